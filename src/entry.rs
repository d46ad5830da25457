//! The normalized entry model and its versioned envelope.
//!
//! Every normalizer produces an [`Envelope`]. The envelope is serialized to
//! JSON inside a [`Record`](crate::models::Record) and decoded again before
//! rendering, so the JSON shape below is a persisted format:
//!
//! ```text
//! v2 summary  {"version":2,"summary":{..},"explain":[..],"verbose":[..]}
//! v2 lexical  {"version":2,"form":"lexical","word":..,"groups":[..]}
//! v1 legacy   {"word":..,"pronounce":[..],"explain":[..],"verbose":[..]}
//! ```
//!
//! Only version 2 is ever produced. Version 1 records (no `version` key)
//! still decode so that old caches stay renderable.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version stamped on every newly normalized envelope.
pub const CURRENT_VERSION: u8 = 2;

const LEXICAL_FORM: &str = "lexical";

/// A versioned, normalized dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    V1(LegacyEntry),
    V2(SummaryEntry),
    Lexical(LexicalEntry),
}

impl Envelope {
    pub fn version(&self) -> u8 {
        match self {
            Envelope::V1(_) => 1,
            Envelope::V2(_) | Envelope::Lexical(_) => CURRENT_VERSION,
        }
    }

    /// Headword as recorded in the entry itself.
    pub fn word(&self) -> &str {
        match self {
            Envelope::V1(entry) => &entry.word,
            Envelope::V2(entry) => &entry.summary.word,
            Envelope::Lexical(entry) => &entry.word,
        }
    }
}

#[derive(Serialize)]
struct Stamped<'a, T> {
    version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    form: Option<&'static str>,
    #[serde(flatten)]
    payload: &'a T,
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::V1(entry) => entry.serialize(serializer),
            Envelope::V2(entry) => Stamped {
                version: CURRENT_VERSION,
                form: None,
                payload: entry,
            }
            .serialize(serializer),
            Envelope::Lexical(entry) => Stamped {
                version: CURRENT_VERSION,
                form: Some(LEXICAL_FORM),
                payload: entry,
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let version = match value.get("version") {
            None => 1,
            Some(v) => v
                .as_u64()
                .ok_or_else(|| de::Error::custom("envelope version must be an integer"))?,
        };
        let form = value.get("form").and_then(Value::as_str).map(str::to_owned);

        let decoded = match (version, form.as_deref()) {
            (1, _) => LegacyEntry::deserialize(value).map(Envelope::V1),
            (2, None) => SummaryEntry::deserialize(value).map(Envelope::V2),
            (2, Some(LEXICAL_FORM)) => LexicalEntry::deserialize(value).map(Envelope::Lexical),
            (2, Some(other)) => {
                return Err(de::Error::custom(format!("unknown envelope form '{}'", other)))
            }
            (v, _) => {
                return Err(de::Error::custom(format!(
                    "unsupported envelope version {}",
                    v
                )))
            }
        };
        decoded.map_err(de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Version 2: scraped summary entries
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub summary: Summary,
    pub explain: Vec<ExplainItem>,
    #[serde(default)]
    pub verbose: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub word: String,
    /// `(label, phonetic)` pairs, e.g. `("KK", "[sɝtʃ]")`.
    #[serde(rename = "pronounce", default)]
    pub pronunciation: Vec<(String, String)>,
    #[serde(default)]
    pub explain: Vec<(ExplainKind, String)>,
    #[serde(default)]
    pub grammar: Vec<String>,
}

/// Classification of one summary explain line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplainKind {
    #[serde(rename = "p")]
    PartOfSpeech,
    #[serde(rename = "e")]
    Explanation,
    #[serde(rename = "?")]
    Unknown,
}

/// One item of the detailed explanation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExplainItem {
    #[serde(rename = "PoS")]
    PartOfSpeechHeader { text: String },
    #[serde(rename = "item")]
    DefinitionItem {
        text: String,
        #[serde(default)]
        sentence: Vec<InlineRun>,
    },
}

/// One unit of a mixed-formatting example sentence.
///
/// Persisted as a bare string for plain text, `"\n"` for a line break, and
/// `["b", text]` for bold text. Plain text that is itself `"\n"` is written
/// as `["t", "\n"]` so it cannot decode as a line break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RunRepr", into = "RunRepr")]
pub enum InlineRun {
    PlainText(String),
    Bold(String),
    LineBreak,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RunRepr {
    Text(String),
    Marked(String, String),
}

const LINE_BREAK: &str = "\n";
const BOLD_MARK: &str = "b";
const TEXT_MARK: &str = "t";

impl From<RunRepr> for InlineRun {
    fn from(repr: RunRepr) -> Self {
        match repr {
            RunRepr::Text(s) if s == LINE_BREAK => InlineRun::LineBreak,
            RunRepr::Text(s) => InlineRun::PlainText(s),
            RunRepr::Marked(mark, s) if mark == BOLD_MARK => InlineRun::Bold(s),
            RunRepr::Marked(_, s) => InlineRun::PlainText(s),
        }
    }
}

impl From<InlineRun> for RunRepr {
    fn from(run: InlineRun) -> Self {
        match run {
            InlineRun::PlainText(s) if s == LINE_BREAK => {
                RunRepr::Marked(TEXT_MARK.to_string(), s)
            }
            InlineRun::PlainText(s) => RunRepr::Text(s),
            InlineRun::Bold(s) => RunRepr::Marked(BOLD_MARK.to_string(), s),
            InlineRun::LineBreak => RunRepr::Text(LINE_BREAK.to_string()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Version 2: structured lexical entries
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalEntry {
    pub word: String,
    pub groups: Vec<LexicalGroup>,
}

/// Senses sharing one grammatical category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalGroup {
    pub category: String,
    #[serde(default)]
    pub pronunciations: Vec<String>,
    #[serde(default)]
    pub senses: Vec<Sense>,
}

/// One meaning node. Each sense owns its subsenses; labels such as `2.1.`
/// are derived from tree position when rendering and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_references: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsenses: Vec<Sense>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub text: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Version 1: legacy entries (decode only)
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyEntry {
    pub word: String,
    #[serde(default)]
    pub pronounce: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default)]
    pub explain: Vec<LegacySpeech>,
    #[serde(default)]
    pub verbose: Vec<LegacySpeech>,
}

/// `[part, [meaning, sentence, ...], ...]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacySpeech {
    pub part: String,
    pub meanings: Vec<LegacyMeaning>,
}

/// A meaning and its example sentences. `*` toggles emphasis in a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyMeaning {
    pub text: String,
    pub sentences: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyCell {
    Text(String),
    Lines(Vec<String>),
}

impl Serialize for LegacySpeech {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(1 + self.meanings.len()))?;
        seq.serialize_element(&self.part)?;
        for meaning in &self.meanings {
            let mut cell = Vec::with_capacity(1 + meaning.sentences.len());
            cell.push(meaning.text.as_str());
            cell.extend(meaning.sentences.iter().map(String::as_str));
            seq.serialize_element(&cell)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for LegacySpeech {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut cells = Vec::<LegacyCell>::deserialize(deserializer)?.into_iter();
        let part = match cells.next() {
            Some(LegacyCell::Text(part)) => part,
            _ => return Err(de::Error::custom("legacy speech must start with its part")),
        };
        let meanings = cells
            .map(|cell| match cell {
                LegacyCell::Lines(lines) => {
                    let mut lines = lines.into_iter();
                    let text = lines.next().unwrap_or_default();
                    Ok(LegacyMeaning {
                        text,
                        sentences: lines.collect(),
                    })
                }
                LegacyCell::Text(_) => Err(de::Error::custom(
                    "legacy meaning must be a list of strings",
                )),
            })
            .collect::<Result<_, _>>()?;
        Ok(LegacySpeech { part, meanings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_v2() -> Envelope {
        Envelope::V2(SummaryEntry {
            summary: Summary {
                word: "search".into(),
                pronunciation: vec![("KK".into(), "[sɝtʃ]".into())],
                explain: vec![
                    (ExplainKind::PartOfSpeech, "vt.".into()),
                    (ExplainKind::Explanation, "搜查".into()),
                ],
                grammar: vec![],
            },
            explain: vec![
                ExplainItem::PartOfSpeechHeader {
                    text: "noun".into(),
                },
                ExplainItem::DefinitionItem {
                    text: "1. a look".into(),
                    sentence: vec![
                        InlineRun::Bold("search".into()),
                        InlineRun::PlainText(" it".into()),
                        InlineRun::LineBreak,
                    ],
                },
            ],
            verbose: vec!["hunt".into()],
        })
    }

    #[test]
    fn v2_wire_shape() {
        let value = serde_json::to_value(sample_v2()).unwrap();
        assert_eq!(value["version"], 2);
        assert!(value.get("form").is_none());
        assert_eq!(value["summary"]["pronounce"], json!([["KK", "[sɝtʃ]"]]));
        assert_eq!(value["summary"]["explain"][0], json!(["p", "vt."]));
        assert_eq!(value["explain"][0], json!({"type": "PoS", "text": "noun"}));
        assert_eq!(
            value["explain"][1]["sentence"],
            json!([["b", "search"], " it", "\n"])
        );
    }

    #[test]
    fn v2_decodes_back() {
        let envelope = sample_v2();
        let text = serde_json::to_string(&envelope).unwrap();
        let decoded: Envelope = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.version(), 2);
    }

    #[test]
    fn lexical_form_is_tagged() {
        let envelope = Envelope::Lexical(LexicalEntry {
            word: "search".into(),
            groups: vec![LexicalGroup {
                category: "Verb".into(),
                pronunciations: vec!["sɜːrtʃ".into()],
                senses: vec![Sense {
                    definitions: Some(vec!["look for".into()]),
                    cross_references: Some(vec!["see seek".into()]),
                    ..Sense::default()
                }],
            }],
        });
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["form"], "lexical");
        assert_eq!(value["groups"][0]["senses"][0]["crossReferences"][0], "see seek");
        assert!(value["groups"][0]["senses"][0].get("regions").is_none());

        let decoded: Envelope = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn unversioned_content_is_legacy() {
        let raw = json!({
            "word": "search",
            "pronounce": [["KK", "[sɝtʃ]"]],
            "explain": [["vt.", ["搜查", "*search* the house 搜查房子"]]],
            "verbose": []
        });
        let envelope: Envelope = serde_json::from_value(raw).unwrap();
        assert_eq!(envelope.version(), 1);
        let Envelope::V1(entry) = envelope else {
            panic!("expected legacy entry");
        };
        assert_eq!(entry.explain[0].part, "vt.");
        assert_eq!(entry.explain[0].meanings[0].text, "搜查");
        assert_eq!(entry.explain[0].meanings[0].sentences.len(), 1);
    }

    #[test]
    fn legacy_speech_serializes_as_nested_lists() {
        let speech = LegacySpeech {
            part: "n.".into(),
            meanings: vec![LegacyMeaning {
                text: "尋找".into(),
                sentences: vec!["a *search*".into()],
            }],
        };
        assert_eq!(
            serde_json::to_value(&speech).unwrap(),
            json!(["n.", ["尋找", "a *search*"]])
        );
    }

    #[test]
    fn newline_text_stays_distinct_from_line_break() {
        let runs = vec![
            InlineRun::Bold("look".into()),
            InlineRun::PlainText("\n".into()),
            InlineRun::LineBreak,
        ];
        let value = serde_json::to_value(&runs).unwrap();
        assert_eq!(value, json!([["b", "look"], ["t", "\n"], "\n"]));
        assert_eq!(serde_json::from_value::<Vec<InlineRun>>(value).unwrap(), runs);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = serde_json::from_value::<Envelope>(json!({"version": 3})).unwrap_err();
        assert!(err.to_string().contains("unsupported envelope version 3"));
    }

    #[test]
    fn unknown_form_is_rejected() {
        let err =
            serde_json::from_value::<Envelope>(json!({"version": 2, "form": "thesaurus"}))
                .unwrap_err();
        assert!(err.to_string().contains("thesaurus"));
    }
}
