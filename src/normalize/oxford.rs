//! Normalizer for Oxford Dictionaries API payloads.
//!
//! The payload is already entry-shaped, so this is mostly a schema mapping:
//! each `lexicalEntries[]` item becomes one [`LexicalGroup`], and the senses
//! of all its `entries[]` are concatenated in order so numbering can restart
//! per group.

use serde::Deserialize;
use serde_json::Value;

use super::ParseFault;
use crate::entry::{Envelope, Example, LexicalEntry, LexicalGroup, Sense};
use crate::error::DictError;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<ApiHeadword>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiHeadword {
    #[serde(default)]
    lexical_entries: Vec<ApiLexicalEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiLexicalEntry {
    lexical_category: String,
    #[serde(default)]
    pronunciations: Vec<ApiPronunciation>,
    #[serde(default)]
    entries: Vec<ApiEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPronunciation {
    phonetic_spelling: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default)]
    senses: Vec<ApiSense>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSense {
    regions: Option<Vec<String>>,
    registers: Option<Vec<String>>,
    domains: Option<Vec<String>>,
    notes: Option<Vec<ApiNote>>,
    definitions: Option<Vec<String>>,
    cross_reference_markers: Option<Vec<String>>,
    #[serde(default)]
    examples: Vec<Example>,
    #[serde(default)]
    subsenses: Vec<ApiSense>,
}

#[derive(Debug, Deserialize)]
struct ApiNote {
    text: String,
}

impl From<ApiSense> for Sense {
    fn from(api: ApiSense) -> Self {
        Sense {
            regions: api.regions,
            registers: api.registers,
            domains: api.domains,
            notes: api
                .notes
                .map(|notes| notes.into_iter().map(|n| n.text).collect()),
            definitions: api.definitions,
            cross_references: api.cross_reference_markers,
            examples: api.examples,
            subsenses: api.subsenses.into_iter().map(Sense::from).collect(),
        }
    }
}

impl From<ApiLexicalEntry> for LexicalGroup {
    fn from(api: ApiLexicalEntry) -> Self {
        LexicalGroup {
            category: api.lexical_category,
            pronunciations: api
                .pronunciations
                .into_iter()
                .filter_map(|p| p.phonetic_spelling)
                .collect(),
            senses: api
                .entries
                .into_iter()
                .flat_map(|entry| entry.senses)
                .map(Sense::from)
                .collect(),
        }
    }
}

/// Wrap an Oxford payload into a lexical envelope.
pub fn normalize(word: &str, payload: Value) -> Result<Envelope, DictError> {
    lexical_entry(word, payload).map_err(|fault| fault.into_not_found(word))
}

fn lexical_entry(word: &str, payload: Value) -> Result<Envelope, ParseFault> {
    let response: ApiResponse =
        serde_json::from_value(payload).map_err(|e| ParseFault::Payload(e.to_string()))?;
    let groups: Vec<LexicalGroup> = response
        .results
        .into_iter()
        .flat_map(|headword| headword.lexical_entries)
        .map(LexicalGroup::from)
        .collect();
    if groups.is_empty() {
        return Err(ParseFault::MissingRegion("results[].lexicalEntries"));
    }
    Ok(Envelope::Lexical(LexicalEntry {
        word: word.to_string(),
        groups,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "metadata": {"provider": "Oxford University Press"},
            "results": [{
                "id": "search",
                "lexicalEntries": [
                    {
                        "lexicalCategory": "Verb",
                        "pronunciations": [{"phoneticSpelling": "səːtʃ", "audioFile": "x.mp3"}],
                        "entries": [
                            {"senses": [
                                {"definitions": ["try to find something"],
                                 "examples": [{"text": "I searched for my keys"}]},
                                {"definitions": ["examine thoroughly"],
                                 "regions": ["British"],
                                 "notes": [{"text": "with object", "type": "grammaticalNote"}],
                                 "subsenses": [{"definitions": ["look into"],
                                                "crossReferenceMarkers": ["see probe"]}]}
                            ]},
                            {"senses": [{"definitions": ["third"]}]}
                        ]
                    },
                    {
                        "lexicalCategory": "Noun",
                        "entries": [{"senses": [{"definitions": ["an act of searching"]}]}]
                    }
                ]
            }]
        })
    }

    #[test]
    fn groups_follow_lexical_entries() {
        let Envelope::Lexical(entry) = normalize("search", payload()).unwrap() else {
            panic!("expected lexical envelope");
        };
        assert_eq!(entry.word, "search");
        assert_eq!(entry.groups.len(), 2);
        assert_eq!(entry.groups[0].category, "Verb");
        assert_eq!(entry.groups[0].pronunciations, vec!["səːtʃ"]);
        assert!(entry.groups[1].pronunciations.is_empty());
    }

    #[test]
    fn senses_of_all_entries_are_concatenated() {
        let Envelope::Lexical(entry) = normalize("search", payload()).unwrap() else {
            panic!("expected lexical envelope");
        };
        let senses = &entry.groups[0].senses;
        assert_eq!(senses.len(), 3);
        assert_eq!(senses[2].definitions.as_deref(), Some(&["third".to_string()][..]));
    }

    #[test]
    fn sense_fields_are_mapped() {
        let Envelope::Lexical(entry) = normalize("search", payload()).unwrap() else {
            panic!("expected lexical envelope");
        };
        let sense = &entry.groups[0].senses[1];
        assert_eq!(sense.regions, Some(vec!["British".to_string()]));
        assert_eq!(sense.notes, Some(vec!["with object".to_string()]));
        assert_eq!(sense.registers, None);
        assert_eq!(
            sense.subsenses[0].cross_references,
            Some(vec!["see probe".to_string()])
        );
        assert_eq!(
            entry.groups[0].senses[0].examples[0].text,
            "I searched for my keys"
        );
    }

    #[test]
    fn empty_results_are_not_found() {
        let err = normalize("fabor", json!({"results": []})).unwrap_err();
        assert_eq!(err, DictError::NotFound("fabor".into()));
    }

    #[test]
    fn wrong_schema_is_not_found() {
        let err = normalize("fabor", json!({"results": "nope"})).unwrap_err();
        assert_eq!(err, DictError::NotFound("fabor".into()));
    }
}
