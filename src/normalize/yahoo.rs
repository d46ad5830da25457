//! Normalizer for scraped Yahoo dictionary pages.
//!
//! The page layout is irregular: the summary block omits its pronunciation
//! and marker children depending on the word, and example sentences mix plain
//! and bold inline nodes. Everything here is read through CSS selectors
//! with `scraper`.
//!
//! # Regions
//!
//! | Region | Selector | Required |
//! |--------|----------|----------|
//! | Summary | `div#web ol.searchCenterMiddle > li > div` | yes |
//! | Grammar | `div#web ol.searchCenterMiddle div.dictionaryWordCard > ul > li` | no |
//! | Explanation | `div.tab-content-explanation ul li` | yes |
//! | Synonyms | `div.tab-content-synonyms` | no |

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use super::ParseFault;
use crate::entry::{Envelope, ExplainItem, ExplainKind, InlineRun, Summary, SummaryEntry};
use crate::error::DictError;

const SUMMARY_ROOT: &str = "div#web ol.searchCenterMiddle > li > div";
const GRAMMAR_LINES: &str = "div#web ol.searchCenterMiddle div.dictionaryWordCard > ul > li";
const EXPLANATION_ITEMS: &str = "div.tab-content-explanation ul li";
const SYNONYMS_ROOT: &str = "div.tab-content-synonyms";

const POS_CLASS: &str = "pos_button";
const EXPLANATION_CLASS: &str = "dictionaryExplanation";

/// Normalize a Yahoo result page into a version 2 envelope.
pub fn normalize(word: &str, html: &str) -> Result<Envelope, DictError> {
    let document = Html::parse_document(html);
    let summary = parse_summary(&document, word)?;
    let explain = parse_explain(&document, word)?;
    let verbose = parse_verbose(&document);
    Ok(Envelope::V2(SummaryEntry {
        summary,
        explain,
        verbose,
    }))
}

/// Extract the summary block. Fails with `NotFound` when the block is
/// missing or has an unrecognized shape.
pub fn parse_summary(document: &Html, word: &str) -> Result<Summary, DictError> {
    summary(document).map_err(|fault| fault.into_not_found(word))
}

/// Extract the detailed explanation list. Fails with `NotFound` when the
/// region is missing or empty.
pub fn parse_explain(document: &Html, word: &str) -> Result<Vec<ExplainItem>, DictError> {
    explanation(document).map_err(|fault| fault.into_not_found(word))
}

/// Extract synonyms. Never fails; a missing region yields an empty list.
pub fn parse_verbose(document: &Html) -> Vec<String> {
    let Ok(root) = selector(SYNONYMS_ROOT) else {
        return Vec::new();
    };
    document
        .select(&root)
        .next()
        .map(|synonyms| child_elements(synonyms).map(|e| element_text(&e)).collect())
        .unwrap_or_default()
}

/// Which optional children the summary block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryShape {
    /// `[marker, word, pronunciation, audio, explain]`
    Full,
    /// `[marker, word, audio, explain]`
    NoPronunciation,
    /// `[marker, word, explain]`
    Bare,
}

impl SummaryShape {
    pub fn from_child_count(count: usize) -> Option<Self> {
        match count {
            5 => Some(SummaryShape::Full),
            4 => Some(SummaryShape::NoPronunciation),
            3 => Some(SummaryShape::Bare),
            _ => None,
        }
    }
}

/// The summary children, picked out by shape.
#[derive(Debug)]
pub struct SummaryBlocks<'a> {
    pub shape: SummaryShape,
    pub word: ElementRef<'a>,
    pub pronunciation: Option<ElementRef<'a>>,
    pub explain: ElementRef<'a>,
}

impl<'a> SummaryBlocks<'a> {
    fn classify(children: &[ElementRef<'a>]) -> Result<Self, ParseFault> {
        let shape = SummaryShape::from_child_count(children.len())
            .ok_or(ParseFault::SummaryShape(children.len()))?;
        let blocks = match (shape, children) {
            (SummaryShape::Full, [_, word, pron, _, explain]) => SummaryBlocks {
                shape,
                word: *word,
                pronunciation: Some(*pron),
                explain: *explain,
            },
            (SummaryShape::NoPronunciation, [_, word, _, explain])
            | (SummaryShape::Bare, [_, word, explain]) => SummaryBlocks {
                shape,
                word: *word,
                pronunciation: None,
                explain: *explain,
            },
            _ => return Err(ParseFault::SummaryShape(children.len())),
        };
        Ok(blocks)
    }
}

fn summary(document: &Html) -> Result<Summary, ParseFault> {
    let root = document
        .select(&selector(SUMMARY_ROOT)?)
        .next()
        .ok_or(ParseFault::MissingRegion(SUMMARY_ROOT))?;
    let children: Vec<ElementRef> = child_elements(root)
        .filter(|e| e.value().name() == "div")
        .collect();
    let blocks = SummaryBlocks::classify(&children)?;

    let word = blocks
        .word
        .select(&selector("span")?)
        .next()
        .map(|span| element_text(&span))
        .ok_or(ParseFault::MissingRegion("summary word"))?;

    let pronunciation = match blocks.pronunciation {
        Some(block) => pronunciation_pairs(block)?,
        None => Vec::new(),
    };

    Ok(Summary {
        word,
        pronunciation,
        explain: summary_explain(blocks.explain)?,
        grammar: grammar(document)?,
    })
}

fn pronunciation_pairs(block: ElementRef) -> Result<Vec<(String, String)>, ParseFault> {
    let list = block
        .select(&selector("ul")?)
        .next()
        .ok_or(ParseFault::MissingRegion("pronunciation list"))?;
    let text: String = list.text().collect();
    text.split_whitespace()
        .map(|token| {
            pronunciation_pattern()
                .captures(token)
                .map(|caps| (caps[1].to_string(), caps[2].to_string()))
                .ok_or_else(|| ParseFault::Pronunciation(token.to_string()))
        })
        .collect()
}

fn pronunciation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*)(\[.*\])").expect("static pattern compiles"))
}

fn summary_explain(block: ElementRef) -> Result<Vec<(ExplainKind, String)>, ParseFault> {
    let lines = selector("ul > li")?;
    let markers = selector("div")?;
    Ok(block
        .select(&lines)
        .flat_map(|line| line.select(&markers).collect::<Vec<_>>())
        .map(|marker| (explain_kind(marker), element_text(&marker)))
        .collect())
}

fn explain_kind(marker: ElementRef) -> ExplainKind {
    let has_class = |class: &str| marker.value().classes().any(|c| c == class);
    if has_class(POS_CLASS) {
        ExplainKind::PartOfSpeech
    } else if has_class(EXPLANATION_CLASS) {
        ExplainKind::Explanation
    } else {
        ExplainKind::Unknown
    }
}

fn grammar(document: &Html) -> Result<Vec<String>, ParseFault> {
    Ok(document
        .select(&selector(GRAMMAR_LINES)?)
        .map(|line| element_text(&line))
        .collect())
}

fn explanation(document: &Html) -> Result<Vec<ExplainItem>, ParseFault> {
    let items: Vec<ExplainItem> = document
        .select(&selector(EXPLANATION_ITEMS)?)
        .map(explain_item)
        .collect::<Result<_, _>>()?;
    if items.is_empty() {
        return Err(ParseFault::EmptyExplanation);
    }
    Ok(items)
}

fn explain_item(node: ElementRef) -> Result<ExplainItem, ParseFault> {
    let text = element_text(&node);
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(ExplainItem::PartOfSpeechHeader { text });
    }

    let span = selector("span")?;
    let definition = node
        .select(&span)
        .next()
        .map(|s| element_text(&s))
        .unwrap_or(text);

    let mut sentence = Vec::new();
    for paragraph in node.select(&selector("p")?) {
        let Some(inline) = paragraph.select(&span).next() else {
            continue;
        };
        sentence.extend(reflow(inline_runs(inline)));
    }

    Ok(ExplainItem::DefinitionItem {
        text: definition,
        sentence,
    })
}

fn inline_runs(span: ElementRef) -> Vec<InlineRun> {
    span.children()
        .filter_map(|child| {
            if let Some(element) = ElementRef::wrap(child) {
                let text = markup_whitespace(&element.text().collect::<String>());
                match element.value().name() {
                    "b" | "strong" => Some(InlineRun::Bold(text)),
                    _ => Some(InlineRun::PlainText(text)),
                }
            } else {
                child
                    .value()
                    .as_text()
                    .map(|t| InlineRun::PlainText(markup_whitespace(&t.text)))
            }
        })
        .collect()
}

/// Source line breaks in a text node are layout, not content.
fn markup_whitespace(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Normalize where an example sentence wraps.
///
/// A trailing plain-text run is split at its last space into
/// `[head, LineBreak, tail]`, then a terminal `LineBreak` is appended.
/// Sentences that already end in a `LineBreak` are returned unchanged, so
/// applying this twice is the same as applying it once. An empty sentence
/// (an empty span) stays empty: it contributes no runs and no `LineBreak`.
pub fn reflow(mut runs: Vec<InlineRun>) -> Vec<InlineRun> {
    if matches!(runs.last(), None | Some(InlineRun::LineBreak)) {
        return runs;
    }
    if let Some(InlineRun::PlainText(text)) = runs.last() {
        let (head, tail) = match text.rsplit_once(' ') {
            Some((head, tail)) => (head.to_string(), tail.to_string()),
            None => (String::new(), text.clone()),
        };
        runs.pop();
        runs.extend([
            InlineRun::PlainText(head),
            InlineRun::LineBreak,
            InlineRun::PlainText(tail),
        ]);
    }
    runs.push(InlineRun::LineBreak);
    runs
}

fn selector(css: &'static str) -> Result<Selector, ParseFault> {
    Selector::parse(css).map_err(|_| ParseFault::Selector(css))
}

fn child_elements<'a>(parent: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    parent.children().filter_map(ElementRef::wrap)
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
