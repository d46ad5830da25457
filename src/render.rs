//! Rendering normalized entries into styled text operations.
//!
//! [`render`] walks an [`Envelope`] and returns an ordered list of [`Emit`]
//! operations. It performs no I/O; a [`Presenter`](crate::present::Presenter)
//! executes the operations against a terminal or a buffer.
//!
//! Three strategies exist, chosen by the envelope variant:
//!
//! | Variant | Layout |
//! |---------|--------|
//! | `V2` | summary (word, pronunciation, inline/blocked explain, grammar), then explanation list with example sentences |
//! | `Lexical` | category headers with numbered, recursively nested senses |
//! | `V1` | legacy speeches with `*`-delimited emphasis |
//!
//! Sense labels such as `2.1.` are computed here from tree position.

use crate::entry::{
    Envelope, ExplainItem, ExplainKind, InlineRun, LegacyEntry, LegacySpeech, LexicalEntry, Sense,
    SummaryEntry,
};

/// Visual role of an emitted fragment. Presenters map these to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Plain,
    Word,
    Phonetic,
    PartOfSpeech,
    Meaning,
    Example,
    ExampleEmphasis,
    Label,
    Region,
    Register,
    Domain,
    Note,
}

/// What follows an emitted fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    Newline,
    Space,
    Nothing,
}

impl LineEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnd::Newline => "\n",
            LineEnd::Space => " ",
            LineEnd::Nothing => "",
        }
    }
}

/// One styled text operation: `indent` spaces, `text`, then `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emit {
    pub text: String,
    pub style: Style,
    pub indent: usize,
    pub end: LineEnd,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Include synonyms (v2) or verbose speeches (v1).
    pub verbose: bool,
}

#[derive(Default)]
struct Output {
    ops: Vec<Emit>,
}

impl Output {
    fn emit(&mut self, text: impl Into<String>, style: Style, indent: usize, end: LineEnd) {
        self.ops.push(Emit {
            text: text.into(),
            style,
            indent,
            end,
        });
    }

    fn line(&mut self, text: impl Into<String>, style: Style) {
        self.emit(text, style, 0, LineEnd::Newline);
    }

    fn newline(&mut self) {
        self.emit("", Style::Plain, 0, LineEnd::Newline);
    }
}

/// Render an entry looked up as `word`.
pub fn render(word: &str, envelope: &Envelope, options: &RenderOptions) -> Vec<Emit> {
    let mut out = Output::default();
    match envelope {
        Envelope::V1(entry) => render_legacy(&mut out, entry, options),
        Envelope::V2(entry) => render_summary(&mut out, entry, options),
        Envelope::Lexical(entry) => render_lexical(&mut out, word, entry),
    }
    out.ops
}

fn render_summary(out: &mut Output, entry: &SummaryEntry, options: &RenderOptions) {
    let summary = &entry.summary;
    out.line(&summary.word, Style::Word);

    for (label, phonetic) in &summary.pronunciation {
        out.emit(label, Style::Plain, 0, LineEnd::Nothing);
        out.emit(phonetic, Style::Phonetic, 0, LineEnd::Space);
    }
    if !summary.pronunciation.is_empty() {
        out.newline();
    }

    // Explanations start a block; part-of-speech and unknown lines stay
    // inline, so the explanation right after them is not indented.
    let mut pending_indent = true;
    for (kind, text) in &summary.explain {
        let indent = if pending_indent { 2 } else { 0 };
        match kind {
            ExplainKind::Explanation => {
                out.emit(text, Style::Plain, indent, LineEnd::Newline);
                pending_indent = true;
            }
            ExplainKind::PartOfSpeech => {
                out.emit(text, Style::PartOfSpeech, indent, LineEnd::Space);
                pending_indent = false;
            }
            ExplainKind::Unknown => {
                out.emit(text, Style::Plain, indent, LineEnd::Space);
                pending_indent = false;
            }
        }
    }

    if !summary.grammar.is_empty() {
        out.newline();
    }
    for line in &summary.grammar {
        out.emit(line, Style::Plain, 2, LineEnd::Newline);
    }

    if !entry.explain.is_empty() {
        out.newline();
    }
    for item in &entry.explain {
        match item {
            ExplainItem::PartOfSpeechHeader { text } => out.line(text, Style::PartOfSpeech),
            ExplainItem::DefinitionItem { text, sentence } => {
                out.emit(text, Style::Plain, 2, LineEnd::Newline);
                render_sentence(out, sentence);
            }
        }
    }

    if options.verbose && !entry.verbose.is_empty() {
        out.newline();
        for synonym in &entry.verbose {
            out.emit(synonym, Style::Meaning, 2, LineEnd::Newline);
        }
    }

    out.newline();
}

fn render_sentence(out: &mut Output, sentence: &[InlineRun]) {
    let mut pending_indent = true;
    for run in sentence {
        let indent = if pending_indent { 4 } else { 0 };
        match run {
            InlineRun::PlainText(text) => out.emit(text, Style::Example, indent, LineEnd::Nothing),
            InlineRun::Bold(text) => {
                out.emit(text, Style::ExampleEmphasis, indent, LineEnd::Nothing)
            }
            InlineRun::LineBreak => {
                out.newline();
                pending_indent = true;
                continue;
            }
        }
        pending_indent = false;
    }
}

fn render_lexical(out: &mut Output, word: &str, entry: &LexicalEntry) {
    out.line(word, Style::Word);

    for group in &entry.groups {
        out.newline();
        out.emit(&group.category, Style::PartOfSpeech, 0, LineEnd::Nothing);
        if group.pronunciations.is_empty() {
            out.newline();
        } else {
            let joined = group
                .pronunciations
                .iter()
                .map(|p| format!("/{}/", p))
                .collect::<Vec<_>>()
                .join("  ");
            out.emit(format!("  {}", joined), Style::Phonetic, 0, LineEnd::Newline);
        }

        // Numbering restarts for every lexical group.
        for (idx, sense) in group.senses.iter().enumerate() {
            render_sense(out, sense, &format!("{}.", idx + 1), 1);
        }
    }

    out.newline();
}

fn render_sense(out: &mut Output, sense: &Sense, label: &str, depth: usize) {
    out.newline();
    out.emit(label, Style::Label, depth, LineEnd::Space);

    if let Some(regions) = &sense.regions {
        out.emit(format!("({})", regions.join(", ")), Style::Region, 0, LineEnd::Space);
    }
    if let Some(registers) = &sense.registers {
        out.emit(registers.join(", "), Style::Register, 0, LineEnd::Space);
    }
    if let Some(domains) = &sense.domains {
        out.emit(format!("({})", domains.join(", ")), Style::Domain, 0, LineEnd::Space);
    }
    if let Some(notes) = &sense.notes {
        out.emit(format!("[{}]", notes.join(", ")), Style::Note, 0, LineEnd::Space);
    }
    if let Some(definitions) = &sense.definitions {
        out.emit(definitions.join(". "), Style::Plain, 0, LineEnd::Newline);
    }
    if let Some(references) = &sense.cross_references {
        out.emit(references.join(". "), Style::Plain, 0, LineEnd::Newline);
    }

    for example in &sense.examples {
        out.newline();
        out.emit(&example.text, Style::Example, example_indent(depth), LineEnd::Newline);
    }

    for (idx, subsense) in sense.subsenses.iter().enumerate() {
        let child_label = format!("{}{}.", label, idx + 1);
        render_sense(out, subsense, &child_label, depth + 1);
    }
}

/// Examples sit under the label, two columns past the label's own indent
/// and again past the sense depth.
fn example_indent(depth: usize) -> usize {
    (depth + 1) + 2 + (depth + 2)
}

fn render_legacy(out: &mut Output, entry: &LegacyEntry, options: &RenderOptions) {
    out.line(&entry.word, Style::Word);

    for (label, phonetic) in &entry.pronounce {
        out.emit(label, Style::Plain, 0, LineEnd::Nothing);
        out.emit(phonetic, Style::Phonetic, 0, LineEnd::Space);
    }
    out.newline();

    let verbose: &[LegacySpeech] = if options.verbose { &entry.verbose } else { &[] };
    for speech in entry.explain.iter().chain(verbose) {
        out.line(&speech.part, Style::PartOfSpeech);
        for meaning in &speech.meanings {
            out.emit(&meaning.text, Style::Meaning, 2, LineEnd::Newline);
            for sentence in meaning.sentences.iter().filter(|s| !s.is_empty()) {
                for (idx, segment) in sentence.split('*').enumerate() {
                    let style = if idx % 2 == 1 {
                        Style::ExampleEmphasis
                    } else {
                        Style::Example
                    };
                    let indent = if idx == 0 { 4 } else { 0 };
                    out.emit(segment, style, indent, LineEnd::Nothing);
                }
                out.newline();
            }
        }
    }

    out.newline();
}
