//! Content blocks: the formatter's output and the renderer's input.
//!
//! Blocks carry semantics (a heading, a metadata line) and never geometry.
//! Fonts, sizes, colours and page breaks are decided by the renderer from the
//! [`TextStyle`] of each paragraph.

use serde::{Deserialize, Serialize};

/// Paragraph style. The renderer maps each to a font, size, colour and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    /// Regular justified body text.
    Body,
    /// Body text set in bold (record titles, skill category labels).
    Strong,
    /// Small grey line under a record title (dates, location, status).
    Meta,
    /// Small body text (technology lists).
    Detail,
    /// Extra-small text (project links).
    Links,
    /// Small, grey, italic, centred.
    Footer,
}

/// A run of text within a paragraph sharing one font variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub style: TextStyle,
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    pub fn new(style: TextStyle, runs: Vec<TextRun>) -> Self {
        Self { style, runs }
    }

    /// A single-run paragraph in the given style.
    pub fn text(style: TextStyle, text: impl Into<String>) -> Self {
        Self::new(style, vec![TextRun::plain(text)])
    }

    /// The paragraph's text without formatting.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// One `Label: value` cell of the header contact grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCell {
    pub label: String,
    pub value: String,
}

/// A two-column contact row. An absent cell renders as blank space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRow {
    pub left: Option<ContactCell>,
    pub right: Option<ContactCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Document title (the upper-cased full name).
    Title { text: String },
    /// Line under the title (professional title).
    Subtitle { text: String },
    /// Two-column key/value grid.
    ContactGrid { rows: Vec<ContactRow> },
    /// Full-width horizontal rule.
    Rule,
    /// Section heading.
    SectionHeading { text: String },
    Paragraph(Paragraph),
    /// Vertical space, in centimetres.
    Spacer { height_cm: f32 },
    /// Blocks that must not be split across a page break.
    KeepTogether { blocks: Vec<ContentBlock> },
}

impl ContentBlock {
    pub fn spacer(height_cm: f32) -> Self {
        ContentBlock::Spacer { height_cm }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        ContentBlock::SectionHeading { text: text.into() }
    }

    pub fn paragraph(style: TextStyle, text: impl Into<String>) -> Self {
        ContentBlock::Paragraph(Paragraph::text(style, text))
    }

    /// All text carried by the block and its children, one entry per line.
    pub fn texts(&self) -> Vec<String> {
        match self {
            ContentBlock::Title { text }
            | ContentBlock::Subtitle { text }
            | ContentBlock::SectionHeading { text } => vec![text.clone()],
            ContentBlock::ContactGrid { rows } => rows
                .iter()
                .flat_map(|r| [&r.left, &r.right])
                .flatten()
                .map(|c| format!("{}: {}", c.label, c.value))
                .collect(),
            ContentBlock::Paragraph(p) => vec![p.plain_text()],
            ContentBlock::Rule | ContentBlock::Spacer { .. } => Vec::new(),
            ContentBlock::KeepTogether { blocks } => {
                blocks.iter().flat_map(ContentBlock::texts).collect()
            }
        }
    }
}
