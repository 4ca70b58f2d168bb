//! Layout engine: word-wraps content blocks and paginates them into a display
//! list of positioned draw operations, one list per page.
//!
//! Coordinates are millimetres with the origin at the bottom-left corner of the
//! page (PDF convention); text positions are baselines.
//!
//! # Pagination rules
//! - Lines flow top to bottom and break onto a new page when they do not fit.
//! - A keep-together group that does not fit the remaining space but does fit
//!   an empty page starts a new page. A group taller than a page flows line by
//!   line.
//! - A section heading is kept with the block that follows it.
//! - Vertical gaps are dropped at the top of a page.

use serde::{Deserialize, Serialize};

use crate::cv::blocks::{ContactCell, ContactRow, ContentBlock, Paragraph, TextRun};
use crate::render::metrics::{measure_mm, space_mm, FontVariant, PT_TO_MM};
use crate::render::styles::{self, Align, ParagraphStyle, Rgb};

/// Absorbs float error when comparing heights against the remaining space.
const FIT_EPSILON_MM: f32 = 0.01;

/// Fraction of the font size below the baseline reserved for descenders.
const DESCENT_EM: f32 = 0.2;

/// Horizontal padding between the two contact grid columns.
const GRID_GUTTER_MM: f32 = 4.0;

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_top_mm: f32,
    pub margin_bottom_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
}

impl PageConfig {
    pub fn content_width_mm(&self) -> f32 {
        self.width_mm - self.margin_left_mm - self.margin_right_mm
    }

    pub fn content_height_mm(&self) -> f32 {
        self.height_mm - self.margin_top_mm - self.margin_bottom_mm
    }
}

/// A4 portrait with 2 cm margins on every side.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_top_mm: 20.0,
        margin_bottom_mm: 20.0,
        margin_left_mm: 20.0,
        margin_right_mm: 20.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Display list
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        variant: FontVariant,
        size_pt: f32,
        color: Rgb,
        x_mm: f32,
        y_mm: f32,
    },
    Rule {
        x1_mm: f32,
        x2_mm: f32,
        y_mm: f32,
        thickness_pt: f32,
        color: Rgb,
    },
}

impl DrawOp {
    /// Moves an op whose `y_mm` is an offset below a line's top edge onto the
    /// page, given that top edge's page coordinate.
    fn placed(mut self, top_y_mm: f32) -> Self {
        match &mut self {
            DrawOp::Text { y_mm, .. } | DrawOp::Rule { y_mm, .. } => *y_mm = top_y_mm - *y_mm,
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

// ────────────────────────────────────────────────────────────────────────────
// Word wrap
// ────────────────────────────────────────────────────────────────────────────

/// A word plus whether it was separated from the previous word by whitespace.
struct Piece {
    text: String,
    variant: FontVariant,
    space_before: bool,
}

fn pieces(runs: &[TextRun], style: &ParagraphStyle) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut pending_space = false;

    for run in runs {
        let variant = style.variant_for(run.bold, run.italic);
        if run.text.starts_with(char::is_whitespace) {
            pending_space = true;
        }
        for word in run.text.split_whitespace() {
            out.push(Piece {
                text: word.to_string(),
                variant,
                space_before: pending_space,
            });
            pending_space = true;
        }
        // A run with no words carries the pending separator through.
        pending_space = run.text.ends_with(char::is_whitespace)
            || (pending_space && run.text.trim().is_empty());
    }
    out
}

/// A same-font stretch of text within a wrapped line.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub variant: FontVariant,
    /// Offset from the start of the line.
    pub x_mm: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub segments: Vec<Segment>,
    pub width_mm: f32,
}

/// Greedy word wrap of styled runs into lines no wider than `max_width_mm`.
///
/// A single word wider than the line is placed alone and allowed to overflow.
pub fn wrap_runs(runs: &[TextRun], style: &ParagraphStyle, max_width_mm: f32) -> Vec<WrappedLine> {
    let size = style.size_pt;
    let mut lines = Vec::new();
    let mut current: Vec<Segment> = Vec::new();
    let mut current_width = 0.0_f32;

    for piece in pieces(runs, style) {
        let word_w = measure_mm(&piece.text, piece.variant, size);
        let mut space_w = if current.is_empty() || !piece.space_before {
            0.0
        } else {
            space_mm(piece.variant, size)
        };

        if !current.is_empty() && current_width + space_w + word_w > max_width_mm + FIT_EPSILON_MM
        {
            lines.push(WrappedLine {
                segments: std::mem::take(&mut current),
                width_mm: current_width,
            });
            current_width = 0.0;
            space_w = 0.0;
        }

        match current.last_mut() {
            Some(last) if last.variant == piece.variant => {
                if space_w > 0.0 {
                    last.text.push(' ');
                }
                last.text.push_str(&piece.text);
            }
            _ => {
                let mut text = piece.text;
                let mut x_mm = current_width + space_w;
                // A space before a font switch is drawn in the new font.
                if space_w > 0.0 {
                    text.insert(0, ' ');
                    x_mm = current_width;
                }
                current.push(Segment {
                    text,
                    variant: piece.variant,
                    x_mm,
                });
            }
        }
        current_width += space_w + word_w;
    }

    if !current.is_empty() {
        lines.push(WrappedLine {
            segments: current,
            width_mm: current_width,
        });
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks → flow items
// ────────────────────────────────────────────────────────────────────────────

/// One unbreakable horizontal strip. Op `y_mm` values are offsets below the
/// strip's top edge until the strip is placed.
#[derive(Debug, Clone)]
struct Strip {
    height_mm: f32,
    ops: Vec<DrawOp>,
}

#[derive(Debug, Clone)]
enum Item {
    Strip(Strip),
    Gap(f32),
    Group(Vec<Item>),
}

impl Item {
    fn height_mm(&self) -> f32 {
        match self {
            Item::Strip(s) => s.height_mm,
            Item::Gap(h) => *h,
            Item::Group(items) => items.iter().map(Item::height_mm).sum(),
        }
    }
}

fn baseline_offset_mm(style: &ParagraphStyle) -> f32 {
    style.line_height_mm() - DESCENT_EM * style.size_pt * PT_TO_MM
}

/// Text ops for one wrapped line, positioned relative to the strip's top edge.
fn line_ops(
    line: &WrappedLine,
    style: &ParagraphStyle,
    x0_mm: f32,
    width_mm: f32,
    top_offset_mm: f32,
) -> Vec<DrawOp> {
    let align_offset = match style.align {
        Align::Left => 0.0,
        Align::Center => ((width_mm - line.width_mm) / 2.0).max(0.0),
    };
    line.segments
        .iter()
        .map(|seg| DrawOp::Text {
            text: seg.text.clone(),
            variant: seg.variant,
            size_pt: style.size_pt,
            color: style.color,
            x_mm: x0_mm + align_offset + seg.x_mm,
            y_mm: top_offset_mm + baseline_offset_mm(style),
        })
        .collect()
}

fn paragraph_items(runs: &[TextRun], style: &ParagraphStyle, config: &PageConfig) -> Vec<Item> {
    let width = config.content_width_mm();
    let mut items = Vec::new();
    if style.space_before_pt > 0.0 {
        items.push(Item::Gap(style.space_before_pt * PT_TO_MM));
    }
    for line in wrap_runs(runs, style, width) {
        items.push(Item::Strip(Strip {
            height_mm: style.line_height_mm(),
            ops: line_ops(&line, style, config.margin_left_mm, width, 0.0),
        }));
    }
    if style.space_after_pt > 0.0 {
        items.push(Item::Gap(style.space_after_pt * PT_TO_MM));
    }
    items
}

fn cell_runs(cell: &ContactCell) -> Vec<TextRun> {
    vec![
        TextRun::bold(format!("{}:", cell.label)),
        TextRun::plain(format!(" {}", cell.value)),
    ]
}

fn contact_row_items(row: &ContactRow, config: &PageConfig) -> Vec<Item> {
    let style = styles::CONTACT_CELL;
    let column_width = config.content_width_mm() / 2.0;
    let line_h = style.line_height_mm();

    let mut ops = Vec::new();
    let mut max_lines = 0;
    for (index, cell) in [&row.left, &row.right].into_iter().enumerate() {
        let Some(cell) = cell else { continue };
        let x0 = config.margin_left_mm + column_width * index as f32;
        let lines = wrap_runs(&cell_runs(cell), &style, column_width - GRID_GUTTER_MM);
        for (n, line) in lines.iter().enumerate() {
            ops.extend(line_ops(line, &style, x0, column_width, n as f32 * line_h));
        }
        max_lines = max_lines.max(lines.len());
    }

    vec![
        Item::Strip(Strip {
            height_mm: max_lines.max(1) as f32 * line_h,
            ops,
        }),
        Item::Gap(style.space_after_pt * PT_TO_MM),
    ]
}

fn rule_item(config: &PageConfig) -> Item {
    Item::Strip(Strip {
        height_mm: styles::RULE_HEIGHT_MM,
        ops: vec![DrawOp::Rule {
            x1_mm: config.margin_left_mm,
            x2_mm: config.margin_left_mm + config.content_width_mm(),
            y_mm: styles::RULE_HEIGHT_MM / 2.0,
            thickness_pt: styles::RULE_THICKNESS_PT,
            color: styles::RULE_COLOR,
        }],
    })
}

fn block_items(block: &ContentBlock, config: &PageConfig) -> Vec<Item> {
    match block {
        ContentBlock::Title { text } => {
            paragraph_items(&[TextRun::plain(text.as_str())], &styles::TITLE, config)
        }
        ContentBlock::Subtitle { text } => {
            paragraph_items(&[TextRun::plain(text.as_str())], &styles::SUBTITLE, config)
        }
        ContentBlock::SectionHeading { text } => paragraph_items(
            &[TextRun::plain(text.as_str())],
            &styles::SECTION_HEADING,
            config,
        ),
        ContentBlock::ContactGrid { rows } => rows
            .iter()
            .flat_map(|row| contact_row_items(row, config))
            .collect(),
        ContentBlock::Rule => vec![rule_item(config)],
        ContentBlock::Paragraph(Paragraph { style, runs }) => {
            paragraph_items(runs, &styles::paragraph_style(*style), config)
        }
        ContentBlock::Spacer { height_cm } => vec![Item::Gap(height_cm * 10.0)],
        ContentBlock::KeepTogether { blocks } => vec![Item::Group(
            blocks.iter().flat_map(|b| block_items(b, config)).collect(),
        )],
    }
}

fn flow_items(blocks: &[ContentBlock], config: &PageConfig) -> Vec<Item> {
    let mut items = Vec::new();
    let mut iter = blocks.iter();

    while let Some(block) = iter.next() {
        let mut current = block_items(block, config);
        if matches!(block, ContentBlock::SectionHeading { .. }) {
            if let Some(next) = iter.next() {
                current.extend(block_items(next, config));
            }
            items.push(Item::Group(current));
        } else {
            items.extend(current);
        }
    }
    items
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

struct Paginator<'a> {
    config: &'a PageConfig,
    pages: Vec<Page>,
    /// Distance already consumed below the top margin of the current page.
    cursor_mm: f32,
}

impl<'a> Paginator<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: vec![Page::default()],
            cursor_mm: 0.0,
        }
    }

    fn at_page_top(&self) -> bool {
        self.cursor_mm <= FIT_EPSILON_MM
    }

    fn remaining_mm(&self) -> f32 {
        self.config.content_height_mm() - self.cursor_mm
    }

    fn fits(&self, height_mm: f32) -> bool {
        height_mm <= self.remaining_mm() + FIT_EPSILON_MM
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_mm = 0.0;
    }

    fn place(&mut self, item: Item) {
        match item {
            Item::Gap(h) => {
                if self.at_page_top() {
                    return;
                }
                if self.fits(h) {
                    self.cursor_mm += h;
                } else {
                    self.new_page();
                }
            }
            Item::Strip(strip) => {
                if !self.fits(strip.height_mm) && !self.at_page_top() {
                    self.new_page();
                }
                let top_y = self.config.height_mm - self.config.margin_top_mm - self.cursor_mm;
                if let Some(page) = self.pages.last_mut() {
                    page.ops
                        .extend(strip.ops.into_iter().map(|op| op.placed(top_y)));
                }
                self.cursor_mm += strip.height_mm;
            }
            Item::Group(items) => {
                let height: f32 = items.iter().map(Item::height_mm).sum();
                let fits_empty_page = height <= self.config.content_height_mm() + FIT_EPSILON_MM;
                if !self.fits(height) && fits_empty_page && !self.at_page_top() {
                    self.new_page();
                }
                for item in items {
                    self.place(item);
                }
            }
        }
    }
}

/// Lays out `blocks` onto pages. Always returns at least one page.
pub fn paginate(blocks: &[ContentBlock], config: &PageConfig) -> Vec<Page> {
    let mut paginator = Paginator::new(config);
    for item in flow_items(blocks, config) {
        paginator.place(item);
    }
    paginator.pages
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
