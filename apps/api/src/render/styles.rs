//! Typographic styles: the mapping from block kinds and [`TextStyle`]s to
//! fonts, sizes, colours and vertical spacing.

use crate::cv::blocks::TextStyle;
use crate::render::metrics::FontVariant;

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn grey(level: f32) -> Self {
        Rgb {
            r: level,
            g: level,
            b: level,
        }
    }
}

pub const BLACK: Rgb = Rgb::grey(0.0);
/// `#2E7D32`
pub const ACCENT_GREEN: Rgb = Rgb {
    r: 46.0 / 255.0,
    g: 125.0 / 255.0,
    b: 50.0 / 255.0,
};
/// `#666666`
pub const SUBTITLE_GREY: Rgb = Rgb::grey(102.0 / 255.0);
pub const MUTED_GREY: Rgb = Rgb::grey(0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Everything the layout engine needs to set one paragraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub size_pt: f32,
    /// Variant of runs that carry no bold/italic flags of their own.
    pub base: FontVariant,
    pub color: Rgb,
    /// Line height as a multiple of the font size.
    pub leading: f32,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
    pub align: Align,
}

impl ParagraphStyle {
    const fn body(size_pt: f32) -> Self {
        ParagraphStyle {
            size_pt,
            base: FontVariant::Regular,
            color: BLACK,
            leading: 1.2,
            space_before_pt: 0.0,
            space_after_pt: 6.0,
            align: Align::Left,
        }
    }

    pub fn line_height_mm(&self) -> f32 {
        self.size_pt * self.leading * crate::render::metrics::PT_TO_MM
    }

    /// Resolves the variant for a run given its own flags.
    pub fn variant_for(&self, bold: bool, italic: bool) -> FontVariant {
        FontVariant::from_flags(
            bold || self.base.is_bold(),
            italic || matches!(self.base, FontVariant::Oblique | FontVariant::BoldOblique),
        )
    }
}

pub const TITLE: ParagraphStyle = ParagraphStyle {
    base: FontVariant::Bold,
    color: ACCENT_GREEN,
    space_after_pt: 12.0,
    align: Align::Center,
    ..ParagraphStyle::body(24.0)
};

pub const SUBTITLE: ParagraphStyle = ParagraphStyle {
    color: SUBTITLE_GREY,
    space_after_pt: 20.0,
    align: Align::Center,
    ..ParagraphStyle::body(12.0)
};

pub const SECTION_HEADING: ParagraphStyle = ParagraphStyle {
    base: FontVariant::Bold,
    color: ACCENT_GREEN,
    space_before_pt: 15.0,
    space_after_pt: 10.0,
    ..ParagraphStyle::body(14.0)
};

/// Contact grid cells.
pub const CONTACT_CELL: ParagraphStyle = ParagraphStyle::body(10.0);

/// Horizontal rule under the header.
pub const RULE_THICKNESS_PT: f32 = 2.0;
pub const RULE_COLOR: Rgb = ACCENT_GREEN;
pub const RULE_HEIGHT_MM: f32 = 3.0;

pub fn paragraph_style(style: TextStyle) -> ParagraphStyle {
    match style {
        TextStyle::Body => ParagraphStyle::body(10.0),
        TextStyle::Strong => ParagraphStyle {
            base: FontVariant::Bold,
            ..ParagraphStyle::body(10.0)
        },
        TextStyle::Meta => ParagraphStyle {
            color: MUTED_GREY,
            ..ParagraphStyle::body(9.0)
        },
        TextStyle::Detail => ParagraphStyle::body(9.0),
        TextStyle::Links => ParagraphStyle::body(8.0),
        TextStyle::Footer => ParagraphStyle {
            base: FontVariant::Oblique,
            color: MUTED_GREY,
            align: Align::Center,
            ..ParagraphStyle::body(8.0)
        },
    }
}
