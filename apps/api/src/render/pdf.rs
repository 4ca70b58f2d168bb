//! PDF emission via `printpdf`: draws a paginated display list onto A4 pages
//! with the built-in Helvetica fonts.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};

use crate::errors::AppError;
use crate::render::layout::{DrawOp, Page, PageConfig};
use crate::render::metrics::FontVariant;
use crate::render::styles::Rgb;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    bold_oblique: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, AppError> {
        let add = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| AppError::Render(format!("PDF font error: {e}")))
        };
        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            oblique: add(BuiltinFont::HelveticaOblique)?,
            bold_oblique: add(BuiltinFont::HelveticaBoldOblique)?,
        })
    }

    fn get(&self, variant: FontVariant) -> &IndirectFontRef {
        match variant {
            FontVariant::Regular => &self.regular,
            FontVariant::Bold => &self.bold,
            FontVariant::Oblique => &self.oblique,
            FontVariant::BoldOblique => &self.bold_oblique,
        }
    }
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(color.r, color.g, color.b, None))
}

fn draw(layer: &PdfLayerReference, op: &DrawOp, fonts: &Fonts) {
    match op {
        DrawOp::Text {
            text,
            variant,
            size_pt,
            color,
            x_mm,
            y_mm,
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text.as_str(), *size_pt, Mm(*x_mm), Mm(*y_mm), fonts.get(*variant));
        }
        DrawOp::Rule {
            x1_mm,
            x2_mm,
            y_mm,
            thickness_pt,
            color,
        } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*thickness_pt);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1_mm), Mm(*y_mm)), false),
                    (Point::new(Mm(*x2_mm), Mm(*y_mm)), false),
                ],
                is_closed: false,
            });
        }
    }
}

/// Writes `pages` into a new PDF document and returns its bytes.
pub fn write_pdf(pages: &[Page], title: &str, config: &PageConfig) -> Result<Vec<u8>, AppError> {
    let width = Mm(config.width_mm);
    let height = Mm(config.height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let fonts = Fonts::load(&doc)?;

    let mut targets = vec![(first_page, first_layer)];
    for n in 1..pages.len() {
        targets.push(doc.add_page(width, height, format!("Layer {}", n + 1)));
    }

    for (page, (page_index, layer_index)) in pages.iter().zip(targets) {
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for op in &page.ops {
            draw(&layer, op, &fonts);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| AppError::Render(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| AppError::Render(format!("PDF buffer error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::default_page_config;
    use crate::render::styles::BLACK;

    #[test]
    fn test_blank_document_is_a_pdf() {
        let bytes = write_pdf(&[Page::default()], "CV", &default_page_config()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_multi_page_document_is_a_pdf() {
        let page = Page {
            ops: vec![DrawOp::Text {
                text: "Experiencia".to_string(),
                variant: FontVariant::Bold,
                size_pt: 10.0,
                color: BLACK,
                x_mm: 20.0,
                y_mm: 270.0,
            }],
        };
        let bytes = write_pdf(&[page.clone(), page], "CV", &default_page_config()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 100);
    }
}
