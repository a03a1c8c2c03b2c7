//! DOCX projection of a [`ResumeRecord`].
//!
//! Paragraph order is fixed: title, contact lines, summary, then a label and a
//! body paragraph for each rich-text section. Markup never reaches this format.
//! Only inline-decoded photos are embedded; remote URLs are never referenced.

use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Pic, Run, Style, StyleType};
use image::ImageFormat;
use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, RichText};

const TITLE_STYLE: &str = "Title";
/// 1.5 inches at 914 400 EMU per inch.
const PHOTO_WIDTH_EMU: u32 = 1_371_600;
/// Fixed relationship id for the single embedded photo.
const PHOTO_ID: &str = "rIdImage1";

#[derive(Debug, Clone, Copy, Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    pub fn render(&self, record: &ResumeRecord) -> Result<Vec<u8>, AppError> {
        let sections: [(&str, &RichText); 5] = [
            ("Experience", &record.experience),
            ("Education", &record.education),
            ("Skills", &record.skills),
            ("Projects", &record.projects),
            ("Awards", &record.awards),
        ];

        let mut docx = Docx::new()
            .add_style(
                Style::new(TITLE_STYLE, StyleType::Paragraph)
                    .name("Title")
                    .size(56)
                    .bold(),
            )
            .add_paragraph(
                Paragraph::new()
                    .style(TITLE_STYLE)
                    .add_run(Run::new().add_text(record.name.as_str())),
            )
            .add_paragraph(labeled("Email", &record.email))
            .add_paragraph(labeled("Phone", &record.phone))
            .add_paragraph(labeled("Address", &record.address))
            .add_paragraph(labeled("Role", &record.role))
            .add_paragraph(label("Summary"))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(record.narrative.as_str())));

        for (name, body) in sections {
            docx = docx
                .add_paragraph(label(name))
                .add_paragraph(plain_body(body));
        }

        if let Some(bytes) = record.photo.inline_bytes() {
            docx = docx.add_paragraph(photo_paragraph(bytes)?);
        }

        let mut out = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut out)
            .map_err(|e| AppError::RenderFailure(format!("DOCX packaging: {e}")))?;

        let bytes = out.into_inner();
        debug!("Rendered DOCX ({} bytes)", bytes.len());
        Ok(bytes)
    }
}

fn label(name: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(format!("{name}:")).bold())
}

/// `Label: value` on one line.
fn labeled(name: &str, value: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(format!("{name}: {value}")))
}

fn plain_body(text: &RichText) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in text.plain_lines().into_iter().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run)
}

fn photo_paragraph(bytes: &[u8]) -> Result<Paragraph, AppError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| AppError::RenderFailure(format!("photo could not be decoded: {e}")))?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(AppError::RenderFailure("photo has no pixels".to_string()));
    }

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::RenderFailure(format!("photo could not be re-encoded: {e}")))?;

    let height_emu = u64::from(PHOTO_WIDTH_EMU) * u64::from(height) / u64::from(width);
    let height_emu = u32::try_from(height_emu)
        .map_err(|_| AppError::RenderFailure("photo aspect ratio is too extreme".to_string()))?;

    let pic = Pic::new_with_dimensions(png, width, height)
        .id(PHOTO_ID)
        .size(PHOTO_WIDTH_EMU, height_emu);
    Ok(Paragraph::new().add_run(Run::new().add_image(pic)))
}
