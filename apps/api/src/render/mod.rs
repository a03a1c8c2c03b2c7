//! Projections of a `ResumeRecord`: HTML (and PDF from HTML) and DOCX.

pub mod docx;
pub mod html;
pub mod markup;
pub mod pdf;
