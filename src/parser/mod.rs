//! PDF access: page enumeration, positioned words and plain-text fallback.

mod backend;
mod content;

pub use backend::{decode_text_simple, LopdfBackend, PageWords, PdfBackend};
pub use content::{extract_words, PageFrame, TextDecoder};
