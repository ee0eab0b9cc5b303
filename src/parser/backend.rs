//! PDF backend abstraction layer.
//!
//! Page layout only needs positioned words, page geometry and a plain-text
//! fallback. [`PdfBackend`] exposes exactly that, which keeps lopdf out of the
//! layout code and lets tests drive the pipeline with synthetic pages.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use super::content::{extract_words, PageFrame, TextDecoder};
use crate::error::{Error, Result};
use crate::layout::Word;

/// US Letter, used when no MediaBox is found in the page tree.
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Positioned words of one page plus its dimensions.
#[derive(Debug, Clone, Default)]
pub struct PageWords {
    /// 1-based page number
    pub number: u32,
    pub width: f64,
    pub height: f64,
    pub words: Vec<Word>,
}

/// Abstract interface for PDF document access.
///
/// Implementations must be shareable across threads; pages are laid out in
/// parallel.
pub trait PdfBackend: Sync {
    /// 1-based page numbers in document order.
    fn page_numbers(&self) -> Vec<u32>;

    /// Positioned words of a page with top-left origin coordinates.
    fn page_words(&self, page: u32) -> Result<PageWords>;

    /// Plain text of a page, used when layout yields nothing.
    fn page_text(&self, page: u32) -> Result<String>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // Try UTF-16BE first (BOM marker)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    pub fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or_else(|| Error::Parse(format!("page {page} does not exist")))
    }

    /// MediaBox of a page, inherited through the page tree when absent.
    fn media_box(&self, page_id: ObjectId) -> [f64; 4] {
        let mut current = Some(page_id);
        while let Some(id) = current {
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };
            if let Ok(values) = dict.get(b"MediaBox").and_then(Object::as_array) {
                if values.len() >= 4 {
                    let mut media_box = [0.0; 4];
                    for (slot, value) in media_box.iter_mut().zip(values) {
                        *slot = value.as_float().map(f64::from).unwrap_or(0.0);
                    }
                    return media_box;
                }
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
        DEFAULT_MEDIA_BOX
    }

    /// Decoded content of a page; empty when the page has no contents.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(stream_data(s)),
                _ => Err(Error::Parse("invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            content.extend_from_slice(&stream_data(s));
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            Object::Stream(s) => Ok(stream_data(s)),
            _ => Err(Error::Parse("invalid content stream".to_string())),
        }
    }
}

/// Stream bytes with filters applied; unfiltered streams are returned as is.
fn stream_data(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

impl PdfBackend for LopdfBackend {
    fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    fn page_words(&self, page: u32) -> Result<PageWords> {
        let page_id = self.page_id(page)?;
        let [x0, y0, x1, y1] = self.media_box(page_id);
        let mut page_words = PageWords {
            number: page,
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
            words: Vec::new(),
        };

        let data = self.page_content(page_id)?;
        if data.is_empty() {
            return Ok(page_words);
        }
        let content = lopdf::content::Content::decode(&data)?;

        let fonts = PageFonts {
            doc: &self.doc,
            fonts: self.doc.get_page_fonts(page_id).unwrap_or_default(),
        };
        let frame = PageFrame {
            left: x0.min(x1),
            top: y0.max(y1),
        };
        page_words.words = extract_words(&content.operations, &fonts, frame);
        Ok(page_words)
    }

    fn page_text(&self, page: u32) -> Result<String> {
        Ok(self.doc.extract_text(&[page])?)
    }
}

/// Font resources of one page.
struct PageFonts<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
}

impl TextDecoder for PageFonts<'_> {
    fn decode(&self, font: &[u8], bytes: &[u8]) -> String {
        if let Some(font_dict) = self.fonts.get(font) {
            if let Ok(enc) = font_dict.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn base_font(&self, font: &[u8]) -> String {
        self.fonts
            .get(font)
            .and_then(|dict| dict.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let err = LopdfBackend::load_bytes(b"%PDF-1.4 not really").err();
        assert!(err.is_some());
    }
}
