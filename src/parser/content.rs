//! Content stream interpretation.
//!
//! Walks the text-showing operators of a page and produces positioned
//! words. Glyph advances are estimated from the font size since font
//! metrics are not consulted.

use lopdf::content::Operation;
use lopdf::Object;

use crate::layout::Word;

/// Ascender share of the font size above the baseline.
const ASCENT: f64 = 0.8;
/// Descender share of the font size below the baseline.
const DESCENT: f64 = 0.2;
/// TJ adjustment (thousandths of an em) treated as a word space.
const SPACE_ADJUSTMENT: f64 = 200.0;
/// Leading used by `T*` until a `TL` or `TD` sets one.
const DEFAULT_LEADING: f64 = 12.0;

/// Decodes shown strings for the fonts of one page.
pub trait TextDecoder {
    /// Decode bytes shown with the font resource `font`.
    fn decode(&self, font: &[u8], bytes: &[u8]) -> String;

    /// Base font name for the font resource, e.g. "Helvetica-Bold".
    fn base_font(&self, font: &[u8]) -> String;
}

/// Page geometry needed to flip PDF user space to top-left coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PageFrame {
    /// Left edge of the media box
    pub left: f64,
    /// Top edge of the media box (PDF y grows upward)
    pub top: f64,
}

/// Extract positioned words from decoded content operations.
pub fn extract_words<D: TextDecoder>(operations: &[Operation], decoder: &D, frame: PageFrame) -> Vec<Word> {
    let mut state = TextState::default();
    let mut words = Vec::new();

    for op in operations {
        match op.operator.as_str() {
            "BT" => {
                state.in_text = true;
                state.matrix = TextMatrix::default();
            }
            "ET" => {
                state.in_text = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(font) = &op.operands[0] {
                        state.font_name = decoder.base_font(font);
                        state.font_key = font.clone();
                    }
                    state.font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(get_number) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let n = |i: usize| get_number(&op.operands[i]);
                    state.matrix.set(
                        n(0).unwrap_or(1.0),
                        n(1).unwrap_or(0.0),
                        n(2).unwrap_or(0.0),
                        n(3).unwrap_or(1.0),
                        n(4).unwrap_or(0.0),
                        n(5).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                state.next_line();
            }
            "Tj" if state.in_text => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    let run = state.show_string(decoder, bytes);
                    words.extend(state.words_from_run(&run, frame));
                }
            }
            "TJ" if state.in_text => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let run = state.show_array(decoder, items);
                    words.extend(state.words_from_run(&run, frame));
                }
            }
            "'" | "\"" => {
                state.next_line();
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if state.in_text {
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let run = state.show_string(decoder, bytes);
                        words.extend(state.words_from_run(&run, frame));
                    }
                }
            }
            _ => {}
        }
    }

    words
}

/// One shown character with its estimated horizontal extent.
#[derive(Debug, Clone, Copy)]
struct Glyph {
    ch: char,
    x: f64,
    width: f64,
}

#[derive(Debug, Clone)]
struct TextState {
    matrix: TextMatrix,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f64,
    leading: f64,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
            in_text: false,
        }
    }
}

impl TextState {
    fn effective_size(&self) -> f64 {
        self.font_size * self.matrix.vertical_scale()
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.matrix.translate(0.0, -leading);
    }

    fn push_text(&mut self, run: &mut Vec<Glyph>, text: &str) {
        let size = self.effective_size();
        for ch in text.chars() {
            let width = glyph_width(ch) * size;
            run.push(Glyph {
                ch,
                x: self.matrix.e,
                width,
            });
            self.matrix.advance(width);
        }
    }

    fn show_string<D: TextDecoder>(&mut self, decoder: &D, bytes: &[u8]) -> Vec<Glyph> {
        let text = decoder.decode(&self.font_key, bytes);
        let mut run = Vec::new();
        self.push_text(&mut run, &text);
        run
    }

    fn show_array<D: TextDecoder>(&mut self, decoder: &D, items: &[Object]) -> Vec<Glyph> {
        let mut run = Vec::new();
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let text = decoder.decode(&self.font_key, bytes);
                    self.push_text(&mut run, &text);
                }
                other => {
                    let Some(n) = get_number(other) else {
                        continue;
                    };
                    // Negative adjustments move the next glyph to the right
                    let adjustment = -n;
                    if adjustment > SPACE_ADJUSTMENT {
                        let breaks_word = run
                            .last()
                            .is_some_and(|g| !g.ch.is_whitespace() && !is_spaceless_script_char(g.ch));
                        if breaks_word {
                            run.push(Glyph {
                                ch: ' ',
                                x: self.matrix.e,
                                width: 0.0,
                            });
                        }
                    }
                    self.matrix.advance(adjustment / 1000.0 * self.effective_size());
                }
            }
        }
        run
    }

    /// Split a glyph run at whitespace into words.
    fn words_from_run(&self, run: &[Glyph], frame: PageFrame) -> Vec<Word> {
        let size = self.effective_size();
        let baseline = self.matrix.f;
        let top = frame.top - (baseline + size * ASCENT);
        let bottom = frame.top - (baseline - size * DESCENT);

        run.split(|g| g.ch.is_whitespace())
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| {
                let text: String = chunk.iter().map(|g| g.ch).collect();
                let first = chunk[0];
                let last = chunk[chunk.len() - 1];
                Word::new(
                    text,
                    top,
                    bottom,
                    first.x - frame.left,
                    last.x + last.width - frame.left,
                    size,
                    self.font_name.clone(),
                )
            })
            .filter(|w| !w.text.is_empty())
            .collect()
    }
}

/// Text matrix and line matrix translation for tracking positions.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64, // X translation
    f: f64, // Y translation
    line_e: f64,
    line_f: f64,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
        };
    }

    /// Move to the start of the next line, offset from the current line start.
    fn translate(&mut self, tx: f64, ty: f64) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    /// Advance horizontally within the current line.
    fn advance(&mut self, dx: f64) {
        self.e += dx;
    }

    fn vertical_scale(&self) -> f64 {
        let scale = (self.b * self.b + self.d * self.d).sqrt();
        if scale > 0.0 {
            scale
        } else {
            1.0
        }
    }
}

/// Estimated advance of a glyph, as a share of the font size.
fn glyph_width(c: char) -> f64 {
    if is_spaceless_script_char(c) || is_fullwidth(c) {
        1.0
    } else if c == ' ' {
        0.25
    } else {
        0.5
    }
}

fn is_fullwidth(c: char) -> bool {
    ('\u{FF01}'..='\u{FF60}').contains(&c) || ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // CJK Unified Ideographs Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana
    || (0x3040..=0x309F).contains(&code)
    // Katakana
    || (0x30A0..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
