//! HTML to Markdown conversion.
//!
//! Parsing goes through the [`DomTree`] capability so the renderer works the
//! same over the full html5ever tree and the built-in minimal parser.

mod dom;
mod heading;
mod noise;
mod render;
#[cfg(feature = "full-html")]
mod scraper_backend;
mod simple;

pub use dom::{DomTree, NodeKind};
pub use heading::{trim_site_suffix, HeadingInferencer};
pub use noise::{is_noise_tag, NoiseStripper, NOISE_TAGS};
pub use render::{emit_block, format_link, MarkdownRenderer};
#[cfg(feature = "full-html")]
pub use scraper_backend::ScraperTree;
pub use simple::{decode_entities, NodeRef, SimpleNode, SimpleTree};
