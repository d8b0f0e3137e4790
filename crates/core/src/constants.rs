//! Constants used throughout the deck core crate.
//!
//! Marker spellings and configuration defaults live here so the assembler, the
//! tokenizer and the fragment source parser agree on them.

/// Number of slides in a complete deck when no configuration says otherwise.
pub const DEFAULT_DECK_SIZE: u32 = 100;

/// Largest deck size accepted from configuration or the command line.
pub const MAX_DECK_SIZE: u32 = 10_000;

/// Skeleton anchor replaced by the assembled slides.
pub const DEFAULT_SPLICE_MARKER: &str = "<!-- SLIDES -->";

/// Markup after which the first slide may appear.
pub const DEFAULT_HEADER_ANCHOR: &str = r#"<div class="slide-container">"#;

/// Markup before which the last slide must end.
pub const DEFAULT_FOOTER_ANCHOR: &str = r#"<div class="controls">"#;

/// Class token carried by the outermost element of every slide.
pub const DEFAULT_ROOT_CLASS: &str = "slide";

/// Keyword opening a slide start marker: `<!-- Slide 12: Title -->`.
pub const START_MARKER_KEYWORD: &str = "Slide";

/// Keyword opening a slide end marker: `<!-- /Slide 12 -->`.
pub const END_MARKER_KEYWORD: &str = "/Slide";

/// Placeholder in skeleton text replaced with the deck size.
pub const SLIDE_COUNT_PLACEHOLDER: &str = "{{slide_count}}";

/// Elements that never take a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text and never parsed as markup.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];
