//! Deck configuration.
//!
//! Configuration is resolved once at process startup (defaults, then an optional YAML
//! file, then command-line overrides) and passed into the assembler and validator. The
//! core never reads environment variables itself.

use crate::constants::{
    DEFAULT_DECK_SIZE, DEFAULT_FOOTER_ANCHOR, DEFAULT_HEADER_ANCHOR, DEFAULT_ROOT_CLASS,
    DEFAULT_SPLICE_MARKER, MAX_DECK_SIZE,
};
use crate::skeleton::MarkerDisposition;
use crate::validator::DeckLayout;
use crate::{DeckError, DeckResult};
use std::path::Path;

/// Settings shared by `assemble` and `validate`.
///
/// In YAML every key is optional; an explicit `null` disables an anchor or the root
/// class check.
///
/// ```yaml
/// deck_size: 100
/// splice_marker: "<!-- SLIDES -->"
/// header_anchor: '<div class="slide-container">'
/// footer_anchor: '<div class="controls">'
/// root_class: slide
/// retain_marker: false
/// require_end_markers: true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    deck_size: u32,
    splice_marker: String,
    header_anchor: Option<String>,
    footer_anchor: Option<String>,
    root_class: Option<String>,
    retain_marker: bool,
    require_end_markers: bool,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            deck_size: DEFAULT_DECK_SIZE,
            splice_marker: DEFAULT_SPLICE_MARKER.to_owned(),
            header_anchor: Some(DEFAULT_HEADER_ANCHOR.to_owned()),
            footer_anchor: Some(DEFAULT_FOOTER_ANCHOR.to_owned()),
            root_class: Some(DEFAULT_ROOT_CLASS.to_owned()),
            retain_marker: false,
            require_end_markers: true,
        }
    }
}

impl DeckConfig {
    /// Parses YAML, filling unspecified keys with defaults.
    pub fn from_yaml_str(yaml: &str) -> DeckResult<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(DeckError::YamlDeserialization)?;
        config.validated()
    }

    pub fn load(path: &Path) -> DeckResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(DeckError::FileRead)?;
        let config = Self::from_yaml_str(&raw)?;
        tracing::debug!("loaded deck config from {}", path.display());
        Ok(config)
    }

    /// Overrides the deck size, rejecting zero and sizes above [`MAX_DECK_SIZE`].
    pub fn with_deck_size(mut self, deck_size: u32) -> DeckResult<Self> {
        self.deck_size = deck_size;
        self.validated()
    }

    /// Overrides the splice marker, rejecting an empty one.
    pub fn with_splice_marker(mut self, marker: impl Into<String>) -> DeckResult<Self> {
        self.splice_marker = marker.into();
        self.validated()
    }

    pub fn with_retain_marker(mut self, retain: bool) -> Self {
        self.retain_marker = retain;
        self
    }

    fn validated(self) -> DeckResult<Self> {
        if self.deck_size == 0 {
            return Err(DeckError::InvalidInput(
                "deck_size must be at least 1".into(),
            ));
        }
        if self.deck_size > MAX_DECK_SIZE {
            return Err(DeckError::InvalidInput(format!(
                "deck_size {} exceeds the maximum of {MAX_DECK_SIZE}",
                self.deck_size
            )));
        }
        if self.splice_marker.is_empty() {
            return Err(DeckError::InvalidInput(
                "splice_marker cannot be empty".into(),
            ));
        }
        for (key, value) in [
            ("header_anchor", &self.header_anchor),
            ("footer_anchor", &self.footer_anchor),
            ("root_class", &self.root_class),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(DeckError::InvalidInput(format!(
                    "{key} cannot be empty; use null to disable it"
                )));
            }
        }
        Ok(self)
    }

    pub fn deck_size(&self) -> u32 {
        self.deck_size
    }

    pub fn splice_marker(&self) -> &str {
        &self.splice_marker
    }

    pub fn marker_disposition(&self) -> MarkerDisposition {
        if self.retain_marker {
            MarkerDisposition::Retain
        } else {
            MarkerDisposition::Consume
        }
    }

    /// The validator's view of this configuration.
    pub fn layout(&self) -> DeckLayout {
        DeckLayout {
            expected: self.deck_size,
            header_anchor: self.header_anchor.clone(),
            footer_anchor: self.footer_anchor.clone(),
            root_class: self.root_class.clone(),
            require_end_markers: self.require_end_markers,
        }
    }
}
