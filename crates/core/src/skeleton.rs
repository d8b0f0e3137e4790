//! The fixed document shell slides are spliced into.

use crate::{DeckError, DeckResult};

/// What happens to the splice marker text when slides are spliced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerDisposition {
    /// The marker is a placeholder and disappears from the output.
    #[default]
    Consume,
    /// The marker is real content (for example the comment heading a closing slide)
    /// and is kept right after the spliced slides.
    Retain,
}

/// A document split once, at construction, around its unique splice marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    prologue: String,
    splice_marker: String,
    epilogue: String,
    disposition: MarkerDisposition,
}

impl Skeleton {
    /// Splits `text` at `splice_marker`, consuming the marker.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::SkeletonMarker`] unless the marker occurs exactly once,
    /// and [`DeckError::InvalidInput`] for an empty marker.
    pub fn parse(text: &str, splice_marker: &str) -> DeckResult<Self> {
        Self::parse_with(text, splice_marker, MarkerDisposition::Consume)
    }

    pub fn parse_with(
        text: &str,
        splice_marker: &str,
        disposition: MarkerDisposition,
    ) -> DeckResult<Self> {
        if splice_marker.is_empty() {
            return Err(DeckError::InvalidInput(
                "splice marker cannot be empty".into(),
            ));
        }

        // Overlapping matches count: `--` can be placed two ways in `---`.
        let positions: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .filter(|&i| text[i..].starts_with(splice_marker))
            .collect();
        let &[at] = positions.as_slice() else {
            return Err(DeckError::SkeletonMarker {
                marker: splice_marker.to_owned(),
                occurrences: positions.len(),
            });
        };

        Ok(Self {
            prologue: text[..at].to_owned(),
            splice_marker: splice_marker.to_owned(),
            epilogue: text[at + splice_marker.len()..].to_owned(),
            disposition,
        })
    }

    /// Text before the splice point.
    pub fn prologue(&self) -> &str {
        &self.prologue
    }

    /// Text after the splice point, including the marker when it is retained.
    pub fn epilogue(&self) -> String {
        match self.disposition {
            MarkerDisposition::Consume => self.epilogue.clone(),
            MarkerDisposition::Retain => format!("{}{}", self.splice_marker, self.epilogue),
        }
    }

    pub fn splice_marker(&self) -> &str {
        &self.splice_marker
    }

    pub fn disposition(&self) -> MarkerDisposition {
        self.disposition
    }
}
