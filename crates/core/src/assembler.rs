//! Splices stored fragments into a skeleton.
//!
//! Each fragment is wrapped in its marker pair and emitted as
//!
//! ```text
//! <!-- Slide N: Title -->
//! body
//! <!-- /Slide N -->
//! ```
//!
//! in ascending slide order between the skeleton's prologue and epilogue. Output is a
//! pure function of the inputs: the same skeleton and store always produce the same
//! bytes.

use crate::constants::SLIDE_COUNT_PLACEHOLDER;
use crate::fragment::FragmentStore;
use crate::markup::{end_marker, start_marker};
use crate::skeleton::Skeleton;
use crate::{DeckError, DeckResult};
use deck_types::SlideNumber;
use std::ops::Range;

/// Where one fragment landed in an assembled document, markers included.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FragmentSpan {
    pub number: SlideNumber,
    pub span: Range<usize>,
}

/// Output of [`Assembler::assemble`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    text: String,
    fragments: Vec<FragmentSpan>,
}

impl AssembledDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Fragment boundaries recorded while assembling, in document order.
    pub fn fragments(&self) -> &[FragmentSpan] {
        &self.fragments
    }
}

#[derive(Debug, Clone)]
pub struct Assembler {
    deck_size: u32,
}

impl Assembler {
    /// `deck_size` is substituted for `{{slide_count}}` in the skeleton text.
    pub fn new(deck_size: u32) -> Self {
        Self { deck_size }
    }

    /// Builds the document. Never mutates its inputs.
    ///
    /// An empty or incomplete store still assembles; validation reports the gaps.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::SlideOutOfRange`] if the store holds a slide numbered above
    /// the deck size.
    pub fn assemble(
        &self,
        skeleton: &Skeleton,
        store: &FragmentStore,
    ) -> DeckResult<AssembledDocument> {
        if let Some(fragment) = store
            .get_ordered()
            .find(|f| f.number.get() > self.deck_size)
        {
            return Err(DeckError::SlideOutOfRange {
                number: fragment.number,
                deck_size: self.deck_size,
            });
        }

        let count = self.deck_size.to_string();
        let prologue = skeleton.prologue().replace(SLIDE_COUNT_PLACEHOLDER, &count);
        let epilogue = skeleton.epilogue().replace(SLIDE_COUNT_PLACEHOLDER, &count);

        let mut text = prologue;
        let mut fragments = Vec::with_capacity(store.len());

        for fragment in store.get_ordered() {
            let begin = text.len();
            text.push_str(&start_marker(fragment.number, fragment.title.as_str()));
            text.push('\n');
            text.push_str(&fragment.body);
            text.push('\n');
            text.push_str(&end_marker(fragment.number));
            fragments.push(FragmentSpan {
                number: fragment.number,
                span: begin..text.len(),
            });
            text.push('\n');
        }

        text.push_str(&epilogue);

        if store.len() != self.deck_size as usize {
            tracing::warn!(
                "assembled {} fragments into a deck of {}",
                store.len(),
                self.deck_size
            );
        } else {
            tracing::info!("assembled {} fragments", store.len());
        }

        Ok(AssembledDocument { text, fragments })
    }
}
