//! # Deck Core
//!
//! Assembly and structural validation of numbered slide decks.
//!
//! This crate contains pure, in-memory operations only:
//! - [`FragmentStore`] collects numbered slide [`Fragment`]s and rejects duplicates
//! - [`Skeleton`] splits a document shell around its unique splice marker
//! - [`Assembler`] splices the stored fragments into the skeleton in slide order
//! - [`Validator`] checks any document and returns an [`IntegrityReport`]
//!
//! **No I/O concerns**: reading sources and writing the assembled document belong in
//! `deck_files` and the `deck` binary.
//!
//! ```
//! use deck_core::{Assembler, DeckLayout, Fragment, FragmentStore, Skeleton, Validator};
//!
//! # fn main() -> Result<(), deck_core::DeckError> {
//! let skeleton = Skeleton::parse("<DOC>{MARK}</DOC>", "{MARK}")?;
//! let mut store = FragmentStore::new();
//! store.insert(Fragment::parse(1, "A", "<S>A</S>")?)?;
//! store.insert(Fragment::parse(2, "B", "<S>B</S>")?)?;
//!
//! let document = Assembler::new(2).assemble(&skeleton, &store)?;
//! let report = Validator::new(DeckLayout::new(2)).validate(document.as_str());
//! assert!(report.is_valid());
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod config;
pub mod constants;
pub mod error;
pub mod fragment;
pub mod markup;
pub mod report;
pub mod skeleton;
pub mod source;
pub mod validator;

pub use assembler::{AssembledDocument, Assembler, FragmentSpan};
pub use config::DeckConfig;
pub use deck_types::{SlideNumber, SlideTitle, TypesError};
pub use error::{DeckError, DeckResult};
pub use fragment::{Fragment, FragmentStore};
pub use report::{Anchor, Duplicate, IntegrityReport, PlacementFinding, WindowSide};
pub use skeleton::{MarkerDisposition, Skeleton};
pub use source::parse_fragments;
pub use validator::{DeckLayout, Validator};
