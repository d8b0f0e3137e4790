use deck_types::{SlideNumber, TypesError};

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("slide {number} is already present in the fragment store")]
    DuplicateFragment { number: SlideNumber },
    #[error(
        "splice marker {marker:?} must occur exactly once in the skeleton, found {occurrences}"
    )]
    SkeletonMarker { marker: String, occurrences: usize },
    #[error("slide {number} is outside a deck of {deck_size} slides")]
    SlideOutOfRange { number: SlideNumber, deck_size: u32 },
    #[error("invalid slide value: {0}")]
    Types(#[from] TypesError),

    #[error("failed to read config file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to deserialize YAML config: {0}")]
    YamlDeserialization(serde_yaml::Error),
}

pub type DeckResult<T> = std::result::Result<T, DeckError>;
