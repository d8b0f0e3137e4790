//! Validated value types shared across the deck crates.
//!
//! Both types enforce their invariants at construction, so code holding a
//! [`SlideNumber`] or a [`SlideTitle`] never re-checks them.

use std::num::NonZeroU32;
use std::str::FromStr;

/// Errors that can occur when creating validated deck values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// Slide numbers start at 1
    #[error("slide number must be a positive integer, got {0:?}")]
    InvalidNumber(String),

    /// The title was empty or contained only whitespace
    #[error("slide title cannot be empty")]
    EmptyTitle,

    /// The title cannot be embedded in a marker comment
    #[error("slide title {0:?} contains a line break, '--' or '>'")]
    UnembeddableTitle(String),
}

/// Ordinal position of a slide in the deck. Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlideNumber(NonZeroU32);

impl SlideNumber {
    /// Creates a `SlideNumber`, rejecting zero.
    pub fn new(value: u32) -> Result<Self, TypesError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| TypesError::InvalidNumber(value.to_string()))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl FromStr for SlideNumber {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypesError::InvalidNumber(s.to_owned()));
        }
        let value: u32 = trimmed
            .parse()
            .map_err(|_| TypesError::InvalidNumber(s.to_owned()))?;
        Self::new(value)
    }
}

impl TryFrom<u32> for SlideNumber {
    type Error = TypesError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SlideNumber> for u32 {
    fn from(number: SlideNumber) -> Self {
        number.get()
    }
}

impl std::fmt::Display for SlideNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for SlideNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.get())
    }
}

impl<'de> serde::Deserialize<'de> for SlideNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        SlideNumber::new(value).map_err(serde::de::Error::custom)
    }
}

/// A short slide label that can be written inside an HTML comment marker.
///
/// The input is trimmed during construction. Line breaks, `--` and `>` are
/// rejected because any of them would end or corrupt the surrounding
/// `<!-- Slide N: Title -->` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideTitle(String);

impl SlideTitle {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyTitle);
        }
        if trimmed.contains(['\n', '\r', '>']) || trimmed.contains("--") {
            return Err(TypesError::UnembeddableTitle(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SlideTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SlideTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for SlideTitle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SlideTitle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SlideTitle::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_number_rejects_zero() {
        let err = SlideNumber::new(0).expect_err("zero is not a slide");
        assert!(matches!(err, TypesError::InvalidNumber(v) if v == "0"));
    }

    #[test]
    fn test_slide_number_parses_digits_only() {
        assert_eq!("42".parse::<SlideNumber>().unwrap().get(), 42);
        assert_eq!(" 7 ".parse::<SlideNumber>().unwrap().get(), 7);
        assert!("-3".parse::<SlideNumber>().is_err());
        assert!("+3".parse::<SlideNumber>().is_err());
        assert!("3a".parse::<SlideNumber>().is_err());
        assert!("".parse::<SlideNumber>().is_err());
        assert!("0".parse::<SlideNumber>().is_err());
        assert!("99999999999".parse::<SlideNumber>().is_err());
    }

    #[test]
    fn test_slide_numbers_order_numerically() {
        let mut numbers: Vec<SlideNumber> = [10, 2, 1]
            .into_iter()
            .map(|n| SlideNumber::new(n).unwrap())
            .collect();
        numbers.sort();
        let raw: Vec<u32> = numbers.into_iter().map(u32::from).collect();
        assert_eq!(raw, vec![1, 2, 10]);
    }

    #[test]
    fn test_slide_title_trims() {
        let title = SlideTitle::new("  Closing / Q&A  ").unwrap();
        assert_eq!(title.as_str(), "Closing / Q&A");
    }

    #[test]
    fn test_slide_title_rejects_empty_and_unembeddable() {
        assert_eq!(SlideTitle::new("   "), Err(TypesError::EmptyTitle));
        assert!(matches!(
            SlideTitle::new("a -- b"),
            Err(TypesError::UnembeddableTitle(_))
        ));
        assert!(matches!(
            SlideTitle::new("a > b"),
            Err(TypesError::UnembeddableTitle(_))
        ));
        assert!(matches!(
            SlideTitle::new("line\nbreak"),
            Err(TypesError::UnembeddableTitle(_))
        ));
    }

    #[test]
    fn test_serde_revalidates() {
        let number: Result<SlideNumber, _> = serde_json::from_str("0");
        assert!(number.is_err());
        let title: SlideTitle = serde_json::from_str("\" Intro \"").unwrap();
        assert_eq!(title.as_str(), "Intro");
        assert_eq!(serde_json::to_string(&SlideNumber::new(5).unwrap()).unwrap(), "5");
    }
}
