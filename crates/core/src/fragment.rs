//! Slide fragments and the ordered store that collects them before assembly.

use crate::{DeckError, DeckResult};
use deck_types::{SlideNumber, SlideTitle};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// One numbered slide: the unit the assembler splices into a skeleton.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fragment {
    pub number: SlideNumber,
    pub title: SlideTitle,
    /// Slide markup. Opaque to the assembler.
    pub body: String,
}

impl Fragment {
    pub fn new(number: SlideNumber, title: SlideTitle, body: impl Into<String>) -> Self {
        Self {
            number,
            title,
            body: body.into(),
        }
    }

    /// Convenience constructor validating raw values.
    pub fn parse(number: u32, title: &str, body: impl Into<String>) -> DeckResult<Self> {
        Ok(Self::new(
            SlideNumber::new(number)?,
            SlideTitle::new(title)?,
            body,
        ))
    }
}

/// Fragments keyed by slide number, iterated in ascending order.
///
/// A number can be inserted once. A second insert is rejected and leaves the store
/// unchanged; callers that populate one store from several sources must serialise
/// their inserts.
#[derive(Debug, Clone, Default)]
pub struct FragmentStore {
    fragments: BTreeMap<SlideNumber, Fragment>,
}

impl FragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `fragment`, failing with [`DeckError::DuplicateFragment`] if its number
    /// is already taken.
    pub fn insert(&mut self, fragment: Fragment) -> DeckResult<()> {
        match self.fragments.entry(fragment.number) {
            Entry::Occupied(_) => Err(DeckError::DuplicateFragment {
                number: fragment.number,
            }),
            Entry::Vacant(slot) => {
                tracing::debug!("stored slide {}: {}", fragment.number, fragment.title);
                slot.insert(fragment);
                Ok(())
            }
        }
    }

    /// Inserts a batch in order, stopping at the first duplicate.
    ///
    /// Fragments before the duplicate stay inserted.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = Fragment>) -> DeckResult<()> {
        for fragment in batch {
            self.insert(fragment)?;
        }
        Ok(())
    }

    pub fn get(&self, number: SlideNumber) -> Option<&Fragment> {
        self.fragments.get(&number)
    }

    pub fn contains(&self, number: SlideNumber) -> bool {
        self.fragments.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments in ascending slide order. Can be called any number of times.
    pub fn get_ordered(&self) -> impl Iterator<Item = &Fragment> + '_ {
        self.fragments.values()
    }

    /// Numbers in `1..=expected_max` with no stored fragment, ascending.
    pub fn missing_numbers(&self, expected_max: u32) -> BTreeSet<SlideNumber> {
        (1..=expected_max)
            .filter_map(|n| SlideNumber::new(n).ok())
            .filter(|n| !self.fragments.contains_key(n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(number: u32, body: &str) -> Fragment {
        Fragment::parse(number, &format!("Slide title {number}"), body).unwrap()
    }

    fn numbers<'a>(it: impl Iterator<Item = &'a Fragment>) -> Vec<u32> {
        it.map(|f| f.number.get()).collect()
    }

    #[test]
    fn test_insert_rejects_duplicate_without_overwriting() {
        let mut store = FragmentStore::new();
        store.insert(fragment(4, "<p>first</p>")).unwrap();

        let err = store
            .insert(fragment(4, "<p>second</p>"))
            .expect_err("duplicate must be rejected");

        assert!(matches!(err, DeckError::DuplicateFragment { number } if number.get() == 4));
        assert_eq!(store.len(), 1);
        let kept = store.get(SlideNumber::new(4).unwrap()).unwrap();
        assert_eq!(kept.body, "<p>first</p>");
    }

    #[test]
    fn test_get_ordered_ignores_insertion_order_and_restarts() {
        let mut store = FragmentStore::new();
        for n in [5, 1, 3] {
            store.insert(fragment(n, "<p></p>")).unwrap();
        }

        assert_eq!(numbers(store.get_ordered()), vec![1, 3, 5]);
        assert_eq!(numbers(store.get_ordered()), vec![1, 3, 5]);
    }

    #[test]
    fn test_missing_numbers() {
        let mut store = FragmentStore::new();
        store.extend([fragment(1, ""), fragment(3, "")]).unwrap();

        let missing: Vec<u32> = store.missing_numbers(5).into_iter().map(u32::from).collect();
        assert_eq!(missing, vec![2, 4, 5]);
        assert!(FragmentStore::new().missing_numbers(0).is_empty());
    }

    #[test]
    fn test_extend_stops_at_first_duplicate() {
        let mut store = FragmentStore::new();
        let result = store.extend([fragment(1, ""), fragment(2, ""), fragment(1, ""), fragment(9, "")]);

        assert!(matches!(result, Err(DeckError::DuplicateFragment { .. })));
        assert_eq!(numbers(store.get_ordered()), vec![1, 2]);
        assert!(!store.contains(SlideNumber::new(9).unwrap()));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(matches!(
            Fragment::parse(0, "Intro", ""),
            Err(DeckError::Types(_))
        ));
        assert!(matches!(
            Fragment::parse(1, "  ", ""),
            Err(DeckError::Types(_))
        ));
    }
}
