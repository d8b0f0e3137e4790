//! The result of a validation run.
//!
//! An [`IntegrityReport`] is built once by the validator and never changes. Every
//! collection is kept in a fixed order so that two runs over the same document render
//! identical text, which makes reports diffable across runs.

use deck_types::SlideNumber;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Which side of the content window a marker fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSide {
    BeforeHeader,
    AfterFooter,
}

/// Which configured anchor could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Header,
    Footer,
}

/// A placement problem, located by byte offset in the validated document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementFinding {
    /// A start or end marker outside the content window.
    OutsideWindow {
        number: SlideNumber,
        side: WindowSide,
        offset: usize,
    },
    /// An end marker with no open slide.
    StrayEnd { number: SlideNumber, offset: usize },
    /// An end marker naming a different slide than the open one.
    MismatchedEnd {
        open: SlideNumber,
        found: SlideNumber,
        offset: usize,
    },
    /// A slide whose end marker never appears.
    Unterminated { number: SlideNumber, offset: usize },
    /// A start marker whose number is not above the one before it.
    OutOfOrder {
        number: SlideNumber,
        previous: SlideNumber,
        offset: usize,
    },
    /// A configured window anchor absent from the document.
    AnchorMissing { anchor: Anchor },
}

impl std::fmt::Display for PlacementFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutsideWindow {
                number,
                side: WindowSide::BeforeHeader,
                offset,
            } => write!(f, "slide {number}: marker before the header anchor (offset {offset})"),
            Self::OutsideWindow {
                number,
                side: WindowSide::AfterFooter,
                offset,
            } => write!(f, "slide {number}: marker after the footer anchor (offset {offset})"),
            Self::StrayEnd { number, offset } => write!(
                f,
                "slide {number}: end marker without a start marker (offset {offset})"
            ),
            Self::MismatchedEnd {
                open,
                found,
                offset,
            } => write!(
                f,
                "slide {open}: closed by the end marker of slide {found} (offset {offset})"
            ),
            Self::Unterminated { number, offset } => {
                write!(f, "slide {number}: no end marker (starts at offset {offset})")
            }
            Self::OutOfOrder {
                number,
                previous,
                offset,
            } => write!(f, "slide {number}: follows slide {previous} (offset {offset})"),
            Self::AnchorMissing {
                anchor: Anchor::Header,
            } => f.write_str("header anchor not found"),
            Self::AnchorMissing {
                anchor: Anchor::Footer,
            } => f.write_str("footer anchor not found"),
        }
    }
}

/// A slide number seen more than once, with how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Duplicate {
    pub number: SlideNumber,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IntegrityReport {
    expected: u32,
    total_found: usize,
    missing: BTreeSet<SlideNumber>,
    out_of_range: BTreeSet<SlideNumber>,
    duplicates: Vec<Duplicate>,
    unbalanced: BTreeSet<SlideNumber>,
    misplaced: Vec<PlacementFinding>,
    rootless: BTreeSet<SlideNumber>,
}

/// Findings gathered by the validator passes, before they are frozen into a report.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub missing: BTreeSet<SlideNumber>,
    pub out_of_range: BTreeSet<SlideNumber>,
    pub duplicates: Vec<Duplicate>,
    pub unbalanced: BTreeSet<SlideNumber>,
    pub misplaced: Vec<PlacementFinding>,
    pub rootless: BTreeSet<SlideNumber>,
}

impl IntegrityReport {
    /// Sorts `duplicates` by slide number; placement findings keep the order given.
    pub(crate) fn new(expected: u32, total_found: usize, findings: Findings) -> Self {
        let Findings {
            missing,
            out_of_range,
            mut duplicates,
            unbalanced,
            misplaced,
            rootless,
        } = findings;
        duplicates.sort_by_key(|d| d.number);
        Self {
            expected,
            total_found,
            missing,
            out_of_range,
            duplicates,
            unbalanced,
            misplaced,
            rootless,
        }
    }

    pub fn expected(&self) -> u32 {
        self.expected
    }

    /// Count of distinct slide numbers detected.
    pub fn total_found(&self) -> usize {
        self.total_found
    }

    pub fn missing(&self) -> &BTreeSet<SlideNumber> {
        &self.missing
    }

    /// Slide numbers found above the expected count.
    pub fn out_of_range(&self) -> &BTreeSet<SlideNumber> {
        &self.out_of_range
    }

    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }

    pub fn unbalanced(&self) -> &BTreeSet<SlideNumber> {
        &self.unbalanced
    }

    pub fn misplaced(&self) -> &[PlacementFinding] {
        &self.misplaced
    }

    pub fn rootless(&self) -> &BTreeSet<SlideNumber> {
        &self.rootless
    }

    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
            && self.out_of_range.is_empty()
            && self.duplicates.is_empty()
            && self.unbalanced.is_empty()
            && self.misplaced.is_empty()
            && self.rootless.is_empty()
    }

    /// One-line verdict, e.g. `VALID: 100 of 100 slides found`.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} of {} slides found",
            if self.is_valid() { "VALID" } else { "INVALID" },
            self.total_found,
            self.expected
        )
    }

    /// Full report text. Deterministic for a given report.
    pub fn render(&self) -> String {
        let mut out = self.summary();
        out.push('\n');

        let _ = writeln!(out, "missing: {}", format_numbers(&self.missing));
        let _ = writeln!(out, "out of range: {}", format_numbers(&self.out_of_range));

        let duplicates = if self.duplicates.is_empty() {
            "none".to_owned()
        } else {
            self.duplicates
                .iter()
                .map(|d| format!("{} (x{})", d.number, d.count))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(out, "duplicates: {duplicates}");

        let _ = writeln!(out, "unbalanced: {}", format_numbers(&self.unbalanced));

        if self.misplaced.is_empty() {
            out.push_str("misplaced: none\n");
        } else {
            out.push_str("misplaced:\n");
            for finding in &self.misplaced {
                let _ = writeln!(out, "  - {finding}");
            }
        }

        let _ = writeln!(out, "rootless: {}", format_numbers(&self.rootless));
        out
    }
}

impl std::fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Formats ascending numbers with consecutive runs collapsed: `2, 5-9, 12`.
fn format_numbers(numbers: &BTreeSet<SlideNumber>) -> String {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for n in numbers.iter().map(|n| n.get()) {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == n => *end = n,
            _ => runs.push((n, n)),
        }
    }

    if runs.is_empty() {
        return "none".to_owned();
    }

    runs.into_iter()
        .map(|(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[u32]) -> BTreeSet<SlideNumber> {
        values.iter().map(|v| SlideNumber::new(*v).unwrap()).collect()
    }

    fn n(value: u32) -> SlideNumber {
        SlideNumber::new(value).unwrap()
    }

    #[test]
    fn test_format_numbers_collapses_runs() {
        assert_eq!(format_numbers(&set(&[])), "none");
        assert_eq!(format_numbers(&set(&[7])), "7");
        assert_eq!(format_numbers(&set(&[12, 2, 5, 6, 7, 8, 9])), "2, 5-9, 12");
    }

    #[test]
    fn test_valid_report_renders_none_everywhere() {
        let report = IntegrityReport::new(2, 2, Findings::default());
        assert!(report.is_valid());
        assert_eq!(
            report.render(),
            "VALID: 2 of 2 slides found\nmissing: none\nout of range: none\nduplicates: none\nunbalanced: none\nmisplaced: none\nrootless: none\n"
        );
    }

    #[test]
    fn test_invalid_report_renders_sorted_findings() {
        let report = IntegrityReport::new(
            10,
            8,
            Findings {
                missing: set(&[4, 2, 3]),
                out_of_range: set(&[12]),
                duplicates: vec![
                    Duplicate { number: n(9), count: 2 },
                    Duplicate { number: n(5), count: 3 },
                ],
                unbalanced: set(&[8, 1]),
                misplaced: vec![
                    PlacementFinding::OutOfOrder {
                        number: n(6),
                        previous: n(7),
                        offset: 90,
                    },
                    PlacementFinding::AnchorMissing {
                        anchor: Anchor::Footer,
                    },
                ],
                rootless: set(&[6]),
            },
        );

        assert!(!report.is_valid());
        assert_eq!(
            report.render(),
            "INVALID: 8 of 10 slides found\n\
             missing: 2-4\n\
             out of range: 12\n\
             duplicates: 5 (x3), 9 (x2)\n\
             unbalanced: 1, 8\n\
             misplaced:\n  - slide 6: follows slide 7 (offset 90)\n  - footer anchor not found\n\
             rootless: 6\n"
        );
        assert_eq!(report.to_string(), report.render());
    }

    #[test]
    fn test_any_finding_invalidates() {
        let only_misplaced = IntegrityReport::new(
            1,
            1,
            Findings {
                misplaced: vec![PlacementFinding::StrayEnd {
                    number: n(1),
                    offset: 0,
                }],
                ..Findings::default()
            },
        );
        assert!(!only_misplaced.is_valid());

        let only_rootless = IntegrityReport::new(
            1,
            1,
            Findings {
                rootless: set(&[1]),
                ..Findings::default()
            },
        );
        assert!(!only_rootless.is_valid());

        let only_out_of_range = IntegrityReport::new(
            1,
            2,
            Findings {
                out_of_range: set(&[2]),
                ..Findings::default()
            },
        );
        assert!(!only_out_of_range.is_valid());
    }

    #[test]
    fn test_report_serialises_findings() {
        let report = IntegrityReport::new(
            3,
            2,
            Findings {
                missing: set(&[2]),
                misplaced: vec![PlacementFinding::OutsideWindow {
                    number: n(3),
                    side: WindowSide::AfterFooter,
                    offset: 40,
                }],
                ..Findings::default()
            },
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["missing"], serde_json::json!([2]));
        assert_eq!(json["misplaced"][0]["kind"], "outside_window");
        assert_eq!(json["misplaced"][0]["side"], "after_footer");
        assert_eq!(json["out_of_range"], serde_json::json!([]));
    }
}
