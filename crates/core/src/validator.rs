//! Structural validation of an assembled (or any candidate) slide document.
//!
//! The validator tokenizes the document once and runs four passes over the tokens:
//!
//! 1. **Numbering** - which slide numbers have a start marker, which of `1..=N` are
//!    missing, which lie above `N`, which appear more than once, and which break the
//!    ascending order.
//! 2. **Balance** - per slide, a signed counter over element open and close tags from
//!    its start marker to its end boundary. Only the net count is checked, not the
//!    nesting shape.
//! 3. **Placement** - every marker must lie inside the content window bounded by the
//!    header and footer anchors, and end markers must close the slide that is open.
//! 4. **Root class** - each slide's first element must carry the configured class.
//!
//! No pass stops the others: a broken document still gets a complete report.

use crate::markup::{tokenize, Token, TokenKind};
use crate::report::{Anchor, Duplicate, Findings, IntegrityReport, PlacementFinding, WindowSide};
use deck_types::SlideNumber;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

/// What a valid document looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckLayout {
    pub expected: u32,
    pub header_anchor: Option<String>,
    pub footer_anchor: Option<String>,
    pub root_class: Option<String>,
    /// When false, a slide may end at the next start marker without an end marker.
    pub require_end_markers: bool,
}

impl DeckLayout {
    /// A layout with no anchors and no root class: only numbering and balance apply.
    pub fn new(expected: u32) -> Self {
        Self {
            expected,
            header_anchor: None,
            footer_anchor: None,
            root_class: None,
            require_end_markers: true,
        }
    }

    pub fn with_window(mut self, header: impl Into<String>, footer: impl Into<String>) -> Self {
        self.header_anchor = Some(header.into());
        self.footer_anchor = Some(footer.into());
        self
    }

    pub fn with_root_class(mut self, class: impl Into<String>) -> Self {
        self.root_class = Some(class.into());
        self
    }

    pub fn with_require_end_markers(mut self, require: bool) -> Self {
        self.require_end_markers = require;
        self
    }
}

/// Read-only checker. Holds no mutable state, so one instance can validate any number
/// of documents, from any number of threads.
#[derive(Debug, Clone)]
pub struct Validator {
    layout: DeckLayout,
}

/// A slide being scanned by the balance and root class passes.
struct OpenSlide {
    number: SlideNumber,
    offset: usize,
    balance: i64,
    first_class: Option<Option<String>>,
    inside_window: bool,
}

impl Validator {
    pub fn new(layout: DeckLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DeckLayout {
        &self.layout
    }

    pub fn validate(&self, document: &str) -> IntegrityReport {
        let tokens = tokenize(document);
        let mut findings = Findings::default();

        let window = self.content_window(document, &mut findings.misplaced);
        let found = self.numbering_pass(&tokens, &mut findings);
        self.slide_pass(&tokens, &window, document.len(), &mut findings);

        findings.missing = (1..=self.layout.expected)
            .filter_map(|n| SlideNumber::new(n).ok())
            .filter(|n| !found.contains(n))
            .collect();
        findings.out_of_range = found
            .iter()
            .filter(|n| n.get() > self.layout.expected)
            .copied()
            .collect();

        let report = IntegrityReport::new(self.layout.expected, found.len(), findings);

        if report.is_valid() {
            tracing::info!("{}", report.summary());
        } else {
            tracing::warn!("{}", report.summary());
        }
        report
    }

    /// Byte range between the header and footer anchors.
    fn content_window(&self, document: &str, misplaced: &mut Vec<PlacementFinding>) -> Range<usize> {
        let start = match self.layout.header_anchor.as_deref() {
            Some(anchor) => match document.find(anchor) {
                Some(at) => at + anchor.len(),
                None => {
                    misplaced.push(PlacementFinding::AnchorMissing {
                        anchor: Anchor::Header,
                    });
                    0
                }
            },
            None => 0,
        };

        let end = match self.layout.footer_anchor.as_deref() {
            Some(anchor) => match document[start..].find(anchor) {
                Some(at) => start + at,
                None => {
                    misplaced.push(PlacementFinding::AnchorMissing {
                        anchor: Anchor::Footer,
                    });
                    document.len()
                }
            },
            None => document.len(),
        };

        start..end
    }

    /// Returns the distinct numbers with a start marker.
    fn numbering_pass(
        &self,
        tokens: &[Token],
        findings: &mut Findings,
    ) -> BTreeSet<SlideNumber> {
        let mut counts: BTreeMap<SlideNumber, usize> = BTreeMap::new();
        let mut previous: Option<SlideNumber> = None;
        for token in tokens {
            if let TokenKind::SlideStart { number, .. } = token.kind {
                *counts.entry(number).or_default() += 1;
                if let Some(previous) = previous.filter(|p| number <= *p) {
                    findings.misplaced.push(PlacementFinding::OutOfOrder {
                        number,
                        previous,
                        offset: token.span.start,
                    });
                }
                previous = Some(number);
            }
        }

        findings.duplicates = counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(number, count)| Duplicate {
                number: *number,
                count: *count,
            })
            .collect();

        counts.into_keys().collect()
    }

    /// Balance, placement of markers and root class, in one walk over the tokens.
    fn slide_pass(
        &self,
        tokens: &[Token],
        window: &Range<usize>,
        document_len: usize,
        findings: &mut Findings,
    ) {
        let Findings {
            unbalanced,
            rootless,
            misplaced,
            ..
        } = findings;
        let mut open: Option<OpenSlide> = None;

        for token in tokens {
            // A slide that began inside the window cannot extend past its end.
            let cut_off = open
                .as_ref()
                .is_some_and(|slide| slide.inside_window && token.span.start >= window.end);
            if cut_off {
                if let Some(slide) = open.take() {
                    self.close_slide(slide, false, unbalanced, rootless, misplaced);
                }
            }

            let marker_number = match token.kind {
                TokenKind::SlideStart { number, .. } | TokenKind::SlideEnd { number } => Some(number),
                _ => None,
            };
            if let Some(number) = marker_number {
                if token.span.start < window.start {
                    misplaced.push(PlacementFinding::OutsideWindow {
                        number,
                        side: WindowSide::BeforeHeader,
                        offset: token.span.start,
                    });
                } else if token.span.end > window.end {
                    misplaced.push(PlacementFinding::OutsideWindow {
                        number,
                        side: WindowSide::AfterFooter,
                        offset: token.span.start,
                    });
                }
            }

            match &token.kind {
                TokenKind::SlideStart { number, .. } => {
                    if let Some(previous) = open.take() {
                        self.close_slide(previous, false, unbalanced, rootless, misplaced);
                    }
                    open = Some(OpenSlide {
                        number: *number,
                        offset: token.span.start,
                        balance: 0,
                        first_class: None,
                        inside_window: window.contains(&token.span.start),
                    });
                }
                TokenKind::SlideEnd { number } => match open.take() {
                    Some(slide) => {
                        if slide.number != *number {
                            misplaced.push(PlacementFinding::MismatchedEnd {
                                open: slide.number,
                                found: *number,
                                offset: token.span.start,
                            });
                        }
                        self.close_slide(slide, true, unbalanced, rootless, misplaced);
                    }
                    None => misplaced.push(PlacementFinding::StrayEnd {
                        number: *number,
                        offset: token.span.start,
                    }),
                },
                TokenKind::Open { class, .. } => {
                    if let Some(slide) = open.as_mut() {
                        slide.balance += 1;
                        if slide.first_class.is_none() {
                            slide.first_class = Some(class.clone());
                        }
                    }
                }
                TokenKind::Close { .. } => {
                    if let Some(slide) = open.as_mut() {
                        slide.balance -= 1;
                    }
                }
            }
        }

        if let Some(slide) = open.take() {
            self.close_slide(slide, false, unbalanced, rootless, misplaced);
        }

        tracing::debug!(
            "scanned {document_len} bytes: {} unbalanced, {} rootless",
            unbalanced.len(),
            rootless.len()
        );
    }

    fn close_slide(
        &self,
        slide: OpenSlide,
        terminated: bool,
        unbalanced: &mut BTreeSet<SlideNumber>,
        rootless: &mut BTreeSet<SlideNumber>,
        misplaced: &mut Vec<PlacementFinding>,
    ) {
        if !terminated && self.layout.require_end_markers {
            misplaced.push(PlacementFinding::Unterminated {
                number: slide.number,
                offset: slide.offset,
            });
        }

        if slide.balance != 0 {
            tracing::debug!("slide {} balance {}", slide.number, slide.balance);
            unbalanced.insert(slide.number);
        }

        if let Some(root_class) = self.layout.root_class.as_deref() {
            let has_root = slide
                .first_class
                .flatten()
                .is_some_and(|class| class.split_whitespace().any(|c| c == root_class));
            if !has_root {
                rootless.insert(slide.number);
            }
        }
    }
}
