//! Parsing of hand-written fragment sources.
//!
//! A source holds one or more slides, each introduced by a start marker:
//!
//! ```text
//! <!-- Slide 34: appsettings.Development.json -->
//! <div class="slide">...</div>
//!
//! <!-- Slide 35: Options pattern -->
//! <div class="slide">...</div>
//! ```
//!
//! A body runs until the next start marker, its own end marker, or the end of the
//! source, and is trimmed of surrounding whitespace. Anything else outside a body is
//! rejected rather than silently dropped.

use crate::fragment::Fragment;
use crate::markup::{tokenize, TokenKind};
use crate::{DeckError, DeckResult};
use deck_types::{SlideNumber, SlideTitle};

/// Splits `text` into fragments in source order. `origin` names the source in errors.
pub fn parse_fragments(text: &str, origin: &str) -> DeckResult<Vec<Fragment>> {
    let markers: Vec<_> = tokenize(text).into_iter().filter(|t| t.is_marker()).collect();

    if markers.is_empty() {
        return Err(DeckError::InvalidInput(format!(
            "{origin}: no slide markers found"
        )));
    }

    let leading = &text[..markers[0].span.start];
    if !leading.trim().is_empty() {
        return Err(DeckError::InvalidInput(format!(
            "{origin}: content before the first slide marker"
        )));
    }

    let mut fragments = Vec::new();
    let mut open: Option<(SlideNumber, SlideTitle, usize)> = None;
    let mut cursor = markers[0].span.start;

    for marker in &markers {
        match &marker.kind {
            TokenKind::SlideStart { number, title } => {
                if let Some((n, t, body_start)) = open.take() {
                    fragments.push(Fragment::new(n, t, text[body_start..marker.span.start].trim()));
                } else if !text[cursor..marker.span.start].trim().is_empty() {
                    return Err(DeckError::InvalidInput(format!(
                        "{origin}: content outside a slide before slide {number}"
                    )));
                }
                let title = title.as_deref().ok_or_else(|| {
                    DeckError::InvalidInput(format!("{origin}: slide {number} marker has no title"))
                })?;
                open = Some((*number, SlideTitle::new(title)?, marker.span.end));
            }
            TokenKind::SlideEnd { number } => match open.take() {
                Some((n, t, body_start)) if n == *number => {
                    fragments.push(Fragment::new(n, t, text[body_start..marker.span.start].trim()));
                    cursor = marker.span.end;
                }
                Some((n, _, _)) => {
                    return Err(DeckError::InvalidInput(format!(
                        "{origin}: end marker for slide {number} closes slide {n}"
                    )));
                }
                None => {
                    return Err(DeckError::InvalidInput(format!(
                        "{origin}: end marker for slide {number} without a start marker"
                    )));
                }
            },
            _ => {}
        }
    }

    match open {
        Some((n, t, body_start)) => fragments.push(Fragment::new(n, t, text[body_start..].trim())),
        None if !text[cursor..].trim().is_empty() => {
            return Err(DeckError::InvalidInput(format!(
                "{origin}: content after the last slide"
            )));
        }
        None => {}
    }

    tracing::debug!("{origin}: parsed {} fragments", fragments.len());
    Ok(fragments)
}
