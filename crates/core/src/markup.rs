//! Token model of a slide document.
//!
//! The tokenizer walks the text once and records every construct the assembler and
//! the validator care about, each with its byte span:
//! - slide start markers `<!-- Slide N: Title -->`
//! - slide end markers `<!-- /Slide N -->`
//! - element open tags (void and self-closing elements are skipped)
//! - element close tags
//!
//! Text, ordinary comments, doctype declarations and the contents of `<script>` and
//! `<style>` elements produce no tokens. The tokenizer never fails: malformed markup
//! simply yields fewer tokens, and the validator reports the consequences.

use crate::constants::{END_MARKER_KEYWORD, RAW_TEXT_ELEMENTS, START_MARKER_KEYWORD, VOID_ELEMENTS};
use deck_types::SlideNumber;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    SlideStart {
        number: SlideNumber,
        title: Option<String>,
    },
    SlideEnd {
        number: SlideNumber,
    },
    Open {
        name: String,
        class: Option<String>,
    },
    Close {
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn is_marker(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::SlideStart { .. } | TokenKind::SlideEnd { .. }
        )
    }
}

/// Renders the start marker for a slide.
pub fn start_marker(number: SlideNumber, title: &str) -> String {
    format!("<!-- {START_MARKER_KEYWORD} {number}: {title} -->")
}

/// Renders the end marker for a slide.
pub fn end_marker(number: SlideNumber) -> String {
    format!("<!-- {END_MARKER_KEYWORD} {number} -->")
}

/// Splits `text` into tokens in document order.
pub fn tokenize(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(found) = text[pos..].find('<') {
        let start = pos + found;
        let rest = &text[start..];

        if rest.starts_with("<!--") {
            let (inner_end, end) = match rest[4..].find("-->") {
                Some(i) => (start + 4 + i, start + 4 + i + 3),
                None => (text.len(), text.len()),
            };
            let inner = &text[start + 4..inner_end];
            if let Some(kind) = parse_marker(inner) {
                tokens.push(Token {
                    kind,
                    span: start..end,
                });
            }
            pos = end;
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = find_tag_end(text, start + 2);
        } else if rest.starts_with("</") {
            let name = tag_name(&rest[2..]);
            let end = find_tag_end(text, start + 2);
            if !name.is_empty() {
                tokens.push(Token {
                    kind: TokenKind::Close { name },
                    span: start..end,
                });
            }
            pos = end;
        } else if bytes.get(start + 1).is_some_and(u8::is_ascii_alphabetic) {
            let name = tag_name(&rest[1..]);
            let end = find_tag_end(text, start + 1 + name.len());
            let raw_attrs = &text[start + 1 + name.len()..end];
            let raw_attrs = raw_attrs.strip_suffix('>').unwrap_or(raw_attrs);
            let self_closing = raw_attrs.trim_end().ends_with('/');
            pos = end;

            if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                continue;
            }

            let raw_text = RAW_TEXT_ELEMENTS.contains(&name.as_str());
            tokens.push(Token {
                kind: TokenKind::Open {
                    name: name.clone(),
                    class: attribute(raw_attrs, "class").map(str::to_owned),
                },
                span: start..end,
            });

            if raw_text {
                // Skip straight to the matching close tag; its content is not markup.
                let closing = format!("</{name}");
                match find_ascii_case_insensitive(&text[pos..], &closing) {
                    Some(i) => pos += i,
                    None => pos = text.len(),
                }
            }
        } else {
            pos = start + 1;
        }
    }

    tokens
}

/// Parses the inside of an HTML comment as a slide marker.
fn parse_marker(inner: &str) -> Option<TokenKind> {
    let inner = inner.trim();

    if let Some(rest) = inner.strip_prefix(END_MARKER_KEYWORD) {
        let (number, tail) = marker_number(rest)?;
        return tail
            .trim()
            .is_empty()
            .then_some(TokenKind::SlideEnd { number });
    }

    let rest = inner.strip_prefix(START_MARKER_KEYWORD)?;
    let (number, tail) = marker_number(rest)?;
    let tail = tail.trim_start();
    let title = match tail.strip_prefix(':') {
        Some(t) => Some(t.trim()).filter(|t| !t.is_empty()).map(str::to_owned),
        None if tail.is_empty() => None,
        // "Slide 3 of the outline" is prose, not a marker.
        None => return None,
    };
    Some(TokenKind::SlideStart { number, title })
}

/// Reads the whitespace-separated number after a marker keyword.
fn marker_number(rest: &str) -> Option<(SlideNumber, &str)> {
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let number = rest[..digits].parse().ok()?;
    Some((number, &rest[digits..]))
}

fn tag_name(rest: &str) -> String {
    rest.chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ':')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Returns the offset just past the `>` closing a tag, honouring quoted attribute values.
fn find_tag_end(text: &str, from: usize) -> usize {
    let mut quote: Option<u8> = None;
    for (i, b) in text.as_bytes()[from..].iter().enumerate() {
        match (quote, *b) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(*b),
            (None, b'>') => return from + i + 1,
            (None, _) => {}
        }
    }
    text.len()
}

/// Looks up an attribute value in the raw attribute text of an open tag.
pub fn attribute<'a>(raw: &'a str, wanted: &str) -> Option<&'a str> {
    let mut rest = raw;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            return None;
        }
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        rest = rest[name_len..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remainder) = match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let close = body.find(q).unwrap_or(body.len());
                    (&body[..close], body.get(close + 1..).unwrap_or(""))
                }
                _ => {
                    let close = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    (&after_eq[..close], &after_eq[close..])
                }
            };
            rest = remainder;
            Some(value)
        } else {
            None
        };

        if name.eq_ignore_ascii_case(wanted) {
            return Some(value.unwrap_or(""));
        }
    }
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(value: u32) -> SlideNumber {
        SlideNumber::new(value).unwrap()
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_markers_and_tags() {
        let text = r#"<!-- Slide 3: Intro --><div class="slide title"><p>x</p></div><!-- /Slide 3 -->"#;
        assert_eq!(
            kinds(text),
            vec![
                TokenKind::SlideStart {
                    number: n(3),
                    title: Some("Intro".into())
                },
                TokenKind::Open {
                    name: "div".into(),
                    class: Some("slide title".into())
                },
                TokenKind::Open {
                    name: "p".into(),
                    class: None
                },
                TokenKind::Close { name: "p".into() },
                TokenKind::Close { name: "div".into() },
                TokenKind::SlideEnd { number: n(3) },
            ]
        );
    }

    #[test]
    fn test_token_spans_cover_source_text() {
        let text = "ab<!-- Slide 1 -->cd<S>";
        let tokens = tokenize(text);
        assert_eq!(&text[tokens[0].span.clone()], "<!-- Slide 1 -->");
        assert_eq!(&text[tokens[1].span.clone()], "<S>");
        assert!(tokens[0].is_marker());
        assert!(!tokens[1].is_marker());
    }

    #[test]
    fn test_ordinary_comments_are_not_markers() {
        let text = "<!-- Slides 65-99: Documentation section --><!-- Slide 3 of the outline --><!-- Slide x -->";
        assert!(tokenize(text).is_empty());
    }

    #[test]
    fn test_marker_without_title() {
        assert_eq!(
            kinds("<!--Slide 7-->"),
            vec![TokenKind::SlideStart {
                number: n(7),
                title: None
            }]
        );
    }

    #[test]
    fn test_void_self_closing_and_doctype_are_skipped() {
        let text = "<!DOCTYPE html><br><img src=\"a.png\"><x-icon /><meta charset=\"UTF-8\">";
        assert!(tokenize(text).is_empty());
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        let text = r#"<div title="a > b" class='slide'></div>"#;
        assert_eq!(
            kinds(text),
            vec![
                TokenKind::Open {
                    name: "div".into(),
                    class: Some("slide".into())
                },
                TokenKind::Close { name: "div".into() },
            ]
        );
    }

    #[test]
    fn test_script_content_is_raw_text() {
        let text = "<script>if (a <div) { '</div>' }</SCRIPT><p></p>";
        let names: Vec<String> = tokenize(text)
            .into_iter()
            .map(|t| match t.kind {
                TokenKind::Open { name, .. } => format!("+{name}"),
                TokenKind::Close { name } => format!("-{name}"),
                other => format!("{other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["+script", "-script", "+p", "-p"]);
    }

    #[test]
    fn test_stray_less_than_is_text() {
        assert!(tokenize("1 < 2 and a<-b").is_empty());
    }

    #[test]
    fn test_attribute_lookup() {
        let raw = r#" id=main data-x class="slide  active" hidden"#;
        assert_eq!(attribute(raw, "class"), Some("slide  active"));
        assert_eq!(attribute(raw, "id"), Some("main"));
        assert_eq!(attribute(raw, "hidden"), Some(""));
        assert_eq!(attribute(raw, "style"), None);
    }

    #[test]
    fn test_marker_rendering_round_trips_through_tokenizer() {
        let start = start_marker(n(12), "Closing / Q&A");
        let end = end_marker(n(12));
        assert_eq!(start, "<!-- Slide 12: Closing / Q&A -->");
        assert_eq!(end, "<!-- /Slide 12 -->");
        assert_eq!(
            kinds(&format!("{start}{end}")),
            vec![
                TokenKind::SlideStart {
                    number: n(12),
                    title: Some("Closing / Q&A".into())
                },
                TokenKind::SlideEnd { number: n(12) },
            ]
        );
    }
}
