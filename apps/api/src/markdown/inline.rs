//! Inline emphasis: `**bold**`, `*italic*`, `` `code` ``.
//!
//! A single left-to-right scan. The first closing marker wins and spans do not
//! nest; a marker with no closing partner is kept as literal text.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
}

pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some((span, consumed)) = match_span(rest) {
            rest = &rest[consumed..];
            match span {
                Inline::Text(literal) => plain.push_str(&literal),
                span => {
                    if !plain.is_empty() {
                        spans.push(Inline::Text(std::mem::take(&mut plain)));
                    }
                    spans.push(span);
                }
            }
            continue;
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            plain.push(c);
        }
        rest = chars.as_str();
    }

    if !plain.is_empty() {
        spans.push(Inline::Text(plain));
    }
    spans
}

/// Tries to read one emphasis span at the start of `s`.
/// Returns the span and how many bytes it consumed.
fn match_span(s: &str) -> Option<(Inline, usize)> {
    if let Some(body) = s.strip_prefix("**") {
        // An unclosed `**` is literal as a pair; its second star never opens italic.
        return Some(match body.find("**").filter(|&end| end > 0) {
            Some(end) => (Inline::Bold(body[..end].to_string()), end + 4),
            None => (Inline::Text("**".to_string()), 2),
        });
    }
    delimited(s, '*').map(|(t, n)| (Inline::Italic(t), n))
        .or_else(|| delimited(s, '`').map(|(t, n)| (Inline::Code(t), n)))
}

fn delimited(s: &str, marker: char) -> Option<(String, usize)> {
    let body = s.strip_prefix(marker)?;
    let end = body.find(marker).filter(|&end| end > 0)?;
    Some((body[..end].to_string(), end + 2 * marker.len_utf8()))
}
