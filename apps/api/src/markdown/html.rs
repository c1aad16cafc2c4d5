//! HTML rendering of parsed blocks. All text is escaped.

use std::fmt::Write;

use crate::markdown::inline::Inline;
use crate::markdown::Block;

pub fn to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        render_block(&mut out, block);
        out.push('\n');
    }
    out
}

fn render_block(out: &mut String, block: &Block) {
    match block {
        Block::Heading { level, content } => {
            let _ = write!(out, "<h{level}>{}</h{level}>", render_inlines(content));
        }
        Block::Paragraph { content } => {
            let _ = write!(out, "<p>{}</p>", render_inlines(content));
        }
        Block::OrderedItem { content } => {
            let _ = write!(out, "<p class=\"ordered-item\">{}</p>", render_inlines(content));
        }
        Block::Blockquote { content } => {
            let _ = write!(out, "<blockquote>{}</blockquote>", render_inlines(content));
        }
        Block::List { items } => {
            out.push_str("<ul>");
            for item in items {
                let _ = write!(out, "<li>{}</li>", render_inlines(item));
            }
            out.push_str("</ul>");
        }
        Block::Table { header, rows } => {
            out.push_str("<table><thead><tr>");
            for cell in header {
                let _ = write!(out, "<th>{}</th>", escape(cell));
            }
            out.push_str("</tr></thead><tbody>");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    let _ = write!(out, "<td>{}</td>", escape(cell));
                }
                out.push_str("</tr>");
            }
            out.push_str("</tbody></table>");
        }
        Block::Spacer => out.push_str("<div class=\"spacer\"></div>"),
    }
}

fn render_inlines(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(t) => escape(t),
            Inline::Bold(t) => format!("<strong>{}</strong>", escape(t)),
            Inline::Italic(t) => format!("<em>{}</em>", escape(t)),
            Inline::Code(t) => format!("<code>{}</code>", escape(t)),
        })
        .collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
