// PRD markdown rendering.
// parser.rs turns text into blocks, inline.rs handles emphasis spans,
// html.rs renders blocks for the document viewer.

pub mod html;
pub mod inline;
pub mod parser;

use serde::Serialize;

pub use html::to_html;
pub use inline::Inline;
pub use parser::parse;

/// One rendered block of a markdown document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph { content: Vec<Inline> },
    Blockquote { content: Vec<Inline> },
    List { items: Vec<Vec<Inline>> },
    /// A numbered line, number stripped. Emitted on its own, never grouped.
    OrderedItem { content: Vec<Inline> },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Spacer,
}
