//! Line-oriented block parser.
//!
//! Each line is classified on its own, then fed to a small state machine that
//! buffers paragraphs, bullet lists, blockquotes and tables until a line of a
//! different kind closes them. Headings, numbered items and blank lines are
//! emitted immediately after flushing whatever was open.

use crate::markdown::inline::{parse_inline, Inline};
use crate::markdown::Block;

/// What a single line is, before any grouping.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    TableRow(Vec<String>),
    Heading(u8, &'a str),
    Quote(&'a str),
    Bullet(&'a str),
    Ordered(&'a str),
    Blank,
    Text(&'a str),
}

/// Classification priority: table row, heading, blockquote, bullet,
/// numbered item, blank, plain text.
pub fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();

    if trimmed.starts_with('|') {
        return LineKind::TableRow(split_cells(trimmed));
    }
    for (level, marker) in [(3u8, "### "), (2, "## "), (1, "# ")] {
        if let Some(text) = line.strip_prefix(marker) {
            return LineKind::Heading(level, text.trim());
        }
    }
    if let Some(text) = line.strip_prefix("> ") {
        return LineKind::Quote(text.trim());
    }
    if let Some(text) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        return LineKind::Bullet(text.trim());
    }
    if let Some(text) = strip_number_prefix(trimmed) {
        return LineKind::Ordered(text);
    }
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    LineKind::Text(trimmed)
}

/// `12. item` -> `item`. Needs at least one digit, a dot and whitespace.
fn strip_number_prefix(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}

fn split_cells(row: &str) -> Vec<String> {
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|c| c.trim().to_string()).collect()
}

/// `|---|:---:|` style row: every cell is dashes with optional alignment colons.
fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|c| {
            c.contains('-') && c.chars().all(|ch| ch == '-' || ch == ':')
        })
}

#[derive(Debug, Default)]
enum Mode {
    #[default]
    Idle,
    Paragraph(Vec<String>),
    List(Vec<Vec<Inline>>),
    Table(Vec<Vec<String>>),
    Blockquote(Vec<String>),
}

#[derive(Debug, Default)]
pub struct BlockParser {
    mode: Mode,
    blocks: Vec<Block>,
}

impl BlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        match classify(line) {
            LineKind::TableRow(cells) => {
                if !matches!(self.mode, Mode::Table(_)) {
                    self.flush();
                    self.mode = Mode::Table(Vec::new());
                }
                if let Mode::Table(rows) = &mut self.mode {
                    rows.push(cells);
                }
            }
            LineKind::Bullet(text) => {
                if !matches!(self.mode, Mode::List(_)) {
                    self.flush();
                    self.mode = Mode::List(Vec::new());
                }
                if let Mode::List(items) = &mut self.mode {
                    items.push(parse_inline(text));
                }
            }
            LineKind::Quote(text) => {
                if !matches!(self.mode, Mode::Blockquote(_)) {
                    self.flush();
                    self.mode = Mode::Blockquote(Vec::new());
                }
                if let Mode::Blockquote(lines) = &mut self.mode {
                    lines.push(text.to_string());
                }
            }
            LineKind::Text(text) => {
                if !matches!(self.mode, Mode::Paragraph(_)) {
                    self.flush();
                    self.mode = Mode::Paragraph(Vec::new());
                }
                if let Mode::Paragraph(lines) = &mut self.mode {
                    lines.push(text.to_string());
                }
            }
            LineKind::Heading(level, text) => {
                self.flush();
                self.blocks.push(Block::Heading {
                    level,
                    content: parse_inline(text),
                });
            }
            LineKind::Ordered(text) => {
                self.flush();
                self.blocks.push(Block::OrderedItem {
                    content: parse_inline(text),
                });
            }
            LineKind::Blank => {
                self.flush();
                self.blocks.push(Block::Spacer);
            }
        }
    }

    /// Closes any open block and returns everything parsed so far.
    pub fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }

    fn flush(&mut self) {
        match std::mem::take(&mut self.mode) {
            Mode::Idle => {}
            Mode::Paragraph(lines) => self.blocks.push(Block::Paragraph {
                content: parse_inline(&lines.join(" ")),
            }),
            Mode::Blockquote(lines) => self.blocks.push(Block::Blockquote {
                content: parse_inline(&lines.join(" ")),
            }),
            Mode::List(items) => self.blocks.push(Block::List { items }),
            Mode::Table(rows) => {
                if let Some(table) = build_table(rows) {
                    self.blocks.push(table);
                }
            }
        }
    }
}

/// First row is the header. A separator directly under it is dropped; body
/// rows are padded or cut to the header's width.
fn build_table(rows: Vec<Vec<String>>) -> Option<Block> {
    let mut rows = rows.into_iter();
    let header = rows.next()?;
    let width = header.len();

    let mut body: Vec<Vec<String>> = rows.collect();
    if body.first().is_some_and(|r| is_separator_row(r)) {
        body.remove(0);
    }
    for row in &mut body {
        row.resize(width, String::new());
    }

    Some(Block::Table { header, rows: body })
}

pub fn parse(markdown: &str) -> Vec<Block> {
    let mut parser = BlockParser::new();
    for line in markdown.lines() {
        parser.push_line(line);
    }
    parser.finish()
}
