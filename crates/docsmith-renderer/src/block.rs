//! Line-oriented block parsing and document body rendering.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::context::RenderContext;
use crate::html::code_block;
use crate::inline::render_inline;
use crate::slug::SlugRegistry;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("invalid heading regex"));

static UL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*]\s+(.*)$").expect("invalid list regex"));

static OL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+(.*)$").expect("invalid list regex"));

static TABLE_DIVIDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?(\s*:?-{3,}:?\s*\|)+\s*:?-{3,}:?\s*\|?\s*$")
        .expect("invalid table divider regex")
});

const FENCE: &str = "```";

/// List flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    /// HTML element name.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

/// One unit of a parsed document, in document order.
#[derive(Debug, PartialEq, Eq)]
pub enum Block<'a> {
    /// A blank line. Ends any open list.
    Break,
    Heading {
        level: u8,
        text: &'a str,
    },
    ListItem {
        kind: ListKind,
        text: &'a str,
    },
    /// A fenced code block. An unterminated fence runs to end of input.
    FencedCode {
        language: Option<String>,
        body: String,
    },
    Table {
        header: Vec<&'a str>,
        rows: Vec<Vec<&'a str>>,
    },
    /// Consecutive plain lines joined with single spaces.
    Paragraph(String),
}

/// Iterator over the [`Block`]s of a Markdown document.
///
/// Classification order per line: blank, fence, heading, table start, list
/// item, paragraph. Anything not recognised is paragraph text, so the parser
/// never fails.
#[derive(Debug)]
pub struct Blocks<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Blocks<'a> {
    /// Start parsing `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    fn starts_table(&self, index: usize) -> bool {
        match (self.lines.get(index), self.lines.get(index + 1)) {
            (Some(line), Some(next)) => line.contains('|') && TABLE_DIVIDER_RE.is_match(next.trim()),
            _ => false,
        }
    }

    fn list_item(line: &'a str) -> Option<(ListKind, &'a str)> {
        if let Some(caps) = UL_RE.captures(line) {
            return caps.get(1).map(|m| (ListKind::Unordered, m.as_str().trim()));
        }
        OL_RE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| (ListKind::Ordered, m.as_str().trim()))
    }

    fn fenced_code(&mut self, opening: &str) -> Block<'a> {
        let language = opening[FENCE.len()..].trim().to_lowercase();
        let mut body = Vec::new();
        while let Some(line) = self.lines.get(self.pos) {
            self.pos += 1;
            if line.trim().starts_with(FENCE) {
                break;
            }
            body.push(*line);
        }
        Block::FencedCode {
            language: (!language.is_empty()).then_some(language),
            body: body.join("\n"),
        }
    }

    fn table(&mut self, header: &'a str) -> Block<'a> {
        // Skip the divider under the header.
        self.pos += 1;
        let mut rows = Vec::new();
        while let Some(line) = self.lines.get(self.pos) {
            let trimmed = line.trim();
            if trimmed.is_empty() || !trimmed.contains('|') {
                break;
            }
            self.pos += 1;
            if TABLE_DIVIDER_RE.is_match(trimmed) {
                continue;
            }
            rows.push(split_row(trimmed));
        }
        Block::Table {
            header: split_row(header),
            rows,
        }
    }

    fn paragraph(&mut self, first: &'a str) -> Block<'a> {
        let mut text = first.to_owned();
        while let Some(line) = self.lines.get(self.pos) {
            let trimmed = line.trim();
            if trimmed.is_empty()
                || trimmed.starts_with(FENCE)
                || HEADING_RE.is_match(trimmed)
                || Self::list_item(line).is_some()
                || self.starts_table(self.pos)
            {
                break;
            }
            text.push(' ');
            text.push_str(trimmed);
            self.pos += 1;
        }
        Block::Paragraph(text)
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.pos;
        let line = *self.lines.get(index)?;
        let trimmed = line.trim();
        self.pos += 1;

        if trimmed.is_empty() {
            return Some(Block::Break);
        }
        if trimmed.starts_with(FENCE) {
            return Some(self.fenced_code(trimmed));
        }
        if let Some(caps) = HEADING_RE.captures(trimmed) {
            let level = u8::try_from(caps[1].len()).unwrap_or(6);
            let text = caps.get(2).map_or("", |m| m.as_str().trim());
            return Some(Block::Heading { level, text });
        }
        if self.starts_table(index) {
            return Some(self.table(trimmed));
        }
        if let Some((kind, text)) = Self::list_item(line) {
            return Some(Block::ListItem { kind, text });
        }
        Some(self.paragraph(trimmed))
    }
}

/// Split a table row into trimmed cells, dropping one outer pipe on each side.
fn split_row(row: &str) -> Vec<&str> {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    row.split('|').map(str::trim).collect()
}

/// Render a Markdown document body to HTML.
///
/// Every block becomes one fragment and fragments are joined with newlines.
/// Heading ids are unique within the document and agree with
/// [`extract_toc`](crate::extract_toc).
#[must_use]
pub fn render_markdown(text: &str, ctx: &RenderContext<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut open_list: Option<ListKind> = None;
    let mut slugs = SlugRegistry::new();

    for block in Blocks::new(text) {
        if let Block::ListItem { kind, text } = block {
            if open_list != Some(kind) {
                close_list(&mut open_list, &mut parts);
                parts.push(format!("<{}>", kind.tag()));
                open_list = Some(kind);
            }
            parts.push(format!("<li>{}</li>", render_inline(text, ctx)));
            continue;
        }

        close_list(&mut open_list, &mut parts);
        match block {
            Block::Break | Block::ListItem { .. } => {}
            Block::Heading { level, text } => {
                let id = slugs.unique(text);
                parts.push(format!(
                    r#"<h{level} id="{id}">{}</h{level}>"#,
                    render_inline(text, ctx)
                ));
            }
            Block::FencedCode { language, body } => {
                let mut out = String::new();
                code_block(language.as_deref(), &body, &mut out);
                parts.push(out);
            }
            Block::Table { header, rows } => parts.push(render_table(&header, &rows, ctx)),
            Block::Paragraph(text) => parts.push(format!("<p>{}</p>", render_inline(&text, ctx))),
        }
    }
    close_list(&mut open_list, &mut parts);

    parts.join("\n")
}

fn close_list(open_list: &mut Option<ListKind>, parts: &mut Vec<String>) {
    if let Some(kind) = open_list.take() {
        parts.push(format!("</{}>", kind.tag()));
    }
}

fn render_table(header: &[&str], rows: &[Vec<&str>], ctx: &RenderContext<'_>) -> String {
    let mut out = String::from("<table><thead><tr>");
    for cell in header {
        write!(out, "<th>{}</th>", render_inline(cell, ctx)).unwrap();
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            write!(out, "<td>{}</td>", render_inline(cell, ctx)).unwrap();
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}
