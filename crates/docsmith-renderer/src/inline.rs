//! Inline span rendering: links, code spans and emphasis.
//!
//! Rendering runs in two passes. The first splits the text into [`Span`]s,
//! turning links and code spans into finished HTML that later steps must not
//! touch. The second escapes the remaining raw text and applies emphasis over
//! it, treating finished spans as opaque.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::RenderContext;
use crate::html::escape_html;
use crate::link::resolve_link;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("invalid link regex"));

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("invalid code span regex"));

/// A piece of inline text before escaping.
#[derive(Debug, PartialEq)]
enum Span {
    /// Source text that still needs escaping and emphasis.
    Raw(String),
    /// Finished HTML, emitted as-is.
    Html(String),
}

/// Escaped text split at emphasis markers.
#[derive(Debug)]
enum Piece {
    Star,
    Done(String),
    /// `<strong>` or `</strong>` placed by the bold pass.
    Strong { open: bool },
}

/// Render one block's inline text to HTML.
///
/// Links are resolved against `ctx`; every other character of the input is
/// escaped exactly once.
#[must_use]
pub fn render_inline(text: &str, ctx: &RenderContext<'_>) -> String {
    let mut spans = Vec::new();
    split_matches(&LINK_RE, text, &mut spans, |caps| {
        let target = resolve_link(caps[2].trim(), ctx);
        format!(
            r#"<a href="{}">{}</a>"#,
            escape_html(&target),
            render_label(caps[1].trim())
        )
    });
    finish(split_code(spans))
}

/// Link labels get code spans and emphasis but never nested links.
fn render_label(label: &str) -> String {
    finish(split_code(vec![Span::Raw(label.to_owned())]))
}

fn split_code(spans: Vec<Span>) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        match span {
            Span::Raw(text) => split_matches(&CODE_RE, &text, &mut out, |caps| {
                format!("<code>{}</code>", escape_html(&caps[1]))
            }),
            html @ Span::Html(_) => out.push(html),
        }
    }
    out
}

/// Split `text` at every match of `re`, rendering matches with `render`.
fn split_matches<F>(re: &Regex, text: &str, out: &mut Vec<Span>, mut render: F)
where
    F: FnMut(&regex::Captures<'_>) -> String,
{
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            out.push(Span::Raw(text[last..whole.start()].to_owned()));
        }
        out.push(Span::Html(render(&caps)));
        last = whole.end();
    }
    if last < text.len() {
        out.push(Span::Raw(text[last..].to_owned()));
    }
}

/// Escape raw spans, apply bold then italic, and join.
fn finish(spans: Vec<Span>) -> String {
    let mut pieces = Vec::new();
    for span in spans {
        match span {
            Span::Html(html) => pieces.push(Piece::Done(html)),
            Span::Raw(text) => {
                for (i, part) in text.split('*').enumerate() {
                    if i > 0 {
                        pieces.push(Piece::Star);
                    }
                    if !part.is_empty() {
                        pieces.push(Piece::Done(escape_html(part)));
                    }
                }
            }
        }
    }

    let pieces = apply_italic(apply_bold(pieces));

    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Star => out.push('*'),
            Piece::Done(html) => out.push_str(&html),
            Piece::Strong { open: true } => out.push_str("<strong>"),
            Piece::Strong { open: false } => out.push_str("</strong>"),
        }
    }
    out
}

fn is_double_star(pieces: &[Piece], at: usize) -> bool {
    matches!(pieces.get(at..at + 2), Some([Piece::Star, Piece::Star]))
}

fn is_star(pieces: &[Piece], at: usize) -> bool {
    matches!(pieces.get(at), Some(Piece::Star))
}

/// `**text**`, where the text may itself contain single stars.
///
/// Matches left to right without overlap; the closing marker is the nearest
/// one that leaves a non-empty body. The body never starts or ends with a bare
/// star, so in a run of three the outer star is left for the italic pass and
/// `***text***` becomes `<em><strong>text</strong></em>`.
fn apply_bold(pieces: Vec<Piece>) -> Vec<Piece> {
    let mut closing = Vec::new();
    let mut i = 0;
    while i < pieces.len() {
        if is_double_star(&pieces, i)
            && !is_star(&pieces, i + 2)
            && let Some(j) = (i + 3..pieces.len())
                .find(|&j| is_double_star(&pieces, j) && !is_star(&pieces, j - 1))
        {
            closing.push((i, j));
            i = j + 2;
        } else {
            i += 1;
        }
    }
    if closing.is_empty() {
        return pieces;
    }

    let mut out = Vec::with_capacity(pieces.len());
    let mut pairs = closing.into_iter().peekable();
    let mut skip = 0;
    for (index, piece) in pieces.into_iter().enumerate() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        match pairs.peek() {
            Some(&(open, _)) if open == index => {
                out.push(Piece::Strong { open: true });
                skip = 1;
            }
            Some(&(_, close)) if close == index => {
                out.push(Piece::Strong { open: false });
                pairs.next();
                skip = 1;
            }
            _ => out.push(piece),
        }
    }
    out
}

/// `*text*` with no stars inside.
///
/// The body may contain whole `<strong>` elements but never only one end of
/// one, so the result stays well nested.
fn apply_italic(pieces: Vec<Piece>) -> Vec<Piece> {
    let mut out = Vec::with_capacity(pieces.len());
    let mut iter = pieces.into_iter().peekable();
    while let Some(piece) = iter.next() {
        if !matches!(piece, Piece::Star) {
            out.push(piece);
            continue;
        }
        let mut body = Vec::new();
        let mut depth = 0usize;
        while let Some(next) = iter.peek() {
            match next {
                Piece::Star => break,
                Piece::Strong { open: false } if depth == 0 => break,
                Piece::Strong { open: false } => depth -= 1,
                Piece::Strong { open: true } => depth += 1,
                Piece::Done(_) => {}
            }
            if let Some(next) = iter.next() {
                body.push(next);
            }
        }
        if !body.is_empty() && depth == 0 && matches!(iter.peek(), Some(Piece::Star)) {
            iter.next();
            out.push(Piece::Done("<em>".to_owned()));
            out.extend(body);
            out.push(Piece::Done("</em>".to_owned()));
        } else {
            out.push(Piece::Star);
            out.extend(body);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::paths::{PathLayout, SitePathMap};

    fn paths() -> SitePathMap {
        SitePathMap::build(
            PathLayout::default(),
            ["docs/README.md", "docs/guide.md", "docs/api/endpoints.md"],
        )
        .unwrap()
    }

    fn render(text: &str) -> String {
        let paths = paths();
        let ctx = RenderContext::new("docs/README.md", "index.html", &paths);
        render_inline(text, &ctx)
    }

    #[test]
    fn test_plain_text_is_escaped() {
        assert_eq!(render(r#"a < b & "c""#), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(render("**bold** and *it*"), "<strong>bold</strong> and <em>it</em>");
    }

    #[test]
    fn test_italic_nested_in_bold() {
        assert_eq!(
            render("**bold *and italic* text**"),
            "<strong>bold <em>and italic</em> text</strong>"
        );
    }

    #[test]
    fn test_unbalanced_stars_are_literal() {
        assert_eq!(render("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(render("**open"), "**open");
        assert_eq!(render("****"), "****");
    }

    #[test]
    fn test_bold_nested_in_italic() {
        assert_eq!(
            render("*an **important** note*"),
            "<em>an <strong>important</strong> note</em>"
        );
    }

    #[test]
    fn test_triple_stars_are_bold_italic() {
        assert_eq!(render("***x***"), "<em><strong>x</strong></em>");
        assert_eq!(
            render("***x*** and ***bold italic***"),
            "<em><strong>x</strong></em> and <em><strong>bold italic</strong></em>"
        );
        assert_eq!(render("*x **y***"), "<em>x <strong>y</strong></em>");
    }

    #[test]
    fn test_emphasis_stays_well_nested() {
        assert_eq!(render("**a *b***"), "<strong>a *b</strong>*");
        assert_eq!(render("*x **y* z**"), "*x <strong>y* z</strong>");
    }

    #[test]
    fn test_code_span_is_protected() {
        assert_eq!(
            render("call `a*b<c>*d` now"),
            "call <code>a*b&lt;c&gt;*d</code> now"
        );
    }

    #[test]
    fn test_emphasis_spans_across_code() {
        assert_eq!(
            render("*see `x` here*"),
            "<em>see <code>x</code> here</em>"
        );
    }

    #[test]
    fn test_link_is_resolved() {
        assert_eq!(
            render("Read [the guide](guide.md#Getting Started)."),
            r#"Read <a href="guide.html#getting-started">the guide</a>."#
        );
    }

    #[test]
    fn test_link_label_gets_code_and_emphasis() {
        assert_eq!(
            render("[**API** `endpoints`](api/endpoints.md)"),
            r#"<a href="api/endpoints.html"><strong>API</strong> <code>endpoints</code></a>"#
        );
    }

    #[test]
    fn test_link_href_is_escaped_once() {
        assert_eq!(
            render("[q](https://example.com/?a=1&b=2)"),
            r#"<a href="https://example.com/?a=1&amp;b=2">q</a>"#
        );
    }

    #[test]
    fn test_link_contents_not_touched_by_emphasis() {
        assert_eq!(
            render("*[x](https://e.com/a*b)*"),
            r#"<em><a href="https://e.com/a*b">x</a></em>"#
        );
    }

    #[test]
    fn test_no_unescaped_specials_outside_spans() {
        let html = render(r#"<script>alert("x") & more</script>"#);
        assert!(!html.contains('<'));
        assert!(!html.contains('"'));
        assert!(html.contains(" &amp; more"));
    }

    #[test]
    fn test_split_code_keeps_order() {
        let spans = split_code(vec![Span::Raw("a `b` c".to_owned())]);
        assert_eq!(
            spans,
            vec![
                Span::Raw("a ".to_owned()),
                Span::Html("<code>b</code>".to_owned()),
                Span::Raw(" c".to_owned()),
            ]
        );
    }
}
