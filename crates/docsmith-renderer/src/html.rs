//! HTML helpers: escaping and whole-document diagram pages.

use std::fmt::Write;

/// Language tag that marks a fenced block as Mermaid diagram markup.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// Escape HTML special characters, including both quote styles.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render a fenced code block.
///
/// Diagram blocks keep their body verbatim so the client-side renderer sees the
/// original markup; everything else is escaped.
pub(crate) fn code_block(language: Option<&str>, body: &str, out: &mut String) {
    match language {
        Some(DIAGRAM_LANGUAGE) => {
            write!(out, r#"<pre class="mermaid">{body}</pre>"#).unwrap();
        }
        Some(lang) => {
            write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(body)
            )
            .unwrap();
        }
        None => {
            write!(out, "<pre><code>{}</code></pre>", escape_html(body)).unwrap();
        }
    }
}

/// Render a standalone diagram-source document (a `.mmd` file) as a page body.
///
/// The diagram is emitted verbatim for client-side rendering, followed by a
/// collapsible view of the escaped source.
#[must_use]
pub fn render_diagram_source(text: &str) -> String {
    let body = text.trim();
    if body.is_empty() {
        return "<p>No Mermaid diagram content found.</p>".to_owned();
    }

    let mut out = String::with_capacity(body.len() * 2 + 192);
    out.push_str("<p>Diagram authored as <code>.mmd</code> (source-first).</p>");
    write!(out, r#"<pre class="mermaid">{body}</pre>"#).unwrap();
    out.push_str("<details><summary>View raw diagram source</summary>");
    write!(out, "<pre><code>{}</code></pre>", escape_html(body)).unwrap();
    out.push_str("</details>");
    out
}
