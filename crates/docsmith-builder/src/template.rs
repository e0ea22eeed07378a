//! HTML page template for static site generation.
//!
//! A page is a sticky top bar, a grouped sidebar, the article and an
//! "On This Page" column. Styles and scripts are embedded so every page is
//! self-contained apart from the Mermaid runtime.

use std::fmt::Write;

use chrono::{DateTime, Datelike, Utc};
use docsmith_renderer::{TocEntry, escape_html, render_toc};
use docsmith_site::{NavChip, NavSection};
use docsmith_vcs::ReleaseInfo;

const THEME_CSS: &str = include_str!("../assets/theme.css");
const THEME_JS: &str = include_str!("../assets/theme.js");
const MERMAID_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.min.js";

/// All data needed to render a static page.
#[derive(Debug)]
pub struct PageData {
    /// Site name shown in the top bar and the window title.
    pub brand: String,
    pub title: String,
    /// Repository-relative source path, shown in the meta row.
    pub source: String,
    /// Href from this page to the raw source file.
    pub source_href: String,
    /// Href from this page to the site's `index.html`.
    pub home_href: String,
    /// Href from this page to the documentation generator.
    pub generator_href: String,
    pub html_content: String,
    pub toc: Vec<TocEntry>,
    pub sidebar: Vec<NavSection>,
    pub chips: Vec<NavChip>,
    pub release: ReleaseInfo,
    pub generated_at: DateTime<Utc>,
}

/// Render a complete static HTML page.
pub fn render_page(page: &PageData) -> String {
    let mut html = String::with_capacity(16384 + page.html_content.len());
    let stamp = page.generated_at.format("%Y-%m-%d %H:%M UTC").to_string();
    let tooltip = escape_html(&page.release.tooltip);

    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    let _ = writeln!(
        html,
        "<title>{}</title>",
        escape_html(&format!("{} | {}", page.title, page.brand))
    );
    let _ = writeln!(html, "<style>\n{THEME_CSS}</style>");
    let _ = writeln!(html, "<script src=\"{MERMAID_SCRIPT}\"></script>");
    html.push_str("</head>\n<body>\n");

    render_topbar(&mut html, page, &stamp, &tooltip);

    html.push_str("<div class=\"layout\">\n");
    render_sidebar(&mut html, &page.sidebar);
    html.push_str("<div class=\"backdrop\" id=\"nav-backdrop\"></div>\n");

    html.push_str("<main class=\"content-wrap\">\n<article class=\"content\">\n");
    html.push_str("<div class=\"eyebrow\">Markdown-First Documentation</div>\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(&page.title));
    html.push_str("<div class=\"meta-row\">\n");
    let _ = writeln!(
        html,
        "<div class=\"meta\">Source Markdown: <a href=\"{}\"><code>{}</code></a> · Generated: {stamp}</div>",
        escape_html(&page.source_href),
        escape_html(&page.source),
    );
    let _ = writeln!(
        html,
        "<span class=\"status-pill\" title=\"{tooltip}\">{}</span>",
        escape_html(&page.release.status.to_string()),
    );
    html.push_str("</div>\n");
    html.push_str(&page.html_content);
    let _ = writeln!(
        html,
        "\n<footer class=\"doc-footer\">(c) {} <a href=\"{}\" title=\"DocSmith documentation generator\">DocSmith</a> documentation generator</footer>",
        page.generated_at.year(),
        escape_html(&page.generator_href),
    );
    html.push_str("</article>\n</main>\n");

    render_toc_column(&mut html, &page.toc);
    html.push_str("</div>\n");

    let _ = writeln!(html, "<script>\n{THEME_JS}</script>");
    html.push_str("</body>\n</html>\n");
    html
}

fn render_topbar(html: &mut String, page: &PageData, stamp: &str, tooltip: &str) {
    html.push_str("<header class=\"topbar\">\n<div class=\"top-left\">\n");
    html.push_str(
        "<button class=\"menu-btn\" id=\"menu-toggle\" aria-label=\"Toggle navigation\">Menu</button>\n",
    );
    let _ = writeln!(
        html,
        "<a class=\"brand\" href=\"{}\">{}</a>",
        escape_html(&page.home_href),
        escape_html(&page.brand),
    );
    html.push_str("<nav class=\"top-nav\" aria-label=\"Top navigation\">");
    render_chips(html, &page.chips);
    html.push_str("</nav>\n</div>\n<div class=\"top-right\">\n");
    let _ = writeln!(
        html,
        "<span class=\"generated-stamp\" title=\"Generation timestamp\">{stamp}</span>"
    );
    let _ = writeln!(
        html,
        "<span class=\"release-pill\" title=\"{tooltip}\">{}</span>",
        escape_html(&page.release.label),
    );
    html.push_str(
        "<button class=\"theme-btn\" id=\"theme-toggle\" aria-label=\"Toggle color theme\">Dark</button>\n",
    );
    html.push_str("</div>\n</header>\n");
}

/// Top-bar group shortcuts.
fn render_chips(html: &mut String, chips: &[NavChip]) {
    for chip in chips {
        let class = if chip.active {
            "top-link top-link-active"
        } else {
            "top-link"
        };
        let _ = write!(
            html,
            "<a class=\"{class}\" href=\"{}\">{}</a>",
            escape_html(&chip.href),
            escape_html(chip.group.title()),
        );
    }
}

/// Grouped sidebar; each group is a collapsible section.
fn render_sidebar(html: &mut String, sections: &[NavSection]) {
    html.push_str(
        "<aside class=\"sidebar\" id=\"left-nav\" aria-label=\"Section navigation\">\n",
    );
    html.push_str("<div class=\"sub\">Generated from Markdown</div>\n");
    for section in sections {
        let (class, expanded) = if section.open {
            ("nav-group open", "true")
        } else {
            ("nav-group", "false")
        };
        let _ = write!(
            html,
            "<section class=\"{class}\"><button class=\"nav-group-btn\" type=\"button\" aria-expanded=\"{expanded}\">\
             <span class=\"nav-group-icon\">{}</span><span class=\"nav-group-title\">{}</span>\
             <span class=\"nav-group-caret\">▾</span></button><div class=\"nav-group-items\">",
            section.group.icon(),
            escape_html(section.group.title()),
        );
        for link in &section.links {
            let class = if link.active { "nav-link active" } else { "nav-link" };
            let _ = write!(
                html,
                "<a class=\"{class}\" href=\"{}\"><span class=\"nav-link-dot\">•</span>\
                 <span class=\"nav-link-text\">{}</span></a>",
                escape_html(&link.href),
                escape_html(&link.title),
            );
        }
        html.push_str("</div></section>\n");
    }
    html.push_str("</aside>\n");
}

fn render_toc_column(html: &mut String, toc: &[TocEntry]) {
    html.push_str("<aside class=\"toc\">\n<h3>On This Page</h3>\n");
    if toc.is_empty() {
        html.push_str("<div class=\"toc-empty\">No section headings on this page.</div>\n");
    } else {
        html.push_str(&render_toc(toc));
        html.push('\n');
    }
    html.push_str("</aside>\n");
}
