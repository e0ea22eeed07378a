//! Line-oriented Markdown renderer with cross-document link resolution.
//!
//! The renderer turns one Markdown document into two HTML fragments: the page
//! body ([`render_markdown`]) and its table of contents ([`extract_toc`] plus
//! [`render_toc`]). Relative links between documents are rewritten to point at
//! the generated pages, using a [`SitePathMap`] built once for the whole site.
//!
//! Rendering is pure: no filesystem access, no global state, and malformed
//! input degrades to plain paragraphs or passthrough links instead of errors.
//!
//! # Example
//!
//! ```
//! use docsmith_renderer::{PathLayout, RenderContext, SitePathMap, render_markdown};
//!
//! let paths = SitePathMap::build(
//!     PathLayout::default(),
//!     ["docs/README.md", "docs/guide.md"],
//! )
//! .unwrap();
//! let ctx = RenderContext::new("docs/README.md", "index.html", &paths);
//!
//! let html = render_markdown("# Title\n\n[Guide](guide.md)", &ctx);
//! assert!(html.contains(r#"<a href="guide.html">Guide</a>"#));
//! ```

mod block;
mod context;
mod html;
mod inline;
mod link;
mod paths;
mod slug;
mod toc;
mod util;

pub use block::{Block, Blocks, ListKind, render_markdown};
pub use context::RenderContext;
pub use html::{DIAGRAM_LANGUAGE, escape_html, render_diagram_source};
pub use inline::render_inline;
pub use link::resolve_link;
pub use paths::{PathLayout, PathMapError, SitePathMap};
pub use slug::{FALLBACK_SLUG, SlugRegistry, slugify};
pub use toc::{TocEntry, extract_toc, render_toc};
pub use util::{clean_path, normalize_path, parent_dir, relative_path};
