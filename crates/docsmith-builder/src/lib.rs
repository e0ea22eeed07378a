//! Static site generation for docsmith.
//!
//! Turns a loaded [`Site`](docsmith_site::Site) into one self-contained HTML
//! page per document, and scaffolds module documentation from a template.

mod builder;
mod scaffold;
mod template;

pub use builder::{BuildConfig, BuildError, BuildReport, StaticSiteBuilder};
pub use scaffold::{Scaffold, ScaffoldError, module_doc_name};
pub use template::{PageData, render_page};
