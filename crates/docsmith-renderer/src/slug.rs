//! Heading anchors.

use std::collections::{HashMap, HashSet};

/// Anchor used when a heading has no alphanumeric characters.
pub const FALLBACK_SLUG: &str = "section";

/// Convert text to a URL/anchor-safe slug.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single dash and trims leading and trailing dashes. Text without any ASCII
/// alphanumerics becomes [`FALLBACK_SLUG`].
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut result = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !result.is_empty() {
                result.push('-');
            }
            pending_dash = false;
            result.push(c);
        } else {
            pending_dash = true;
        }
    }

    if result.is_empty() {
        FALLBACK_SLUG.to_owned()
    } else {
        result
    }
}

/// Hands out page-unique heading ids.
///
/// The first heading with a given slug keeps it; repeats get `-1`, `-2`, ...
/// suffixes in document order, so body ids and table of contents links agree
/// as long as both walk the headings in the same order. A suffix already taken
/// by another heading is skipped.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    counts: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl SlugRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugify `text` and make the result unique within this registry.
    pub fn unique(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.counts.entry(base.clone()).or_default();
        let mut n = *count;
        let mut id = if n == 0 { base.clone() } else { format!("{base}-{n}") };
        while self.issued.contains(&id) {
            n += 1;
            id = format!("{base}-{n}");
        }
        *count = n + 1;
        self.issued.insert(id.clone());
        id
    }
}
