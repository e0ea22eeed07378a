//! Link target resolution.
//!
//! A Markdown link target is either passed through (external URLs, same-page
//! anchors) or canonicalised to a repository-relative path and run through an
//! ordered list of [`LinkStrategy`] tiers. The first tier that produces an href
//! wins; when none does, or the target is not a usable path, the raw target is
//! returned unchanged.

use crate::context::RenderContext;
use crate::slug::slugify;
use crate::util::{extension, join_path, normalize_path, parent_dir, relative_path};

/// Prefixes of targets that are always left untouched.
const EXTERNAL_PREFIXES: [&str; 3] = ["http://", "https://", "mailto:"];

/// One resolution tier.
///
/// Strategies are total: they never fail, they just decline with `None`.
trait LinkStrategy {
    fn resolve(&self, candidate: &str, ctx: &RenderContext<'_>) -> Option<String>;
}

/// A documented cross-reference: the target is part of the build.
struct MappedDocument;

impl LinkStrategy for MappedDocument {
    fn resolve(&self, candidate: &str, ctx: &RenderContext<'_>) -> Option<String> {
        let destination = ctx.paths.destination(candidate)?;
        Some(relative_path(ctx.destination, destination))
    }
}

/// A Markdown file outside the build: link to where it would be generated.
struct GuessedDocument;

impl LinkStrategy for GuessedDocument {
    fn resolve(&self, candidate: &str, ctx: &RenderContext<'_>) -> Option<String> {
        if !extension(candidate).is_some_and(|ext| ext.eq_ignore_ascii_case("md")) {
            return None;
        }
        let guessed = ctx.paths.guess_destination(candidate);
        Some(relative_path(ctx.destination, &guessed))
    }
}

/// Any other repository file: reference it in place in the source tree.
struct SourceAsset;

impl LinkStrategy for SourceAsset {
    fn resolve(&self, candidate: &str, ctx: &RenderContext<'_>) -> Option<String> {
        let prefix = ctx.site_prefix?;
        let page = join_path(prefix, ctx.destination);
        Some(relative_path(&page, candidate))
    }
}

const STRATEGIES: &[&dyn LinkStrategy] = &[&MappedDocument, &GuessedDocument, &SourceAsset];

/// Resolve a raw Markdown link target into an href for the current page.
///
/// # Examples
///
/// ```
/// use docsmith_renderer::{PathLayout, RenderContext, SitePathMap, resolve_link};
///
/// let paths = SitePathMap::build(
///     PathLayout::default(),
///     ["docs/README.md", "docs/api/client.md"],
/// )
/// .unwrap();
/// let ctx = RenderContext::new("docs/README.md", "index.html", &paths);
///
/// assert_eq!(resolve_link("api/client.md#Retry Policy", &ctx), "api/client.html#retry-policy");
/// assert_eq!(resolve_link("https://example.com", &ctx), "https://example.com");
/// ```
#[must_use]
pub fn resolve_link(target: &str, ctx: &RenderContext<'_>) -> String {
    if target.is_empty()
        || target.starts_with('#')
        || EXTERNAL_PREFIXES.iter().any(|p| target.starts_with(p))
    {
        return target.to_owned();
    }

    let (path_part, fragment) = match target.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (target, None),
    };
    let anchor = fragment
        .filter(|f| !f.is_empty())
        .map(|f| format!("#{}", slugify(f)))
        .unwrap_or_default();

    let Some(candidate) = canonicalize(path_part, ctx) else {
        return target.to_owned();
    };

    STRATEGIES
        .iter()
        .find_map(|strategy| strategy.resolve(&candidate, ctx))
        .map_or_else(|| target.to_owned(), |href| format!("{href}{anchor}"))
}

/// Turn the path portion of a link into a repository-relative path.
///
/// Returns `None` when the path leaves the repository or is not a path at all
/// (a URI with some other scheme, a protocol-relative URL).
fn canonicalize(path: &str, ctx: &RenderContext<'_>) -> Option<String> {
    if path.is_empty() {
        return Some(ctx.source.to_owned());
    }
    if path.starts_with("//") || has_scheme(path) {
        return None;
    }

    if let Some(root) = ctx.repo_root
        && let Some(rest) = path.strip_prefix(root)
        && (rest.is_empty() || rest.starts_with('/'))
    {
        return normalize_path(rest);
    }

    if let Some(rest) = path.strip_prefix('/') {
        return normalize_path(rest);
    }

    normalize_path(&join_path(parent_dir(ctx.source), path))
}

/// Whether `s` starts with an RFC 3986 scheme (`tel:`, `ftp:`, ...).
///
/// Single letters are excluded so Windows drive letters are not mistaken for
/// schemes.
fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
