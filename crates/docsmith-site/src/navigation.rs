//! Sidebar and top navigation.
//!
//! Pages are grouped by where their source lives. Hrefs are relative to the
//! page being rendered, so the same [`Navigation`] serves every page.

use std::fmt;

use docsmith_renderer::{PathLayout, relative_path};

use crate::site::Site;

/// Navigation group, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NavGroup {
    Overview,
    Frontend,
    Api,
    Tests,
    Utilities,
    Diagrams,
    Modules,
    Reference,
}

impl NavGroup {
    /// All groups in display order.
    pub const ALL: [NavGroup; 8] = [
        Self::Overview,
        Self::Frontend,
        Self::Api,
        Self::Tests,
        Self::Utilities,
        Self::Diagrams,
        Self::Modules,
        Self::Reference,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Frontend => "Frontend",
            Self::Api => "API",
            Self::Tests => "Tests",
            Self::Utilities => "Utilities",
            Self::Diagrams => "Diagrams",
            Self::Modules => "Modules",
            Self::Reference => "Reference",
        }
    }

    /// Sidebar glyph.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Overview => "◉",
            Self::Frontend => "▣",
            Self::Api => "⬡",
            Self::Tests => "✓",
            Self::Utilities => "⚙",
            Self::Diagrams => "◇",
            Self::Modules => "☰",
            Self::Reference => "⌁",
        }
    }

    /// Group for a repository-relative source path.
    ///
    /// The root readme is the overview; sources outside the docs root are
    /// reference material; inside it the first directory picks the group.
    #[must_use]
    pub fn of(source: &str, layout: &PathLayout) -> Self {
        if source == layout.root_readme {
            return Self::Overview;
        }
        let Some(rest) = source
            .strip_prefix(layout.docs_root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return Self::Reference;
        };
        match rest.split('/').next().unwrap_or_default() {
            "frontend" => Self::Frontend,
            "api" => Self::Api,
            "tests" => Self::Tests,
            "utils" => Self::Utilities,
            "diagrams" => Self::Diagrams,
            "modules" => Self::Modules,
            _ => Self::Overview,
        }
    }
}

impl fmt::Display for NavGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct NavEntry {
    source: String,
    destination: String,
    title: String,
}

/// Sidebar link, relative to the current page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub title: String,
    /// Whether this link is the current page.
    pub active: bool,
}

/// One sidebar group with its links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavSection {
    pub group: NavGroup,
    /// Expanded on first paint.
    pub open: bool,
    pub links: Vec<NavLink>,
}

/// Top-bar shortcut to a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavChip {
    pub group: NavGroup,
    pub href: String,
    pub active: bool,
}

/// Grouped page list for a whole site.
#[derive(Clone, Debug)]
pub struct Navigation {
    layout: PathLayout,
    groups: Vec<(NavGroup, Vec<NavEntry>)>,
}

impl Navigation {
    /// Group every document of `site`, ordering pages by destination path.
    #[must_use]
    pub fn new(site: &Site) -> Self {
        let layout = site.paths().layout().clone();
        let mut groups: Vec<(NavGroup, Vec<NavEntry>)> =
            NavGroup::ALL.iter().map(|g| (*g, Vec::new())).collect();

        let mut docs: Vec<_> = site.documents().iter().collect();
        docs.sort_by(|a, b| a.destination.cmp(&b.destination));
        for doc in docs {
            let group = NavGroup::of(&doc.source, &layout);
            if let Some((_, entries)) = groups.iter_mut().find(|(g, _)| *g == group) {
                entries.push(NavEntry {
                    source: doc.source.clone(),
                    destination: doc.destination.clone(),
                    title: doc.title.clone(),
                });
            }
        }
        groups.retain(|(_, entries)| !entries.is_empty());

        Self { layout, groups }
    }

    /// Sidebar sections for the page rendered from `source` to `destination`.
    #[must_use]
    pub fn sidebar(&self, source: &str, destination: &str) -> Vec<NavSection> {
        let current = NavGroup::of(source, &self.layout);
        self.groups
            .iter()
            .map(|(group, entries)| NavSection {
                group: *group,
                open: *group == current || *group == NavGroup::Overview,
                links: entries
                    .iter()
                    .map(|entry| NavLink {
                        href: relative_path(destination, &entry.destination),
                        title: entry.title.clone(),
                        active: entry.source == source,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Top-bar chips for the page rendered from `source` to `destination`.
    ///
    /// Each group links to its `index.html` page when it has one, else to its
    /// first page. Reference always comes last and links to its first page.
    #[must_use]
    pub fn chips(&self, source: &str, destination: &str) -> Vec<NavChip> {
        let current = NavGroup::of(source, &self.layout);
        let mut chips = Vec::new();
        let mut reference = None;

        for (group, entries) in &self.groups {
            let Some(first) = entries.first() else {
                continue;
            };
            let target = if *group == NavGroup::Reference {
                first
            } else {
                entries
                    .iter()
                    .find(|e| e.destination.rsplit('/').next() == Some("index.html"))
                    .unwrap_or(first)
            };
            let chip = NavChip {
                group: *group,
                href: relative_path(destination, &target.destination),
                active: *group == current,
            };
            if *group == NavGroup::Reference {
                reference = Some(chip);
            } else {
                chips.push(chip);
            }
        }

        chips.extend(reference);
        chips
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;

    fn site() -> Site {
        let files = [
            ("docs/README.md", "# Home"),
            ("docs/guide.md", "# Guide"),
            ("docs/api/README.md", "# API"),
            ("docs/api/auth.md", "# Auth"),
            ("docs/diagrams/flow.mmd", "%% Flow"),
            ("requirements.md", "# Requirements"),
            ("src/core/notes.md", "# Notes"),
        ];
        Site::from_sources(
            Path::new("/repo"),
            PathLayout::default(),
            files.map(|(s, t)| (s.to_owned(), t.to_owned())),
        )
        .unwrap()
    }

    #[test]
    fn test_group_of() {
        let layout = PathLayout::default();
        assert_eq!(NavGroup::of("docs/README.md", &layout), NavGroup::Overview);
        assert_eq!(NavGroup::of("docs/guide.md", &layout), NavGroup::Overview);
        assert_eq!(NavGroup::of("docs/api/x.md", &layout), NavGroup::Api);
        assert_eq!(NavGroup::of("docs/utils/x.md", &layout), NavGroup::Utilities);
        assert_eq!(NavGroup::of("docs/misc/x.md", &layout), NavGroup::Overview);
        assert_eq!(NavGroup::of("src/a.md", &layout), NavGroup::Reference);
        assert_eq!(NavGroup::of("docsearch/a.md", &layout), NavGroup::Reference);
    }

    #[test]
    fn test_sidebar_groups_and_links() {
        let nav = Navigation::new(&site());
        let sections = nav.sidebar("docs/api/auth.md", "api/auth.html");

        let groups: Vec<(NavGroup, bool)> = sections.iter().map(|s| (s.group, s.open)).collect();
        assert_eq!(
            groups,
            vec![
                (NavGroup::Overview, true),
                (NavGroup::Api, true),
                (NavGroup::Diagrams, false),
                (NavGroup::Reference, false),
            ]
        );

        let api = &sections[1];
        assert_eq!(
            api.links,
            vec![
                NavLink {
                    href: "auth.html".to_owned(),
                    title: "Auth".to_owned(),
                    active: true,
                },
                NavLink {
                    href: "index.html".to_owned(),
                    title: "API".to_owned(),
                    active: false,
                },
            ]
        );

        let overview: Vec<&str> = sections[0].links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(overview, vec!["../guide.html", "../index.html"]);
    }

    #[test]
    fn test_chips_prefer_index_and_end_with_reference() {
        let nav = Navigation::new(&site());
        let chips = nav.chips("docs/README.md", "index.html");
        let summary: Vec<(&str, &str, bool)> = chips
            .iter()
            .map(|c| (c.group.title(), c.href.as_str(), c.active))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Overview", "index.html", true),
                ("API", "api/index.html", false),
                ("Diagrams", "diagrams/flow.html", false),
                ("Reference", "reference/requirements.html", false),
            ]
        );
    }
}
