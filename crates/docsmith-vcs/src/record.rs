//! Commit and release records parsed from `git log` output.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

/// Field separator used in `--pretty` formats (`%x1f`).
pub(crate) const FIELD_SEPARATOR: char = '\u{1f}';

/// `git log` format matching [`CommitRecord::parse`].
pub(crate) const LOG_FORMAT: &str = "--pretty=format:%H%x1f%ad%x1f%s";

static RELEASE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Release\s+(\d{8}\.\d{3})").expect("invalid release tag regex")
});

/// One commit: hash, author date and subject line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    /// Author date as printed by git (`--date=iso-strict`).
    pub date: String,
    pub subject: String,
    /// Parsed author date.
    pub at: DateTime<FixedOffset>,
}

impl CommitRecord {
    /// Parse one `hash \x1f date \x1f subject` line.
    ///
    /// Returns `None` for blank lines, a wrong field count or an unparseable
    /// date.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split(FIELD_SEPARATOR);
        let (Some(hash), Some(date), Some(subject), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return None;
        };
        let date = date.trim();
        let at = DateTime::parse_from_rfc3339(date).ok()?;
        Some(Self {
            hash: hash.trim().to_owned(),
            date: date.to_owned(),
            subject: subject.trim().to_owned(),
            at,
        })
    }
}

/// A release commit (subject `Release YYYYMMDD.NNN ...`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Release {
    /// Release tag, e.g. `20240105.001`.
    pub tag: String,
    pub commit: CommitRecord,
}

impl Release {
    /// Interpret `commit` as a release, if its subject carries a release tag.
    #[must_use]
    pub fn from_commit(commit: CommitRecord) -> Option<Self> {
        let tag = RELEASE_TAG_RE.captures(&commit.subject)?.get(1)?.as_str().to_owned();
        Some(Self { tag, commit })
    }
}
