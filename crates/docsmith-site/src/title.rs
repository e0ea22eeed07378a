//! Page titles.

/// Title for a document.
///
/// Diagram sources use their first `%%` comment line; an empty comment means
/// no title. Otherwise the first `# ` heading wins, then the file stem in
/// title case.
#[must_use]
pub fn extract_title(source: &str, text: &str, is_diagram: bool) -> String {
    if is_diagram && let Some(comment) = diagram_comment(text) {
        let title = comment.trim_matches(|c| c == '%' || c == ' ').trim();
        return if title.is_empty() {
            title_from_stem(source)
        } else {
            title.to_owned()
        };
    }
    markdown_title(text).unwrap_or_else(|| title_from_stem(source))
}

fn diagram_comment(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| line.starts_with("%%"))
}

fn markdown_title(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_owned())
}

/// `release_notes-v2` becomes `Release Notes V2`.
fn title_from_stem(source: &str) -> String {
    let name = source.rsplit_once('/').map_or(source, |(_, name)| name);
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };

    let mut result = String::with_capacity(stem.len());
    for word in stem.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_into(word, &mut result);
    }
    result
}

/// Uppercase the first character and lowercase the rest, appending to `buf`.
fn capitalize_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(&chars.as_str().to_lowercase());
    }
}
