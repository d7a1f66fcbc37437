//! Text Normalization
//!
//! String helpers shared by the parser and the parameter extractor. All
//! functions are pure.

use std::path::Path;

/// Derived copy of an operator command used for matching: lowercased and trimmed.
pub fn normalize_command(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove one pair of matching quotes wrapping the whole string.
pub fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Collapse whitespace, drop wrapping quotes, trim.
pub fn clean_text(text: &str) -> String {
    strip_wrapping_quotes(&collapse_whitespace(text))
        .trim()
        .to_string()
}

/// Clean body markup.
///
/// Text that already contains tags only has its whitespace collapsed. Plain
/// text becomes one `<p>` per blank-line-delimited paragraph.
pub fn clean_html(html: &str) -> String {
    let unquoted = strip_wrapping_quotes(html.trim());

    if contains_tag(unquoted) {
        return clean_text(unquoted);
    }

    paragraphs(unquoted)
        .iter()
        .map(|p| clean_text(p))
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", p))
        .collect()
}

/// Whether the text holds something shaped like `<...>`.
fn contains_tag(text: &str) -> bool {
    text.match_indices('<').any(|(start, _)| {
        text[start + 1..]
            .find('>')
            .is_some_and(|len| len > 0)
    })
}

/// Split on blank (whitespace-only) lines.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Turn a topic into a title: cleaned, each word capitalized.
pub fn title_case(topic: &str) -> String {
    clean_text(topic)
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive a media title from a file path: directory and extension dropped,
/// `_`/`-` runs turned into spaces, then title-cased.
pub fn filename_to_title(file_path: &str) -> String {
    let stem = Path::new(file_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    title_case(&stem.replace(['_', '-'], " "))
}

/// Split a tag string on `,`, `;` or `|`, cleaning each tag and dropping blanks.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split([',', ';', '|'])
        .map(clean_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Slugify a project name for local site tooling.
///
/// `"My Cool Site!"` becomes `"my-cool-site"`.
pub fn clean_project_name(name: &str) -> String {
    let mut slug = String::new();
    for c in clean_text(name).to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}
