//! Placeholder substitution.
//!
//! A placeholder is the literal token `{{key}}`. [`fill_template`] replaces
//! the tokens of a record's keys inside one paragraph; everything else in
//! the paragraph, including tokens the record has no key for, is left as-is.

use crate::model::{Paragraph, Record};
use regex::Regex;
use std::sync::OnceLock;

/// Opening delimiter of a placeholder token.
pub const OPEN: &str = "{{";
/// Closing delimiter of a placeholder token.
pub const CLOSE: &str = "}}";

/// Build the placeholder token for a key: `name` becomes `{{name}}`.
pub fn placeholder_token(key: &str) -> String {
    format!("{}{}{}", OPEN, key, CLOSE)
}

/// Substitute a record's values into a paragraph.
///
/// Takes the working copy by value and returns it; pass a clone, never the
/// template paragraph itself.
///
/// # Example
///
/// ```
/// use docmerge::model::{Paragraph, Record};
/// use docmerge::template::fill_template;
///
/// let record: Record = [("name", "Jeroen"), ("address", "Terlinden")]
///     .into_iter()
///     .collect();
/// let template = Paragraph::with_text("Hello {{name}}, you live at {{address}}.");
///
/// let filled = fill_template(template.clone(), &record);
/// assert_eq!(filled.plain_text(), "Hello Jeroen, you live at Terlinden.");
/// ```
pub fn fill_template(unit: Paragraph, record: &Record) -> Paragraph {
    fill_template_counted(unit, record).0
}

/// Like [`fill_template`], also returning the number of replacements made.
///
/// The paragraph text is scanned once from left to right. At each step the
/// earliest token of any key is replaced (the longer token on a tie) and the
/// scan continues after the inserted value, so values are never expanded
/// again and the result does not depend on key order.
pub fn fill_template_counted(mut unit: Paragraph, record: &Record) -> (Paragraph, usize) {
    if record.is_empty() {
        return (unit, 0);
    }

    let substitutions: Vec<(String, String)> = record
        .iter()
        .map(|(key, value)| (placeholder_token(key), value.to_string()))
        .collect();

    let mut count = 0;
    let mut cursor = 0;
    loop {
        let text = unit.plain_text();
        let Some((start, token, value)) = next_token(&text, cursor, &substitutions) else {
            break;
        };
        unit.replace_range(start..start + token.len(), value);
        cursor = start + value.len();
        count += 1;
    }

    (unit, count)
}

fn next_token<'a>(
    text: &str,
    from: usize,
    substitutions: &'a [(String, String)],
) -> Option<(usize, &'a str, &'a str)> {
    let haystack = text.get(from..)?;
    substitutions
        .iter()
        .filter_map(|(token, value)| {
            haystack
                .find(token.as_str())
                .map(|pos| (from + pos, token.as_str(), value.as_str()))
        })
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.len().cmp(&a.1.len())))
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid"))
}

/// List the distinct placeholder names in `text`, in first-occurrence order.
///
/// Names containing braces are not recognized.
pub fn placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_regex().captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// List the distinct placeholder names across several paragraphs.
pub fn paragraph_placeholders<'a, I>(paragraphs: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Paragraph>,
{
    let mut names: Vec<String> = Vec::new();
    for paragraph in paragraphs {
        for name in placeholders(&paragraph.plain_text()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}
