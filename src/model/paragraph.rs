//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A paragraph of text content.
///
/// Paragraphs are the repeating unit of a merge template: every record gets
/// its own deep copy (via `Clone`) of each template paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in the paragraph
    pub content: Vec<InlineContent>,

    /// Paragraph style
    #[serde(default)]
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self {
            content: Vec::new(),
            style: ParagraphStyle::default(),
        }
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a heading paragraph.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        let mut p = Self::with_text(text);
        p.style.heading_level = Some(level.clamp(1, 6));
        p
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.content.push(InlineContent::Text(TextRun::new(text)));
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.content.push(InlineContent::Text(run));
    }

    /// Add a line break.
    pub fn add_line_break(&mut self) {
        self.content.push(InlineContent::LineBreak);
    }

    /// Get plain text content of the paragraph.
    ///
    /// Line breaks are rendered as `\n`. Byte offsets into this string are
    /// the coordinates used by [`Paragraph::replace_range`].
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.as_str(),
                InlineContent::LineBreak => "\n",
            })
            .collect()
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() || self.plain_text().trim().is_empty()
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.style.heading_level.is_some()
    }

    /// Get the number of text runs.
    pub fn run_count(&self) -> usize {
        self.content
            .iter()
            .filter(|c| matches!(c, InlineContent::Text(_)))
            .count()
    }

    /// Replace every occurrence of `search` with `replacement`.
    ///
    /// Matching runs over the paragraph's plain text, so a token split across
    /// differently styled runs is still found. The scan resumes after each
    /// inserted replacement; replacements are never re-scanned.
    ///
    /// Returns the number of replacements made.
    pub fn replace_text(&mut self, search: &str, replacement: &str) -> usize {
        if search.is_empty() {
            return 0;
        }

        let mut count = 0;
        let mut cursor = 0;
        loop {
            let text = self.plain_text();
            let Some(found) = text.get(cursor..).and_then(|rest| rest.find(search)) else {
                break;
            };
            let start = cursor + found;
            self.replace_range(start..start + search.len(), replacement);
            cursor = start + replacement.len();
            count += 1;
        }
        count
    }

    /// Replace a byte range of the plain text with `value`.
    ///
    /// The replacement inherits the style of the run containing `range.start`;
    /// the rest of the range is cut out of the following runs. Runs left empty
    /// by the cut are dropped.
    pub fn replace_range(&mut self, range: Range<usize>, value: &str) {
        if range.is_empty() {
            return;
        }

        let mut offset = 0;
        let mut inserted = false;
        let mut emptied = Vec::new();

        for (idx, item) in self.content.iter_mut().enumerate() {
            let item_start = offset;
            let item_end = offset + item.text_len();
            offset = item_end;

            if item_end <= range.start {
                continue;
            }
            if item_start >= range.end {
                break;
            }

            let replacement = if inserted { "" } else { value };
            inserted = true;

            if let InlineContent::Text(run) = item {
                let local_start = range.start.max(item_start) - item_start;
                let local_end = range.end.min(item_end) - item_start;
                run.text.replace_range(local_start..local_end, replacement);
                if run.text.is_empty() {
                    emptied.push(idx);
                }
            } else if replacement.is_empty() {
                emptied.push(idx);
            } else {
                *item = InlineContent::Text(TextRun::new(replacement));
            }
        }

        for idx in emptied.into_iter().rev() {
            self.content.remove(idx);
        }
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run with styling
    Text(TextRun),

    /// A line break
    LineBreak,
}

impl InlineContent {
    /// Length of this item in plain text bytes.
    fn text_len(&self) -> usize {
        match self {
            InlineContent::Text(run) => run.text.len(),
            InlineContent::LineBreak => 1,
        }
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    #[serde(default)]
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                bold: true,
                ..Default::default()
            },
        }
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                italic: true,
                ..Default::default()
            },
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Font name
    pub font_name: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Text color (hex format, e.g., "#FF0000")
    pub color: Option<String>,
}

impl TextStyle {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.underline || self.strikethrough
    }
}

/// Paragraph styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphStyle {
    /// Heading level (1-6) or None for normal paragraph
    pub heading_level: Option<u8>,

    /// Text alignment
    pub alignment: Alignment,

    /// Space before paragraph in points
    pub space_before: Option<f32>,

    /// Space after paragraph in points
    pub space_after: Option<f32>,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_plain_text() {
        let mut p = Paragraph::new();
        p.add_text("Hello ");
        p.add_run(TextRun::bold("world"));
        p.add_line_break();
        p.add_text("!");

        assert_eq!(p.plain_text(), "Hello world\n!");
    }

    #[test]
    fn test_heading() {
        let h1 = Paragraph::heading("Title", 9);
        assert!(h1.is_heading());
        assert_eq!(h1.style.heading_level, Some(6));
    }

    #[test]
    fn test_replace_text_within_run() {
        let mut p = Paragraph::with_text("Dear {{name}}, {{name}}!");
        let count = p.replace_text("{{name}}", "Ada");
        assert_eq!(count, 2);
        assert_eq!(p.plain_text(), "Dear Ada, Ada!");
    }

    #[test]
    fn test_replace_text_is_not_recursive() {
        let mut p = Paragraph::with_text("{{x}}");
        let count = p.replace_text("{{x}}", "{{x}}{{x}}");
        assert_eq!(count, 1);
        assert_eq!(p.plain_text(), "{{x}}{{x}}");
    }

    #[test]
    fn test_replace_text_across_runs_keeps_first_style() {
        let mut p = Paragraph::new();
        p.add_text("Hi {{na");
        p.add_run(TextRun::bold("me}} there"));

        assert_eq!(p.replace_text("{{name}}", "Ada"), 1);
        assert_eq!(p.plain_text(), "Hi Ada there");
        assert_eq!(p.run_count(), 2);

        match &p.content[1] {
            InlineContent::Text(run) => {
                assert_eq!(run.text, " there");
                assert!(run.style.bold);
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_replace_range_drops_emptied_runs() {
        let mut p = Paragraph::new();
        p.add_run(TextRun::italic("{{"));
        p.add_run(TextRun::bold("name"));
        p.add_text("}}");

        p.replace_range(0..8, "Ada");
        assert_eq!(p.plain_text(), "Ada");
        assert_eq!(p.run_count(), 1);
        match &p.content[0] {
            InlineContent::Text(run) => assert!(run.style.italic),
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_replace_with_empty_value() {
        let mut p = Paragraph::with_text("a{{gap}}b");
        p.replace_text("{{gap}}", "");
        assert_eq!(p.plain_text(), "ab");
    }

    #[test]
    fn test_replace_multibyte_text() {
        let mut p = Paragraph::with_text("Grüße, {{name}} ✓");
        p.replace_text("{{name}}", "Jürgen");
        assert_eq!(p.plain_text(), "Grüße, Jürgen ✓");
    }

    #[test]
    fn test_text_style() {
        let style = TextStyle::default();
        assert!(!style.has_styling());

        let bold_style = TextStyle {
            bold: true,
            ..Default::default()
        };
        assert!(bold_style.has_styling());
    }
}
