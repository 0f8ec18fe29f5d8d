//! Rendering options and configuration.

/// Page break marker used in plain text output (form feed).
pub const TEXT_PAGE_BREAK: &str = "\u{000C}";

/// Page break marker used in Markdown output.
pub const MARKDOWN_PAGE_BREAK: &str = "<div style=\"page-break-after: always;\"></div>";

/// Options for rendering document content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with metadata (Markdown only)
    pub include_frontmatter: bool,

    /// Preserve line breaks from source
    pub preserve_line_breaks: bool,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Text written for each page break; the format's default when unset
    pub page_break_marker: Option<String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable line break preservation.
    pub fn with_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Set the page break marker.
    pub fn with_page_break_marker(mut self, marker: impl Into<String>) -> Self {
        self.page_break_marker = Some(marker.into());
        self
    }

    pub(crate) fn page_break_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.page_break_marker.as_deref().unwrap_or(default)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            preserve_line_breaks: true,
            escape_special_chars: true,
            page_break_marker: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_frontmatter(true)
            .with_line_breaks(false)
            .with_page_break_marker("----");

        assert!(options.include_frontmatter);
        assert!(!options.preserve_line_breaks);
        assert_eq!(options.page_break_or(TEXT_PAGE_BREAK), "----");
    }

    #[test]
    fn test_default_page_break() {
        let options = RenderOptions::default();
        assert_eq!(options.page_break_or(TEXT_PAGE_BREAK), "\u{000C}");
    }
}
