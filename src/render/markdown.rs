//! Markdown rendering for documents.

use crate::error::Result;
use crate::model::{Block, Document, InlineContent, Paragraph, TextRun, TextStyle};

use super::options::MARKDOWN_PAGE_BREAK;
use super::RenderOptions;

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&doc.metadata.to_yaml_frontmatter());
        }

        for block in &doc.body {
            self.render_block(&mut output, block);
        }

        Ok(output.trim().to_string())
    }

    fn render_block(&self, output: &mut String, block: &Block) {
        match block {
            Block::Paragraph(p) => self.render_paragraph(output, p),
            Block::PageBreak => {
                if !output.is_empty() && !output.ends_with("\n\n") {
                    output.push_str("\n\n");
                }
                output.push_str(self.options.page_break_or(MARKDOWN_PAGE_BREAK));
                output.push_str("\n\n");
            }
        }
    }

    fn render_paragraph(&self, output: &mut String, para: &Paragraph) {
        if para.is_empty() {
            return;
        }

        if let Some(level) = para.style.heading_level {
            output.push_str(&"#".repeat(level as usize));
            output.push(' ');
        }
        self.render_inline_content(output, &para.content);
        output.push_str("\n\n");
    }

    fn render_inline_content(&self, output: &mut String, content: &[InlineContent]) {
        for item in content {
            match item {
                InlineContent::Text(run) => self.render_text_run(output, run),
                InlineContent::LineBreak => {
                    if self.options.preserve_line_breaks {
                        output.push_str("  \n");
                    } else {
                        output.push(' ');
                    }
                }
            }
        }
    }

    fn render_text_run(&self, output: &mut String, run: &TextRun) {
        if run.text.is_empty() {
            return;
        }

        let text = if self.options.escape_special_chars {
            escape_markdown(&run.text)
        } else {
            run.text.clone()
        };

        output.push_str(&apply_text_style(&text, &run.style));
    }
}

/// Wrap text in the markers for its style, innermost first.
fn apply_text_style(text: &str, style: &TextStyle) -> String {
    if !style.has_styling() {
        return text.to_string();
    }

    let mut result = text.to_string();

    if style.strikethrough {
        result = format!("~~{}~~", result);
    }
    if style.italic {
        result = format!("*{}*", result);
    }
    if style.bold {
        result = format!("**{}**", result);
    }
    if style.underline {
        result = format!("<u>{}</u>", result);
    }

    result
}

/// Escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
        assert_eq!(escape_markdown("{{name}}"), "{{name}}");
    }

    #[test]
    fn test_apply_text_style() {
        let colored = TextStyle {
            color: Some("#FF0000".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_text_style("Ada", &colored), "Ada");

        let bold_italic = TextStyle {
            bold: true,
            italic: true,
            ..Default::default()
        };
        assert_eq!(apply_text_style("Ada", &bold_italic), "***Ada***");
    }

    #[test]
    fn test_render_styled_runs() {
        let mut doc = Document::new();
        let mut p = Paragraph::new();
        p.add_text("Dear ");
        p.add_run(TextRun::bold("Ada"));
        p.add_text(",");
        doc.append_paragraph(p);

        let result = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(result, "Dear **Ada**,");
    }

    #[test]
    fn test_render_heading() {
        let mut doc = Document::new();
        doc.append_paragraph(Paragraph::heading("Invoice", 2));

        let result = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(result, "## Invoice");
    }

    #[test]
    fn test_render_page_break() {
        let mut doc = Document::new();
        doc.append_paragraph(Paragraph::with_text("one"));
        doc.append_page_break();
        doc.append_paragraph(Paragraph::with_text("two"));

        let result = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(
            result,
            format!("one\n\n{}\n\ntwo", MARKDOWN_PAGE_BREAK)
        );
    }

    #[test]
    fn test_render_line_break() {
        let mut doc = Document::new();
        let mut p = Paragraph::with_text("Street 1");
        p.add_line_break();
        p.add_text("City");
        doc.append_paragraph(p);

        let kept = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(kept, "Street 1  \nCity");

        let joined = to_markdown(&doc, &RenderOptions::new().with_line_breaks(false)).unwrap();
        assert_eq!(joined, "Street 1 City");
    }

    #[test]
    fn test_render_with_frontmatter() {
        let mut doc = Document::named("Letter - Addresses");
        doc.append_paragraph(Paragraph::with_text("Hi"));

        let options = RenderOptions::new().with_frontmatter(true);
        let result = to_markdown(&doc, &options).unwrap();
        assert!(result.starts_with("---\nname: \"Letter - Addresses\""));
        assert!(result.ends_with("---\nHi"));
    }
}
