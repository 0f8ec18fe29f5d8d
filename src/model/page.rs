//! Page geometry and body block types.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// Page size and margins of a document, in points (1 point = 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page height in points
    pub page_height: f32,

    /// Page width in points
    pub page_width: f32,

    /// Top margin in points
    pub margin_top: f32,

    /// Right margin in points
    pub margin_right: f32,

    /// Bottom margin in points
    pub margin_bottom: f32,

    /// Left margin in points
    pub margin_left: f32,
}

impl PageGeometry {
    /// Create a geometry with the given page size and uniform margins.
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            page_height: height,
            page_width: width,
            margin_top: margin,
            margin_right: margin,
            margin_bottom: margin,
            margin_left: margin,
        }
    }

    /// Standard Letter size (8.5 x 11 inches) with one inch margins.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0, 72.0) // 8.5 * 72, 11 * 72
    }

    /// Standard A4 size (210 x 297 mm) with one inch margins.
    pub fn a4() -> Self {
        Self::new(595.0, 842.0, 72.0) // 210mm * 2.834, 297mm * 2.834
    }

    /// Set all four margins.
    pub fn with_margins(mut self, top: f32, right: f32, bottom: f32, left: f32) -> Self {
        self.margin_top = top;
        self.margin_right = right;
        self.margin_bottom = bottom;
        self.margin_left = left;
        self
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// A content block in a document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A page break marker
    PageBreak,
}

impl Block {
    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// Check if this block is a page break.
    pub fn is_page_break(&self) -> bool {
        matches!(self, Block::PageBreak)
    }

    /// Get the paragraph if this block is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            Block::PageBreak => None,
        }
    }
}
