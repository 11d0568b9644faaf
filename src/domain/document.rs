// ============================================================
// Layer 3 — Document Domain Types
// ============================================================
// What a parsed page looks like once the PDF backend is done
// with it, and what the structurer turns it into.
//
//   RawFragment     — one positioned piece of page content
//   StructuredLine  — one logical line of the linear text
//
// Coordinates are PDF user space: points, origin bottom-left.
//
// Reference: ISO 32000-1 §8.3 (Coordinate Systems)

use serde::{Deserialize, Serialize};

/// An axis-aligned box on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// Build a rect from any two corners; the result is always ordered.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest rect containing both `self` and `other`
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Horizontal slice covering the fraction `[start, end]` of the width.
    /// Used to place a highlight over part of a text line.
    pub fn horizontal_slice(&self, start: f32, end: f32) -> Rect {
        let start = start.clamp(0.0, 1.0);
        let end   = end.clamp(start, 1.0);
        Rect {
            x0: self.x0 + self.width() * start,
            y0: self.y0,
            x1: self.x0 + self.width() * end,
            y1: self.y1,
        }
    }
}

/// What a fragment holds. Only `Text` fragments carry text;
/// images and vector drawings are reported so callers can see
/// the page had content, but the structurer skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentKind {
    Text,
    Image,
    Drawing,
}

/// A positioned piece of page content as emitted by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    /// Zero-based page index
    pub page: usize,

    /// Where the fragment sits on the page
    pub bbox: Rect,

    /// Text content — empty for non-text fragments
    pub text: String,

    pub kind: FragmentKind,

    /// Left edge of each char of `text`, when the parser knows it
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub char_x: Vec<f32>,
}

impl RawFragment {
    pub fn text(page: usize, bbox: Rect, text: impl Into<String>) -> Self {
        Self { page, bbox, text: text.into(), kind: FragmentKind::Text, char_x: Vec::new() }
    }

    pub fn non_text(page: usize, bbox: Rect, kind: FragmentKind) -> Self {
        Self { page, bbox, text: String::new(), kind, char_x: Vec::new() }
    }

    pub fn with_char_x(mut self, char_x: Vec<f32>) -> Self {
        self.char_x = char_x;
        self
    }

    pub fn is_text(&self) -> bool {
        self.kind == FragmentKind::Text
    }

    /// Box of the chars `start..end` of `text`.
    ///
    /// Uses the recorded char positions when there is one per char;
    /// otherwise the chars are assumed equally wide.
    pub fn char_span(&self, start: usize, end: usize) -> Rect {
        let total = self.text.chars().count();
        if total == 0 || self.char_x.len() != total {
            let total = total.max(1) as f32;
            return self.bbox.horizontal_slice(start as f32 / total, end as f32 / total);
        }

        let x0 = self.char_x.get(start).copied().unwrap_or(self.bbox.x1);
        let x1 = self.char_x.get(end).copied().unwrap_or(self.bbox.x1);
        Rect::new(x0, self.bbox.y0, x1, self.bbox.y1)
    }
}

/// Classification of one structured line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Heading,
    Bullet,
    Paragraph,
    PageBreak,
}

/// One logical unit of the structured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredLine {
    pub kind: LineKind,
    pub text: String,
}

impl StructuredLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn page_break() -> Self {
        Self { kind: LineKind::PageBreak, text: String::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_new_orders_corners() {
        let r = Rect::new(10.0, 20.0, 0.0, 5.0);
        assert_eq!(r, Rect { x0: 0.0, y0: 5.0, x1: 10.0, y1: 20.0 });
    }

    #[test]
    fn test_horizontal_slice() {
        let r = Rect::new(0.0, 0.0, 100.0, 10.0);
        let s = r.horizontal_slice(0.25, 0.5);
        assert_eq!(s.x0, 25.0);
        assert_eq!(s.x1, 50.0);
        assert_eq!(s.height(), 10.0);
    }

    #[test]
    fn test_horizontal_slice_clamps() {
        let r = Rect::new(0.0, 0.0, 100.0, 10.0);
        let s = r.horizontal_slice(-1.0, 2.0);
        assert_eq!(s, r);
    }

    #[test]
    fn test_char_span_uses_char_positions() {
        let fragment = RawFragment::text(0, Rect::new(10.0, 0.0, 50.0, 10.0), "Wii")
            .with_char_x(vec![10.0, 30.0, 40.0]);

        let w = fragment.char_span(0, 1);
        assert_eq!((w.x0, w.x1), (10.0, 30.0));

        // the last char ends at the fragment's right edge
        let tail = fragment.char_span(1, 3);
        assert_eq!((tail.x0, tail.x1), (30.0, 50.0));
        assert_eq!(tail.height(), 10.0);
    }

    #[test]
    fn test_char_span_without_positions_is_proportional() {
        let fragment = RawFragment::text(0, Rect::new(0.0, 0.0, 100.0, 10.0), "abcd");
        assert_eq!(fragment.char_span(1, 2), Rect::new(25.0, 0.0, 50.0, 10.0));

        let mismatched = fragment.clone().with_char_x(vec![0.0]);
        assert_eq!(mismatched.char_span(1, 2), Rect::new(25.0, 0.0, 50.0, 10.0));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(2.0, -1.0, 3.0, 0.5);
        assert_eq!(a.union(&b), Rect::new(0.0, -1.0, 3.0, 1.0));
    }
}
