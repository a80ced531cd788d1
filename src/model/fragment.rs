//! Styled text fragments as produced by a document reader.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Raw span flags in the convention used by PDF span extractors.
    ///
    /// Only [`FontFlags::BOLD`] influences outline inference.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FontFlags: u32 {
        /// Bit 0: superscript
        const SUPERSCRIPT = 1 << 0;
        /// Bit 1: italic
        const ITALIC = 1 << 1;
        /// Bit 2: serifed font
        const SERIF = 1 << 2;
        /// Bit 3: monospaced font
        const MONOSPACE = 1 << 3;
        /// Bit 4: bold / emphasis
        const BOLD = 1 << 4;
    }
}

impl FontFlags {
    /// Derive flags from a base font name such as `Helvetica-BoldOblique`.
    pub fn from_font_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let mut flags = FontFlags::empty();
        if lower.contains("bold") || lower.contains("black") || lower.contains("heavy") {
            flags |= FontFlags::BOLD;
        }
        if lower.contains("italic") || lower.contains("oblique") {
            flags |= FontFlags::ITALIC;
        }
        if lower.contains("mono") || lower.contains("courier") {
            flags |= FontFlags::MONOSPACE;
        }
        flags
    }
}

/// Bounding box in page coordinates, origin at the top-left corner.
///
/// A smaller `y0` means the fragment sits nearer the top of the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Vertical distance between the origins of two boxes.
    pub fn vertical_gap(&self, other: &BoundingBox) -> f32 {
        (self.y0 - other.y0).abs()
    }

    /// Horizontal distance between the origins of two boxes.
    pub fn horizontal_gap(&self, other: &BoundingBox) -> f32 {
        (self.x0 - other.x0).abs()
    }
}

/// One styled run of text on a page.
///
/// Fragments are immutable once produced. A fragment created by merging
/// several neighbours carries the joined text and the style and position of
/// its first member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// The text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the run is bold or emphasized
    #[serde(default)]
    pub bold: bool,
    /// Page index (0-based)
    pub page: usize,
    /// Position on the page
    pub bbox: BoundingBox,
}

impl Fragment {
    /// Create a new fragment.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        bold: bool,
        page: usize,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
            page,
            bbox,
        }
    }

    /// Create a fragment from raw span flags; bold is read from bit 4.
    pub fn from_flags(
        text: impl Into<String>,
        font_size: f32,
        flags: FontFlags,
        page: usize,
        bbox: BoundingBox,
    ) -> Self {
        Self::new(text, font_size, flags.contains(FontFlags::BOLD), page, bbox)
    }

    /// Font size bucketed to tenths of a point.
    ///
    /// Used wherever sizes are compared "rounded to one decimal".
    pub fn size_key(&self) -> i32 {
        size_key(self.font_size)
    }
}

/// Bucket a font size to integer tenths of a point.
pub fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Inverse of [`size_key`].
pub fn size_from_key(key: i32) -> f32 {
    key as f32 / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_from_flags() {
        let bbox = BoundingBox::default();
        let bold = Fragment::from_flags("A", 12.0, FontFlags::BOLD | FontFlags::SERIF, 0, bbox);
        assert!(bold.bold);

        let plain = Fragment::from_flags("A", 12.0, FontFlags::SERIF | FontFlags::ITALIC, 0, bbox);
        assert!(!plain.bold);

        assert!(FontFlags::from_bits_truncate(16).contains(FontFlags::BOLD));
    }

    #[test]
    fn test_flags_from_font_name() {
        assert!(FontFlags::from_font_name("Helvetica-Bold").contains(FontFlags::BOLD));
        assert!(FontFlags::from_font_name("Arial-Black").contains(FontFlags::BOLD));
        let oblique = FontFlags::from_font_name("Helvetica-Oblique");
        assert!(oblique.contains(FontFlags::ITALIC));
        assert!(!oblique.contains(FontFlags::BOLD));
        assert!(FontFlags::from_font_name("Courier").contains(FontFlags::MONOSPACE));
    }

    #[test]
    fn test_size_key_rounds_to_tenths() {
        assert_eq!(size_key(11.96), 120);
        assert_eq!(size_key(12.04), 120);
        assert_eq!(size_key(9.46), 95);
        assert!((size_from_key(145) - 14.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bbox_gaps() {
        let a = BoundingBox::new(10.0, 100.0, 50.0, 112.0);
        let b = BoundingBox::new(40.0, 140.0, 90.0, 152.0);
        assert_eq!(a.vertical_gap(&b), 40.0);
        assert_eq!(a.horizontal_gap(&b), 30.0);
    }

    #[test]
    fn test_fragment_deserializes_without_bold() {
        let json = r#"{"text":"Intro","font_size":12.0,"page":0,"bbox":{"x0":0,"y0":0,"x1":1,"y1":1}}"#;
        let fragment: Fragment = serde_json::from_str(json).unwrap();
        assert!(!fragment.bold);
        assert_eq!(fragment.text, "Intro");
    }
}
