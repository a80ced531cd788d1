//! PDF reader backed by lopdf.
//!
//! Walks each page's content stream, tracking the text matrix and the
//! current font, and turns every run of shown text into a [`Fragment`] with
//! a top-left-origin bounding box.

use std::collections::HashMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::{Error, Result};
use crate::model::{BoundingBox, FontFlags, Fragment};

use super::DocumentReader;

/// Page height used when no MediaBox can be found (US Letter).
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;
/// TJ adjustment (thousandths of text space) treated as a word break.
const SPACE_THRESHOLD: f32 = 200.0;
/// Approximate glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// [`DocumentReader`] over a PDF file.
pub struct LopdfReader {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
}

impl std::fmt::Debug for LopdfReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfReader")
            .field("pages", &self.pages.len())
            .finish()
    }
}

impl LopdfReader {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let version = sniff_path(path)?;
        log::debug!("Opening {} ({})", path.display(), version);
        Self::from_document(LopdfDocument::load(path)?)
    }

    /// Read a PDF from memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        sniff_bytes(data)?;
        Self::from_document(LopdfDocument::load_mem(data)?)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        Ok(Self { doc, pages })
    }

    /// Height of a page from its (possibly inherited) MediaBox.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        self.doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .ok()
            .and_then(|dict| self.find_media_box(dict))
            .and_then(|media_box| {
                let nums: Vec<f32> = media_box.iter().filter_map(|o| self.number(o)).collect();
                match nums.as_slice() {
                    [_, lly, _, ury, ..] if ury > lly => Some(ury - lly),
                    _ => None,
                }
            })
            .unwrap_or(DEFAULT_PAGE_HEIGHT)
    }

    /// Walk up the page tree to find the MediaBox array.
    fn find_media_box<'d>(&'d self, dict: &'d Dictionary) -> Option<&'d Vec<Object>> {
        if let Ok(obj) = dict.get(b"MediaBox") {
            if let Some(array) = self.resolve(obj).and_then(|o| o.as_array().ok()) {
                return Some(array);
            }
        }
        let parent_id = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        let parent = self.doc.get_object(parent_id).and_then(Object::as_dict).ok()?;
        self.find_media_box(parent)
    }

    fn resolve<'d>(&'d self, obj: &'d Object) -> Option<&'d Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn number(&self, obj: &Object) -> Option<f32> {
        self.resolve(obj).and_then(get_number)
    }

    /// Font resources of a page, keyed by resource name.
    fn page_fonts(&self, page_id: ObjectId) -> Result<HashMap<Vec<u8>, FontInfo>> {
        let fonts = self.doc.get_page_fonts(page_id)?;
        Ok(fonts
            .iter()
            .map(|(name, dict)| (name.clone(), FontInfo::from_dict(dict)))
            .collect())
    }
}

impl DocumentReader for LopdfReader {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_fragments(&self, page: usize) -> Result<Vec<Fragment>> {
        let page_id = *self
            .pages
            .get(page)
            .ok_or(Error::PageOutOfRange(page, self.pages.len()))?;

        let fonts = self.page_fonts(page_id)?;
        let content = Content::decode(&self.doc.get_page_content(page_id)?)?;
        let height = self.page_height(page_id);

        let mut state = TextState::new(page, height);
        for op in &content.operations {
            state.apply(&op.operator, &op.operands, &fonts);
        }
        let mut fragments = state.finish();

        fragments.sort_by(|a, b| {
            a.bbox
                .y0
                .total_cmp(&b.bbox.y0)
                .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
        });
        log::trace!("Page {}: {} fragments", page, fragments.len());
        Ok(fragments)
    }
}

/// What the reader needs to know about a font resource.
#[derive(Debug, Clone)]
struct FontInfo {
    flags: FontFlags,
    identity: bool,
}

impl FontInfo {
    fn from_dict(dict: &Dictionary) -> Self {
        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_default();
        let identity = matches!(
            dict.get(b"Encoding"),
            Ok(Object::Name(name)) if name.starts_with(b"Identity")
        );
        Self {
            flags: FontFlags::from_font_name(&base_font),
            identity,
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        if self.identity && bytes.len() >= 2 && bytes.len() % 2 == 0 {
            let units: Vec<u16> = bytes
                .chunks(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            let decoded = String::from_utf16_lossy(&units);
            if !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                return decoded;
            }
        }
        decode_text_simple(bytes)
    }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, values: [f32; 6]) {
        let [a, b, c, d, e, f] = values;
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    /// Move to the next line; without an explicit leading, one line of
    /// `font_size * 1.2` is assumed.
    fn next_line(&mut self, font_size: f32) {
        let leading = if self.leading > 0.0 {
            self.leading
        } else {
            font_size * 1.2
        };
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// A run of text being accumulated at one position with one font.
#[derive(Debug)]
struct Run {
    text: String,
    x: f32,
    y: f32,
    size: f32,
    flags: FontFlags,
}

/// Content-stream interpreter state for one page.
struct TextState {
    page: usize,
    page_height: f32,
    matrix: TextMatrix,
    font: Vec<u8>,
    font_size: f32,
    in_text: bool,
    run: Option<Run>,
    fragments: Vec<Fragment>,
}

impl TextState {
    fn new(page: usize, page_height: f32) -> Self {
        Self {
            page,
            page_height,
            matrix: TextMatrix::default(),
            font: Vec::new(),
            font_size: 12.0,
            in_text: false,
            run: None,
            fragments: Vec::new(),
        }
    }

    fn apply(&mut self, operator: &str, operands: &[Object], fonts: &HashMap<Vec<u8>, FontInfo>) {
        match operator {
            "BT" => {
                self.in_text = true;
                let leading = self.matrix.leading;
                self.matrix = TextMatrix {
                    leading,
                    ..TextMatrix::default()
                };
            }
            "ET" => {
                self.flush();
                self.in_text = false;
            }
            "Tf" => {
                if let [Object::Name(name), size, ..] = operands {
                    self.flush();
                    self.font = name.clone();
                    self.font_size = get_number(size).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(get_number) {
                    self.matrix.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands {
                    self.flush();
                    let tx = get_number(tx).unwrap_or(0.0);
                    let ty = get_number(ty).unwrap_or(0.0);
                    if operator == "TD" {
                        self.matrix.leading = -ty;
                    }
                    self.matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if operands.len() >= 6 {
                    self.flush();
                    let mut values = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                    for (slot, operand) in values.iter_mut().zip(operands) {
                        if let Some(n) = get_number(operand) {
                            *slot = n;
                        }
                    }
                    self.matrix.set(values);
                }
            }
            "T*" => {
                self.flush();
                self.matrix.next_line(self.font_size);
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = self.decode(fonts, bytes);
                    self.show(text, fonts);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let text = self.decode_array(fonts, items);
                    self.show(text, fonts);
                }
            }
            "'" | "\"" => {
                self.flush();
                self.matrix.next_line(self.font_size);
                let index = if operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = operands.get(index) {
                    let text = self.decode(fonts, bytes);
                    self.show(text, fonts);
                }
            }
            _ => {}
        }
    }

    fn decode(&self, fonts: &HashMap<Vec<u8>, FontInfo>, bytes: &[u8]) -> String {
        match fonts.get(&self.font) {
            Some(font) => font.decode(bytes),
            None => decode_text_simple(bytes),
        }
    }

    /// Decode a TJ array; large negative adjustments become word spaces.
    fn decode_array(&self, fonts: &HashMap<Vec<u8>, FontInfo>, items: &[Object]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(fonts, bytes)),
                other => {
                    let adjustment = get_number(other).map_or(0.0, |n| -n);
                    if adjustment > SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(char::is_whitespace)
                    {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }

    fn show(&mut self, text: String, fonts: &HashMap<Vec<u8>, FontInfo>) {
        if !self.in_text || text.is_empty() {
            return;
        }
        let (x, y) = self.matrix.position();
        let size = self.font_size * self.matrix.scale();
        let flags = fonts
            .get(&self.font)
            .map_or(FontFlags::empty(), |font| font.flags);

        // Consecutive shows without repositioning extend the current run.
        if let Some(run) = self.run.as_mut() {
            if run.x == x && run.y == y && run.size == size && run.flags == flags {
                run.text.push_str(&text);
                return;
            }
        }
        self.flush();
        self.run = Some(Run {
            text,
            x,
            y,
            size,
            flags,
        });
    }

    fn flush(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let normalized: String = run.text.nfkc().collect();
        let text = normalized.trim();
        if text.is_empty() {
            return;
        }
        let width = text.chars().count() as f32 * run.size * AVG_GLYPH_WIDTH;
        let bbox = BoundingBox::new(
            run.x,
            self.page_height - (run.y + run.size * 0.8),
            run.x + width,
            self.page_height - (run.y - run.size * 0.2),
        );
        self.fragments.push(Fragment::from_flags(
            text,
            run.size,
            run.flags,
            self.page,
            bbox,
        ));
    }

    fn finish(mut self) -> Vec<Fragment> {
        self.flush();
        self.fragments
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding when no font information is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use lopdf::{Stream, StringFormat};

    fn text(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    }

    fn run_ops(ops: Vec<(&str, Vec<Object>)>) -> Vec<Fragment> {
        let mut fonts = HashMap::new();
        fonts.insert(
            b"F1".to_vec(),
            FontInfo {
                flags: FontFlags::from_font_name("Helvetica-Bold"),
                identity: false,
            },
        );
        let mut state = TextState::new(0, 792.0);
        for (operator, operands) in ops {
            state.apply(operator, &operands, &fonts);
        }
        state.finish()
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_text_runs_become_fragments() {
        let fragments = run_ops(vec![
            ("BT", vec![]),
            ("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(20)]),
            ("Td", vec![Object::Integer(72), Object::Integer(700)]),
            ("Tj", vec![text("Annual ")]),
            ("Tj", vec![text("Report")]),
            ("Td", vec![Object::Integer(0), Object::Integer(-40)]),
            (
                "TJ",
                vec![Object::Array(vec![
                    text("Fiscal"),
                    Object::Integer(-250),
                    text("Year"),
                ])],
            ),
            ("ET", vec![]),
        ]);

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "Annual Report");
        assert!(fragments[0].bold);
        assert_eq!(fragments[0].font_size, 20.0);
        assert_eq!(fragments[0].bbox.x0, 72.0);
        assert_eq!(fragments[0].bbox.y0, 792.0 - (700.0 + 16.0));
        assert_eq!(fragments[1].text, "Fiscal Year");
        assert_eq!(fragments[1].bbox.y0 - fragments[0].bbox.y0, 40.0);
    }

    #[test]
    fn test_ligatures_are_normalized_and_blanks_dropped() {
        let fragments = run_ops(vec![
            ("BT", vec![]),
            ("Tf", vec![Object::Name(b"F9".to_vec()), Object::Integer(10)]),
            ("Tj", vec![Object::String("\u{FB01}nal".as_bytes().to_vec(), StringFormat::Literal)]),
            ("T*", vec![]),
            ("Tj", vec![text("   ")]),
            ("ET", vec![]),
        ]);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "final");
        assert!(!fragments[0].bold);
    }

    #[test]
    fn test_reads_generated_pdf() {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                lopdf::content::Operation::new("BT", vec![]),
                lopdf::content::Operation::new("Tf", vec!["F1".into(), 24.into()]),
                lopdf::content::Operation::new("Td", vec![72.into(), 700.into()]),
                lopdf::content::Operation::new("Tj", vec![Object::string_literal("Project Charter")]),
                lopdf::content::Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let reader = LopdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 1);
        let fragments = reader.page_fragments(0).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "Project Charter");
        assert!(fragments[0].bold);
        assert!(matches!(
            reader.page_fragments(3),
            Err(Error::PageOutOfRange(3, 1))
        ));
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        assert!(matches!(
            LopdfReader::from_bytes(b"hello world, not a pdf"),
            Err(Error::UnknownFormat)
        ));
    }
}
