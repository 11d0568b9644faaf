// ============================================================
// Layer 4 — Page Fonts
// ============================================================
// What the bytes of a show operator mean depends on the font
// selected by the last Tf:
//
//   Type0 (Identity-H)  two-byte glyph ids → /ToUnicode CMap
//   simple font         one byte → named encoding
//                       (WinAnsi, MacRoman, Standard, ...)
//                       optionally patched by /Differences
//
// Decoding goes through lopdf: `get_font_encoding` builds the
// decoder and `Document::decode_text` applies it, the same way
// lopdf's own `extract_text` does. lopdf does not apply an
// /Encoding dictionary, so for those fonts a 256-entry table is
// built here: lopdf decodes the base encoding byte by byte and
// the /Differences glyph names are laid over it.
//
// Glyph advances come from the font as well:
//   simple fonts   /FirstChar + /Widths
//   CID fonts      /DW + /W of the descendant font
//   standard 14    built-in Helvetica and Courier metrics
//
// Reference: ISO 32000-1 §9.6 (Simple Fonts), §9.7 (Composite
//            Fonts), §9.10 (Extraction of Text Content)
//            lopdf crate documentation (Document::extract_text)

use lopdf::{dictionary, Dictionary, Document, Encoding, Object, ObjectId};

/// Advance used when a font gives none, in thousandths of an em
const DEFAULT_WIDTH: f32 = 500.0;

/// Default advance of a CID font without /DW
const DEFAULT_CID_WIDTH: f32 = 1000.0;

/// Helvetica advances for ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const COURIER_WIDTH: f32 = 600.0;

/// Glyph names that are not a single character or a uniXXXX form
const GLYPH_NAMES: &[(&str, &str)] = &[
    ("space", " "), ("nbspace", " "), ("exclam", "!"), ("quotedbl", "\""),
    ("numbersign", "#"), ("dollar", "$"), ("percent", "%"), ("ampersand", "&"),
    ("quotesingle", "'"), ("quoteright", "\u{2019}"), ("quoteleft", "\u{2018}"),
    ("parenleft", "("), ("parenright", ")"), ("asterisk", "*"), ("plus", "+"),
    ("comma", ","), ("hyphen", "-"), ("minus", "\u{2212}"), ("period", "."),
    ("slash", "/"), ("zero", "0"), ("one", "1"), ("two", "2"), ("three", "3"),
    ("four", "4"), ("five", "5"), ("six", "6"), ("seven", "7"), ("eight", "8"),
    ("nine", "9"), ("colon", ":"), ("semicolon", ";"), ("less", "<"), ("equal", "="),
    ("greater", ">"), ("question", "?"), ("at", "@"), ("bracketleft", "["),
    ("backslash", "\\"), ("bracketright", "]"), ("asciicircum", "^"),
    ("underscore", "_"), ("grave", "`"), ("braceleft", "{"), ("bar", "|"),
    ("braceright", "}"), ("asciitilde", "~"), ("bullet", "\u{2022}"),
    ("endash", "\u{2013}"), ("emdash", "\u{2014}"), ("quotedblleft", "\u{201C}"),
    ("quotedblright", "\u{201D}"), ("ellipsis", "\u{2026}"), ("periodcentered", "\u{B7}"),
    ("fi", "fi"), ("fl", "fl"), ("ff", "ff"), ("ffi", "ffi"), ("ffl", "ffl"),
    ("dotlessi", "\u{131}"), ("germandbls", "\u{DF}"), ("copyright", "\u{A9}"),
    ("registered", "\u{AE}"), ("trademark", "\u{2122}"), ("degree", "\u{B0}"),
    ("section", "\u{A7}"), ("paragraph", "\u{B6}"), ("multiply", "\u{D7}"),
    ("eacute", "\u{E9}"), ("egrave", "\u{E8}"), ("ecircumflex", "\u{EA}"),
    ("edieresis", "\u{EB}"), ("aacute", "\u{E1}"), ("agrave", "\u{E0}"),
    ("adieresis", "\u{E4}"), ("oacute", "\u{F3}"), ("odieresis", "\u{F6}"),
    ("uacute", "\u{FA}"), ("udieresis", "\u{FC}"), ("iacute", "\u{ED}"),
    ("ccedilla", "\u{E7}"), ("ntilde", "\u{F1}"),
];

/// One glyph of a show string.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Unicode text of the glyph; empty when it has none
    pub text: String,

    /// Horizontal advance in thousandths of an em
    pub width: f32,

    /// Single-byte code 32, the only code word spacing applies to
    pub is_space: bool,
}

enum Decoding<'a> {
    /// lopdf's decoder for a named encoding or a ToUnicode CMap
    Lopdf(Encoding<'a>),
    /// Text per byte value: base encoding with /Differences applied
    Table(Vec<String>),
    /// No usable encoding
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Family {
    Helvetica,
    Courier,
    Other,
}

enum Widths {
    Simple { first: u32, widths: Vec<f32>, missing: f32 },
    Cid { default: f32, ranges: Vec<(u32, u32, f32)> },
    Standard(Family),
}

/// Decoder and metrics of one font resource.
struct FontProfile<'a> {
    decoding: Decoding<'a>,
    two_byte: bool,
    widths:   Widths,
}

/// The fonts a page's resources name, keyed by resource name (`F1`).
#[derive(Default)]
pub struct PageFonts<'a> {
    fonts: Vec<(Vec<u8>, FontProfile<'a>)>,
}

impl<'a> PageFonts<'a> {
    /// Resolve every font reachable from the resources of `page_id`,
    /// inherited resources included. An unreadable font table leaves
    /// the page with no fonts, so its text is decoded without one.
    pub fn load(doc: &'a Document, page_id: ObjectId) -> Self {
        let fonts = match doc.get_page_fonts(page_id) {
            Ok(fonts) => fonts,
            Err(e) => {
                tracing::warn!("Cannot read fonts of page {:?}: {}", page_id, e);
                return Self::default();
            }
        };

        let fonts = fonts
            .into_iter()
            .map(|(name, dict)| {
                let profile = FontProfile::from_dict(doc, dict);
                (name, profile)
            })
            .collect();
        Self { fonts }
    }

    /// Index of the font resource `name`, for `glyphs`
    pub fn index_of(&self, name: &[u8]) -> Option<usize> {
        self.fonts.iter().position(|(key, _)| key.as_slice() == name)
    }

    /// Split `bytes` into glyphs of font `font`.
    /// Without a font every char of the decoded string is one glyph.
    pub fn glyphs(&self, font: Option<usize>, bytes: &[u8]) -> Vec<Glyph> {
        match font.and_then(|index| self.fonts.get(index)) {
            Some((_, profile)) => profile.glyphs(bytes),
            None => decode_pdf_string(bytes)
                .chars()
                .map(|c| Glyph { text: c.to_string(), width: DEFAULT_WIDTH, is_space: c == ' ' })
                .collect(),
        }
    }
}

impl<'a> FontProfile<'a> {
    fn from_dict(doc: &'a Document, font: &'a Dictionary) -> Self {
        let two_byte = font.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Type0".as_slice());
        let widths = if two_byte { cid_widths(doc, font) } else { simple_widths(doc, font) };

        Self { decoding: decoding(doc, font, two_byte), two_byte, widths }
    }

    fn glyphs(&self, bytes: &[u8]) -> Vec<Glyph> {
        let step = if self.two_byte { 2 } else { 1 };
        bytes
            .chunks(step)
            .map(|code_bytes| {
                let code = code_bytes.iter().fold(0u32, |acc, &b| acc << 8 | u32::from(b));
                let text = visible(&self.decode(code, code_bytes));
                Glyph {
                    width:    self.widths.advance(code, &text),
                    is_space: !self.two_byte && code == 32,
                    text,
                }
            })
            .collect()
    }

    fn decode(&self, code: u32, code_bytes: &[u8]) -> String {
        match &self.decoding {
            Decoding::Table(table) => table.get(code as usize).cloned().unwrap_or_default(),
            Decoding::Lopdf(encoding) => {
                // ToUnicode CMaps are keyed by two-byte codes
                let widened;
                let bytes = match encoding {
                    Encoding::UnicodeMapEncoding(_) if code_bytes.len() == 1 => {
                        widened = [0, code_bytes[0]];
                        &widened[..]
                    }
                    _ => code_bytes,
                };
                Document::decode_text(encoding, bytes).unwrap_or_else(|_| decode_pdf_string(code_bytes))
            }
            // Glyph ids without a map carry no text
            Decoding::Unknown if self.two_byte => String::new(),
            Decoding::Unknown => decode_pdf_string(code_bytes),
        }
    }
}

fn decoding<'a>(doc: &'a Document, font: &'a Dictionary, two_byte: bool) -> Decoding<'a> {
    if !two_byte {
        if let Ok(Object::Dictionary(encoding)) = font.get_deref(b"Encoding", doc) {
            return Decoding::Table(differences_table(doc, encoding));
        }
    }

    // get_font_encoding is only defined for /Type /Font dictionaries
    if !font.type_is(b"Font") {
        return Decoding::Unknown;
    }
    match font.get_font_encoding(doc) {
        Ok(encoding) => Decoding::Lopdf(encoding),
        Err(e) => {
            tracing::debug!("No usable encoding for font {:?}: {}", base_font(font), e);
            Decoding::Unknown
        }
    }
}

/// Text for every byte value of a simple font whose /Encoding is a
/// dictionary: /BaseEncoding (StandardEncoding when absent), then
/// the /Differences overrides.
fn differences_table(doc: &Document, encoding: &Dictionary) -> Vec<String> {
    let base_name = encoding
        .get(b"BaseEncoding")
        .and_then(Object::as_name)
        .unwrap_or(b"StandardEncoding".as_slice());
    let base_font = dictionary! {
        "Type" => "Font",
        "Encoding" => Object::Name(base_name.to_vec()),
    };

    let mut table: Vec<String> = match base_font.get_font_encoding(doc) {
        Ok(base) => (0..=255u8)
            .map(|b| Document::decode_text(&base, &[b]).unwrap_or_else(|_| decode_pdf_string(&[b])))
            .collect(),
        Err(_) => (0..=255u8).map(|b| decode_pdf_string(&[b])).collect(),
    };

    let Ok(differences) = encoding.get_deref(b"Differences", doc).and_then(Object::as_array) else {
        return table;
    };

    let mut code: Option<usize> = None;
    for item in differences {
        match item {
            Object::Integer(start) => code = usize::try_from(*start).ok(),
            Object::Name(name) => {
                if let Some(current) = code.filter(|c| *c < table.len()) {
                    if let Some(text) = glyph_text(name) {
                        table[current] = text;
                    }
                    code = Some(current + 1);
                }
            }
            _ => {}
        }
    }
    table
}

/// Unicode text of a glyph name: a listed name, a single
/// character, `uniXXXX[XXXX...]`, `uXXXX[XX]`, or ligature
/// parts joined by `_`. Suffixes such as `.sc` are ignored.
fn glyph_text(name: &[u8]) -> Option<String> {
    let name = std::str::from_utf8(name).ok()?;
    let base = name.split('.').next().filter(|b| !b.is_empty())?;

    if base.contains('_') {
        return base.split('_').map(|part| glyph_text(part.as_bytes())).collect();
    }
    if let Some((_, text)) = GLYPH_NAMES.iter().find(|(glyph, _)| *glyph == base) {
        return Some(text.to_string());
    }

    let mut chars = base.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(c.to_string());
    }

    if let Some(hex) = base.strip_prefix("uni") {
        if hex.len() % 4 == 0 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let units: Vec<u16> = hex
                .as_bytes()
                .chunks(4)
                .filter_map(|chunk| u16::from_str_radix(std::str::from_utf8(chunk).ok()?, 16).ok())
                .collect();
            return String::from_utf16(&units).ok();
        }
    }
    if let Some(hex) = base.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            let scalar = u32::from_str_radix(hex, 16).ok()?;
            return char::from_u32(scalar).map(String::from);
        }
    }
    None
}

// ─── Widths ───────────────────────────────────────────────────────────────────

impl Widths {
    fn advance(&self, code: u32, text: &str) -> f32 {
        match self {
            Widths::Simple { first, widths, missing } => code
                .checked_sub(*first)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            Widths::Cid { default, ranges } => ranges
                .iter()
                .find(|(lo, hi, _)| (*lo..=*hi).contains(&code))
                .map(|&(_, _, width)| width)
                .unwrap_or(*default),
            Widths::Standard(family) => family.advance(text),
        }
    }
}

impl Family {
    fn of(font: &Dictionary) -> Self {
        let name = base_font(font);
        // Subset fonts are named ABCDEF+RealName
        let name = name.rsplit('+').next().unwrap_or(&name);
        if name.contains("Courier") {
            Family::Courier
        } else if name.contains("Helvetica") || name.contains("Arial") {
            Family::Helvetica
        } else {
            Family::Other
        }
    }

    fn advance(&self, text: &str) -> f32 {
        match self {
            Family::Courier => COURIER_WIDTH,
            Family::Helvetica => text
                .chars()
                .next()
                .and_then(|c| (c as usize).checked_sub(32))
                .and_then(|i| HELVETICA_WIDTHS.get(i))
                .map_or(556.0, |&w| f32::from(w)),
            Family::Other => DEFAULT_WIDTH,
        }
    }
}

fn simple_widths(doc: &Document, font: &Dictionary) -> Widths {
    let first  = font.get(b"FirstChar").and_then(Object::as_i64).ok();
    let widths = font.get_deref(b"Widths", doc).and_then(Object::as_array).ok();

    match (first, widths) {
        (Some(first), Some(widths)) => {
            let missing = font
                .get_deref(b"FontDescriptor", doc)
                .and_then(Object::as_dict)
                .and_then(|descriptor| descriptor.get(b"MissingWidth"))
                .and_then(Object::as_float)
                .unwrap_or(DEFAULT_WIDTH);
            Widths::Simple {
                first:  u32::try_from(first).unwrap_or(0),
                widths: widths.iter().map(|w| float(doc, w).unwrap_or(0.0)).collect(),
                missing,
            }
        }
        _ => Widths::Standard(Family::of(font)),
    }
}

/// /W entries come in two forms:
///   c [w1 w2 ...]     consecutive codes from c
///   c_first c_last w  one width for a range
fn cid_widths(doc: &Document, font: &Dictionary) -> Widths {
    let descendant = font
        .get_deref(b"DescendantFonts", doc)
        .and_then(Object::as_array)
        .ok()
        .and_then(|fonts| fonts.first())
        .and_then(|first| resolve(doc, first).as_dict().ok());

    let Some(cid_font) = descendant else {
        return Widths::Cid { default: DEFAULT_CID_WIDTH, ranges: Vec::new() };
    };

    let default = cid_font.get(b"DW").and_then(Object::as_float).unwrap_or(DEFAULT_CID_WIDTH);
    let mut ranges = Vec::new();

    if let Ok(entries) = cid_font.get_deref(b"W", doc).and_then(Object::as_array) {
        let mut i = 0;
        while let Some(start) = entries.get(i).and_then(|o| code(doc, o)) {
            match entries.get(i + 1).map(|o| resolve(doc, o)) {
                Some(Object::Array(list)) => {
                    for (offset, width) in list.iter().enumerate() {
                        let c = start + offset as u32;
                        ranges.push((c, c, float(doc, width).unwrap_or(default)));
                    }
                    i += 2;
                }
                Some(last) => {
                    let (Some(end), Some(width)) = (
                        code(doc, last),
                        entries.get(i + 2).and_then(|o| float(doc, o)),
                    ) else {
                        break;
                    };
                    ranges.push((start, end, width));
                    i += 3;
                }
                None => break,
            }
        }
    }

    Widths::Cid { default, ranges }
}

// ─── Object helpers ───────────────────────────────────────────────────────────

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    doc.dereference(obj).map(|(_, target)| target).unwrap_or(obj)
}

fn float(doc: &Document, obj: &Object) -> Option<f32> {
    resolve(doc, obj).as_float().ok()
}

fn code(doc: &Document, obj: &Object) -> Option<u32> {
    resolve(doc, obj).as_i64().ok().and_then(|v| u32::try_from(v).ok())
}

fn base_font(font: &Dictionary) -> String {
    font.get(b"BaseFont")
        .and_then(Object::as_name)
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .unwrap_or_default()
}

/// Tabs and line breaks become spaces; other control characters
/// and U+FFFD (an unmapped glyph) are dropped.
fn visible(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '\t' | '\n' | '\r' => Some(' '),
            '\u{FFFD}' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Decode bytes shown in a font with no usable encoding.
///
/// Order of attempts:
///   1. UTF-16BE with a byte order mark
///   2. valid UTF-8
///   3. WinAnsiEncoding (Latin-1 with 0x80–0x9F remapped)
fn decode_pdf_string(bytes: &[u8]) -> String {
    let raw: String = if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if let Ok(utf8) = std::str::from_utf8(bytes) {
        utf8.to_string()
    } else {
        bytes.iter().map(|&b| win_ansi_char(b)).collect()
    };
    visible(&raw)
}

fn win_ansi_char(b: u8) -> char {
    match b {
        0x80 => '€',
        0x82 => '‚',
        0x83 => 'ƒ',
        0x84 => '„',
        0x85 => '…',
        0x86 => '†',
        0x87 => '‡',
        0x88 => 'ˆ',
        0x89 => '‰',
        0x8A => 'Š',
        0x8B => '‹',
        0x8C => 'Œ',
        0x8E => 'Ž',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '•',
        0x96 => '–',
        0x97 => '—',
        0x98 => '˜',
        0x99 => '™',
        0x9A => 'š',
        0x9B => '›',
        0x9C => 'œ',
        0x9E => 'ž',
        0x9F => 'Ÿ',
        other => other as char,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    fn first_page(doc: &Document) -> ObjectId {
        doc.get_pages()[&1]
    }

    fn text_of(glyphs: &[Glyph]) -> String {
        glyphs.iter().map(|g| g.text.as_str()).collect()
    }

    #[test]
    fn test_type0_font_decodes_through_to_unicode() {
        let doc = fixtures::font_document(
            |doc| fixtures::type0_font(doc, "Python", &[600, 480, 310, 500, 520, 530]),
            &[fixtures::glyph_ids(6)],
        );
        let fonts = PageFonts::load(&doc, first_page(&doc));
        let f1    = fonts.index_of(b"F1");
        assert!(f1.is_some());

        let glyphs = fonts.glyphs(f1, &fixtures::glyph_ids(6));
        assert_eq!(text_of(&glyphs), "Python");
        assert_eq!(glyphs[0].width, 600.0);
        assert_eq!(glyphs[2].width, 310.0);
        assert!(glyphs.iter().all(|g| !g.is_space));
    }

    #[test]
    fn test_cid_width_ranges_and_default() {
        let doc = fixtures::font_document(|doc| fixtures::type0_font(doc, "ab", &[250, 750]), &[]);
        let fonts = PageFonts::load(&doc, first_page(&doc));

        // glyph 7 is outside /W, so /DW applies
        let glyphs = fonts.glyphs(fonts.index_of(b"F1"), &[0, 2, 0, 7]);
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].text, "b");
        assert_eq!(glyphs[0].width, 750.0);
        assert_eq!(glyphs[1].text, "");
        assert_eq!(glyphs[1].width, 1000.0);
    }

    #[test]
    fn test_differences_ligature_and_quote() {
        let doc   = fixtures::font_document(fixtures::differences_font, &[]);
        let fonts = PageFonts::load(&doc, first_page(&doc));

        let glyphs = fonts.glyphs(fonts.index_of(b"F1"), b"\x0Cnance team\x27s");
        assert_eq!(text_of(&glyphs), "finance team\u{2019}s");
        assert!(glyphs[6].is_space);
    }

    #[test]
    fn test_simple_font_widths_table() {
        let doc   = fixtures::font_document(fixtures::proportional_font, &[]);
        let fonts = PageFonts::load(&doc, first_page(&doc));

        let glyphs = fonts.glyphs(fonts.index_of(b"F1"), b"Wi~");
        assert_eq!(text_of(&glyphs), "Wi~");
        assert_eq!(glyphs[0].width, fixtures::proportional_width(b'W'));
        assert_eq!(glyphs[1].width, fixtures::proportional_width(b'i'));
        // code 126 is past the /Widths array
        assert_eq!(glyphs[2].width, fixtures::MISSING_WIDTH);
    }

    #[test]
    fn test_standard_helvetica_metrics() {
        let doc   = fixtures::pdf_document(&[&["x"]]);
        let fonts = PageFonts::load(&doc, first_page(&doc));

        let glyphs = fonts.glyphs(fonts.index_of(b"F1"), b"Wi \x95");
        assert_eq!(text_of(&glyphs), "Wi •");
        let widths: Vec<f32> = glyphs.iter().map(|g| g.width).collect();
        assert_eq!(widths, vec![944.0, 222.0, 278.0, 556.0]);
    }

    #[test]
    fn test_unknown_font_falls_back_to_string_decoding() {
        let fonts  = PageFonts::default();
        let glyphs = fonts.glyphs(fonts.index_of(b"F9"), b"Go \x95");
        assert_eq!(text_of(&glyphs), "Go •");
        assert!(glyphs.iter().all(|g| g.width == DEFAULT_WIDTH));
        assert!(glyphs[2].is_space);
    }

    #[test]
    fn test_glyph_names() {
        assert_eq!(glyph_text(b"A").as_deref(), Some("A"));
        assert_eq!(glyph_text(b"fi").as_deref(), Some("fi"));
        assert_eq!(glyph_text(b"f_f_i").as_deref(), Some("ffi"));
        assert_eq!(glyph_text(b"uni00E9").as_deref(), Some("é"));
        assert_eq!(glyph_text(b"u1F600").as_deref(), Some("😀"));
        assert_eq!(glyph_text(b"a.sc").as_deref(), Some("a"));
        assert_eq!(glyph_text(b"glyph1234"), None);
    }

    #[test]
    fn test_decode_win_ansi_bullet() {
        assert_eq!(decode_pdf_string(&[0x95, b' ', b'G', b'o']), "• Go");
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        assert_eq!(decode_pdf_string(&[0xFE, 0xFF, 0x00, b'A', 0x20, 0x22]), "A•");
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_pdf_string("café".as_bytes()), "café");
    }

    #[test]
    fn test_decode_drops_controls() {
        assert_eq!(decode_pdf_string(b"a\x00b\tc"), "ab c");
    }
}
