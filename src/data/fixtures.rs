// ============================================================
// Test fixtures — small PDFs built in memory
// ============================================================
// Each page is a list of lines. Every line is drawn with its own
// Td / Tj pair, 16pt apart, in 11pt font F1, so the loader sees
// exactly one text fragment per line.
//
// `pdf_document` uses standard Helvetica with WinAnsiEncoding:
// ASCII bytes, with • written as 0x95. `font_document` takes the
// font from the caller, for the Type0, /Differences and /Widths
// variants below, and the lines as raw show bytes.

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

pub const TITLE: &str = "Jane Doe CV";
pub const AUTHOR: &str = "Jane Doe";

/// Font size every fixture line is drawn at
pub const FONT_SIZE: f32 = 11.0;

/// Left edge of every fixture line
pub const LINE_X: f32 = 72.0;

/// /MissingWidth of `proportional_font`
pub const MISSING_WIDTH: f32 = 333.0;

fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '•' => 0x95,
            c if c.is_ascii() => c as u8,
            _ => b'?',
        })
        .collect()
}

fn page_content(lines: &[Vec<u8>]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("Td", vec![LINE_X.into(), 720.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("Td", vec![0.into(), (-16).into()]));
        }
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(line.clone(), StringFormat::Hexadecimal)],
        ));
    }
    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// Pages tree, catalog and /Info around `pages`, all using `font_id` as F1
fn assemble(mut doc: Document, font_id: ObjectId, pages: Vec<Content>) -> Document {
    let pages_id = doc.new_object_id();
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for content in pages {
        let bytes = content.encode().expect("encodable content");
        let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(TITLE),
        "Author" => Object::string_literal(AUTHOR),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc
}

/// Build a PDF document with one page per entry of `pages`
pub fn pdf_document(pages: &[&[&str]]) -> Document {
    let mut doc = Document::with_version("1.5");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let contents = pages
        .iter()
        .map(|lines| page_content(&lines.iter().map(|line| encode(line)).collect::<Vec<_>>()))
        .collect();
    assemble(doc, font_id, contents)
}

/// One page whose F1 is built by `font`, showing each of `lines`
/// (raw show bytes) on its own line
pub fn font_document(font: impl FnOnce(&mut Document) -> ObjectId, lines: &[Vec<u8>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let font_id = font(&mut doc);
    assemble(doc, font_id, vec![page_content(lines)])
}

/// Two-byte glyph ids 1..=count, as shown with an Identity-H font
pub fn glyph_ids(count: u16) -> Vec<u8> {
    (1..=count).flat_map(u16::to_be_bytes).collect()
}

/// A Type0 / Identity-H font whose /ToUnicode maps glyph id i
/// (1-based) to the i-th char of `word`. `widths` are the /W
/// advances of those glyphs; other ids get /DW 1000.
pub fn type0_font(doc: &mut Document, word: &str, widths: &[i64]) -> ObjectId {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    cmap.push_str(&format!("{} beginbfchar\n", word.chars().count()));
    for (i, ch) in word.chars().enumerate() {
        cmap.push_str(&format!("<{:04X}> <{:04X}>\n", i + 1, ch as u32));
    }
    cmap.push_str("endbfchar\nendcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");

    let to_unicode = doc.add_object(Stream::new(dictionary! {}, cmap.into_bytes()));
    let w: Vec<Object> = widths.iter().map(|&w| Object::Integer(w)).collect();
    let descendant = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "ABCDEF+Calibri",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "DW" => 1000,
        "W" => vec![Object::Integer(1), Object::Array(w)],
    });
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "ABCDEF+Calibri",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(descendant)],
        "ToUnicode" => to_unicode,
    })
}

/// A TeX-style Type1 font: StandardEncoding with code 12 as the
/// "fi" ligature and code 39 as a right quote
pub fn differences_font(doc: &mut Document) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "CMR10",
        "Encoding" => dictionary! {
            "Type" => "Encoding",
            "Differences" => vec![
                Object::Integer(12), Object::Name(b"fi".to_vec()),
                Object::Integer(39), Object::Name(b"quoteright".to_vec()),
            ],
        },
    })
}

/// Advance `proportional_font` gives code `c`
pub fn proportional_width(c: u8) -> f32 {
    match c {
        b'W' | b'M' => 900.0,
        b'I' | b'i' | b'l' | b' ' => 250.0,
        _ => 550.0,
    }
}

/// A WinAnsi TrueType font with /Widths for codes 32..=122
pub fn proportional_font(doc: &mut Document) -> ObjectId {
    let widths: Vec<Object> = (32..=122u8).map(|c| Object::Real(proportional_width(c))).collect();
    let descriptor = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => "Lato",
        "MissingWidth" => MISSING_WIDTH,
    });
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => "Lato",
        "Encoding" => "WinAnsiEncoding",
        "FirstChar" => 32,
        "LastChar" => 122,
        "Widths" => widths,
        "FontDescriptor" => descriptor,
    })
}

/// Serialised PDF bytes for `pages`
pub fn pdf_bytes(pages: &[&[&str]]) -> Vec<u8> {
    document_bytes(pdf_document(pages))
}

fn document_bytes(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("in-memory save");
    bytes
}

/// Write a PDF for `pages` to `dir/name` and return its path
pub fn write_pdf(dir: &Path, name: &str, pages: &[&[&str]]) -> PathBuf {
    write_document(dir, name, pdf_document(pages))
}

pub fn write_document(dir: &Path, name: &str, doc: Document) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, document_bytes(doc)).expect("fixture write");
    path
}
