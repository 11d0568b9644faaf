// ============================================================
// Layer 4 — Page Content Walker
// ============================================================
// Turns the decoded operator list of one PDF page into
// positioned RawFragments.
//
// A page content stream is a flat list of operators:
//   BT /F1 11 Tf 72 700 Td (Skills) Tj ET   ← text
//   q 100 0 0 50 72 600 cm /Im1 Do Q        ← image
//   72 590 400 1 re f                       ← drawing
//
// We track just enough state to place things:
//   - graphics state: CTM, saved/restored by q / Q
//   - text state:     font, size, leading, spacing, scaling
//   - text matrices:  Tm / Tlm, reset by BT
//
// Show strings are split into glyphs by the current font
// (see fonts.rs), which also gives each glyph its advance.
// Show operators on one baseline are joined into a single
// line fragment that keeps the x position of every char.
//
// Reference: ISO 32000-1 §8.4 (Graphics State),
//            §9.4 (Text Objects), §9.3 (Text State Parameters)
//            lopdf crate documentation (content::Content)

use lopdf::content::{Content, Operation};
use lopdf::Object;

use crate::data::fonts::PageFonts;
use crate::domain::document::{FragmentKind, RawFragment, Rect};

/// TJ adjustments at or below this (thousandths of an em)
/// are read as a word gap
const TJ_SPACE_THRESHOLD: f32 = -250.0;

// ─── Matrix ───────────────────────────────────────────────────────────────────
// PDF 3x3 affine matrix [a b 0; c d 0; e f 1], row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    fn translate(tx: f32, ty: f32) -> Self {
        Matrix { e: tx, f: ty, ..Self::IDENTITY }
    }

    fn from_operands(ops: &[Object]) -> Option<Self> {
        Some(Matrix {
            a: number(ops.first()?)?,
            b: number(ops.get(1)?)?,
            c: number(ops.get(2)?)?,
            d: number(ops.get(3)?)?,
            e: number(ops.get(4)?)?,
            f: number(ops.get(5)?)?,
        })
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    /// Bounding box of the unit square under this matrix
    fn unit_square(&self) -> Rect {
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(1.0, 0.0),
            self.apply(0.0, 1.0),
            self.apply(1.0, 1.0),
        ];
        bounding(&corners).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }
}

// ─── State ────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy)]
struct TextState {
    /// Index into the page's fonts, set by Tf
    font: Option<usize>,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    /// Tz / 100
    horizontal_scaling: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 12.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

/// A text line being assembled from show operators
struct LineBuilder {
    text: String,
    char_x: Vec<f32>,
    bbox: Rect,
    baseline: f32,
    size: f32,
}

impl LineBuilder {
    /// Insert a word space at the current right edge
    fn push_space(&mut self) {
        self.text.push(' ');
        self.char_x.push(self.bbox.x1);
    }
}

struct Walker<'a> {
    page: usize,
    fonts: &'a PageFonts<'a>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    tm: Matrix,
    tlm: Matrix,
    path: Vec<(f32, f32)>,
    line: Option<LineBuilder>,
    fragments: Vec<RawFragment>,
}

/// Walk the operators of page `page` and return its fragments
/// in content-stream order. `fonts` are the page's font resources.
pub fn page_fragments(page: usize, content: &Content, fonts: &PageFonts<'_>) -> Vec<RawFragment> {
    let mut walker = Walker {
        page,
        fonts,
        state: GraphicsState { ctm: Matrix::IDENTITY, text: TextState::default() },
        saved: Vec::new(),
        tm: Matrix::IDENTITY,
        tlm: Matrix::IDENTITY,
        path: Vec::new(),
        line: None,
        fragments: Vec::new(),
    };

    for op in &content.operations {
        walker.step(op);
    }
    walker.flush_line();
    walker.fragments
}

impl Walker<'_> {
    fn step(&mut self, op: &Operation) {
        let ops = op.operands.as_slice();
        match op.operator.as_str() {
            // ── Graphics state ───────────────────────────────────────────────
            "q" => self.saved.push(self.state),
            "Q" => {
                if let Some(state) = self.saved.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(ops) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }

            // ── Text objects and state ───────────────────────────────────────
            "BT" => {
                self.tm  = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => {
                self.state.text.font = ops
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| self.fonts.index_of(name));
                if let Some(size) = ops.get(1).and_then(number) {
                    self.state.text.font_size = size;
                }
            }
            "TL" => set_from(ops, &mut self.state.text.leading),
            "Tc" => set_from(ops, &mut self.state.text.char_spacing),
            "Tw" => set_from(ops, &mut self.state.text.word_spacing),
            "Tz" => {
                if let Some(scale) = ops.first().and_then(number) {
                    self.state.text.horizontal_scaling = scale / 100.0;
                }
            }

            // ── Text positioning ─────────────────────────────────────────────
            "Td" => {
                if let (Some(tx), Some(ty)) = (ops.first().and_then(number), ops.get(1).and_then(number)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (ops.first().and_then(number), ops.get(1).and_then(number)) {
                    self.state.text.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(ops) {
                    self.tm  = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(),

            // ── Text showing ─────────────────────────────────────────────────
            "Tj" => {
                if let Some(bytes) = ops.first().and_then(string_bytes) {
                    self.show(bytes);
                }
            }
            "'" => {
                self.next_line();
                if let Some(bytes) = ops.first().and_then(string_bytes) {
                    self.show(bytes);
                }
            }
            "\"" => {
                set_from(ops, &mut self.state.text.word_spacing);
                if let Some(ac) = ops.get(1).and_then(number) {
                    self.state.text.char_spacing = ac;
                }
                self.next_line();
                if let Some(bytes) = ops.get(2).and_then(string_bytes) {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = ops.first() {
                    self.show_array(items);
                }
            }

            // ── Images and XObjects ──────────────────────────────────────────
            "Do" | "BI" => {
                let bbox = self.state.ctm.unit_square();
                self.fragments
                    .push(RawFragment::non_text(self.page, bbox, FragmentKind::Image));
            }

            // ── Path construction ────────────────────────────────────────────
            "m" | "l" => self.path_points(ops, 2),
            "c" => self.path_points(ops, 6),
            "v" | "y" => self.path_points(ops, 4),
            "re" => {
                let vals: Vec<f32> = ops.iter().filter_map(number).collect();
                if let &[x, y, w, h] = vals.as_slice() {
                    self.path.push((x, y));
                    self.path.push((x + w, y + h));
                }
            }

            // ── Path painting ────────────────────────────────────────────────
            "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => self.paint_path(),
            "n" => self.path.clear(),

            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translate(tx, ty).then(&self.tlm);
        self.tm  = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.state.text.leading;
        self.move_line(0.0, -leading);
    }

    /// Advance the text matrix horizontally, in unscaled text space
    fn advance(&mut self, tx: f32) {
        self.tm = Matrix::translate(tx, 0.0).then(&self.tm);
    }

    fn show_array(&mut self, items: &[Object]) {
        for item in items {
            match item {
                Object::String(bytes, _) => self.show(bytes),
                other => {
                    if let Some(adjust) = number(other) {
                        let ts = self.state.text;
                        self.advance(-adjust / 1000.0 * ts.font_size * ts.horizontal_scaling);
                        if adjust <= TJ_SPACE_THRESHOLD {
                            if let Some(line) = self.line.as_mut() {
                                if !line.text.ends_with(' ') {
                                    line.push_space();
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn show(&mut self, bytes: &[u8]) {
        let glyphs = self.fonts.glyphs(self.state.text.font, bytes);
        if glyphs.is_empty() {
            return;
        }

        let ts = self.state.text;
        let trm = self.tm.then(&self.state.ctm);
        let (x, y) = trm.apply(0.0, 0.0);
        let size = (ts.font_size * trm.vertical_scale()).abs().max(1.0);

        // ── Advance glyph by glyph, spreading each glyph's chars over its width
        let mut text = String::new();
        let mut char_x = Vec::new();
        let mut start = x;
        for glyph in &glyphs {
            let mut tx = glyph.width / 1000.0 * ts.font_size + ts.char_spacing;
            if glyph.is_space {
                tx += ts.word_spacing;
            }
            self.advance(tx * ts.horizontal_scaling);
            let (end, _) = self.tm.then(&self.state.ctm).apply(0.0, 0.0);

            let count = glyph.text.chars().count();
            for i in 0..count {
                char_x.push(start + (end - start) * i as f32 / count as f32);
            }
            text.push_str(&glyph.text);
            start = end;
        }
        if text.is_empty() {
            return;
        }

        let bbox = Rect::new(x, y - 0.2 * size, start, y + 0.8 * size);

        let same_line = self
            .line
            .as_ref()
            .is_some_and(|line| (line.baseline - y).abs() <= line.size * 0.5 && x >= line.bbox.x0);

        if same_line {
            if let Some(line) = self.line.as_mut() {
                let gap = x - line.bbox.x1;
                if gap > 0.15 * size
                    && !line.text.ends_with(char::is_whitespace)
                    && !text.starts_with(char::is_whitespace)
                {
                    line.push_space();
                }
                line.text.push_str(&text);
                line.char_x.extend(char_x);
                line.bbox = line.bbox.union(&bbox);
            }
        } else {
            self.flush_line();
            self.line = Some(LineBuilder { text, char_x, bbox, baseline: y, size });
        }
    }

    fn flush_line(&mut self) {
        if let Some(line) = self.line.take() {
            self.fragments
                .push(RawFragment::text(self.page, line.bbox, line.text).with_char_x(line.char_x));
        }
    }

    fn path_points(&mut self, ops: &[Object], count: usize) {
        let vals: Vec<f32> = ops.iter().take(count).filter_map(number).collect();
        for pair in vals.chunks_exact(2) {
            self.path.push((pair[0], pair[1]));
        }
    }

    fn paint_path(&mut self) {
        let ctm = self.state.ctm;
        let points: Vec<(f32, f32)> = self.path.drain(..).map(|(x, y)| ctm.apply(x, y)).collect();
        if let Some(bbox) = bounding(&points) {
            self.fragments
                .push(RawFragment::non_text(self.page, bbox, FragmentKind::Drawing));
        }
    }
}

// ─── Operand helpers ──────────────────────────────────────────────────────────

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn set_from(ops: &[Object], target: &mut f32) {
    if let Some(value) = ops.first().and_then(number) {
        *target = value;
    }
}

fn string_bytes(obj: &Object) -> Option<&[u8]> {
    match obj {
        Object::String(bytes, _) => Some(bytes.as_slice()),
        _ => None,
    }
}

fn bounding(points: &[(f32, f32)]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let start = Rect::new(first.0, first.1, first.0, first.1);
    Some(rest.iter().fold(start, |acc, &(x, y)| acc.union(&Rect::new(x, y, x, y))))
}
