// this_file: crates/typsm-export/src/pen.rs

//! Glyph outlines as PDF path operators

use lopdf::content::Operation;
use skrifa::outline::OutlinePen;

/// Turns skrifa outline commands into `m`/`l`/`c`/`h` operators, placed
/// at a pen position on the page and filled once the glyph is done
pub(crate) struct PdfPathPen {
    x: f32,
    baseline: f32,
    scale: f32,
    /// Last on-curve point in font units, for quadratic conversion
    last: (f32, f32),
    operations: Vec<Operation>,
}

impl PdfPathPen {
    pub(crate) fn new(x: f32, baseline: f32, scale: f32) -> Self {
        Self {
            x,
            baseline,
            scale,
            last: (0.0, 0.0),
            operations: Vec::new(),
        }
    }

    /// Path operators followed by a nonzero fill; empty for blank glyphs
    pub(crate) fn finish(mut self) -> Vec<Operation> {
        if !self.operations.is_empty() {
            self.operations.push(Operation::new("f", vec![]));
        }
        self.operations
    }

    fn point(&self, x: f32, y: f32) -> [lopdf::Object; 2] {
        [
            (self.x + x * self.scale).into(),
            (self.baseline + y * self.scale).into(),
        ]
    }
}

impl OutlinePen for PdfPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.operations.push(Operation::new("m", self.point(x, y).to_vec()));
        self.last = (x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.operations.push(Operation::new("l", self.point(x, y).to_vec()));
        self.last = (x, y);
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        // PDF has no quadratic segments; raise the degree
        let (x0, y0) = self.last;
        let c1 = (x0 + 2.0 / 3.0 * (cx - x0), y0 + 2.0 / 3.0 * (cy - y0));
        let c2 = (x + 2.0 / 3.0 * (cx - x), y + 2.0 / 3.0 * (cy - y));
        self.curve_to(c1.0, c1.1, c2.0, c2.1, x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let mut operands = Vec::with_capacity(6);
        operands.extend(self.point(cx0, cy0));
        operands.extend(self.point(cx1, cy1));
        operands.extend(self.point(x, y));
        self.operations.push(Operation::new("c", operands));
        self.last = (x, y);
    }

    fn close(&mut self) {
        self.operations.push(Operation::new("h", vec![]));
    }
}
