use std::collections::BTreeMap;

/// Measured extent of a resolved TEXT or IMAGE instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub w: i32,
    pub h: i32,
    /// Text metrics; `None` for images.
    pub metrics: Option<TextMetrics>,
}

/// Detailed text metrics kept alongside a text bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextMetrics {
    /// Height of one unwrapped line (or the configured override).
    pub line_height: i32,
    /// Raw 8-point glyph quad of the unwrapped text.
    pub quad: [i32; 8],
}

impl BoundingBox {
    pub fn new(w: i32, h: i32) -> Self {
        Self {
            w,
            h,
            metrics: None,
        }
    }

    /// Field lookup used by `[<pos>.<field>]` references; unknown fields read as 0.
    pub fn field(&self, name: &str) -> i32 {
        match name {
            "w" => self.w,
            "h" => self.h,
            "lineHeight" => self.metrics.map(|m| m.line_height).unwrap_or(0),
            _ => 0,
        }
    }
}

/// Append-only side table of bounding boxes keyed by instruction position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundingBoxes {
    boxes: BTreeMap<i64, BoundingBox>,
}

impl BoundingBoxes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the box for `pos`. A box is never replaced once set; returns whether it was stored.
    pub fn record(&mut self, pos: i64, bbox: BoundingBox) -> bool {
        if self.boxes.contains_key(&pos) {
            return false;
        }
        self.boxes.insert(pos, bbox);
        true
    }

    pub fn get(&self, pos: i64) -> Option<&BoundingBox> {
        self.boxes.get(&pos)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
