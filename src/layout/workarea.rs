use crate::foundation::core::IntRect;

/// Current clip rectangle plus the default snapshotted once the canvas is initialized.
///
/// Every coordinate stored here already includes the scene-wide global offset. Positioning
/// functions receive the current rectangle by value, so derived effects can hand out translated
/// copies without touching this state.
#[derive(Clone, Debug)]
pub struct WorkAreaStack {
    current: IntRect,
    default: IntRect,
    global_offset: (i32, i32),
    canvas: (i32, i32),
}

impl WorkAreaStack {
    /// Establish the initial work area from `spec` and snapshot it as the default.
    pub fn new(canvas_w: u32, canvas_h: u32, global_offset: (i32, i32), spec: &[i32]) -> Self {
        let mut out = Self {
            current: IntRect::default(),
            default: IntRect::default(),
            global_offset,
            canvas: (to_i32(canvas_w), to_i32(canvas_h)),
        };
        out.set_current(spec);
        out.default = out.current;
        out
    }

    /// Overwrite the current area from a 2..4 element `x,y[,w,h]` spec.
    ///
    /// Missing or non-positive width/height fall back to the full canvas extent; the global
    /// offset is applied to the origin.
    pub fn set_current(&mut self, spec: &[i32]) {
        let part = |i: usize| spec.get(i).copied().unwrap_or(0);
        let w = if part(2) > 0 { part(2) } else { self.canvas.0 };
        let h = if part(3) > 0 { part(3) } else { self.canvas.1 };
        self.current = IntRect::new(part(0), part(1), w, h)
            .translate(self.global_offset.0, self.global_offset.1);
    }

    /// Restore the value captured when the stack was created.
    pub fn reset_to_default(&mut self) {
        self.current = self.default;
    }

    /// Record a new canvas size and reset the current area to cover all of it.
    ///
    /// Used after operations that replace the canvas (scale, crop) or filter it wholesale.
    pub fn reset_to_canvas(&mut self, canvas_w: u32, canvas_h: u32) {
        self.canvas = (to_i32(canvas_w), to_i32(canvas_h));
        self.set_current(&[]);
    }

    pub fn current(&self) -> IntRect {
        self.current
    }
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/workarea.rs"]
mod tests;
