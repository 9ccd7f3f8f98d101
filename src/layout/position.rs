use crate::foundation::core::IntRect;

/// Horizontal text alignment inside the work area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Object alignment from an `"h,v"` spec such as `"c,b"` or `"right,center"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjAlign {
    pub h: HAlign,
    pub v: VAlign,
}

impl ObjAlign {
    /// Only the first letter of each part counts: `r`/`c` horizontally, `b`/`c` vertically.
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split(',');
        let first = |p: Option<&str>| {
            p.and_then(|p| p.trim().chars().next())
                .map(|c| c.to_ascii_lowercase())
        };
        let h = match first(parts.next()) {
            Some('r') => HAlign::Right,
            Some('c') => HAlign::Center,
            _ => HAlign::Left,
        };
        let v = match first(parts.next()) {
            Some('b') => VAlign::Bottom,
            Some('c') => VAlign::Center,
            _ => VAlign::Top,
        };
        Self { h, v }
    }
}

/// Add the first two components of `offset` to `pos`.
pub fn apply_offset(pos: (i32, i32), offset: &[i32]) -> (i32, i32) {
    let dx = offset.first().copied().unwrap_or(0);
    let dy = offset.get(1).copied().unwrap_or(0);
    (pos.0.saturating_add(dx), pos.1.saturating_add(dy))
}

/// Top-left placement of a `size` object inside `work_area`.
pub fn obj_position(
    align: ObjAlign,
    offset: &[i32],
    work_area: IntRect,
    size: (i32, i32),
) -> IntRect {
    let x = match align.h {
        HAlign::Right => work_area.w.saturating_sub(size.0),
        HAlign::Center => round_half(work_area.w.saturating_sub(size.0)),
        HAlign::Left => 0,
    };
    let y = match align.v {
        VAlign::Bottom => work_area.h.saturating_sub(size.1),
        VAlign::Center => round_half(work_area.h.saturating_sub(size.1)),
        VAlign::Top => 0,
    };
    let p = apply_offset((x, y), offset);
    let p = apply_offset(p, &[work_area.x, work_area.y]);
    IntRect::new(p.0, p.1, size.0, size.1)
}

/// Pen origin of a text object (x of the first glyph, y of the first baseline).
///
/// For rotated text the right/center anchor blends the rotated bounding width `bbox.0` with the
/// unrotated width `straight_w`, weighted by the angle.
pub fn txt_position(
    align: TextAlign,
    angle_deg: i32,
    bbox: (i32, i32),
    straight_w: i32,
    offset: &[i32],
    work_area: IntRect,
) -> (i32, i32) {
    let angle = f64::from(angle_deg).to_radians();
    let (mut x, mut y) = (0i32, 0i32);

    if align != TextAlign::Left {
        let w = f64::from(work_area.w);

        let factor = angle.cos().abs();
        let sign = if angle.cos() < 0.0 { -1.0 } else { 1.0 };
        let len1 = sign * factor * f64::from(straight_w);
        let len2 = sign * f64::from(bbox.0);
        x = (w - (len2 * factor + (1.0 - factor) * len1).ceil()) as i32;

        let factor = angle.sin().abs();
        let sign = if angle.sin() < 0.0 { -1.0 } else { 1.0 };
        let len1 = sign * factor * f64::from(straight_w);
        let len2 = sign * f64::from(bbox.1);
        y = (len2 * factor + (1.0 - factor) * len1).ceil() as i32;

        if align == TextAlign::Center {
            x = (f64::from(x) / 2.0).round() as i32;
            y = (f64::from(y) / 2.0).round() as i32;
        }
    }

    let p = apply_offset((x, y), offset);
    apply_offset(p, &[work_area.x, work_area.y])
}

fn round_half(v: i32) -> i32 {
    (f64::from(v) / 2.0).round() as i32
}

#[cfg(test)]
#[path = "../../tests/unit/layout/position.rs"]
mod tests;
