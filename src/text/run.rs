use std::path::PathBuf;

use crate::assets::color::ColorSpec;
use crate::effects::outline::OutlineSpec;
use crate::effects::shadow::{EmbossSpec, ShadowSpec};
use crate::layout::position::TextAlign;
use crate::render::backend::Quad;

/// Styling of one segment produced by split rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct RunStyle {
    pub font: PathBuf,
    pub size: f32,
    /// `None` keeps the instruction's color.
    pub color: Option<ColorSpec>,
    pub x_space_before: i32,
    pub x_space_after: i32,
    pub y_space_before: i32,
    pub y_space_after: i32,
}

impl RunStyle {
    pub fn base(font: PathBuf, size: f32) -> Self {
        Self {
            font,
            size,
            color: None,
            x_space_before: 0,
            x_space_after: 0,
            y_space_before: 0,
            y_space_after: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub text: String,
    pub style: RunStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SplitKind {
    /// Isolate every occurrence of a literal substring.
    HighlightWord(String),
    /// Inclusive code point ranges; an upper bound of 0 means "no upper bound".
    CharRange(Vec<(u32, u32)>),
}

/// One `splitRendering` rule with the styling applied to matching text.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitRule {
    pub kind: SplitKind,
    pub font: Option<PathBuf>,
    pub size: Option<f32>,
    pub color: Option<ColorSpec>,
    pub x_space_before: i32,
    pub x_space_after: i32,
    pub y_space_before: i32,
    pub y_space_after: i32,
}

impl SplitRule {
    pub fn new(kind: SplitKind) -> Self {
        Self {
            kind,
            font: None,
            size: None,
            color: None,
            x_space_before: 0,
            x_space_after: 0,
            y_space_before: 0,
            y_space_after: 0,
        }
    }

    /// Style for text matched by this rule, inheriting font and size from `part`.
    pub(crate) fn style_over(&self, part: &RunStyle) -> RunStyle {
        RunStyle {
            font: self.font.clone().unwrap_or_else(|| part.font.clone()),
            size: self.size.unwrap_or(part.size),
            color: self.color,
            x_space_before: self.x_space_before,
            x_space_after: self.x_space_after,
            y_space_before: self.y_space_before,
            y_space_after: self.y_space_after,
        }
    }
}

/// Split-rendering configuration: ordered rules plus inter-segment compensation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitRendering {
    pub comp_x: i32,
    pub comp_y: i32,
    pub rules: Vec<SplitRule>,
}

/// Upscaled-mask antialiasing settings.
#[derive(Clone, Debug, PartialEq)]
pub struct NiceText {
    /// Integer upscale factor, 2..=5.
    pub scale_factor: u32,
    /// Extra filter arguments run before and after the downscale.
    pub before: String,
    pub after: String,
    /// 0..=100 sharpen strength applied last.
    pub sharpen: i64,
}

/// Measured extent of a text run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBox {
    pub w: i32,
    pub h: i32,
    pub line_height: i32,
    /// Raw glyph box of the unwrapped text.
    pub quad: Quad,
    /// Width of the same text laid out at angle 0.
    pub straight_w: i32,
}

/// A resolved TEXT instruction.
///
/// Built once by the construction step; derived effects clone it and swap the color or work
/// area instead of mutating shared state.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: PathBuf,
    /// Pixels.
    pub font_size: i32,
    pub color: ColorSpec,
    /// Degrees, counter-clockwise.
    pub angle: i32,
    pub offset: Vec<i32>,
    pub align: TextAlign,
    pub antialias: bool,
    pub iterations: u32,
    pub hide: bool,
    pub max_width: i32,
    pub spacing: i32,
    /// 0 means twice `spacing`.
    pub word_spacing: i32,
    pub break_width: i32,
    pub break_space: f64,
    pub line_height: Option<i32>,
    pub nice_text: Option<NiceText>,
    pub split: SplitRendering,
    pub shadow: Option<ShadowSpec>,
    pub emboss: Option<EmbossSpec>,
    pub outline: Option<OutlineSpec>,
    pub bbox: TextBox,
}

impl TextRun {
    /// A plain run with default styling; the usual starting point in tests and builders.
    pub fn new(text: impl Into<String>, font: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            font_size: 12,
            color: ColorSpec::BLACK,
            angle: 0,
            offset: Vec::new(),
            align: TextAlign::Left,
            antialias: true,
            iterations: 1,
            hide: false,
            max_width: 0,
            spacing: 0,
            word_spacing: 0,
            break_width: 0,
            break_space: 1.0,
            line_height: None,
            nice_text: None,
            split: SplitRendering::default(),
            shadow: None,
            emboss: None,
            outline: None,
            bbox: TextBox::default(),
        }
    }

    /// Letter and word spacing in pixels at scale `sf`.
    pub fn spacing_at(&self, sf: f32) -> (i32, i32) {
        let word = if self.word_spacing != 0 {
            self.word_spacing
        } else {
            self.spacing * 2
        };
        (scale(self.spacing, sf), scale(word, sf))
    }

    pub fn has_spacing(&self) -> bool {
        self.spacing_at(1.0) != (0, 0)
    }

    /// Base segment style at scale `sf`.
    pub(crate) fn base_style(&self, sf: f32) -> RunStyle {
        RunStyle::base(self.font.clone(), self.font_size as f32 * sf)
    }
}

pub(crate) fn scale(v: i32, sf: f32) -> i32 {
    (v as f32 * sf).round() as i32
}
