use crate::assets::color::ColorSpec;
use crate::assets::decode::OutputFormat;
use crate::compose::blit::Placement;
use crate::composition::props::Props;
use crate::effects::levels::LevelsOp;
use crate::effects::outline::OutlineSpec;
use crate::effects::shadow::{EmbossSpec, ShadowSpec};
use crate::foundation::core::Bitmap;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::foundation::math::{clamp_int, int_explode, lenient_float, lenient_int};
use crate::layout::bbox::BoundingBoxes;
use crate::layout::position::ObjAlign;
use crate::render::filter::{FilterChain, FilterOp, blur_for_strength, sharpen_for_strength};
use crate::text::run::TextRun;

/// A raw configuration tree: numeric keys are instructions, the rest are canvas settings.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicSetup {
    root: serde_json::Value,
}

impl GraphicSetup {
    pub fn from_value(root: serde_json::Value) -> ForgeResult<Self> {
        if !root.is_object() {
            return Err(ForgeError::validation("graphic setup must be a JSON object"));
        }
        Ok(Self { root })
    }

    pub fn from_json_str(s: &str) -> ForgeResult<Self> {
        let root: serde_json::Value =
            serde_json::from_str(s).map_err(|e| ForgeError::serde(e.to_string()))?;
        Self::from_value(root)
    }

    pub fn props(&self) -> Props<'_> {
        Props::new(&self.root)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.root
    }
}

/// Instruction tags accepted in the `type` property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    Text,
    Image,
    Box,
    Ellipse,
    Outline,
    Emboss,
    Shadow,
    Effect,
    Adjust,
    Crop,
    Scale,
    WorkArea,
}

impl InstructionKind {
    pub fn parse(tag: &str) -> Option<Self> {
        Some(match tag.trim() {
            "TEXT" => Self::Text,
            "IMAGE" => Self::Image,
            "BOX" => Self::Box,
            "ELLIPSE" => Self::Ellipse,
            "OUTLINE" => Self::Outline,
            "EMBOSS" => Self::Emboss,
            "SHADOW" => Self::Shadow,
            "EFFECT" => Self::Effect,
            "ADJUST" => Self::Adjust,
            "CROP" => Self::Crop,
            "SCALE" => Self::Scale,
            "WORKAREA" => Self::WorkArea,
            _ => return None,
        })
    }
}

/// IMAGE: the loaded source, an optional mask, and their placement.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageSpec {
    pub image: Bitmap,
    pub mask: Option<Bitmap>,
    pub placement: Placement,
}

/// BOX and ELLIPSE: `x,y,w,h` dimensions (x,y is the center for ellipses).
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSpec {
    pub dimensions: Vec<i32>,
    pub color: ColorSpec,
    pub align: ObjAlign,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CropSpec {
    /// `x,y,w,h` relative to the aligned crop position.
    pub crop: Vec<i32>,
    /// `None` uses the canvas background color.
    pub back_color: Option<ColorSpec>,
    pub align: ObjAlign,
}

/// One SCALE side; `fit` (suffix `m`) treats the value as a maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleDim {
    pub px: i32,
    pub fit: bool,
}

impl ScaleDim {
    /// Parse `"120"`, `"120m"` or an expression; non-positive sizes read as unset.
    pub fn parse(value: &str, boxes: &BoundingBoxes) -> Option<Self> {
        let value = value.trim();
        let (expr, fit) = match value.strip_suffix(['m', 'M']) {
            Some(rest) => (rest, true),
            None => (value, false),
        };
        let px = crate::expression::offset::component(
            &crate::expression::offset::resolve(expr, boxes),
            0,
        );
        (px > 0).then_some(Self { px, fit })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScaleSpec {
    pub width: Option<ScaleDim>,
    pub height: Option<ScaleDim>,
}

impl ScaleSpec {
    /// Target size for a `w`×`h` canvas, or `None` when nothing is requested.
    ///
    /// A single side keeps the aspect ratio; `fit` sides shrink or grow the canvas uniformly
    /// until it fits inside every given maximum.
    pub fn target(&self, w: u32, h: u32) -> Option<(u32, u32)> {
        let (fw, fh) = (f64::from(w.max(1)), f64::from(h.max(1)));
        let scaled = |v: f64| (v.round() as u32).max(1);
        let fit = self.width.is_some_and(|d| d.fit) || self.height.is_some_and(|d| d.fit);

        match (self.width, self.height) {
            (None, None) => None,
            _ if fit => {
                let ratio = [
                    self.width.map(|d| f64::from(d.px) / fw),
                    self.height.map(|d| f64::from(d.px) / fh),
                ]
                .into_iter()
                .flatten()
                .fold(f64::INFINITY, f64::min);
                Some((scaled(fw * ratio), scaled(fh * ratio)))
            }
            (Some(wd), None) => Some((wd.px as u32, scaled(fh * f64::from(wd.px) / fw))),
            (None, Some(hd)) => Some((scaled(fw * f64::from(hd.px) / fh), hd.px as u32)),
            (Some(wd), Some(hd)) => Some((wd.px as u32, hd.px as u32)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkAreaSpec {
    pub set: Option<Vec<i32>>,
    /// Restore the default area (applied after `set`).
    pub clear: bool,
}

/// A fully resolved drawing or control step.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Text(Box<TextRun>),
    Image(ImageSpec),
    Rect(ShapeSpec),
    Ellipse(ShapeSpec),
    Outline(Box<TextRun>, OutlineSpec),
    Emboss(Box<TextRun>, EmbossSpec),
    Shadow(Box<TextRun>, ShadowSpec),
    Effect(FilterChain),
    Adjust(Vec<LevelsOp>),
    Crop(CropSpec),
    Scale(ScaleSpec),
    WorkArea(WorkAreaSpec),
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "TEXT",
            Self::Image(_) => "IMAGE",
            Self::Rect(_) => "BOX",
            Self::Ellipse(_) => "ELLIPSE",
            Self::Outline(..) => "OUTLINE",
            Self::Emboss(..) => "EMBOSS",
            Self::Shadow(..) => "SHADOW",
            Self::Effect(_) => "EFFECT",
            Self::Adjust(_) => "ADJUST",
            Self::Crop(_) => "CROP",
            Self::Scale(_) => "SCALE",
            Self::WorkArea(_) => "WORKAREA",
        }
    }
}

/// An instruction with its position key.
#[derive(Clone, Debug, PartialEq)]
pub struct Positioned {
    pub pos: i64,
    pub instruction: Instruction,
}

/// Canvas settings after expression resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasPlan {
    pub width: u32,
    pub height: u32,
    pub back_color: ColorSpec,
    /// `backColor = transparent` on a format that keeps alpha.
    pub transparent_fill: bool,
    /// Key out the background color when finalizing.
    pub transparent_background: bool,
    pub transparent_colors: Vec<ColorSpec>,
    pub transparent_closest: bool,
    pub format: OutputFormat,
    pub quality: u8,
    pub offset: (i32, i32),
    pub work_area: Vec<i32>,
    /// Largest canvas a SCALE may produce.
    pub max_size: (u32, u32),
}

/// Output of the construction step: everything a render needs, nothing left to resolve.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSetup {
    pub canvas: CanvasPlan,
    pub instructions: Vec<Positioned>,
    pub bboxes: BoundingBoxes,
}

fn pair(value: &str) -> (i32, i32) {
    let v = int_explode(value);
    let at = |i: usize| {
        let n = v.get(i).copied().unwrap_or(0);
        clamp_int(n, i32::MIN.into(), i32::MAX.into()) as i32
    };
    (at(0), at(1))
}

fn range(value: &str, min: i64, max: i64) -> i32 {
    clamp_int(lenient_int(value), min, max) as i32
}

/// Parse an EFFECT value: `|`-separated `name=value` pairs, unknown names ignored.
pub fn parse_effects(value: &str) -> FilterChain {
    let mut chain = FilterChain::new();
    for part in value.split('|') {
        let (name, arg) = part.split_once('=').unwrap_or((part, ""));
        let arg = arg.trim();
        let op = match name.trim().to_ascii_lowercase().as_str() {
            "gamma" => Some(FilterOp::Gamma(lenient_float(arg) as f32)),
            "blur" => blur_for_strength(lenient_int(arg)),
            "sharpen" => sharpen_for_strength(lenient_int(arg)),
            "rotate" => Some(FilterOp::Rotate(range(arg, 0, 360))),
            "solarize" => Some(FilterOp::Solarize(range(arg, 0, 99))),
            "swirl" => Some(FilterOp::Swirl(range(arg, 0, 1000))),
            "wave" => {
                let (a, b) = pair(arg);
                Some(FilterOp::Wave {
                    amplitude: a.clamp(0, 99),
                    length: b.clamp(0, 99),
                })
            }
            "charcoal" => Some(FilterOp::Charcoal(range(arg, 0, 100))),
            "gray" => Some(FilterOp::Gray),
            "edge" => Some(FilterOp::Edge(range(arg, 0, 99))),
            "emboss" => Some(FilterOp::Emboss),
            "flip" => Some(FilterOp::Flip),
            "flop" => Some(FilterOp::Flop),
            "colors" => Some(FilterOp::Colors(range(arg, 2, 255))),
            "shear" => Some(FilterOp::Shear(range(arg, -90, 90))),
            "invert" => Some(FilterOp::Negate),
            _ => None,
        };
        if let Some(op) = op {
            chain.push(op);
        }
    }
    chain
}

/// Parse an ADJUST value: `inputLevels=lo,hi`, `outputLevels=lo,hi`, `autoLevels`.
pub fn parse_adjust(value: &str) -> Vec<LevelsOp> {
    value
        .split('|')
        .filter_map(|part| {
            let (name, arg) = part.split_once('=').unwrap_or((part, ""));
            let (low, high) = pair(arg);
            match name.trim().to_ascii_lowercase().as_str() {
                "inputlevels" => Some(LevelsOp::Input { low, high }),
                "outputlevels" => Some(LevelsOp::Output { low, high }),
                "autolevels" => Some(LevelsOp::Auto),
                _ => None,
            }
        })
        .collect()
}

fn color_or_black(p: &Props<'_>, key: &str) -> ColorSpec {
    ColorSpec::parse(&p.string_or(key, "black"))
}

pub fn parse_outline(p: &Props<'_>) -> OutlineSpec {
    OutlineSpec {
        thickness: p.int("thickness") as i32,
        color: color_or_black(p, "color"),
    }
}

pub fn parse_shadow(p: &Props<'_>) -> ShadowSpec {
    ShadowSpec {
        offset: pair(&p.string_or("offset", "")),
        blur: p.int("blur") as i32,
        intensity: p.int("intensity") as i32,
        opacity: p.int("opacity") as i32,
        color: color_or_black(p, "color"),
    }
}

pub fn parse_emboss(p: &Props<'_>) -> EmbossSpec {
    EmbossSpec {
        offset: pair(&p.string_or("offset", "")),
        high_color: color_or_black(p, "highColor"),
        low_color: color_or_black(p, "lowColor"),
        blur: p.int("blur") as i32,
        intensity: p.int("intensity") as i32,
        opacity: p.int("opacity") as i32,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
