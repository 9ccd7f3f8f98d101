use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::Bitmap;
use crate::foundation::error::ForgeResult;

/// One raster filter step, spelled the way ImageMagick's `convert` takes it.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterOp {
    Blur { radius: f32, sigma: f32 },
    Sharpen { radius: f32, sigma: f32 },
    Negate,
    /// Exact resize (`WxH!`), aspect ratio ignored.
    Resize { width: u32, height: u32 },
    Gamma(f32),
    Rotate(i32),
    /// Threshold in percent.
    Solarize(i32),
    Swirl(i32),
    Wave { amplitude: i32, length: i32 },
    Charcoal(i32),
    Gray,
    Edge(i32),
    Emboss,
    Flip,
    Flop,
    Colors(i32),
    Shear(i32),
    /// Pass-through arguments only an external processor understands.
    Raw(Vec<String>),
}

impl FilterOp {
    pub fn magick_args(&self) -> Vec<String> {
        match self {
            Self::Blur { radius, sigma } => vec!["-blur".into(), format!("{radius}x{sigma}")],
            Self::Sharpen { radius, sigma } => {
                vec!["-sharpen".into(), format!("{radius}x{sigma}")]
            }
            Self::Negate => vec!["-negate".into()],
            Self::Resize { width, height } => vec!["-geometry".into(), format!("{width}x{height}!")],
            Self::Gamma(g) => vec!["-gamma".into(), g.to_string()],
            Self::Rotate(d) => vec!["-rotate".into(), d.to_string()],
            Self::Solarize(p) => vec!["-solarize".into(), p.to_string()],
            Self::Swirl(d) => vec!["-swirl".into(), d.to_string()],
            Self::Wave { amplitude, length } => {
                vec!["-wave".into(), format!("{amplitude}x{length}")]
            }
            Self::Charcoal(f) => vec!["-charcoal".into(), f.to_string()],
            Self::Gray => vec!["-colorspace".into(), "GRAY".into()],
            Self::Edge(r) => vec!["-edge".into(), r.to_string()],
            Self::Emboss => vec!["-emboss".into()],
            Self::Flip => vec!["-flip".into()],
            Self::Flop => vec!["-flop".into()],
            Self::Colors(n) => vec!["-colors".into(), n.to_string()],
            Self::Shear(d) => vec!["-shear".into(), d.to_string()],
            Self::Raw(args) => args.clone(),
        }
    }
}

/// `radius x sigma` pairs selected by a 1..=100 strength in steps of ten.
const STRENGTH_STEPS: [(f32, f32); 10] = [
    (1.0, 2.0),
    (2.0, 4.0),
    (3.0, 6.0),
    (4.0, 8.0),
    (5.0, 10.0),
    (6.0, 12.0),
    (7.0, 14.0),
    (8.0, 16.0),
    (9.0, 18.0),
    (10.0, 20.0),
];

fn strength_step(strength: i64) -> Option<(f32, f32)> {
    let idx = ((strength as f64) / 10.0).ceil().clamp(0.0, 10.0) as usize;
    idx.checked_sub(1).map(|i| STRENGTH_STEPS[i])
}

/// Blur for a 1..=100 strength; 0 and below yield no operation.
pub fn blur_for_strength(strength: i64) -> Option<FilterOp> {
    strength_step(strength).map(|(radius, sigma)| FilterOp::Blur { radius, sigma })
}

/// Sharpen for a 1..=100 strength; 0 and below yield no operation.
pub fn sharpen_for_strength(strength: i64) -> Option<FilterOp> {
    strength_step(strength).map(|(radius, sigma)| FilterOp::Sharpen { radius, sigma })
}

/// Ordered list of filter operations handed to a [`FilterBackend`] in one round trip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterChain {
    ops: Vec<FilterOp>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: FilterOp) {
        self.ops.push(op);
    }

    pub fn extend(&mut self, other: FilterChain) {
        self.ops.extend(other.ops);
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn magick_args(&self) -> Vec<String> {
        self.ops.iter().flat_map(FilterOp::magick_args).collect()
    }

    /// Parse a free-form command-line fragment such as `"-sharpen 2x4 -negate"`.
    ///
    /// Options this crate models become typed ops; anything else is kept as [`FilterOp::Raw`].
    pub fn parse_magick(args: &str) -> Self {
        let tokens: Vec<&str> = args.split_whitespace().collect();
        let mut out = Self::new();
        let mut i = 0usize;
        while i < tokens.len() {
            let opt = tokens[i];
            let arg = tokens.get(i + 1).copied();
            let (op, used) = match (opt, arg) {
                ("-negate", _) => (FilterOp::Negate, 1),
                ("-flip", _) => (FilterOp::Flip, 1),
                ("-flop", _) => (FilterOp::Flop, 1),
                ("-emboss", _) => (FilterOp::Emboss, 1),
                ("-blur", Some(a)) => {
                    let (radius, sigma) = parse_geometry_pair(a);
                    (FilterOp::Blur { radius, sigma }, 2)
                }
                ("-sharpen", Some(a)) => {
                    let (radius, sigma) = parse_geometry_pair(a);
                    (FilterOp::Sharpen { radius, sigma }, 2)
                }
                ("-gamma", Some(a)) => (FilterOp::Gamma(a.parse().unwrap_or(1.0)), 2),
                ("-rotate", Some(a)) => (FilterOp::Rotate(a.parse().unwrap_or(0)), 2),
                ("-solarize", Some(a)) => (FilterOp::Solarize(a.parse().unwrap_or(0)), 2),
                ("-colorspace", Some(a)) if a.eq_ignore_ascii_case("gray") => (FilterOp::Gray, 2),
                _ => {
                    // Unknown option: keep it together with any non-option arguments.
                    let mut raw = vec![opt.to_string()];
                    let mut j = i + 1;
                    while j < tokens.len() && !tokens[j].starts_with('-') {
                        raw.push(tokens[j].to_string());
                        j += 1;
                    }
                    (FilterOp::Raw(raw), j - i)
                }
            };
            out.push(op);
            i += used;
        }
        out
    }
}

impl FromIterator<FilterOp> for FilterChain {
    fn from_iter<T: IntoIterator<Item = FilterOp>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

fn parse_geometry_pair(s: &str) -> (f32, f32) {
    let (a, b) = s.split_once('x').unwrap_or((s, "0"));
    (a.parse().unwrap_or(0.0), b.parse().unwrap_or(0.0))
}

/// Raster filter and combine capability.
///
/// Every call is a potential failure point (missing binary, I/O error). Callers treat an `Err`
/// as "no effect applied" and keep their input unchanged.
pub trait FilterBackend: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Run `chain` over `src` and return the result.
    fn apply_chain(&self, src: &Bitmap, chain: &FilterChain) -> ForgeResult<Bitmap>;

    /// Blend `fg` over `base` weighted by `mask` luminance (white = foreground).
    fn combine(&self, base: &Bitmap, fg: &Bitmap, mask: &Bitmap) -> ForgeResult<Bitmap>;
}

/// Supplies unique temporary file paths so concurrent renders never collide.
pub trait TempNamer: Send + Sync {
    fn next_path(&self, extension: &str) -> PathBuf;
}

/// Names files `<prefix>_<n>.<ext>` inside one directory.
#[derive(Debug)]
pub struct TempDirNamer {
    dir: PathBuf,
    prefix: String,
    counter: AtomicU64,
}

static NAMER_SEQ: AtomicU64 = AtomicU64::new(0);

impl TempDirNamer {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// A namer whose prefix is unique within this process (pid plus a sequence number).
    pub fn unique(dir: impl Into<PathBuf>) -> Self {
        let seq = NAMER_SEQ.fetch_add(1, Ordering::Relaxed);
        Self::new(dir, format!("lf{}_{seq}", std::process::id()))
    }
}

impl TempNamer for TempDirNamer {
    fn next_path(&self, extension: &str) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!("{}_{n}.{}", self.prefix, extension.trim_start_matches('.')))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/filter.rs"]
mod tests;
