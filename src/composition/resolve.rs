//! Construction step: turn a raw setup into an immutable, fully resolved instruction list.
//!
//! Pass 1 walks the numbered entries in position order, normalizes and measures TEXT, loads
//! IMAGE sources and records their bounding boxes. Pass 2 resolves every expression property
//! against the finished bounding-box table, so an instruction may reference any other
//! position, earlier or later.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::assets::color::ColorSpec;
use crate::assets::decode::{OutputFormat, resize_premul};
use crate::assets::locator::ResourceLocator;
use crate::compose::blit::Placement;
use crate::composition::model::{
    CanvasPlan, CropSpec, GraphicSetup, ImageSpec, Instruction, InstructionKind, Positioned,
    ResolvedSetup, ScaleDim, ScaleSpec, ShapeSpec, WorkAreaSpec, parse_adjust, parse_effects,
    parse_emboss, parse_outline, parse_shadow,
};
use crate::composition::props::Props;
use crate::expression::offset::{component, resolve};
use crate::foundation::core::Bitmap;
use crate::foundation::error::ForgeResult;
use crate::foundation::math::{clamp_int, int_explode};
use crate::layout::bbox::{BoundingBox, BoundingBoxes, TextMetrics};
use crate::layout::position::{ObjAlign, TextAlign};
use crate::pipeline::opts::EngineOpts;
use crate::render::backend::RasterBackend;
use crate::text::normalize::{clean_text, prepare_run};
use crate::text::run::{NiceText, SplitKind, SplitRendering, SplitRule, TextRun};
use crate::text::split::parse_char_ranges;

/// Builds [`ResolvedSetup`]s for one engine configuration.
pub struct SetupResolver<'a> {
    opts: &'a EngineOpts,
    locator: &'a dyn ResourceLocator,
}

/// Pass-1 state of one numbered entry.
enum Prepared<'s> {
    Text(TextRun),
    Image(Bitmap, Option<Bitmap>),
    Plain(InstructionKind, Props<'s>),
}

struct Entry<'s> {
    pos: i64,
    props: Props<'s>,
    prepared: Prepared<'s>,
}

impl<'a> SetupResolver<'a> {
    pub fn new(opts: &'a EngineOpts, locator: &'a dyn ResourceLocator) -> Self {
        Self { opts, locator }
    }

    /// Resolve `setup`. Unreadable resources and unknown tags drop their instruction with a
    /// warning; only allocation failures are returned.
    #[tracing::instrument(skip_all)]
    pub fn resolve(
        &self,
        setup: &GraphicSetup,
        raster: &mut dyn RasterBackend,
    ) -> ForgeResult<ResolvedSetup> {
        let root = setup.props();
        let mut bboxes = BoundingBoxes::new();
        let limits = self.size_limits(&root);

        let mut entries = Vec::new();
        for (pos, value) in root.numbered() {
            let props = Props::new(value);
            let tag = props.str("type").unwrap_or_default();
            let Some(kind) = InstructionKind::parse(&tag) else {
                tracing::warn!(pos, tag = %tag, "unknown instruction type skipped");
                continue;
            };
            let prepared = match kind {
                InstructionKind::Text => {
                    let Some(run) = prepare_run(raster, self.text_run(&props)) else {
                        tracing::debug!(pos, "empty text dropped");
                        continue;
                    };
                    bboxes.record(
                        pos,
                        BoundingBox {
                            w: run.bbox.w,
                            h: run.bbox.h,
                            metrics: Some(TextMetrics {
                                line_height: run.bbox.line_height,
                                quad: run.bbox.quad,
                            }),
                        },
                    );
                    Prepared::Text(run)
                }
                InstructionKind::Image => {
                    let Some(image) = self.load_image(raster, &props, "file", limits)? else {
                        continue;
                    };
                    let mask = self.load_image(raster, &props, "mask", limits)?;
                    bboxes.record(
                        pos,
                        BoundingBox::new(image.width() as i32, image.height() as i32),
                    );
                    Prepared::Image(image, mask)
                }
                other => Prepared::Plain(other, props),
            };
            entries.push(Entry {
                pos,
                props,
                prepared,
            });
        }

        let mut texts = BTreeMap::new();
        for entry in &entries {
            if let Prepared::Text(run) = &entry.prepared {
                let mut run = run.clone();
                run.offset = resolve(&entry.props.string_or("offset", ""), &bboxes);
                texts.insert(entry.pos, run);
            }
        }

        let mut instructions = Vec::with_capacity(entries.len());
        for entry in entries {
            let Entry {
                pos,
                props,
                prepared,
            } = entry;
            let instruction = match prepared {
                Prepared::Text(_) => match texts.get(&pos) {
                    Some(run) => Instruction::Text(Box::new(run.clone())),
                    None => continue,
                },
                Prepared::Image(image, mask) => Instruction::Image(ImageSpec {
                    image,
                    mask,
                    placement: Placement {
                        align: align_of(&props),
                        offset: resolve(&props.string_or("offset", ""), &bboxes),
                        tile: pair(&props.string_or("tile", "1,1")),
                    },
                }),
                Prepared::Plain(kind, props) => {
                    match plain_instruction(kind, &props, &bboxes, &texts) {
                        Some(i) => i,
                        None => {
                            tracing::warn!(pos, "instruction references no TEXT; skipped");
                            continue;
                        }
                    }
                }
            };
            instructions.push(Positioned { pos, instruction });
        }

        Ok(ResolvedSetup {
            canvas: self.canvas_plan(&root, &bboxes),
            instructions,
            bboxes,
        })
    }

    fn canvas_plan(&self, root: &Props<'_>, bboxes: &BoundingBoxes) -> CanvasPlan {
        let xy = resolve(&root.string_or("XY", ""), bboxes);
        let (max_w, max_h) = self.size_limits(root);
        let width = clamp_int(component(&xy, 0).into(), 1, max_w.into()) as u32;
        let height = clamp_int(component(&xy, 1).into(), 1, max_h.into()) as u32;

        let format = root
            .str("format")
            .and_then(|f| OutputFormat::from_extension(&f))
            .unwrap_or(self.opts.default_format);
        let back = root.string_or("backColor", "white");
        let wants_transparent = back.trim().eq_ignore_ascii_case("transparent");
        let transparent_fill = wants_transparent && format == OutputFormat::Png;
        let back_color = if wants_transparent {
            ColorSpec::WHITE
        } else {
            ColorSpec::parse(&back)
        };

        let transparent_colors = root
            .str("transparentColor")
            .map(|list| {
                list.split('|')
                    .filter(|c| !c.trim().is_empty())
                    .map(ColorSpec::parse)
                    .collect()
            })
            .unwrap_or_default();
        let offset = resolve(&root.string_or("offset", ""), bboxes);

        CanvasPlan {
            width,
            height,
            back_color,
            transparent_fill,
            transparent_background: root.flag("transparentBackground"),
            transparent_colors,
            transparent_closest: root.child("transparentColor").flag("closest"),
            format,
            quality: clamp_int(root.int_or("quality", self.opts.jpeg_quality.into()), 10, 100)
                as u8,
            offset: (component(&offset, 0), component(&offset, 1)),
            work_area: resolve(&root.string_or("workArea", ""), bboxes),
            max_size: (max_w, max_h),
        }
    }

    /// `maxWidth`/`maxHeight` of the setup, else the engine limits.
    fn size_limits(&self, root: &Props<'_>) -> (u32, u32) {
        (
            positive_or(root.int("maxWidth"), self.opts.max_width),
            positive_or(root.int("maxHeight"), self.opts.max_height),
        )
    }

    fn font_path(&self, token: Option<String>) -> PathBuf {
        match token.filter(|t| !t.trim().is_empty()) {
            Some(token) => self.locator.locate(&token).unwrap_or_else(|| {
                tracing::warn!(font = %token, "font not found");
                PathBuf::from(token)
            }),
            None => self.opts.default_font.clone().unwrap_or_default(),
        }
    }

    fn text_run(&self, p: &Props<'_>) -> TextRun {
        let break_width = int32(p, "breakWidth");
        let max_len = match p.int("textMaxLength") {
            n if n > 0 => n as usize,
            _ => self.opts.text_max_length,
        };
        let raw = p.str("text").unwrap_or_default();
        let text = clean_text(&raw, !p.flag("doNotStripHTML"), max_len, break_width > 0);

        let mut run = TextRun::new(text, self.font_path(p.str("fontFile")));
        run.font_size = clamp_int(p.int_or("fontSize", 12), 1, 4096) as i32;
        run.color = ColorSpec::parse(&p.string_or("fontColor", "black"));
        run.angle = clamp_int(p.int("angle"), -360, 360) as i32;
        run.align = TextAlign::parse(&p.string_or("align", "left"));
        run.antialias = !p.has("antiAlias") || p.flag("antiAlias");
        run.iterations = clamp_int(p.int_or("iterations", 1), 1, 255) as u32;
        run.hide = p.flag("hide");
        run.max_width = int32(p, "maxWidth");
        run.spacing = int32(p, "spacing");
        run.word_spacing = int32(p, "wordSpacing");
        run.break_width = break_width;
        run.break_space = match p.float_or("breakSpace", 1.0) {
            b if b > 0.0 => b,
            _ => 1.0,
        };
        run.line_height = Some(int32(p, "lineHeight")).filter(|h| *h > 0);
        run.nice_text = p.flag("niceText").then(|| {
            let n = p.child("niceText");
            NiceText {
                scale_factor: clamp_int(n.int_or("scaleFactor", 2), 2, 5) as u32,
                before: n.str("before").unwrap_or_default(),
                after: n.str("after").unwrap_or_default(),
                sharpen: clamp_int(n.int("sharpen"), 0, 100),
            }
        });
        run.split = self.split_rendering(&p.child("splitRendering"));
        run.shadow = p.has_child("shadow").then(|| parse_shadow(&p.child("shadow")));
        run.emboss = p.has_child("emboss").then(|| parse_emboss(&p.child("emboss")));
        run.outline = p.has_child("outline").then(|| parse_outline(&p.child("outline")));
        run
    }

    /// Rules come as `"10": {"type": "charRange", "value": ...}` or as a tag string at `"10"`
    /// with the settings under `"10."`.
    fn split_rendering(&self, sp: &Props<'_>) -> SplitRendering {
        let mut rules = Vec::new();
        for (n, value) in sp.numbered() {
            let conf = sp.child(&n.to_string());
            let tag = value
                .as_str()
                .map(str::to_string)
                .or_else(|| conf.str("type"))
                .unwrap_or_default();
            let value = conf.str("value").unwrap_or_default();
            let kind = match tag.trim() {
                "highlightWord" if !value.is_empty() => SplitKind::HighlightWord(value),
                "charRange" if !value.trim().is_empty() => {
                    SplitKind::CharRange(parse_char_ranges(&value))
                }
                _ => continue,
            };
            let mut rule = SplitRule::new(kind);
            rule.font = conf.str("fontFile").map(|f| self.font_path(Some(f)));
            rule.size = Some(conf.int("fontSize"))
                .filter(|s| *s > 0)
                .map(|s| s as f32);
            rule.color = conf.str("color").map(|c| ColorSpec::parse(&c));
            rule.x_space_before = int32(&conf, "xSpaceBefore");
            rule.x_space_after = int32(&conf, "xSpaceAfter");
            rule.y_space_before = int32(&conf, "ySpaceBefore");
            rule.y_space_after = int32(&conf, "ySpaceAfter");
            rules.push(rule);
        }
        SplitRendering {
            comp_x: int32(sp, "compX"),
            comp_y: int32(sp, "compY"),
            rules,
        }
    }

    /// Load the image named by `key`; `Ok(None)` when it is unset or unreadable.
    ///
    /// A `width`/`height` rescale beyond `limits` is ignored.
    fn load_image(
        &self,
        raster: &mut dyn RasterBackend,
        p: &Props<'_>,
        key: &str,
        limits: (u32, u32),
    ) -> ForgeResult<Option<Bitmap>> {
        let Some(token) = p.str(key).filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };
        let Some(path) = self.locator.locate(&token) else {
            tracing::warn!(key, file = %token, "image not found");
            return Ok(None);
        };
        let image = match raster.load_image(&path) {
            Ok(image) => image,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                tracing::warn!(key, error = %err, "image not loaded");
                return Ok(None);
            }
        };

        let target = ScaleSpec {
            width: dim(p.int("width")),
            height: dim(p.int("height")),
        }
        .target(image.width(), image.height());
        match target {
            Some((w, h)) if w > limits.0 || h > limits.1 => {
                tracing::warn!(key, w, h, "image rescale exceeds the size limits; kept as loaded");
                Ok(Some(image))
            }
            Some((w, h)) if (w, h) != (image.width(), image.height()) => {
                resize_premul(&image, w, h).map(Some)
            }
            _ => Ok(Some(image)),
        }
    }
}

/// Pass-2 resolution of instructions that need no pass-1 work.
fn plain_instruction(
    kind: InstructionKind,
    p: &Props<'_>,
    bboxes: &BoundingBoxes,
    texts: &BTreeMap<i64, TextRun>,
) -> Option<Instruction> {
    let expr = |key: &str| resolve(&p.string_or(key, ""), bboxes);
    let text = || texts.get(&p.int("textObjNum")).cloned().map(Box::new);

    Some(match kind {
        InstructionKind::Box => {
            let mut color = ColorSpec::parse(&p.string_or("color", "black"));
            if p.has("opacity") {
                color = color.with_opacity(p.int("opacity"));
            }
            Instruction::Rect(ShapeSpec {
                dimensions: expr("dimensions"),
                color,
                align: align_of(p),
            })
        }
        InstructionKind::Ellipse => Instruction::Ellipse(ShapeSpec {
            dimensions: expr("dimensions"),
            color: ColorSpec::parse(&p.string_or("color", "black")),
            align: align_of(p),
        }),
        InstructionKind::Outline => Instruction::Outline(text()?, parse_outline(p)),
        InstructionKind::Emboss => Instruction::Emboss(text()?, parse_emboss(p)),
        InstructionKind::Shadow => Instruction::Shadow(text()?, parse_shadow(p)),
        InstructionKind::Effect => Instruction::Effect(parse_effects(&p.string_or("value", ""))),
        InstructionKind::Adjust => Instruction::Adjust(parse_adjust(&p.string_or("value", ""))),
        InstructionKind::Crop => Instruction::Crop(CropSpec {
            crop: expr("crop"),
            back_color: p
                .str("backColor")
                .filter(|c| !c.trim().is_empty())
                .map(|c| ColorSpec::parse(&c)),
            align: align_of(p),
        }),
        InstructionKind::Scale => Instruction::Scale(ScaleSpec {
            width: p.str("width").and_then(|w| ScaleDim::parse(&w, bboxes)),
            height: p.str("height").and_then(|h| ScaleDim::parse(&h, bboxes)),
        }),
        InstructionKind::WorkArea => Instruction::WorkArea(WorkAreaSpec {
            set: p.str("set").map(|s| resolve(&s, bboxes)),
            clear: p.has("clear"),
        }),
        InstructionKind::Text | InstructionKind::Image => return None,
    })
}

/// Resolve `setup` with a one-off [`SetupResolver`].
pub fn resolve_setup(
    setup: &GraphicSetup,
    opts: &EngineOpts,
    locator: &dyn ResourceLocator,
    raster: &mut dyn RasterBackend,
) -> ForgeResult<ResolvedSetup> {
    SetupResolver::new(opts, locator).resolve(setup, raster)
}

fn align_of(p: &Props<'_>) -> ObjAlign {
    ObjAlign::parse(&p.string_or("align", ""))
}

fn int32(p: &Props<'_>, key: &str) -> i32 {
    clamp_int(p.int(key), i32::MIN.into(), i32::MAX.into()) as i32
}

fn pair(value: &str) -> (i32, i32) {
    let v = int_explode(value);
    let at = |i: usize| clamp_int(v.get(i).copied().unwrap_or(0), 0, i32::MAX.into()) as i32;
    (at(0), at(1))
}

fn positive_or(v: i64, fallback: u32) -> u32 {
    if v > 0 {
        clamp_int(v, 1, u32::MAX.into()) as u32
    } else {
        fallback.max(1)
    }
}

fn dim(px: i64) -> Option<ScaleDim> {
    (px > 0).then(|| ScaleDim {
        px: clamp_int(px, 1, i32::MAX.into()) as i32,
        fit: false,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/composition/resolve.rs"]
mod tests;
