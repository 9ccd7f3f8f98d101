use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::effects::composite::over;
use crate::foundation::core::{Bitmap, Rgba8Premul};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::render::backend::{
    GlyphStyle, Quad, RasterBackend, TextPaint, glyph_transform, text_quad,
};

/// Alpha at or above which a glyph pixel is kept when antialiasing is off.
const ALIAS_THRESHOLD: u8 = 128;

/// Brush carried through Parley layouts; the paint is chosen at draw time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct NoBrush;

struct LoadedFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Raster backend shaping with Parley and rasterizing with `vello_cpu`.
///
/// Fonts are loaded once per path and kept for the lifetime of the backend. Every draw call
/// renders into a fresh layer that is then composited over the destination.
pub struct CpuRaster {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<NoBrush>,
    fonts: HashMap<PathBuf, LoadedFont>,
}

impl Default for CpuRaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CpuRaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRaster")
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

/// One shaped string: the layout plus the font its glyph ids refer to.
struct Shaped {
    layout: parley::Layout<NoBrush>,
    font: vello_cpu::peniko::FontData,
}

impl Shaped {
    fn first_line(&self) -> Option<parley::layout::LineMetrics> {
        self.layout.lines().next().map(|l| *l.metrics())
    }

    fn advance(&self) -> f64 {
        self.layout
            .lines()
            .map(|l| f64::from(l.metrics().advance))
            .fold(0.0, f64::max)
    }
}

impl CpuRaster {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    fn font(&mut self, path: &Path) -> ForgeResult<&LoadedFont> {
        if !self.fonts.contains_key(path) {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read font '{}'", path.display()))
                .map_err(|e| ForgeError::resource(format!("{e:#}")))?;

            let families = self
                .font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
            let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                ForgeError::resource(format!("no font family in '{}'", path.display()))
            })?;
            let family = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| {
                    ForgeError::resource(format!("font family in '{}' has no name", path.display()))
                })?
                .to_string();

            let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
            tracing::debug!(font = %path.display(), %family, "font loaded");
            self.fonts
                .insert(path.to_path_buf(), LoadedFont { family, data });
        }
        self.fonts
            .get(path)
            .ok_or_else(|| ForgeError::resource(format!("font '{}' not cached", path.display())))
    }

    fn shape(&mut self, style: &GlyphStyle, text: &str) -> ForgeResult<Shaped> {
        if !style.size.is_finite() || style.size <= 0.0 {
            return Err(ForgeError::validation("font size must be finite and > 0"));
        }
        let (family, font) = {
            let f = self.font(&style.font)?;
            (f.family.clone(), f.data.clone())
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size));
        let mut layout: parley::Layout<NoBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(Shaped { layout, font })
    }
}

fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn canvas_dims(dst: &Bitmap) -> ForgeResult<(u16, u16)> {
    let w: u16 = dst
        .width()
        .try_into()
        .map_err(|_| ForgeError::validation("bitmap width exceeds u16"))?;
    let h: u16 = dst
        .height()
        .try_into()
        .map_err(|_| ForgeError::validation("bitmap height exceeds u16"))?;
    Ok((w, h))
}

fn paint_color(px: Rgba8Premul) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = crate::foundation::math::unpremultiply(px.to_array());
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

/// Render `draw` into a fresh layer the size of `dst` and composite it over `dst`.
///
/// With `antialias` off, layer pixels are snapped to fully on or fully off.
fn composite_layer(
    dst: &mut Bitmap,
    solid: Rgba8Premul,
    antialias: bool,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> ForgeResult<()> {
    let (w, h) = canvas_dims(dst)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint(paint_color(solid));
    draw(&mut ctx);
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let solid = solid.to_array();
    for (d, s) in dst
        .data_mut()
        .chunks_exact_mut(4)
        .zip(pixmap.data_as_u8_slice().chunks_exact(4))
    {
        if s[3] == 0 {
            continue;
        }
        let src = if antialias {
            [s[0], s[1], s[2], s[3]]
        } else if s[3] >= ALIAS_THRESHOLD {
            solid
        } else {
            continue;
        };
        let out = over([d[0], d[1], d[2], d[3]], src, 1.0);
        d.copy_from_slice(&out);
    }
    Ok(())
}

impl RasterBackend for CpuRaster {
    fn draw_filled_ellipse(
        &mut self,
        dst: &mut Bitmap,
        center: (i32, i32),
        size: (i32, i32),
        color: Rgba8Premul,
    ) {
        use vello_cpu::kurbo::Shape;

        if size.0 <= 0 || size.1 <= 0 {
            return;
        }
        let ellipse = vello_cpu::kurbo::Ellipse::new(
            (f64::from(center.0), f64::from(center.1)),
            (f64::from(size.0) / 2.0, f64::from(size.1) / 2.0),
            0.0,
        );
        let path = ellipse.to_path(0.1);
        if let Err(err) = composite_layer(dst, color, true, |ctx| ctx.fill_path(&path)) {
            tracing::warn!(error = %err, "ellipse not drawn");
        }
    }

    fn measure_text(&mut self, style: &GlyphStyle, text: &str) -> ForgeResult<Quad> {
        let shaped = self.shape(style, text)?;
        let Some(first) = shaped.first_line() else {
            return Ok([0; 8]);
        };
        let ascent = f64::from(first.ascent);
        let descent = f64::from(shaped.layout.height()) - f64::from(first.baseline);
        Ok(text_quad(
            shaped.advance(),
            ascent,
            descent.max(f64::from(first.descent)),
            style.angle,
        ))
    }

    fn draw_text(
        &mut self,
        dst: &mut Bitmap,
        style: &GlyphStyle,
        origin: (i32, i32),
        paint: TextPaint,
        text: &str,
    ) -> ForgeResult<()> {
        let shaped = self.shape(style, text)?;
        let Some(first) = shaped.first_line() else {
            return Ok(());
        };

        let transform = affine_to_cpu(glyph_transform(
            origin,
            style.angle,
            f64::from(first.baseline),
        ));

        composite_layer(dst, paint.color.to_premul(), paint.antialias, |ctx| {
            ctx.set_transform(transform);
            for line in shaped.layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&shaped.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        })
    }
}
