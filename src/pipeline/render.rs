use crate::assets::color::unify_colors;
use crate::assets::locator::ResourceLocator;
use crate::compose::blit::copy_gif_onto_gif;
use crate::compose::mask::mask_image_onto_image;
use crate::composition::model::{
    CanvasPlan, CropSpec, GraphicSetup, ImageSpec, Instruction, ResolvedSetup, ScaleSpec,
    ShapeSpec,
};
use crate::composition::resolve::resolve_setup;
use crate::effects::outline::make_outline;
use crate::effects::shadow::{make_emboss, make_shadow};
use crate::expression::offset::component;
use crate::foundation::core::{Canvas, IntRect, Rgba8Premul};
use crate::foundation::error::ForgeResult;
use crate::layout::position::obj_position;
use crate::layout::workarea::WorkAreaStack;
use crate::pipeline::opts::EngineOpts;
use crate::render::Backends;
use crate::render::backend::RasterBackend;
use crate::render::filter::{FilterBackend, FilterChain, FilterOp};
use crate::text::render::make_text;
use crate::text::run::TextRun;

/// Draws a [`ResolvedSetup`] onto a fresh canvas: Init, Dispatch for every instruction in
/// position order, then Finalize.
///
/// Non-fatal failures are logged and skipped; only allocation errors end a render.
pub struct Renderer<'a> {
    raster: &'a mut dyn RasterBackend,
    filters: Option<&'a dyn FilterBackend>,
}

impl<'a> Renderer<'a> {
    pub fn new(raster: &'a mut dyn RasterBackend, filters: Option<&'a dyn FilterBackend>) -> Self {
        Self { raster, filters }
    }

    #[tracing::instrument(skip_all, fields(instructions = setup.instructions.len()))]
    pub fn render(&mut self, setup: &ResolvedSetup) -> ForgeResult<Canvas> {
        let plan = &setup.canvas;
        let mut canvas = self.init(plan)?;
        let mut work_area = WorkAreaStack::new(
            canvas.width(),
            canvas.height(),
            plan.offset,
            &plan.work_area,
        );

        for step in &setup.instructions {
            tracing::debug!(pos = step.pos, kind = step.instruction.name(), "dispatch");
            self.dispatch(&step.instruction, plan, &mut canvas, &mut work_area)?;
        }

        self.finalize(plan, &mut canvas);
        Ok(canvas)
    }

    fn backends(&mut self) -> Backends<'_> {
        Backends {
            raster: &mut *self.raster,
            filters: self.filters,
        }
    }

    fn init(&mut self, plan: &CanvasPlan) -> ForgeResult<Canvas> {
        let mut bitmap = self.raster.allocate(plan.width, plan.height)?;
        let fill = if plan.transparent_fill {
            Rgba8Premul::transparent()
        } else {
            plan.back_color.to_premul()
        };
        let area = bitmap.bounds();
        self.raster.fill(&mut bitmap, area, fill);
        Ok(Canvas::new(bitmap, plan.transparent_fill))
    }

    fn dispatch(
        &mut self,
        instruction: &Instruction,
        plan: &CanvasPlan,
        canvas: &mut Canvas,
        work_area: &mut WorkAreaStack,
    ) -> ForgeResult<()> {
        let wa = work_area.current();
        match instruction {
            Instruction::Text(run) => self.draw_text(canvas, run, wa)?,
            Instruction::Image(spec) => self.draw_image(canvas, spec, wa)?,
            Instruction::Rect(shape) => {
                let (rect, color) = shape_rect(shape, wa);
                self.raster.draw_filled_rect(&mut canvas.bitmap, rect, color);
            }
            Instruction::Ellipse(shape) => {
                let (rect, color) = shape_rect(shape, wa);
                self.raster.draw_filled_ellipse(
                    &mut canvas.bitmap,
                    (rect.x, rect.y),
                    (rect.w, rect.h),
                    color,
                );
            }
            Instruction::Outline(run, spec) => {
                make_outline(&mut self.backends(), &mut canvas.bitmap, run, wa, *spec)?;
            }
            Instruction::Emboss(run, spec) => {
                make_emboss(&mut self.backends(), &mut canvas.bitmap, run, wa, *spec)?;
            }
            Instruction::Shadow(run, spec) => {
                make_shadow(&mut self.backends(), &mut canvas.bitmap, run, wa, *spec)?;
            }
            Instruction::Effect(chain) => {
                self.filter_canvas(canvas, chain, "EFFECT");
                work_area.reset_to_canvas(canvas.width(), canvas.height());
            }
            Instruction::Adjust(ops) => {
                for op in ops {
                    self.raster.levels_adjust(&mut canvas.bitmap, *op);
                }
                work_area.reset_to_canvas(canvas.width(), canvas.height());
            }
            Instruction::Crop(spec) => {
                work_area.reset_to_canvas(canvas.width(), canvas.height());
                crop(canvas, spec, plan, work_area.current())?;
                work_area.reset_to_canvas(canvas.width(), canvas.height());
            }
            Instruction::Scale(spec) => {
                self.scale(canvas, spec, plan.max_size);
                work_area.reset_to_canvas(canvas.width(), canvas.height());
            }
            Instruction::WorkArea(spec) => {
                if let Some(set) = &spec.set {
                    work_area.set_current(set);
                }
                if spec.clear {
                    work_area.reset_to_default();
                }
            }
        }
        Ok(())
    }

    /// Nested effects first (shadow, emboss, outline), then the glyphs.
    fn draw_text(&mut self, canvas: &mut Canvas, run: &TextRun, wa: IntRect) -> ForgeResult<()> {
        let mut backends = self.backends();
        let dst = &mut canvas.bitmap;
        if let Some(shadow) = run.shadow {
            make_shadow(&mut backends, dst, run, wa, shadow)?;
        }
        if let Some(emboss) = run.emboss {
            make_emboss(&mut backends, dst, run, wa, emboss)?;
        }
        if let Some(outline) = run.outline {
            make_outline(&mut backends, dst, run, wa, outline)?;
        }
        make_text(&mut backends, dst, run, wa, run.color)
    }

    fn draw_image(
        &mut self,
        canvas: &mut Canvas,
        spec: &ImageSpec,
        wa: IntRect,
    ) -> ForgeResult<()> {
        match (&spec.mask, self.filters) {
            (Some(mask), Some(filters)) => mask_image_onto_image(
                &mut *self.raster,
                filters,
                canvas,
                &spec.image,
                mask,
                &spec.placement,
                wa,
            ),
            (Some(_), None) => {
                tracing::warn!("masked image needs a filter backend; skipped");
                Ok(())
            }
            (None, _) => {
                let preserve_alpha = canvas.preserve_alpha;
                copy_gif_onto_gif(
                    &mut canvas.bitmap,
                    &spec.image,
                    &spec.placement,
                    wa,
                    preserve_alpha,
                )
                .map(|_| ())
            }
        }
    }

    /// Run `chain` over the whole canvas; any failure leaves it unchanged.
    fn filter_canvas(&mut self, canvas: &mut Canvas, chain: &FilterChain, what: &str) {
        if chain.is_empty() {
            return;
        }
        let Some(filters) = self.filters else {
            tracing::warn!(instruction = what, "no filter backend; skipped");
            return;
        };
        match filters.apply_chain(&canvas.bitmap, chain) {
            Ok(out) => canvas.bitmap = out,
            Err(err) => {
                tracing::warn!(
                    instruction = what,
                    backend = filters.name(),
                    error = %err,
                    "filter failed"
                );
            }
        }
    }

    fn scale(&mut self, canvas: &mut Canvas, spec: &ScaleSpec, max_size: (u32, u32)) {
        let Some((width, height)) = spec.target(canvas.width(), canvas.height()) else {
            return;
        };
        if (width, height) == (canvas.width(), canvas.height()) {
            return;
        }
        if width > max_size.0 || height > max_size.1 {
            tracing::warn!(
                width,
                height,
                ?max_size,
                "SCALE target exceeds the size limits; skipped"
            );
            return;
        }
        let chain: FilterChain = [FilterOp::Resize { width, height }].into_iter().collect();
        self.filter_canvas(canvas, &chain, "SCALE");
    }

    fn finalize(&mut self, plan: &CanvasPlan, canvas: &mut Canvas) {
        if canvas.preserve_alpha {
            return;
        }
        if plan.transparent_background {
            self.raster.set_color_transparent(canvas, plan.back_color.rgb);
        } else if let Some(target) =
            unify_colors(&mut canvas.bitmap, &plan.transparent_colors, plan.transparent_closest)
        {
            self.raster.set_color_transparent(canvas, target.rgb);
        }
    }
}

/// A finished canvas with the settings it was rendered from.
#[derive(Clone, Debug)]
pub struct Rendered {
    pub canvas: Canvas,
    pub plan: CanvasPlan,
}

/// Resolve and render `setup` with the filter backend `opts` selects.
pub fn render_setup(
    setup: &GraphicSetup,
    opts: &EngineOpts,
    locator: &dyn ResourceLocator,
    raster: &mut dyn RasterBackend,
) -> ForgeResult<Rendered> {
    let resolved = resolve_setup(setup, opts, locator, raster)?;
    let filters = opts.filter_backend();
    let canvas = Renderer::new(raster, filters.as_deref()).render(&resolved)?;
    Ok(Rendered {
        canvas,
        plan: resolved.canvas,
    })
}

/// Placed rectangle and color of a BOX or ELLIPSE. For ellipses `x,y` is the center.
fn shape_rect(shape: &ShapeSpec, wa: IntRect) -> (IntRect, Rgba8Premul) {
    let d = &shape.dimensions;
    let size = (component(d, 2), component(d, 3));
    let offset = [component(d, 0), component(d, 1)];
    let placed = obj_position(shape.align, &offset, wa, size);
    (
        IntRect::new(placed.x, placed.y, size.0, size.1),
        shape.color.to_premul(),
    )
}

/// Replace the canvas with the `crop` region; uncovered parts get the crop background.
fn crop(canvas: &mut Canvas, spec: &CropSpec, plan: &CanvasPlan, wa: IntRect) -> ForgeResult<()> {
    let size = (component(&spec.crop, 2).max(1), component(&spec.crop, 3).max(1));
    let offset = [component(&spec.crop, 0), component(&spec.crop, 1)];
    let placed = obj_position(spec.align, &offset, wa, size);
    let background = match spec.back_color {
        Some(color) => color.to_premul(),
        None if canvas.preserve_alpha => Rgba8Premul::transparent(),
        None => plan.back_color.to_premul(),
    };
    canvas.bitmap = canvas
        .bitmap
        .crop(IntRect::new(placed.x, placed.y, size.0, size.1), background)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/render.rs"]
mod tests;
