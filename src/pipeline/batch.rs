use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::assets::locator::ResourceLocator;
use crate::composition::model::GraphicSetup;
use crate::foundation::error::ForgeResult;
use crate::pipeline::opts::EngineOpts;
use crate::pipeline::output::{output_path, write_output};
use crate::pipeline::render::render_setup;
use crate::render::cpu::CpuRaster;

/// One independent graphic to render; `name` becomes the output file stem.
#[derive(Clone, Debug)]
pub struct BatchJob {
    pub name: String,
    pub setup: GraphicSetup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOutput {
    pub name: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Render one setup with a fresh CPU backend and write it to `out_dir`.
pub fn render_to_file(
    job: &BatchJob,
    opts: &EngineOpts,
    locator: &dyn ResourceLocator,
    out_dir: &Path,
) -> ForgeResult<BatchOutput> {
    let mut raster = CpuRaster::new();
    let rendered = render_setup(&job.setup, opts, locator, &mut raster)?;
    let plan = &rendered.plan;
    let path = output_path(out_dir, &job.name, plan.format);
    write_output(
        &mut raster,
        &rendered.canvas,
        &path,
        plan.format,
        plan.quality,
        plan.back_color,
    )?;
    Ok(BatchOutput {
        name: job.name.clone(),
        path,
        width: rendered.canvas.width(),
        height: rendered.canvas.height(),
    })
}

/// Render independent jobs in parallel.
///
/// Every job gets its own raster backend and filter backend (and so its own temp-file
/// namespace); results come back in job order and one failure does not stop the others.
#[tracing::instrument(skip_all, fields(jobs = jobs.len()))]
pub fn render_batch(
    jobs: &[BatchJob],
    opts: &EngineOpts,
    locator: &dyn ResourceLocator,
    out_dir: &Path,
) -> Vec<ForgeResult<BatchOutput>> {
    jobs.par_iter()
        .map(|job| {
            let out = render_to_file(job, opts, locator, out_dir);
            if let Err(err) = &out {
                tracing::warn!(job = %job.name, error = %err, "render failed");
            }
            out
        })
        .collect()
}
