use std::path::{Path, PathBuf};

use crate::assets::color::ColorSpec;
use crate::assets::decode::OutputFormat;
use crate::effects::composite::over_in_place;
use crate::foundation::core::{Bitmap, Canvas};
use crate::foundation::error::ForgeResult;
use crate::render::backend::RasterBackend;

/// `<dir>/<stem>.<ext>` for `format`.
pub fn output_path(dir: &Path, stem: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{stem}.{}", format.extension()))
}

/// Write `canvas` through the raster backend.
///
/// GIF and PNG keep transparency; JPEG output is flattened onto `matte` first.
#[tracing::instrument(skip(raster, canvas))]
pub fn write_output(
    raster: &mut dyn RasterBackend,
    canvas: &Canvas,
    path: &Path,
    format: OutputFormat,
    quality: u8,
    matte: ColorSpec,
) -> ForgeResult<()> {
    let flat;
    let bitmap = if format.supports_transparency() || canvas.bitmap.is_opaque() {
        &canvas.bitmap
    } else {
        let matte = ColorSpec { alpha: None, ..matte };
        let mut out = Bitmap::filled(canvas.width(), canvas.height(), matte.to_premul())?;
        over_in_place(out.data_mut(), canvas.bitmap.data(), 1.0)?;
        flat = out;
        &flat
    };
    raster.write_image(bitmap, path, format, quality)
}
