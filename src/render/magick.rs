use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::assets::decode::{OutputFormat, load_image_file, write_image_file};
use crate::foundation::core::Bitmap;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::render::filter::{FilterBackend, FilterChain, TempNamer};

/// Filter backend running ImageMagick's `convert` and `composite` through PNG temp files.
///
/// Each call is a blocking round trip: write the inputs, run the tool, read the result back.
/// Temp files come from the injected [`TempNamer`] and are removed when the call returns.
pub struct ImageMagick {
    bin_dir: Option<PathBuf>,
    namer: Box<dyn TempNamer>,
}

impl std::fmt::Debug for ImageMagick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageMagick")
            .field("bin_dir", &self.bin_dir)
            .finish_non_exhaustive()
    }
}

/// Removes its files on drop, ignoring files that were never created.
struct TempFiles(Vec<PathBuf>);

impl TempFiles {
    fn add(&mut self, path: PathBuf) -> PathBuf {
        self.0.push(path.clone());
        path
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        for p in &self.0 {
            let _ = std::fs::remove_file(p);
        }
    }
}

impl ImageMagick {
    /// `bin_dir` holds the `convert`/`composite` binaries; `None` looks them up on `PATH`.
    pub fn new(bin_dir: Option<PathBuf>, namer: Box<dyn TempNamer>) -> Self {
        Self { bin_dir, namer }
    }

    fn tool(&self, name: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Whether `convert -version` runs successfully.
    pub fn is_available(&self) -> bool {
        Command::new(self.tool("convert"))
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn write_temp(&self, files: &mut TempFiles, bitmap: &Bitmap) -> ForgeResult<PathBuf> {
        let path = files.add(self.namer.next_path("png"));
        write_image_file(bitmap, &path, OutputFormat::Png, 100)?;
        Ok(path)
    }

    fn run(&self, tool: &str, args: &[String], out: &Path) -> ForgeResult<Bitmap> {
        let output = Command::new(self.tool(tool))
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ForgeError::filter(format!("failed to spawn {tool}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ForgeError::filter(format!(
                "{tool} exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        load_image_file(out).map_err(|e| ForgeError::filter(format!("{tool} output: {e}")))
    }
}

impl FilterBackend for ImageMagick {
    fn name(&self) -> &'static str {
        "imagemagick"
    }

    #[tracing::instrument(skip_all, fields(args = ?chain.magick_args()))]
    fn apply_chain(&self, src: &Bitmap, chain: &FilterChain) -> ForgeResult<Bitmap> {
        if chain.is_empty() {
            return Ok(src.clone());
        }
        let mut files = TempFiles(Vec::new());
        let input = self.write_temp(&mut files, src)?;
        let out = files.add(self.namer.next_path("png"));

        let mut args = vec![input.display().to_string()];
        args.extend(chain.magick_args());
        args.push(out.display().to_string());
        self.run("convert", &args, &out)
    }

    #[tracing::instrument(skip_all)]
    fn combine(&self, base: &Bitmap, fg: &Bitmap, mask: &Bitmap) -> ForgeResult<Bitmap> {
        if base.bounds() != fg.bounds() || base.bounds() != mask.bounds() {
            return Err(ForgeError::validation(
                "combine expects equally sized base, foreground and mask",
            ));
        }
        let mut files = TempFiles(Vec::new());
        let base_p = self.write_temp(&mut files, base)?;
        let fg_p = self.write_temp(&mut files, fg)?;
        let mask_p = self.write_temp(&mut files, mask)?;
        let out = files.add(self.namer.next_path("png"));

        let args: Vec<String> = ["-compose".to_string(), "over".to_string()]
            .into_iter()
            .chain([&fg_p, &base_p, &mask_p, &out].map(|p| p.display().to_string()))
            .collect();
        self.run("composite", &args, &out)
    }
}
