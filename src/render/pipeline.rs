use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::effects::canvas::compose;
use crate::effects::order::apply_processing;
use crate::foundation::core::{FrameIndex, RasterImage};
use crate::foundation::error::{FrameError, FrameResult, Stage};
use crate::media::ffmpeg;
use crate::media::frames::{
    FrameEntry, ensure_dir, load_frame, relocate_frame, reset_dir, scan_frames, store_frame,
};
use crate::settings::model::Settings;
use crate::transform::scale::{ScaleTarget, compute_target, resize};

/// Run one frame through resize → effects → canvas, as enabled in `settings`.
///
/// Pure with respect to every other frame. `resize_to` is applied in-core before the effects;
/// pass `None` when the decoder already scaled the frame.
pub fn process_frame(
    frame: RasterImage,
    settings: &Settings,
    resize_to: Option<ScaleTarget>,
) -> FrameResult<RasterImage> {
    run_stages(frame, settings, resize_to).map_err(|(_, e)| e)
}

fn run_stages(
    mut frame: RasterImage,
    settings: &Settings,
    resize_to: Option<ScaleTarget>,
) -> Result<RasterImage, (Stage, FrameError)> {
    if let Some(target) = resize_to {
        frame = resize(frame, target).map_err(|e| (Stage::Resize, e))?;
    }
    if settings.processing.enabled {
        frame = apply_processing(frame, &settings.processing).map_err(|e| (Stage::Effects, e))?;
    }
    if settings.composition.enabled {
        frame = compose(frame, &settings.composition).map_err(|e| (Stage::Compose, e))?;
    }
    Ok(frame)
}

/// Whether a frame has to be decoded at all, or can move through untouched.
fn touches_pixels(settings: &Settings, resize_to: Option<ScaleTarget>) -> bool {
    resize_to.is_some() || settings.processing.enabled || settings.composition.enabled
}

#[derive(Clone, Debug, Default)]
pub struct BatchOpts {
    /// Worker count; `None` uses one per core. `Some(0)` is rejected.
    pub threads: Option<usize>,
    /// Set to stop the batch before the next frame starts.
    pub cancel: Option<Arc<AtomicBool>>,
    /// In-core resize applied to every frame.
    pub resize: Option<ScaleTarget>,
    /// Move untouched frames instead of copying them. Only for disposable input directories.
    pub relocate_unchanged: bool,
}

/// Reported after every finished frame. Completion order is not index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchProgress {
    pub index: FrameIndex,
    pub completed: u64,
    pub total: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub frames_total: u64,
    /// Decoded, transformed and re-encoded.
    pub frames_processed: u64,
    /// Passed through without decoding.
    pub frames_passed: u64,
}

/// Process every numbered frame of `in_dir` into `out_dir` under the same file name.
///
/// Frames run in parallel on a dedicated pool. The first failure stops the batch and is
/// returned wrapped in [`FrameError::Frame`]. A failed or cancelled batch takes back what it
/// wrote: created frames are removed and moved frames return to `in_dir`, so `out_dir` never
/// holds a partial sequence. `in_dir` and `out_dir` may be the same directory, in which case
/// overwritten inputs are not restored.
#[tracing::instrument(skip_all, fields(in_dir = %in_dir.display(), out_dir = %out_dir.display()))]
pub fn process_sequence(
    in_dir: &Path,
    out_dir: &Path,
    settings: &Settings,
    opts: &BatchOpts,
    progress: Option<&(dyn Fn(BatchProgress) + Sync)>,
) -> FrameResult<BatchStats> {
    settings.validate()?;
    let frames = scan_frames(in_dir)?;
    let total = frames.len() as u64;
    if frames.is_empty() {
        tracing::warn!("no frames found");
        return Ok(BatchStats::default());
    }
    ensure_dir(out_dir)?;

    let pool = build_thread_pool(opts.threads)?;
    let pixels = touches_pixels(settings, opts.resize);
    let completed = AtomicU64::new(0);
    let written = Mutex::new(Vec::new());
    let in_place = same_dir(in_dir, out_dir);
    tracing::info!(
        total,
        threads = pool.current_num_threads(),
        pixels,
        order = settings.processing.order.label(),
        "processing frames"
    );

    let res = pool.install(|| {
        frames.par_iter().try_for_each(|entry| -> FrameResult<()> {
            if let Some(cancel) = &opts.cancel
                && cancel.load(Ordering::Acquire)
            {
                return Err(FrameError::Cancelled {
                    completed: completed.load(Ordering::Acquire),
                });
            }

            let dst = out_dir.join(entry.file_name());
            if pixels {
                record(&written, Written::Created(dst.clone()));
                process_entry(entry, &dst, settings, opts.resize)?;
            } else if opts.relocate_unchanged {
                pass_entry(entry, &dst, true)?;
                record(
                    &written,
                    Written::Moved {
                        from: entry.path.clone(),
                        to: dst,
                    },
                );
            } else {
                record(&written, Written::Created(dst.clone()));
                pass_entry(entry, &dst, false)?;
            }

            let done = completed.fetch_add(1, Ordering::AcqRel) + 1;
            tracing::debug!(index = entry.index.0, done, total, "frame done");
            if let Some(report) = progress {
                report(BatchProgress {
                    index: entry.index,
                    completed: done,
                    total,
                });
            }
            Ok(())
        })
    });

    if let Err(err) = res {
        tracing::error!(stage = ?err.stage(), error = %err, "batch failed");
        if !in_place {
            roll_back(written.into_inner().unwrap_or_else(|p| p.into_inner()));
        }
        return Err(err);
    }

    let stats = BatchStats {
        frames_total: total,
        frames_processed: if pixels { total } else { 0 },
        frames_passed: if pixels { 0 } else { total },
    };
    tracing::info!(?stats, "batch complete");
    Ok(stats)
}

/// Output touched by a running batch, undone if the batch fails.
enum Written {
    Created(PathBuf),
    Moved { from: PathBuf, to: PathBuf },
}

fn record(written: &Mutex<Vec<Written>>, item: Written) {
    written
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .push(item);
}

// try_for_each returns only after in-flight frames finish, so the list is complete here.
fn roll_back(written: Vec<Written>) {
    let n = written.len();
    for item in written {
        let res = match &item {
            Written::Created(path) => match std::fs::remove_file(path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other
                    .with_context(|| format!("failed to remove '{}'", path.display()))
                    .map_err(FrameError::from),
            },
            Written::Moved { from, to } => relocate_frame(to, from),
        };
        if let Err(e) = res {
            tracing::warn!(error = %e, "failed to undo partial output");
        }
    }
    tracing::debug!(frames = n, "partial output removed");
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn process_entry(
    entry: &FrameEntry,
    dst: &Path,
    settings: &Settings,
    resize_to: Option<ScaleTarget>,
) -> FrameResult<()> {
    let fail = |stage: Stage, e: FrameError| e.in_frame(entry.index.0, entry.file_name(), stage);

    let frame = load_frame(&entry.path).map_err(|e| fail(Stage::Load, e))?;
    let frame = run_stages(frame, settings, resize_to).map_err(|(stage, e)| fail(stage, e))?;
    store_frame(frame, dst).map_err(|e| fail(Stage::Store, e))
}

fn pass_entry(entry: &FrameEntry, dst: &Path, relocate: bool) -> FrameResult<()> {
    if entry.path == dst {
        return Ok(());
    }
    let res = if relocate {
        relocate_frame(&entry.path, dst)
    } else {
        std::fs::copy(&entry.path, dst)
            .with_context(|| format!("failed to copy frame to '{}'", dst.display()))
            .map(|_| ())
            .map_err(FrameError::from)
    };
    res.map_err(|e| e.in_frame(entry.index.0, entry.file_name(), Stage::Store))
}

fn build_thread_pool(threads: Option<usize>) -> FrameResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FrameError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("framesmith-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FrameError::validation(format!("failed to build rayon thread pool: {e}")))
}

/// Where a full job reads from and writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobPaths {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Scratch directory for extracted frames. Wiped before and removed after the job.
    pub temp_dir: PathBuf,
}

impl JobPaths {
    /// Name of the scratch directory created inside the output directory.
    pub const TEMP_DIR_NAME: &'static str = ".framesmith-frames";

    /// Paths for `input`, defaulting the output to a directory named after the video's stem,
    /// next to it.
    pub fn new(input: impl Into<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        let input = input.into();
        let output_dir = output_dir.unwrap_or_else(|| {
            let stem = input
                .file_stem()
                .map(|s| s.to_os_string())
                .unwrap_or_else(|| "frames".into());
            input
                .parent()
                .map(|p| p.join(&stem))
                .unwrap_or_else(|| PathBuf::from(&stem))
        });
        let temp_dir = output_dir.join(Self::TEMP_DIR_NAME);
        Self {
            input,
            output_dir,
            temp_dir,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JobReport {
    /// Probed source size, if the probe succeeded.
    pub original: Option<(u32, u32)>,
    /// Scaling handed to the decoder.
    pub scale: Option<ScaleTarget>,
    pub stats: BatchStats,
}

/// Probe, extract, process and place every frame of a video.
///
/// The scratch directory is removed on success and on failure alike.
#[tracing::instrument(skip_all, fields(input = %paths.input.display()))]
pub fn run_job(
    paths: &JobPaths,
    settings: &Settings,
    opts: &BatchOpts,
    progress: Option<&(dyn Fn(BatchProgress) + Sync)>,
) -> FrameResult<JobReport> {
    settings.validate()?;
    ffmpeg::ensure_tools()?;

    let original = probe_or_skip(&paths.input);
    let scale = original.and_then(|dims| compute_target(dims, &settings.scaling));

    reset_dir(&paths.temp_dir)?;
    let _guard = TempDirGuard(Some(paths.temp_dir.clone()));

    ffmpeg::extract_frames(
        &paths.input,
        &paths.temp_dir,
        settings.extraction.fps,
        scale,
    )?;

    let batch_opts = BatchOpts {
        resize: None,
        relocate_unchanged: true,
        ..opts.clone()
    };
    let stats = process_sequence(
        &paths.temp_dir,
        &paths.output_dir,
        settings,
        &batch_opts,
        progress,
    )?;

    Ok(JobReport {
        original,
        scale,
        stats,
    })
}

/// Render the middle frame of `input` exactly as a batch would, into `out_file`.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub fn render_preview(input: &Path, out_file: &Path, settings: &Settings) -> FrameResult<()> {
    settings.validate()?;
    ffmpeg::ensure_tools()?;

    let original = probe_or_skip(input);
    let scale = original.and_then(|dims| compute_target(dims, &settings.scaling));
    let at_sec = ffmpeg::probe_duration(input)? / 2.0;

    if let Some(parent) = out_file.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }
    ffmpeg::extract_frame_at(input, at_sec, out_file, scale)?;

    let index = 0;
    let file = out_file.display().to_string();
    let frame = load_frame(out_file).map_err(|e| e.in_frame(index, file.clone(), Stage::Load))?;
    let frame = run_stages(frame, settings, None)
        .map_err(|(stage, e)| e.in_frame(index, file.clone(), stage))?;
    store_frame(frame, out_file).map_err(|e| e.in_frame(index, file, Stage::Store))?;
    tracing::info!(at_sec, "preview rendered");
    Ok(())
}

/// The geometry probe is advisory: when it fails, scaling is skipped.
fn probe_or_skip(input: &Path) -> Option<(u32, u32)> {
    match ffmpeg::probe_dimensions(input) {
        Ok(dims) => Some(dims),
        Err(e) => {
            tracing::warn!(error = %e, "dimension probe failed; scaling skipped");
            None
        }
    }
}

struct TempDirGuard(Option<PathBuf>);

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_dir_all(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
