//! Framesmith turns a video into a directory of reshaped PNG frames.
//!
//! Extraction and probing are delegated to the system `ffmpeg`/`ffprobe`. Everything after
//! decoding runs on the CPU, one frame per worker:
//!
//! - [`compute_target`] picks the output geometry from one of five [`ScalingMode`]s
//! - [`build_corner_mask`] and [`build_feather_mask`] synthesize alpha masks
//! - [`apply`] combines them in the configured [`EffectOrder`], blurring along the way
//! - [`compose`] centres the result on a background canvas
//!
//! [`process_sequence`] drives a whole directory in parallel and [`run_job`] wraps it with
//! extraction and scratch-directory handling.
#![forbid(unsafe_code)]

pub(crate) mod effects;
pub(crate) mod foundation;
pub(crate) mod media;
pub(crate) mod render;
pub(crate) mod settings;
pub(crate) mod transform;

pub use crate::foundation::core::{AlphaMask, FrameIndex, RasterImage, Rgb8};
pub use crate::foundation::error::{FrameError, FrameResult, Stage};

pub use crate::settings::model::{
    CompositionConfig, EffectOrder, ExtractionConfig, FeatheringConfig, ProcessingConfig,
    ScalingConfig, ScalingMode, Settings,
};

pub use crate::transform::scale::{ScaleTarget, compute_target, preview_all, resize};

pub use crate::effects::blur::gaussian_blur;
pub use crate::effects::canvas::{background, compose, over_straight, paste_offset};
pub use crate::effects::mask::{
    BandEdge, build_corner_mask, build_feather_mask, corner_radius_px, ease, feather_profile,
};
pub use crate::effects::order::{
    apply, apply_processing, combine, corner_blur_feather, corner_feather_blur,
};

pub use crate::media::ffmpeg::{
    ensure_tools, extract_frame_at, extract_frames, is_ffmpeg_on_path, is_ffprobe_on_path,
    probe_dimensions, probe_duration,
};
pub use crate::media::frames::{
    FrameEntry, frame_file_name, load_frame, parse_frame_index, scan_frames, store_frame,
};

pub use crate::render::pipeline::{
    BatchOpts, BatchProgress, BatchStats, JobPaths, JobReport, process_frame, process_sequence,
    render_preview, run_job,
};
