//! The external decoder: `ffprobe` for geometry, `ffmpeg` for frame extraction.
//!
//! The system binaries are invoked directly; nothing links against FFmpeg.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::{FrameError, FrameResult};
use crate::media::frames::{FRAME_EXT, scan_frames};
use crate::transform::scale::ScaleTarget;

/// `printf`-style output pattern ffmpeg expands into `000.png`, `001.png`, ...
pub fn frame_pattern() -> String {
    format!("%03d.{FRAME_EXT}")
}

fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

/// Fail with [`FrameError::Decoder`] unless both `ffmpeg` and `ffprobe` can be run.
pub fn ensure_tools() -> FrameResult<()> {
    for (tool, found) in [
        ("ffmpeg", is_ffmpeg_on_path()),
        ("ffprobe", is_ffprobe_on_path()),
    ] {
        if !found {
            return Err(FrameError::decoder(format!(
                "{tool} is required but was not found on PATH"
            )));
        }
    }
    Ok(())
}

/// The `-vf` chain for extraction: optional scale, then frame-rate resampling.
pub fn video_filter(fps: u32, scale: Option<ScaleTarget>) -> String {
    let fps_expr = format!("fps={fps}");
    match scale.and_then(ScaleTarget::filter_expr) {
        Some(scale) => format!("{scale},{fps_expr}"),
        None => fps_expr,
    }
}

/// Arguments for extracting every frame of `input` into `out_dir`.
pub fn extraction_args(
    input: &Path,
    out_dir: &Path,
    fps: u32,
    scale: Option<ScaleTarget>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-i"].map(OsString::from).into();
    args.push(input.as_os_str().to_owned());
    for a in [
        "-vf".to_owned(),
        video_filter(fps, scale),
        "-start_number".to_owned(),
        "0".to_owned(),
        "-y".to_owned(),
    ] {
        args.push(a.into());
    }
    args.push(out_dir.join(frame_pattern()).into_os_string());
    args
}

/// Arguments for grabbing the single frame at `at_sec` into `out_file`.
pub fn single_frame_args(
    input: &Path,
    at_sec: f64,
    out_file: &Path,
    scale: Option<ScaleTarget>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    for a in ["-v", "error", "-ss"] {
        args.push(a.into());
    }
    args.push(format!("{:.3}", at_sec.max(0.0)).into());
    args.push("-i".into());
    args.push(input.as_os_str().to_owned());
    args.push("-vframes".into());
    args.push("1".into());
    if let Some(scale) = scale.and_then(ScaleTarget::filter_expr) {
        args.push("-vf".into());
        args.push(scale.into());
    }
    for a in ["-y", "-update", "1"] {
        args.push(a.into());
    }
    args.push(out_file.as_os_str().to_owned());
    args
}

fn run_tool(tool: &str, args: &[OsString], what: &str) -> FrameResult<Vec<u8>> {
    tracing::debug!(tool, ?args, "spawning");
    let out = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to run {tool} for {what}"))?;
    if !out.status.success() {
        return Err(FrameError::decoder(format!(
            "{tool} {what} failed ({}): {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(out.stdout)
}

/// Width and height of the first video stream.
pub fn probe_dimensions(input: &Path) -> FrameResult<(u32, u32)> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
    }

    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=width,height",
        "-print_format",
        "json",
    ]
    .map(OsString::from)
    .into();
    args.push(input.as_os_str().to_owned());

    let stdout = run_tool("ffprobe", &args, "probe")?;
    let parsed: ProbeOut = serde_json::from_slice(&stdout)
        .map_err(|e| FrameError::decoder(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed.streams.first().ok_or_else(|| {
        FrameError::decoder(format!("no video stream found in '{}'", input.display()))
    })?;
    match (stream.width, stream.height) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(FrameError::decoder("missing video width/height from ffprobe")),
    }
}

/// Container duration in seconds.
pub fn probe_duration(input: &Path) -> FrameResult<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        format: Option<ProbeFormat>,
    }

    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-print_format",
        "json",
    ]
    .map(OsString::from)
    .into();
    args.push(input.as_os_str().to_owned());

    let stdout = run_tool("ffprobe", &args, "probe")?;
    let parsed: ProbeOut = serde_json::from_slice(&stdout)
        .map_err(|e| FrameError::decoder(format!("ffprobe json parse failed: {e}")))?;
    parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| FrameError::decoder(format!("no duration for '{}'", input.display())))
}

/// Decode `input` at `fps` into numbered PNGs in `out_dir`, returning how many were written.
#[tracing::instrument(skip_all, fields(input = %input.display(), fps = fps))]
pub fn extract_frames(
    input: &Path,
    out_dir: &Path,
    fps: u32,
    scale: Option<ScaleTarget>,
) -> FrameResult<usize> {
    if fps == 0 {
        return Err(FrameError::validation("fps must be > 0"));
    }
    run_tool(
        "ffmpeg",
        &extraction_args(input, out_dir, fps, scale),
        "extraction",
    )?;
    let count = scan_frames(out_dir)?.len();
    if count == 0 {
        return Err(FrameError::decoder(format!(
            "ffmpeg produced no frames from '{}'",
            input.display()
        )));
    }
    tracing::info!(count, "extracted frames");
    Ok(count)
}

/// Write the frame at `at_sec` of `input` to `out_file` as PNG.
pub fn extract_frame_at(
    input: &Path,
    at_sec: f64,
    out_file: &Path,
    scale: Option<ScaleTarget>,
) -> FrameResult<()> {
    run_tool(
        "ffmpeg",
        &single_frame_args(input, at_sec, out_file, scale),
        "frame grab",
    )?;
    if !out_file.is_file() {
        return Err(FrameError::decoder(format!(
            "ffmpeg wrote no frame at {at_sec:.3}s of '{}'",
            input.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/media/ffmpeg.rs"]
mod tests;
