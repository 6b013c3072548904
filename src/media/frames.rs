//! Numbered-PNG frame sequences on disk.
//!
//! The decoder writes `000.png`, `001.png`, ... into a directory. The numeric stem is the frame's
//! [`FrameIndex`] and the only key used to pair an input file with its output.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{FrameIndex, RasterImage};
use crate::foundation::error::{FrameError, FrameResult};

/// Extension of every frame file.
pub const FRAME_EXT: &str = "png";

/// Canonical file name for `index`: at least three digits, zero-padded.
pub fn frame_file_name(index: FrameIndex) -> String {
    format!("{:03}.{FRAME_EXT}", index.0)
}

/// Parse `NNN.png` into its index. Anything else is not a frame.
pub fn parse_frame_index(file_name: &str) -> Option<FrameIndex> {
    let stem = file_name.strip_suffix(FRAME_EXT)?.strip_suffix('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse::<u64>().ok().map(FrameIndex)
}

/// One frame file found in a sequence directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameEntry {
    pub index: FrameIndex,
    pub path: PathBuf,
}

impl FrameEntry {
    /// File name component, as found on disk.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// List the frames in `dir`, sorted by index.
///
/// Non-frame files are ignored. Two files mapping to the same index (`7.png` and `007.png`)
/// are rejected since the output would be ambiguous.
pub fn scan_frames(dir: &Path) -> FrameResult<Vec<FrameEntry>> {
    let rd = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read frame directory '{}'", dir.display()))?;

    let mut entries = Vec::new();
    for item in rd {
        let item =
            item.with_context(|| format!("failed to list frame directory '{}'", dir.display()))?;
        let name = item.file_name();
        let Some(index) = name.to_str().and_then(parse_frame_index) else {
            continue;
        };
        let is_file = item
            .file_type()
            .with_context(|| format!("failed to stat '{}'", item.path().display()))?
            .is_file();
        if is_file {
            entries.push(FrameEntry {
                index,
                path: item.path(),
            });
        }
    }

    entries.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.path.cmp(&b.path)));
    if let Some(pair) = entries.windows(2).find(|w| w[0].index == w[1].index) {
        return Err(FrameError::validation(format!(
            "frames '{}' and '{}' share index {}",
            pair[0].file_name(),
            pair[1].file_name(),
            pair[0].index.0
        )));
    }
    Ok(entries)
}

/// Decode a frame file into straight-alpha RGBA8.
pub fn load_frame(path: &Path) -> FrameResult<RasterImage> {
    let img = image::open(path).map_err(|source| FrameError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    })?;
    RasterImage::from_rgba_image(img.to_rgba8())
}

/// Encode `frame` as PNG at `path`, replacing any existing file.
pub fn store_frame(frame: RasterImage, path: &Path) -> FrameResult<()> {
    let img = frame.into_rgba_image()?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| FrameError::EncodeFailure {
            path: path.to_path_buf(),
            source,
        })
}

/// Move a frame file to `dst`, falling back to copy + remove across filesystems.
pub fn relocate_frame(src: &Path, dst: &Path) -> FrameResult<()> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }
    std::fs::copy(src, dst).with_context(|| {
        format!(
            "failed to move frame '{}' to '{}'",
            src.display(),
            dst.display()
        )
    })?;
    std::fs::remove_file(src)
        .with_context(|| format!("failed to remove moved frame '{}'", src.display()))?;
    Ok(())
}

/// Create `dir` (and parents) if it does not exist.
pub fn ensure_dir(dir: &Path) -> FrameResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
    Ok(())
}

/// Empty `dir`, leaving it in place.
pub fn reset_dir(dir: &Path) -> FrameResult<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("failed to clear directory '{}'", dir.display()))?;
    }
    ensure_dir(dir)
}

#[cfg(test)]
#[path = "../../tests/unit/media/frames.rs"]
mod tests;
