use std::path::PathBuf;

/// Convenience result type used across framesmith.
pub type FrameResult<T> = Result<T, FrameError>;

/// Pipeline stage a per-frame failure happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Reading and decoding the numbered PNG.
    Load,
    /// Applying the in-core resize.
    Resize,
    /// Corner/feather/blur mask application.
    Effects,
    /// Canvas compositing.
    Compose,
    /// Encoding and writing the processed PNG, or relocating it.
    Store,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Load => "load",
            Self::Resize => "resize",
            Self::Effects => "effects",
            Self::Compose => "compose",
            Self::Store => "store",
        };
        f.write_str(s)
    }
}

/// Top-level error taxonomy used by the library.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// Zero-sized geometry reached a stage that needs positive dimensions.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A frame buffer could not be loaded.
    #[error("failed to decode frame '{path}': {source}")]
    DecodeFailure {
        /// Source file.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// A processed buffer could not be written.
    #[error("failed to encode frame '{path}': {source}")]
    EncodeFailure {
        /// Destination file.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// A mask does not match the size of the frame it is applied to.
    #[error("mask {mask_w}x{mask_h} does not match frame {frame_w}x{frame_h}")]
    MaskDimensionMismatch {
        /// Mask width.
        mask_w: u32,
        /// Mask height.
        mask_h: u32,
        /// Frame width.
        frame_w: u32,
        /// Frame height.
        frame_h: u32,
    },

    /// Invalid user-provided settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// The external decoder (ffmpeg/ffprobe) failed or is missing.
    #[error("decoder error: {0}")]
    Decoder(String),

    /// The batch was aborted between frames.
    #[error("batch cancelled after {completed} frame(s)")]
    Cancelled {
        /// Frames fully written before the abort was observed.
        completed: u64,
    },

    /// A per-frame failure with the frame it happened on.
    #[error("frame {index} ('{file}') failed during {stage}: {source}")]
    Frame {
        /// Sequence index parsed from the filename.
        index: u64,
        /// Frame filename.
        file: String,
        /// Stage that failed.
        stage: Stage,
        /// Underlying failure.
        #[source]
        source: Box<FrameError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameError {
    /// Build a [`FrameError::InvalidGeometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`FrameError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FrameError::Decoder`] value.
    pub fn decoder(msg: impl Into<String>) -> Self {
        Self::Decoder(msg.into())
    }

    /// Attach frame context. Errors that already carry it are returned unchanged.
    pub fn in_frame(self, index: u64, file: impl Into<String>, stage: Stage) -> Self {
        match self {
            Self::Frame { .. } => self,
            other => Self::Frame {
                index,
                file: file.into(),
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The failing stage, if this error carries frame context.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Frame { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
