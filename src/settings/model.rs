use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{FrameError, FrameResult};

/// A fully resolved processing job description.
///
/// Settings are plain data: load them from JSON (missing fields fall back to defaults), adjust
/// them in code, then hand an immutable reference to the pipeline. Nothing in the library mutates
/// a `Settings` once processing begins.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frame extraction parameters for the external decoder.
    pub extraction: ExtractionConfig,
    /// Target geometry policy.
    pub scaling: ScalingConfig,
    /// Corner/feather/blur edge processing.
    pub processing: ProcessingConfig,
    /// Background canvas compositing.
    pub composition: CompositionConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Frames per second sampled from the source video.
    pub fps: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { fps: 40 }
    }
}

/// Scaling policy selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScalingMode {
    /// Fixed width, height derived from the aspect ratio.
    #[default]
    #[serde(rename = "A")]
    WidthAnchored,
    /// Fixed height, width derived from the aspect ratio.
    #[serde(rename = "B")]
    HeightAnchored,
    /// Fit to the maximum width unless that overflows the maximum height.
    #[serde(rename = "C")]
    WidthAnchoredHeightCapped,
    /// Fit to the maximum height unless that overflows the maximum width.
    #[serde(rename = "D")]
    HeightAnchoredWidthCapped,
    /// Both sides scaled by a percentage.
    #[serde(rename = "E")]
    Percent,
}

impl ScalingMode {
    pub const ALL: [ScalingMode; 5] = [
        Self::WidthAnchored,
        Self::HeightAnchored,
        Self::WidthAnchoredHeightCapped,
        Self::HeightAnchoredWidthCapped,
        Self::Percent,
    ];

    /// Single-letter label used in settings files and the CLI.
    pub fn letter(self) -> char {
        match self {
            Self::WidthAnchored => 'A',
            Self::HeightAnchored => 'B',
            Self::WidthAnchoredHeightCapped => 'C',
            Self::HeightAnchoredWidthCapped => 'D',
            Self::Percent => 'E',
        }
    }

    pub fn from_letter(c: char) -> FrameResult<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.letter() == c.to_ascii_uppercase())
            .ok_or_else(|| FrameError::validation(format!("unknown scaling mode '{c}' (A-E)")))
    }
}

/// Scaling parameters. Every mode keeps its own values; only `mode` decides which are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    pub enabled: bool,
    pub mode: ScalingMode,
    pub a_width: u32,
    pub b_height: u32,
    pub c_width: u32,
    pub c_height: u32,
    pub d_width: u32,
    pub d_height: u32,
    pub e_percent: u32,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: ScalingMode::WidthAnchored,
            a_width: 750,
            b_height: 1624,
            c_width: 750,
            c_height: 1504,
            d_width: 750,
            d_height: 1624,
            e_percent: 100,
        }
    }
}

/// Per-edge feather band sizes, in percent of the perpendicular frame dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FeatheringConfig {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl FeatheringConfig {
    pub const NONE: Self = Self {
        top: 0,
        bottom: 0,
        left: 0,
        right: 0,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for FeatheringConfig {
    fn default() -> Self {
        Self {
            top: 5,
            bottom: 5,
            left: 5,
            right: 5,
        }
    }
}

/// Order in which the corner mask, feather mask and blur are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EffectOrder {
    /// Corner, then feather, then blur the product. Both boundaries soften.
    #[default]
    #[serde(rename = "C-F-B")]
    CornerFeatherBlur,
    /// Corner, blur, then feather. Only the corner boundary softens.
    #[serde(rename = "C-B-F")]
    CornerBlurFeather,
}

impl EffectOrder {
    pub fn label(self) -> &'static str {
        match self {
            Self::CornerFeatherBlur => "C-F-B",
            Self::CornerBlurFeather => "C-B-F",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub enabled: bool,
    pub order: EffectOrder,
    /// Percent of the shorter frame side, 0..=50.
    pub corner_radius_percent: u32,
    /// Gaussian standard deviation in pixels, 0..=50.
    pub blur_strength: u32,
    pub feathering: FeatheringConfig,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: EffectOrder::CornerFeatherBlur,
            corner_radius_percent: 20,
            blur_strength: 10,
            feathering: FeatheringConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
    pub bg_color: Rgb8,
    /// Background opacity, 0..=100.
    pub bg_opacity: u32,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 750,
            height: 1624,
            bg_color: Rgb8::BLACK,
            bg_opacity: 0,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Absent fields take their defaults.
    pub fn load_json(path: &Path) -> FrameResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> FrameResult<Self> {
        let settings: Settings = serde_json::from_str(text)
            .map_err(|e| FrameError::validation(format!("parse settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_json(&self, path: &Path) -> FrameResult<()> {
        let text = serde_json::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(path, text)
            .with_context(|| format!("write settings '{}'", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> FrameResult<()> {
        if self.extraction.fps == 0 {
            return Err(FrameError::validation("extraction.fps must be > 0"));
        }

        let sca = &self.scaling;
        if sca.enabled {
            let active = match sca.mode {
                ScalingMode::WidthAnchored => vec![("a_width", sca.a_width)],
                ScalingMode::HeightAnchored => vec![("b_height", sca.b_height)],
                ScalingMode::WidthAnchoredHeightCapped => {
                    vec![("c_width", sca.c_width), ("c_height", sca.c_height)]
                }
                ScalingMode::HeightAnchoredWidthCapped => {
                    vec![("d_width", sca.d_width), ("d_height", sca.d_height)]
                }
                ScalingMode::Percent => vec![("e_percent", sca.e_percent)],
            };
            for (name, value) in active {
                if value == 0 {
                    return Err(FrameError::validation(format!(
                        "scaling.{name} must be > 0 for mode {}",
                        sca.mode.letter()
                    )));
                }
            }
        }

        let pro = &self.processing;
        let f = &pro.feathering;
        for (name, value) in [
            ("top", f.top),
            ("bottom", f.bottom),
            ("left", f.left),
            ("right", f.right),
        ] {
            if value > 100 {
                return Err(FrameError::validation(format!(
                    "processing.feathering.{name} must be in 0..=100"
                )));
            }
        }
        if pro.corner_radius_percent > 50 {
            return Err(FrameError::validation(
                "processing.corner_radius_percent must be in 0..=50",
            ));
        }
        if pro.blur_strength > 50 {
            return Err(FrameError::validation(
                "processing.blur_strength must be in 0..=50",
            ));
        }

        let com = &self.composition;
        if com.bg_opacity > 100 {
            return Err(FrameError::validation(
                "composition.bg_opacity must be in 0..=100",
            ));
        }
        if com.enabled && (com.width == 0 || com.height == 0) {
            return Err(FrameError::validation(
                "composition canvas width/height must be > 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;
