use serde::Deserialize;

use crate::error::ConfigError;

/// Location of the optional override document, relative to the page.
pub const CONFIG_PATH: &str = "data/viewer.json";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub document_manifest: String,
    pub media_manifest: String,

    /// Scale a freshly loaded document starts at.
    pub default_scale: f64,
    /// Step used by the zoom in / zoom out buttons.
    pub zoom_step: f64,
    /// Zoom requests landing at or below this scale are refused. There is no matching ceiling.
    pub min_scale: f64,
    /// Pixels subtracted from the page container before computing fit-width.
    pub fit_width_padding: f64,

    pub list_title_limit: usize,
    pub select_title_limit: usize,

    pub custom_video_id: String,
    pub custom_video_title: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            document_manifest: "data/pdf-manifest.json".into(),
            media_manifest: "data/media-manifest.json".into(),
            default_scale: 1.0,
            zoom_step: 0.2,
            min_scale: 0.2,
            fit_width_padding: 40.0,
            list_title_limit: 60,
            select_title_limit: 50,
            custom_video_id: "custom_youtube".into(),
            custom_video_title: "Custom YouTube video".into(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("default_scale", self.default_scale),
            ("zoom_step", self.zoom_step),
            ("min_scale", self.min_scale),
        ];

        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field });
            }
        }

        Ok(())
    }

    pub fn zoom(&self) -> ZoomSettings {
        ZoomSettings {
            default_scale: self.default_scale,
            step: self.zoom_step,
            min_scale: self.min_scale,
        }
    }
}

/// The part of the config the page renderer needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomSettings {
    pub default_scale: f64,
    pub step: f64,
    pub min_scale: f64,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        ViewerConfig::default().zoom()
    }
}
