use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StereoConfig {
    /// Maximum horizontal pixel shift applied at full depth.
    pub max_disparity: u32,
}

impl Default for StereoConfig {
    fn default() -> Self {
        Self { max_disparity: 20 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// FFmpeg encoder name for the output file (e.g. "libx264", "mpeg4").
    pub codec: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreviewConfig {
    /// Show a live preview window while converting.
    pub enabled: bool,
    /// Key that cancels a running conversion.
    pub cancel_key: char,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cancel_key: 'q',
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RelievoConfig {
    #[serde(default)]
    pub stereo: StereoConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl RelievoConfig {
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: RelievoConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
