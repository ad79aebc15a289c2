//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Minimum confidence for a classification to count (strictly above)
    #[serde(default = "default_detection_threshold")]
    pub threshold: f64,
    /// Minimum hold time before a pose is recorded
    #[serde(default = "default_sustain_ms")]
    pub sustain_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { threshold: default_detection_threshold(), sustain_ms: default_sustain_ms() }
    }
}

fn default_detection_threshold() -> f64 {
    0.65
}

fn default_sustain_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    /// Landmark frame source (JSONL, one frame per line)
    #[serde(default = "default_capture_input")]
    pub input: String,
    /// Pacing interval between replayed frames
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { input: default_capture_input(), frame_interval_ms: default_frame_interval_ms() }
    }
}

fn default_capture_input() -> String {
    "frames.jsonl".to_string()
}

fn default_frame_interval_ms() -> u64 {
    33
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// File path for session history (JSONL format)
    #[serde(default = "default_export_file")]
    pub file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { file: default_export_file() }
    }
}

fn default_export_file() -> String {
    "sessions.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudConfig {
    /// Save finished sessions to the remote store
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the document store REST endpoint
    #[serde(default)]
    pub base_url: String,
    /// Collection the session documents land in
    #[serde(default = "default_cloud_collection")]
    pub collection: String,
    /// API key appended to requests (optional)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Fixed user identity; anonymous sign-in is used when absent
    #[serde(default)]
    pub user_id: Option<String>,
    /// Anonymous sign-in endpoint
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default = "default_cloud_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            collection: default_cloud_collection(),
            api_key: None,
            user_id: None,
            auth_url: None,
            timeout_ms: default_cloud_timeout_ms(),
        }
    }
}

fn default_cloud_collection() -> String {
    "yogaSessions".to_string()
}

fn default_cloud_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_interval_secs")]
    pub interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval_secs() }
    }
}

fn default_metrics_interval_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub cloud: CloudConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    detection_threshold: f64,
    sustain_ms: u64,
    capture_input: String,
    frame_interval_ms: u64,
    export_file: String,
    cloud_enabled: bool,
    cloud_base_url: String,
    cloud_collection: String,
    cloud_api_key: Option<String>,
    cloud_user_id: Option<String>,
    cloud_auth_url: Option<String>,
    cloud_timeout_ms: u64,
    metrics_interval_secs: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default")
    }
}

impl Config {
    pub(crate) fn from_toml(toml_config: TomlConfig, config_file: &str) -> Self {
        Self {
            detection_threshold: toml_config.detection.threshold,
            sustain_ms: toml_config.detection.sustain_ms,
            capture_input: toml_config.capture.input,
            frame_interval_ms: toml_config.capture.frame_interval_ms,
            export_file: toml_config.export.file,
            cloud_enabled: toml_config.cloud.enabled,
            cloud_base_url: toml_config.cloud.base_url,
            cloud_collection: toml_config.cloud.collection,
            cloud_api_key: toml_config.cloud.api_key,
            cloud_user_id: toml_config.cloud.user_id,
            cloud_auth_url: toml_config.cloud.auth_url,
            cloud_timeout_ms: toml_config.cloud.timeout_ms,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            config_file: config_file.to_string(),
        }
    }

    /// Determine config file path from an explicit argument or environment
    pub fn resolve_config_path(explicit: Option<&str>) -> String {
        if let Some(path) = explicit {
            return path.to_string();
        }
        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }
        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, &path.display().to_string()))
    }

    /// Load configuration - tries the TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn detection_threshold(&self) -> f64 {
        self.detection_threshold
    }

    pub fn sustain_ms(&self) -> u64 {
        self.sustain_ms
    }

    pub fn capture_input(&self) -> &str {
        &self.capture_input
    }

    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    pub fn export_file(&self) -> &str {
        &self.export_file
    }

    pub fn cloud_enabled(&self) -> bool {
        self.cloud_enabled
    }

    pub fn cloud_base_url(&self) -> &str {
        &self.cloud_base_url
    }

    pub fn cloud_collection(&self) -> &str {
        &self.cloud_collection
    }

    pub fn cloud_api_key(&self) -> Option<&str> {
        self.cloud_api_key.as_deref()
    }

    pub fn cloud_user_id(&self) -> Option<&str> {
        self.cloud_user_id.as_deref()
    }

    pub fn cloud_auth_url(&self) -> Option<&str> {
        self.cloud_auth_url.as_deref()
    }

    pub fn cloud_timeout_ms(&self) -> u64 {
        self.cloud_timeout_ms
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}
