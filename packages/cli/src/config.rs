use coursecraft_generation::{GenerationConfig, Tone, WizardKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "coursecraft.config.json";

/// Coursecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one `<course-id>.json` per course
    #[serde(default = "default_courses_dir")]
    pub courses_dir: String,

    /// Default generation language
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub tone: Tone,

    /// Pacing of the simulated generation backend
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_courses_dir() -> String {
    "courses".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub step_delay_ms: u64,
    pub steps_per_phase: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 150,
            steps_per_phase: 4,
        }
    }
}

impl SimulationConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            tracing::debug!("loading config from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            tracing::debug!("no {} in {}, using defaults", DEFAULT_CONFIG_NAME, cwd);
            Ok(Config::default())
        }
    }

    /// Get absolute path to the courses directory
    pub fn get_courses_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.courses_dir)
    }

    /// Wizard defaults with this file's language and tone
    pub fn generation_config(&self, kind: WizardKind) -> GenerationConfig {
        GenerationConfig {
            language: self.language.clone(),
            tone: self.tone,
            ..GenerationConfig::for_kind(kind)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            courses_dir: default_courses_dir(),
            language: default_language(),
            tone: Tone::default(),
            simulation: SimulationConfig::default(),
        }
    }
}
