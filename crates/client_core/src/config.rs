//! Page configuration: endpoint, messages, class names, actions and FAQ content.
//!
//! Built once at startup and shared by reference with every controller.

use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::{ActionButton, FaqEntry};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub server_url: String,
    pub endpoint: String,
    pub classes: ClassNames,
    pub messages: Messages,
    pub actions: Vec<ActionButton>,
    pub faq: Vec<FaqEntry>,
    pub render: RenderOptions,
    #[serde(with = "millis")]
    pub fade_delay: Duration,
    #[serde(with = "millis")]
    pub fade_duration: Duration,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub highlight: String,
    pub active: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub errors: ErrorMessages,
    pub default_dropzone: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ErrorMessages {
    pub job_description: String,
    pub no_file: String,
    pub file_type: String,
    pub generic: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Soft line breaks become hard breaks.
    pub breaks: bool,
    /// GitHub-flavored extensions (tables, strikethrough, task lists, footnotes).
    pub gfm: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            endpoint: "/analyze".into(),
            classes: ClassNames::default(),
            messages: Messages::default(),
            actions: vec![ActionButton::new("Analyze Resume", "Analyze Resume")],
            faq: Vec::new(),
            render: RenderOptions::default(),
            fade_delay: Duration::from_millis(100),
            fade_duration: Duration::from_millis(500),
        }
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            highlight: "highlight".into(),
            active: "active".into(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            errors: ErrorMessages::default(),
            default_dropzone: "Drag and drop your resume here or click to browse".into(),
        }
    }
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            job_description: "Please enter a job description".into(),
            no_file: "Please upload your resume".into(),
            file_type: "Please upload a PDF file".into(),
            generic: "An error occurred during analysis. Please try again.".into(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            breaks: true,
            gfm: true,
        }
    }
}

impl PageConfig {
    /// Absolute URL of the analysis endpoint.
    pub fn analyze_url(&self) -> anyhow::Result<Url> {
        let base = Url::parse(self.server_url.trim())
            .with_context(|| format!("invalid server url '{}'", self.server_url))?;
        base.join(&self.endpoint)
            .with_context(|| format!("invalid analysis endpoint '{}'", self.endpoint))
    }
}

/// Defaults, then the optional TOML file, then environment overrides.
///
/// A missing file is fine; a file that exists but cannot be read or parsed is
/// reported.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<PageConfig> {
    let mut settings = match path {
        Some(path) if path.exists() => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            toml::from_str::<PageConfig>(&raw)
                .with_context(|| format!("failed to parse config '{}'", path.display()))?
        }
        _ => PageConfig::default(),
    };

    if let Ok(v) = std::env::var("DESK_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("DESK_ENDPOINT") {
        settings.endpoint = v;
    }

    Ok(settings)
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
