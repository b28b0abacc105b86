use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: Scan,
    #[serde(default)]
    pub probe: Probe,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        cfg.validate()
            .with_context(|| format!("invalid config: {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let secs = self.probe.timeout_seconds;
        if !secs.is_finite() || secs <= 0.0 {
            bail!("probe.timeout_seconds must be a positive number of seconds, got {secs}");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scan {
    /// Matched against the trimmed text of every data cell.
    pub url_pattern: String,
}
impl Default for Scan {
    fn default() -> Self {
        Self {
            url_pattern: r"^https?://\S+".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Probe {
    pub timeout_seconds: f64,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub user_agent: String,
}
impl Default for Probe {
    fn default() -> Self {
        Self {
            timeout_seconds: 5.0,
            follow_redirects: true,
            max_redirects: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub suffix: String,
    pub sheet_name: String,
    pub write_report_json: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            suffix: "_broken_urls.xlsx".into(),
            sheet_name: "Broken URLs".into(),
            write_report_json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            json: false,
            write_to_file: false,
            file_path: "sheet-linkcheck.log".into(),
        }
    }
}
