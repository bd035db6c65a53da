use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the course identifier in `Endpoints::course_root`.
pub const COURSE_PLACEHOLDER: &str = "{course}";

/// Remote endpoints used to log in and locate course pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Course root URL template; `{course}` is replaced with the course identifier.
    pub course_root: String,
    /// Path appended to the course root to reach the lecture index.
    pub lecture_index_path: String,
    /// Login API endpoint (form POST).
    pub login_url: String,
    /// Referer header sent with the login POST.
    pub signin_referer: String,
    /// Name of the login flag cookie sent alongside CAUTH.
    pub login_flag_cookie: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            course_root: "https://class.coursera.org/{course}".to_string(),
            lecture_index_path: "/lecture/index".to_string(),
            login_url: "https://accounts.coursera.org/api/v1/login".to_string(),
            signin_referer: "https://accounts.coursera.org/signin".to_string(),
            login_flag_cookie: "maestro_login_flag".to_string(),
        }
    }
}

impl Endpoints {
    pub fn course_uri(&self, course: &str) -> String {
        self.course_root.replace(COURSE_PLACEHOLDER, course)
    }

    pub fn course_content_uri(&self, course: &str) -> String {
        format!("{}{}", self.course_uri(course), self.lecture_index_path)
    }
}

pub fn default_extensions() -> Vec<String> {
    [".mp4", ".srt", ".pdf", ".pptx", ".ppt"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Global configuration loaded from `~/.config/coursedl/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDlConfig {
    /// Last used course identifier (e.g. `ml-003`), saved with `--remember`.
    #[serde(default)]
    pub course: Option<String>,
    /// Account email, saved with `--remember`. The password is never stored.
    #[serde(default)]
    pub username: Option<String>,
    /// Destination folder; the current directory when unset.
    #[serde(default)]
    pub dest_dir: Option<PathBuf>,
    /// Extensions to download, including the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Filename substitutions merged over the built-in table.
    #[serde(default)]
    pub filename_subs: BTreeMap<String, String>,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for CourseDlConfig {
    fn default() -> Self {
        Self {
            course: None,
            username: None,
            dest_dir: None,
            extensions: default_extensions(),
            filename_subs: BTreeMap::new(),
            endpoints: Endpoints::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("coursedl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CourseDlConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<CourseDlConfig> {
    if !path.exists() {
        let default_cfg = CourseDlConfig::default();
        save_at(path, &default_cfg)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: CourseDlConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Persist configuration to `~/.config/coursedl/config.toml`.
pub fn save(cfg: &CourseDlConfig) -> Result<()> {
    save_at(&config_path()?, cfg)
}

pub fn save_at(path: &Path, cfg: &CourseDlConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml).with_context(|| format!("write config {}", path.display()))?;
    Ok(())
}
