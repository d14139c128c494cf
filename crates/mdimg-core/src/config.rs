use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Network parameters for image fetches (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole transfer; 0 means no limit.
    pub timeout_secs: u64,
    /// Maximum number of redirects followed per image.
    pub max_redirects: u32,
    /// Optional User-Agent header sent with each GET.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 0,
            max_redirects: 10,
            user_agent: None,
        }
    }
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Overall transfer timeout, `None` when unlimited.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Global configuration loaded from `~/.config/mdimg/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdimgConfig {
    /// Directory scanned for Markdown files. Not stored on disk; defaults to the
    /// current working directory and is set from the CLI.
    #[serde(skip)]
    pub input_dir: PathBuf,
    /// Where images are saved. Relative paths are resolved against `input_dir`
    /// and used verbatim as the prefix of rewritten links.
    pub images_dir: PathBuf,
    /// Create `images_dir` before the first download if it is missing.
    pub create_images_dir: bool,
    /// File extension (without dot) identifying Markdown files; matched case-insensitively.
    pub markdown_extension: String,
    /// Optional fetch section; if missing, built-in defaults are used.
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

impl Default for MdimgConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            images_dir: PathBuf::from("images"),
            create_images_dir: true,
            markdown_extension: "md".to_string(),
            fetch: None,
        }
    }
}

impl MdimgConfig {
    /// Fetch settings, falling back to defaults when the section is absent.
    pub fn fetch_config(&self) -> FetchConfig {
        self.fetch.clone().unwrap_or_default()
    }

    /// Filesystem location of the images directory.
    pub fn images_path(&self) -> PathBuf {
        resolve_images_dir(&self.input_dir, &self.images_dir)
    }
}

/// Joins a relative images directory onto the input directory; absolute paths pass through.
pub fn resolve_images_dir(input_dir: &Path, images_dir: &Path) -> PathBuf {
    if images_dir.is_absolute() {
        images_dir.to_path_buf()
    } else {
        input_dir.join(images_dir)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mdimg")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MdimgConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Same as [`load_or_init`] but for an explicit config file path.
pub fn load_or_init_at(path: &Path) -> Result<MdimgConfig> {
    if !path.exists() {
        let default_cfg = MdimgConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: MdimgConfig = toml::from_str(&data)?;
    Ok(cfg)
}
