mod locator;

use std::env;
use std::path::{
    Path,
    PathBuf,
};

pub use locator::{
    CONFIG_FILE_NAME,
    CONFIG_SUBFOLDER,
    EMBEDDED_CONFIG,
    candidate_paths,
    locate,
};

use crate::error::{
    FacadeError,
    FacadeResult,
};

pub const BASE_DIR_ENV: &str = "LOGWRAP_BASE_DIR";

pub const AUTO_DETECT_ENV: &str = "LOGWRAP_AUTO_DETECT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacadeConfig {
    base_dir: PathBuf,
    auto_detect: bool,
}

impl FacadeConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            auto_detect: false,
        }
    }

    pub fn builder() -> FacadeConfigBuilder {
        FacadeConfigBuilder::default()
    }

    pub fn from_env() -> FacadeResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`FacadeConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> FacadeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_dir = match lookup(BASE_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_base_dir()?,
        };

        let auto_detect = lookup(AUTO_DETECT_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Ok(Self {
            base_dir,
            auto_detect,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn auto_detect(&self) -> bool {
        self.auto_detect
    }
}

/// Directory of the running executable, falling back to the working directory.
pub fn default_base_dir() -> FacadeResult<PathBuf> {
    if let Some(dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        return Ok(dir);
    }

    env::current_dir().map_err(|e| FacadeError::BaseDir(e.to_string()))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Debug, Default)]
pub struct FacadeConfigBuilder {
    base_dir: Option<PathBuf>,
    auto_detect: Option<bool>,
}

impl FacadeConfigBuilder {
    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn auto_detect(mut self, enabled: bool) -> Self {
        self.auto_detect = Some(enabled);
        self
    }

    pub fn build(self) -> FacadeResult<FacadeConfig> {
        let base_dir = match self.base_dir {
            Some(dir) => dir,
            None => default_base_dir()?,
        };

        Ok(FacadeConfig {
            base_dir,
            auto_detect: self.auto_detect.unwrap_or(false),
        })
    }
}
