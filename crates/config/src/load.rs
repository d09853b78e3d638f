use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::Serialize;
use tracing::instrument;

use crate::Config;
use crate::error::{ErrorKind, Result};

pub const ENV_PREFIX: &str = "TMD_";
const FILE_STEM: &str = "config";

/// Platform configuration directory, if the platform has one.
pub fn user_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tmd").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Builds a [`Config`] from every layer, see the [crate docs](crate).
///
/// # Examples
///
/// ```no_run
/// use tmd_config::ConfigLoader;
///
/// let config = ConfigLoader::default()
///     .with_file(Some("tmd.toml"))
///     .load()
///     .unwrap();
/// println!("writing to {}", config.download.output.display());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    user_dir: Option<PathBuf>,
    file: Option<PathBuf>,
    env: bool,
    overrides: Vec<Figment>,
}
impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            user_dir: user_config_dir(),
            file: None,
            env: true,
            overrides: Vec::new(),
        }
    }
}
impl ConfigLoader {
    /// A loader that reads nothing but what it is explicitly given.
    pub fn isolated() -> Self {
        Self {
            user_dir: None,
            file: None,
            env: false,
            overrides: Vec::new(),
        }
    }

    /// Look for `config.{toml,yaml,json}` in `dir` instead of the platform
    /// directory; `None` skips this layer.
    pub fn with_user_dir(mut self, dir: Option<impl Into<PathBuf>>) -> Self {
        self.user_dir = dir.map(Into::into);
        self
    }

    /// Explicit file, which must exist when given.
    pub fn with_file(mut self, file: Option<impl Into<PathBuf>>) -> Self {
        self.file = file.map(Into::into);
        self
    }

    pub fn with_env(mut self, env: bool) -> Self {
        self.env = env;
        self
    }

    /// Highest priority layer. Only the fields `overrides` serializes are
    /// applied, so skip unset ones with `skip_serializing_if`.
    pub fn with_overrides(mut self, overrides: impl Serialize) -> Self {
        self.overrides.push(Figment::from(Serialized::defaults(overrides)));
        self
    }

    pub fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(dir) = &self.user_dir {
            figment = figment
                .merge(Toml::file(dir.join(FILE_STEM).with_extension("toml")))
                .merge(Yaml::file(dir.join(FILE_STEM).with_extension("yaml")))
                .merge(Json::file(dir.join(FILE_STEM).with_extension("json")));
        }
        if let Some(file) = &self.file {
            figment = merge_file(figment, file)?;
        }
        if self.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        for overrides in &self.overrides {
            figment = figment.merge(overrides.clone());
        }
        Ok(figment)
    }

    #[instrument(skip(self), fields(file = ?self.file, user_dir = ?self.user_dir))]
    pub fn load(&self) -> Result<Config> {
        let config: Config = self.figment()?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

fn merge_file(figment: Figment, file: &Path) -> Result<Figment> {
    // Missing files are silently skipped by figment; an explicit one must exist.
    if !file.is_file() {
        exn::bail!(ErrorKind::MissingFile(file.to_path_buf()));
    }
    let extension = file.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(file)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
        Some("json") => figment.merge(Json::file(file)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(file.to_path_buf())),
    })
}
