//! Tool configuration.
//!
//! Names the catalog to load and carries the classifier settings.
//!
//! # Example YAML
//!
//! ```yaml
//! catalog: catalogs/git.yml
//! classify:
//!   long_option_policy: ignore
//!   skip_blank_tokens: true
//! ```

use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use cmdtree_core::{ClassifyConfig, CommandTree};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader::load_tree;

/// Top-level configuration file.
///
/// # Examples
///
/// ```no_run
/// use cmdtree_catalog::CatalogConfig;
///
/// let config = CatalogConfig::load(".cmdtree.yml").unwrap();
/// let tree = config.load_catalog().unwrap();
/// println!("{} subcommands", tree.root.subcommands.len());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file; relative paths resolve against the config file's directory
    pub catalog: PathBuf,
    /// Classifier settings
    #[serde(default)]
    pub classify: ClassifyConfig,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl CatalogConfig {
    /// Creates a config pointing at `catalog` with default classifier settings.
    pub fn new(catalog: impl Into<PathBuf>) -> Self {
        Self {
            catalog: catalog.into(),
            classify: ClassifyConfig::default(),
            base_dir: None,
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoadError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::LoadError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let mut config: Self = serde_yaml::from_reader(reader)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoadError::Io) if the file cannot be written, or
    /// [`Yaml`](crate::LoadError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        serde_yaml::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Path of the catalog file, resolved against the config's directory.
    pub fn catalog_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(base) if self.catalog.is_relative() => base.join(&self.catalog),
            _ => self.catalog.clone(),
        }
    }

    /// Loads and validates the configured catalog.
    ///
    /// # Errors
    ///
    /// Any [`LoadError`](crate::LoadError) from [`load_tree`].
    pub fn load_catalog(&self) -> Result<CommandTree> {
        load_tree(self.catalog_path())
    }
}
