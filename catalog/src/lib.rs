//! Catalog files and configuration for cmdtree.
//!
//! Loads a [`CommandTree`](cmdtree_core::CommandTree) from JSON or YAML,
//! validates it, and saves it back. [`CatalogConfig`] ties a catalog file to
//! the classifier settings used when parsing against it.
//!
//! # Quick start
//!
//! ```no_run
//! use cmdtree_catalog::{CatalogConfig, load_tree};
//! use cmdtree_core::parse_with;
//!
//! let tree = load_tree("catalogs/git.yml").unwrap();
//! let parsed = cmdtree_core::parse(&["git", "commit", "-m", "msg"], &tree).unwrap();
//! assert_eq!(parsed.path, vec!["commit"]);
//!
//! // Or go through a config file
//! let config = CatalogConfig::load(".cmdtree.yml").unwrap();
//! let tree = config.load_catalog().unwrap();
//! let parsed = parse_with(&["git", "status"], &tree, &config.classify).unwrap();
//! ```

mod config;
mod error;
mod loader;

pub use config::CatalogConfig;
pub use error::{LoadError, Result};
pub use loader::{CatalogFormat, load_tree, parse_tree, save_tree};
