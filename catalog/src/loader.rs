//! Reading and writing catalog files.
//!
//! The file format is picked from the extension: `.json` for JSON, `.yaml` or
//! `.yml` for YAML. Every loaded catalog is validated before it is returned.

use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use cmdtree_core::{CommandTree, validate_tree};
use tracing::{debug, info};

use crate::error::{LoadError, Result};

/// Serialization format of a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    /// Picks the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedFormat`] for any other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_catalog::CatalogFormat;
    ///
    /// assert_eq!(CatalogFormat::from_path("git.yml").unwrap(), CatalogFormat::Yaml);
    /// assert_eq!(CatalogFormat::from_path("git.JSON").unwrap(), CatalogFormat::Json);
    /// assert!(CatalogFormat::from_path("git.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parses and validates a catalog from a string.
///
/// # Errors
///
/// Returns [`LoadError::Json`] or [`LoadError::Yaml`] if deserialization
/// fails, or [`LoadError::InvalidCatalog`] listing every validation problem.
///
/// # Examples
///
/// ```
/// use cmdtree_catalog::{CatalogFormat, parse_tree};
///
/// let yaml = r#"
/// root:
///   name: git
///   subcommands:
///     - name: commit
///       opts:
///         - short: m
///           long: message
/// "#;
/// let tree = parse_tree(yaml, CatalogFormat::Yaml).unwrap();
/// assert_eq!(tree.root.subcommand_names(), vec!["commit"]);
/// assert!(tree.auto_help);
/// ```
pub fn parse_tree(input: &str, format: CatalogFormat) -> Result<CommandTree> {
    let tree: CommandTree = match format {
        CatalogFormat::Json => serde_json::from_str(input)?,
        CatalogFormat::Yaml => serde_yaml::from_str(input)?,
    };
    check(&tree)?;
    Ok(tree)
}

/// Loads and validates a catalog file.
///
/// # Errors
///
/// Returns [`LoadError::UnsupportedFormat`] for an unknown extension,
/// [`LoadError::Io`] if the file cannot be read, a deserialization error if
/// parsing fails, or [`LoadError::InvalidCatalog`] if validation fails.
pub fn load_tree(path: impl AsRef<Path>) -> Result<CommandTree> {
    let path = path.as_ref();
    let format = CatalogFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "loading catalog");

    let reader = BufReader::new(std::fs::File::open(path)?);
    let tree: CommandTree = match format {
        CatalogFormat::Json => serde_json::from_reader(reader)?,
        CatalogFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    check(&tree)?;

    info!(
        path = %path.display(),
        root = %tree.root.name,
        subcommands = tree.root.subcommands.len(),
        "catalog loaded"
    );
    Ok(tree)
}

/// Writes `tree` to `path` in the format implied by its extension.
///
/// # Errors
///
/// Returns [`LoadError::UnsupportedFormat`] for an unknown extension,
/// [`LoadError::Io`] if the file cannot be written, or a serialization error.
pub fn save_tree(tree: &CommandTree, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = CatalogFormat::from_path(path)?;

    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    match format {
        CatalogFormat::Json => serde_json::to_writer_pretty(&mut writer, tree)?,
        CatalogFormat::Yaml => serde_yaml::to_writer(&mut writer, tree)?,
    }
    writer.flush()?;

    debug!(path = %path.display(), ?format, "catalog saved");
    Ok(())
}

fn check(tree: &CommandTree) -> Result<()> {
    let errors = validate_tree(tree);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LoadError::InvalidCatalog(errors))
    }
}

#[cfg(test)]
mod tests {
    use cmdtree_core::{Command, Flag, Opt, ValidationError};

    use super::*;

    fn sample_json() -> &'static str {
        r#"{
  "root": {
    "name": "the",
    "subcommands": [
      {
        "name": "quick",
        "subcommands": [
          {
            "name": "brown",
            "flags": [{ "short": "b" }],
            "opts": [{ "short": "f", "long": "LongF" }]
          }
        ]
      }
    ]
  },
  "version": "0.1.0"
}"#
    }

    #[test]
    fn test_parse_json_catalog() {
        let tree = parse_tree(sample_json(), CatalogFormat::Json).unwrap();

        let brown = tree.root.descendant(&["quick", "brown"]).unwrap();
        assert_eq!(brown.flags, vec![Flag::short('b')]);
        assert_eq!(brown.opts, vec![Opt::new(Some('f'), Some("LongF"))]);
        assert_eq!(tree.version.as_deref(), Some("0.1.0"));
        assert!(tree.auto_help);
    }

    #[test]
    fn test_parse_yaml_auto_help_off() {
        let yaml = "root:\n  name: app\nauto_help: false\n";
        let tree = parse_tree(yaml, CatalogFormat::Yaml).unwrap();

        assert_eq!(tree.root, Command::new("app"));
        assert!(!tree.auto_help);
    }

    #[test]
    fn test_parse_rejects_invalid_catalog() {
        let yaml = r#"
root:
  name: app
  subcommands:
    - name: run
    - name: run
"#;
        let err = parse_tree(yaml, CatalogFormat::Yaml).unwrap_err();
        let LoadError::InvalidCatalog(errors) = err else {
            panic!("expected a validation failure");
        };
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::DuplicateSubcommand { .. }]
        ));
    }

    #[test]
    fn test_parse_reports_syntax_errors() {
        let err = parse_tree("{ not json", CatalogFormat::Json).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));

        let err = parse_tree("root: [unclosed", CatalogFormat::Yaml).unwrap_err();
        assert!(matches!(err, LoadError::Yaml(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            CatalogFormat::from_path("a/b/catalog.yaml").unwrap(),
            CatalogFormat::Yaml
        );
        assert!(matches!(
            CatalogFormat::from_path("catalog"),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let tree = parse_tree(sample_json(), CatalogFormat::Json).unwrap();

        for name in ["catalog.json", "catalog.yml"] {
            let path = dir.path().join(name);
            save_tree(&tree, &path).unwrap();
            assert_eq!(load_tree(&path).unwrap(), tree, "{name}");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_tree(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
