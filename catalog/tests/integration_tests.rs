use std::path::Path;

use cmdtree_catalog::{CatalogConfig, LoadError, load_tree, save_tree};
use cmdtree_core::{
    Command, CommandTree, Flag, MissingValuePolicy, Opt, ParseError, SharedParameters,
    ValidationError, parse, parse_with, render_tree,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const GIT_YAML: &str = r#"
root:
  name: git
  description: the stupid content tracker
  subcommands:
    - name: commit
      usage: git commit [flags]
      flags:
        - short: a
          long: all
      opts:
        - short: m
          long: message
          description: commit message
    - name: remote
      subcommands:
        - name: add
          args:
            - name: name
            - name: url
shared:
  flags:
    - short: v
      long: verbose
version: "2.43.0"
"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Loading and parsing
// ---------------------------------------------------------------------------

#[test]
fn test_loaded_catalog_parses_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let tree = load_tree(write(dir.path(), "git.yaml", GIT_YAML)).unwrap();

    let parsed = parse(&["git", "commit", "--message=fix", "-av"], &tree).unwrap();
    assert_eq!(parsed.path, vec!["commit"]);
    assert_eq!(parsed.invocation.opt_value("message"), Some("fix"));
    assert!(parsed.invocation.has_flag("a"));
    assert!(parsed.invocation.has_flag("v"));

    let parsed = parse(&["git", "remote", "add", "origin", "url"], &tree).unwrap();
    assert_eq!(parsed.path, vec!["remote", "add"]);
    assert_eq!(parsed.invocation.positionals(), vec!["origin", "url"]);
}

#[test]
fn test_json_and_yaml_catalogs_agree() {
    let dir = tempfile::tempdir().unwrap();
    let from_yaml = load_tree(write(dir.path(), "git.yml", GIT_YAML)).unwrap();

    let json_path = dir.path().join("git.json");
    save_tree(&from_yaml, &json_path).unwrap();
    let from_json = load_tree(&json_path).unwrap();

    assert_eq!(from_yaml, from_json);
    assert_eq!(render_tree(&from_json.root), "0: git\n  1: commit\n  1: remote\n    2: add\n");
}

#[test]
fn test_builder_catalog_survives_save() {
    let dir = tempfile::tempdir().unwrap();
    let tree = CommandTree::new(
        Command::new("the").with_subcommand(
            Command::new("quick").with_subcommand(
                Command::new("brown")
                    .with_flag(Flag::short('b'))
                    .with_opt(Opt::new(Some('f'), Some("LongF"))),
            ),
        ),
    )
    .with_shared(SharedParameters {
        opts: vec![Opt::long("color")],
        ..Default::default()
    })
    .with_author("someone");

    let path = dir.path().join("fox.yaml");
    save_tree(&tree, &path).unwrap();

    assert_eq!(load_tree(&path).unwrap(), tree);
}

#[test]
fn test_invalid_catalog_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = r#"
root:
  name: app
  flags:
    - description: nameless
"#;
    let err = load_tree(write(dir.path(), "bad.yml", yaml)).unwrap_err();

    assert!(matches!(
        &err,
        LoadError::InvalidCatalog(errors)
            if errors == &vec![ValidationError::MissingName("app".to_string())]
    ));
    assert_eq!(err.to_string(), "invalid catalog: flag or option without a name in `app`");
}

#[test]
fn test_invalid_catalog_reports_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{
  "root": {
    "name": "app",
    "flags": [{ "long": "--all" }],
    "subcommands": [{ "name": "run" }, { "name": "run" }]
  }
}"#;
    let err = load_tree(write(dir.path(), "bad.json", json)).unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid catalog: invalid long name `--all` in `app`; \
         duplicate subcommand `run` under `app`"
    );
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_tree(write(dir.path(), "git.toml", GIT_YAML)).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat(_)));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_drives_classification() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "git.yml", GIT_YAML);
    let config_path = write(
        dir.path(),
        "cmdtree.yml",
        "catalog: git.yml\nclassify:\n  long_option_policy: ignore\n",
    );

    let config = CatalogConfig::load(&config_path).unwrap();
    assert_eq!(config.classify.long_option_policy, MissingValuePolicy::Ignore);

    let tree = config.load_catalog().unwrap();
    let tokens = ["git", "commit", "--message"];

    let lenient = parse_with(&tokens, &tree, &config.classify).unwrap();
    assert!(lenient.invocation.opts.is_empty());

    assert_eq!(
        parse(&tokens, &tree),
        Err(ParseError::MissingOptionValue("--message".to_string()))
    );
}

#[test]
fn test_config_with_missing_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write(dir.path(), "cmdtree.yml", "catalog: nowhere.json\n");

    let config = CatalogConfig::load(&config_path).unwrap();
    assert!(matches!(config.load_catalog(), Err(LoadError::Io(_))));
}
