use clap::{CommandFactory, Parser};
use sitenav::config::SitenavConfig;
use sitenav::sitemap::DirectSource;
use sitenav::tooling::cli::{Cli, CliContext, Commands};
use std::fs;
use tempfile::TempDir;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["sitenav", "check"],
        vec!["sitenav", "check", "--format", "json"],
        vec!["sitenav", "tree"],
        vec!["sitenav", "--sitemap", "pages.toml", "tree", "--format", "json"],
        vec!["sitenav", "resolve", "private/page1"],
        vec![
            "sitenav",
            "resolve",
            "private/admin",
            "--authenticated",
            "--role",
            "admin",
            "--role",
            "staff",
            "--permission",
            "page:view:private:*",
            "--locale",
            "sv",
        ],
    ];
    for args in cases {
        assert!(Cli::try_parse_from(args.clone()).is_ok(), "expected valid parse for {args:?}");
    }
}

#[test]
fn parse_rejects_missing_fragment() {
    assert!(Cli::try_parse_from(["sitenav", "resolve"]).is_err());
    assert!(Cli::try_parse_from(["sitenav", "navigate", "x"]).is_err());
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn context_loads_declaration_files_from_arguments() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("pages.toml");
    fs::write(
        &path,
        r#"
[[pages]]
uri = "public/home"
label = "home"
view = "home"
standard_page = "public_home"

[[pages]]
uri = "private/page1"
label = "page1"
policy = "permission"
view = "page"

[[redirects]]
from = "private"
to = "private/page1"
"#,
    )
    .unwrap();

    let context = CliContext::new(temp.path().to_path_buf(), None, vec![path]).unwrap();
    assert!(context.config().sitemap.sources.iter().any(|s| s == "file"));

    let out = context
        .execute(&Commands::Tree {
            format: "json".to_string(),
        })
        .unwrap();
    let tree: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(tree["pages"].as_array().unwrap().len(), 4);
    assert_eq!(tree["redirects"][0][0], "private");
}

#[test]
fn check_fails_on_redirect_loop() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("loop.yaml");
    fs::write(
        &path,
        "pages:\n  - uri: a\n    label: a\n    view: v\nredirects:\n  - from: a\n    to: b\n  - from: b\n    to: a\n",
    )
    .unwrap();
    let context = CliContext::new(temp.path().to_path_buf(), None, vec![path]).unwrap();
    let err = context
        .execute(&Commands::Check {
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(err.to_string().contains("would cause a loop"), "{err}");
}

#[test]
fn empty_direct_source_builds_empty_sitemap() {
    let context = CliContext::with_config(SitenavConfig::default(), DirectSource::new());
    let out = context
        .execute(&Commands::Check {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(out.starts_with("Sitemap OK: 0 pages"), "{out}");
}
