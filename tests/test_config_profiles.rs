use odata_filter::config::{ConfigError, default_config, load_config, load_config_from_path};
use odata_filter::{FilterError, ParseError, QueryOptions, build_query, compile_filter_with};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_config_without_path_returns_defaults() {
    let config = load_config(None).expect("default config");
    assert_eq!(config.profile_name, default_config().profile_name);
    assert_eq!(config.max_depth, 32);
    assert_eq!(config.resource.orderby_paged, "_id");
}

#[test]
fn test_profile_limits_nesting_depth() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("shallow.toml");
    fs::write(&path, "profile_name = \"shallow\"\nmax_depth = 2\n").expect("write config");

    let config = load_config_from_path(&path).expect("config should parse");
    assert_eq!(config.profile_name, "shallow");

    assert!(compile_filter_with("((a eq 1) and b eq 2)", &config).is_ok());
    assert!(matches!(
        compile_filter_with("(((a eq 1) and b eq 2) or c eq 3)", &config),
        Err(FilterError::Parse(ParseError::NestingTooDeep { limit: 2, .. }))
    ));
}

#[test]
fn test_profile_resource_defaults_apply_to_queries() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("books.toml");
    fs::write(
        &path,
        r#"
profile_name = "books"

[resource]
top = 20
orderby = "title asc"
select = "title pages"
"#,
    )
    .expect("write config");

    let config = load_config(Some(&path)).expect("config should parse");
    let spec = build_query(&QueryOptions::default(), &config).expect("valid query");

    assert_eq!(spec.limit, Some(20));
    assert_eq!(spec.sort.as_deref(), Some("title"));
    assert_eq!(spec.projection.as_deref(), Some("title pages"));
}

#[test]
fn test_missing_config_file_is_read_error() {
    let dir = tempdir().expect("temp dir");
    let result = load_config_from_path(&dir.path().join("missing.toml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_malformed_config_is_parse_error() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "max_depth = \"deep\"\n").expect("write config");

    let err = load_config_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}
