use odata_filter::config::CompilerConfig;
use odata_filter::query::ResourceDefaults;
use odata_filter::{FilterError, QueryOptions, build_query};
use serde_json::json;

fn config_with(resource: ResourceDefaults) -> CompilerConfig {
    CompilerConfig {
        resource,
        ..Default::default()
    }
}

#[test]
fn test_filter_and_orderby_are_translated() {
    let options = QueryOptions {
        filter: Some("pages le 120".to_string()),
        orderby: Some("title asc,pages desc".to_string()),
        ..Default::default()
    };
    let spec = build_query(&options, &CompilerConfig::default()).expect("valid query");

    assert_eq!(
        spec.to_json(),
        json!({
            "filter": {"pages": {"$lte": 120}},
            "sort": "title -pages"
        })
    );
}

#[test]
fn test_client_values_override_defaults() {
    let config = config_with(ResourceDefaults {
        top: Some(25),
        skip: Some(5),
        orderby: Some("title".to_string()),
        ..Default::default()
    });
    let options = QueryOptions {
        top: Some(2),
        skip: Some(4),
        orderby: Some("pages desc".to_string()),
        ..Default::default()
    };
    let spec = build_query(&options, &config).expect("valid query");

    assert_eq!(spec.limit, Some(2));
    assert_eq!(spec.skip, Some(4));
    assert_eq!(spec.sort.as_deref(), Some("-pages"));
}

#[test]
fn test_defaults_fill_missing_values() {
    let config = config_with(ResourceDefaults {
        top: Some(25),
        orderby: Some("title desc".to_string()),
        ..Default::default()
    });
    let spec = build_query(&QueryOptions::default(), &config).expect("valid query");

    assert_eq!(spec.limit, Some(25));
    assert_eq!(spec.skip, None);
    assert_eq!(spec.sort.as_deref(), Some("-title"));
}

#[test]
fn test_paging_without_orderby_sorts_on_paged_field() {
    let config = config_with(ResourceDefaults {
        orderby_paged: "created".to_string(),
        ..Default::default()
    });
    let options = QueryOptions {
        top: Some(10),
        ..Default::default()
    };
    let spec = build_query(&options, &config).expect("valid query");
    assert_eq!(spec.sort.as_deref(), Some("created"));

    let unpaged = build_query(&QueryOptions::default(), &config).expect("valid query");
    assert_eq!(unpaged.sort, None);
}

#[test]
fn test_blank_orderby_suppresses_paged_sort() {
    let options = QueryOptions {
        orderby: Some("   ".to_string()),
        top: Some(5),
        ..Default::default()
    };
    let spec = build_query(&options, &CompilerConfig::default()).expect("valid query");
    assert_eq!(spec.to_json(), json!({"filter": {}, "limit": 5}));

    let empty = QueryOptions {
        orderby: Some(String::new()),
        top: Some(5),
        ..Default::default()
    };
    let spec = build_query(&empty, &CompilerConfig::default()).expect("valid query");
    assert_eq!(spec.sort.as_deref(), Some("_id"));
}

#[test]
fn test_configured_select_cannot_be_overridden() {
    let config = config_with(ResourceDefaults {
        select: Some("-secret".to_string()),
        ..Default::default()
    });
    let options = QueryOptions {
        select: Some("secret".to_string()),
        ..Default::default()
    };
    let spec = build_query(&options, &config).expect("valid query");
    assert_eq!(spec.projection.as_deref(), Some("-secret"));

    let spec = build_query(&options, &CompilerConfig::default()).expect("valid query");
    assert_eq!(spec.projection.as_deref(), Some("secret"));
}

#[test]
fn test_invalid_filter_fails_the_whole_query() {
    let options = QueryOptions {
        filter: Some("a eq 1 or b eq 2 and c eq 3".to_string()),
        orderby: Some("title".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        build_query(&options, &CompilerConfig::default()),
        Err(FilterError::Parse(_))
    ));
}

#[test]
fn test_empty_options_give_empty_spec() {
    let spec = build_query(&QueryOptions::default(), &CompilerConfig::default())
        .expect("valid query");
    assert_eq!(spec.to_json(), json!({"filter": {}}));
}
