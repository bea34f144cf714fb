//! Translation of OData query options into a document-store query spec
//!
//! Besides `$filter`, a resource query may carry `$orderby`, `$top`, `$skip`
//! and `$select`. Resource-level defaults fill in whatever the client omits.

use crate::compile_filter_with;
use crate::config::CompilerConfig;
use crate::filter::{FilterError, Predicate};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ORDERBY_CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s*(asc|desc|)$").expect("valid orderby regex"));

/// Defaults applied to every query against a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDefaults {
    pub top: Option<u64>,
    pub skip: Option<u64>,
    /// OData syntax, e.g. `"title asc,pages desc"`
    pub orderby: Option<String>,
    /// Sort field imposed when a client pages (`$top`) without `$orderby`
    pub orderby_paged: String,
    /// Projection passed through verbatim. When set, the client's `$select` is ignored.
    pub select: Option<String>,
}

impl Default for ResourceDefaults {
    fn default() -> Self {
        Self {
            top: None,
            skip: None,
            orderby: None,
            orderby_paged: "_id".to_string(),
            select: None,
        }
    }
}

/// Client-supplied query options
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub filter: Option<String>,
    pub orderby: Option<String>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub select: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QuerySpec {
    pub filter: Predicate,
    /// Space-separated sort fields, `-` prefix for descending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<String>,
}

impl QuerySpec {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// An option counts as given unless it is missing or the empty string.
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Resolve client options against the configured resource defaults
pub fn build_query(
    options: &QueryOptions,
    config: &CompilerConfig,
) -> Result<QuerySpec, FilterError> {
    let defaults = &config.resource;

    let limit = options.top.or(defaults.top).filter(|n| *n > 0);
    let skip = options.skip.or(defaults.skip).filter(|n| *n > 0);
    let projection = non_empty(&defaults.select)
        .or_else(|| non_empty(&options.select))
        .map(str::to_string);

    // A blank but given orderby yields no sort and suppresses the paging sort.
    let sort = match given(&options.orderby).or_else(|| given(&defaults.orderby)) {
        Some(orderby) => translate_orderby(orderby),
        None if limit.is_some() && !defaults.orderby_paged.is_empty() => {
            Some(defaults.orderby_paged.clone())
        }
        None => None,
    };

    let filter = match non_empty(&options.filter) {
        Some(filter) => compile_filter_with(filter, config)?,
        None => Predicate::new(),
    };

    Ok(QuerySpec {
        filter,
        sort,
        limit,
        skip,
        projection,
    })
}

/// Translate an OData `$orderby` clause (`"a asc,b desc,c"`) into a sort
/// string (`"a -b c"`). Invalid clauses are skipped.
pub fn translate_orderby(orderby: &str) -> Option<String> {
    let fields: Vec<String> = orderby
        .split(',')
        .filter_map(|clause| {
            let clause = clause.trim();
            let Some(caps) = ORDERBY_CLAUSE_RE.captures(clause) else {
                debug!("orderby clause \"{}\" invalid, ignoring", clause);
                return None;
            };
            let field = &caps[1];
            Some(if &caps[2] == "desc" {
                format!("-{}", field)
            } else {
                field.to_string()
            })
        })
        .collect();

    if fields.is_empty() {
        return None;
    }
    let sort = fields.join(" ");
    debug!("Translated orderby \"{}\" to sort \"{}\"", orderby, sort);
    Some(sort)
}
