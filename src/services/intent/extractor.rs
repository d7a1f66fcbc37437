//! Parameter Extraction
//!
//! Two stages. `extract_from_captures` turns a rule match into a raw
//! parameter mapping. The `extract_*_params` functions validate and
//! normalize a mapping per intent family into a typed value; they are the
//! only place where parameter errors surface.

use regex::Captures;
use serde::Serialize;
use serde_json::Value;

use drupal_agent_core::{CoreError, CoreResult, Intent, Params};

use super::normalizer::{
    clean_html, clean_project_name, clean_text, filename_to_title, split_tags, title_case,
};
use super::patterns::Template;

const DEFAULT_CONTENT_TYPE: &str = "article";
const DEFAULT_PLATFORM: &str = "ddev";
const DEFAULT_QUERY_LIMIT: u32 = 10;
const MAX_QUERY_LIMIT: u32 = 100;

// ============================================================================
// First stage: captures -> raw params
// ============================================================================

fn group(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Integer capture. Digits that do not fit an `i64` stay a string so the
/// second stage rejects them instead of guessing a value.
fn integer_group(caps: &Captures<'_>, index: usize, field: &str) -> Value {
    let raw = group(caps, index);
    match raw.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(e) => {
            tracing::warn!(field, value = %raw, error = %e, "integer capture out of range");
            Value::String(raw)
        }
    }
}

fn params_from<const N: usize>(entries: [(&str, Value); N]) -> Params {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn text(value: impl Into<String>) -> Value {
    Value::String(value.into())
}

/// Build the raw parameter mapping for a matched rule.
///
/// `normalized` is the whole normalized command; site creation looks for
/// the platform keyword anywhere in it.
pub fn extract_from_captures(
    intent: Intent,
    template: Template,
    caps: &Captures<'_>,
    normalized: &str,
) -> Params {
    match template {
        Template::Topic => params_from([("topic", text(group(caps, 1)))]),
        Template::PostTitle => params_from([("title", text(group(caps, 1)))]),
        Template::AiContent => params_from([
            ("topic", text(group(caps, 2))),
            ("ai_provider", text(group(caps, 1))),
        ]),
        Template::NodeTitle => params_from([
            ("node_id", integer_group(caps, 1, "node_id")),
            ("title", text(group(caps, 2))),
        ]),
        Template::NodeBody => params_from([
            ("node_id", integer_group(caps, 1, "node_id")),
            ("body", text(group(caps, 2))),
        ]),
        Template::NodeId => params_from([("node_id", integer_group(caps, 1, "node_id"))]),
        Template::FileAlt => params_from([
            ("file_path", text(group(caps, 1))),
            ("alt_text", text(group(caps, 2))),
        ]),
        Template::File => params_from([("file_path", text(group(caps, 1)))]),
        Template::CacheClear => params_from([("command", text("cache:clear"))]),
        Template::CacheRebuild => params_from([("command", text("cache:rebuild"))]),
        Template::Cron => params_from([("command", text("cron:run"))]),
        Template::CustomDrush => params_from([("command", text(group(caps, 1)))]),
        Template::EnableModule => params_from([
            ("command", text("pm:enable")),
            ("module", text(group(caps, 1))),
        ]),
        Template::DisableModule => params_from([
            ("command", text("pm:disable")),
            ("module", text(group(caps, 1))),
        ]),
        Template::LatestPosts => params_from([
            ("query_type", text("latest_nodes")),
            ("content_type", text(DEFAULT_CONTENT_TYPE)),
            ("limit", integer_group(caps, 1, "limit")),
        ]),
        Template::SearchTerm | Template::ContentSearch => params_from([
            ("query_type", text("search_nodes")),
            ("search_term", text(group(caps, 1))),
        ]),
        Template::TypeFilter => params_from([
            ("query_type", text("latest_nodes")),
            ("content_type", text(group(caps, 1))),
        ]),
        Template::UsersByRole => params_from([
            ("query_type", text("users_by_role")),
            ("role", text(group(caps, 1))),
        ]),
        Template::TaggedContent => {
            let tags: Vec<Value> = group(caps, 1)
                .split(',')
                .map(|tag| text(tag.trim()))
                .collect();
            params_from([
                ("query_type", text("nodes_with_tags")),
                ("tags", Value::Array(tags)),
            ])
        }
        Template::Project => {
            let mut params = params_from([("project_name", text(group(caps, 1)))]);
            // Only site creation picks a platform
            if intent == Intent::CreateSite {
                let platform = if normalized.contains("lando") {
                    "lando"
                } else {
                    DEFAULT_PLATFORM
                };
                params.insert("platform".to_string(), text(platform));
            }
            params
        }
    }
}

// ============================================================================
// Second stage: typed, validated params
// ============================================================================

/// Validated content-creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Validated node edit/delete parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub content_type: String,
}

/// Validated media upload parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaParams {
    pub file_path: String,
    pub alt_text: String,
    pub title: String,
}

/// Validated drush parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrushParams {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

/// Validated GraphQL query parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParams {
    pub query_type: String,
    pub content_type: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
}

/// Validated local site parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteParams {
    pub project_name: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Second-stage output for any intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedParams {
    Content(ContentParams),
    Node(NodeParams),
    Media(MediaParams),
    Drush(DrushParams),
    Query(QueryParams),
    Site(SiteParams),
    /// `unknown` passes its mapping through untouched
    Raw(Params),
}

/// String form of a scalar parameter. Non-strings are rendered as JSON text.
fn string_param(params: &Params, key: &str) -> Option<String> {
    params.get(key).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn required(params: &Params, key: &str) -> CoreResult<String> {
    string_param(params, key).ok_or_else(|| CoreError::missing(key))
}

fn content_type(params: &Params) -> String {
    string_param(params, "content_type").unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

fn tags_param(params: &Params) -> Option<Vec<String>> {
    params.get("tags").map(|tags| match tags {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(clean_text(s)),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|t| !t.is_empty())
            .collect(),
        Value::String(s) => split_tags(s),
        _ => Vec::new(),
    })
}

/// Integer from a JSON integer or a numeric string.
fn integer_param(params: &Params, key: &str) -> CoreResult<Option<i64>> {
    match params.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| CoreError::invalid(key, format!("not an integer: {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| CoreError::invalid(key, format!("not an integer: {}", s))),
        Some(other) => Err(CoreError::invalid(key, format!("not an integer: {}", other))),
    }
}

/// Content creation: explicit title wins over a title-cased topic.
pub fn extract_content_params(params: &Params) -> CoreResult<ContentParams> {
    let title = match string_param(params, "title") {
        Some(title) => Some(clean_text(&title)),
        None => string_param(params, "topic").map(|topic| title_case(&topic)),
    };

    Ok(ContentParams {
        title,
        body: string_param(params, "body").map(|b| clean_html(&b)),
        content_type: content_type(params),
        ai_provider: string_param(params, "ai_provider"),
        topic: string_param(params, "topic").map(|t| clean_text(&t)),
        tags: tags_param(params),
    })
}

/// Node edit/delete.
pub fn extract_node_params(params: &Params) -> CoreResult<NodeParams> {
    Ok(NodeParams {
        node_id: integer_param(params, "node_id")?,
        title: string_param(params, "title").map(|t| clean_text(&t)),
        body: string_param(params, "body").map(|b| clean_html(&b)),
        content_type: content_type(params),
    })
}

/// Media upload; `file_path` is required.
pub fn extract_media_params(params: &Params) -> CoreResult<MediaParams> {
    let file_path = required(params, "file_path")?.trim().to_string();
    let title = string_param(params, "title").unwrap_or_else(|| filename_to_title(&file_path));

    Ok(MediaParams {
        alt_text: string_param(params, "alt_text").unwrap_or_default(),
        title,
        file_path,
    })
}

/// Drush; `command` is required and `args` always becomes a list.
pub fn extract_drush_params(params: &Params) -> CoreResult<DrushParams> {
    let args = params.get("args").map(|args| match args {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => vec![s.clone()],
        other => vec![other.to_string()],
    });

    Ok(DrushParams {
        command: required(params, "command")?,
        module: string_param(params, "module"),
        args,
    })
}

/// GraphQL query; `query_type` is required and `limit` is capped.
pub fn extract_query_params(params: &Params) -> CoreResult<QueryParams> {
    let query_type = required(params, "query_type")?;

    let limit = match integer_param(params, "limit")? {
        None => DEFAULT_QUERY_LIMIT,
        Some(n) if n < 1 => {
            return Err(CoreError::invalid("limit", format!("must be positive: {}", n)));
        }
        Some(n) => n.min(MAX_QUERY_LIMIT as i64) as u32,
    };

    let query = params.get("query").map(|q| match q {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    Ok(QueryParams {
        query_type,
        content_type: content_type(params),
        limit,
        search_term: string_param(params, "search_term").map(|s| clean_text(&s)),
        role: string_param(params, "role"),
        tags: tags_param(params),
        query,
        variables: params.get("variables").cloned(),
    })
}

/// Local site; `project_name` is required and slugified.
pub fn extract_site_params(params: &Params) -> CoreResult<SiteParams> {
    let raw_name = required(params, "project_name")?;
    let project_name = clean_project_name(&raw_name);
    if project_name.is_empty() {
        return Err(CoreError::invalid(
            "project_name",
            format!("no usable characters in '{}'", raw_name),
        ));
    }

    Ok(SiteParams {
        project_name,
        platform: string_param(params, "platform").unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        directory: string_param(params, "directory"),
        domain: string_param(params, "domain"),
    })
}

/// Run the second stage matching `intent`.
pub fn extract_for_intent(intent: Intent, params: &Params) -> CoreResult<ExtractedParams> {
    let extracted = match intent {
        Intent::CreatePost => ExtractedParams::Content(extract_content_params(params)?),
        Intent::EditNode | Intent::DeleteNode => ExtractedParams::Node(extract_node_params(params)?),
        Intent::UploadMedia => ExtractedParams::Media(extract_media_params(params)?),
        Intent::RunDrush => ExtractedParams::Drush(extract_drush_params(params)?),
        Intent::QueryGraphql => ExtractedParams::Query(extract_query_params(params)?),
        Intent::CreateSite
        | Intent::StartSite
        | Intent::StopSite
        | Intent::RestartSite
        | Intent::StatusSite => ExtractedParams::Site(extract_site_params(params)?),
        Intent::Unknown => ExtractedParams::Raw(params.clone()),
    };
    Ok(extracted)
}
