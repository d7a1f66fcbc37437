//! Pattern Table
//!
//! The ordered rule list that maps a normalized command to an intent and an
//! extraction template. Rules are scanned top to bottom and the first match
//! wins, so the order of `BUILTIN_RULES` is part of the behavior.

use regex::{Captures, Regex};

use drupal_agent_core::{CoreError, CoreResult, Intent};

/// Extraction recipe attached to a rule.
///
/// Every template is owned by one intent, except `Project`, which is shared
/// by site creation and the site lifecycle intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Topic,
    PostTitle,
    AiContent,
    NodeTitle,
    NodeBody,
    NodeId,
    FileAlt,
    File,
    CacheClear,
    CacheRebuild,
    Cron,
    CustomDrush,
    EnableModule,
    DisableModule,
    LatestPosts,
    SearchTerm,
    ContentSearch,
    TypeFilter,
    UsersByRole,
    TaggedContent,
    Project,
}

impl Template {
    /// Short name used in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Topic => "topic",
            Template::PostTitle | Template::NodeTitle => "title",
            Template::AiContent => "ai_content",
            Template::NodeBody => "body",
            Template::NodeId => "node_id",
            Template::FileAlt => "file_alt",
            Template::File => "file",
            Template::CacheClear => "cache-clear",
            Template::CacheRebuild => "cache-rebuild",
            Template::Cron => "cron",
            Template::CustomDrush => "custom",
            Template::EnableModule => "enable-module",
            Template::DisableModule => "disable-module",
            Template::LatestPosts => "latest_posts",
            Template::SearchTerm => "search_term",
            Template::ContentSearch => "content_search",
            Template::TypeFilter => "type_filter",
            Template::UsersByRole => "users_by_role",
            Template::TaggedContent => "tagged_content",
            Template::Project => "project",
        }
    }

    /// Whether this template may be paired with `intent`.
    pub fn accepts(&self, intent: Intent) -> bool {
        match self {
            Template::Topic | Template::PostTitle | Template::AiContent => {
                intent == Intent::CreatePost
            }
            Template::NodeTitle | Template::NodeBody => intent == Intent::EditNode,
            Template::NodeId => intent == Intent::DeleteNode,
            Template::FileAlt | Template::File => intent == Intent::UploadMedia,
            Template::CacheClear
            | Template::CacheRebuild
            | Template::Cron
            | Template::CustomDrush
            | Template::EnableModule
            | Template::DisableModule => intent == Intent::RunDrush,
            Template::LatestPosts
            | Template::SearchTerm
            | Template::ContentSearch
            | Template::TypeFilter
            | Template::UsersByRole
            | Template::TaggedContent => intent == Intent::QueryGraphql,
            Template::Project => intent == Intent::CreateSite || intent.is_site_lifecycle(),
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One compiled rule: case-insensitive pattern, target intent, template.
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    intent: Intent,
    template: Template,
}

impl PatternRule {
    /// Compile a rule. The pattern is always matched case-insensitively.
    pub fn new(pattern: &str, intent: Intent, template: Template) -> CoreResult<Self> {
        if !template.accepts(intent) {
            return Err(CoreError::UnrecognizedTemplate {
                intent: intent.to_string(),
                template: template.to_string(),
            });
        }

        let regex = Regex::new(&format!("(?i){}", pattern))
            .map_err(|e| CoreError::pattern(format!("{}: {}", pattern, e)))?;

        Ok(Self {
            regex,
            intent,
            template,
        })
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn template(&self) -> Template {
        self.template
    }

    /// Source pattern without the case-insensitivity prefix.
    pub fn pattern(&self) -> &str {
        self.regex.as_str().trim_start_matches("(?i)")
    }

    /// Search anywhere in `text`.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(text)
    }
}

/// A rule that matched, with its table position and captures.
#[derive(Debug)]
pub struct RuleMatch<'r, 't> {
    pub index: usize,
    pub rule: &'r PatternRule,
    pub captures: Captures<'t>,
}

/// Project name characters accepted by the site rules.
const NAME: &str = r"([a-zA-Z0-9\-_]+)";

/// Built-in rules in precedence order.
fn builtin_rules() -> Vec<(String, Intent, Template)> {
    use Intent::*;
    use Template::*;

    let rules: Vec<(&str, Intent, Template)> = vec![
        // Content creation
        (r"create.*(?:post|article|blog).*about\s+(.+)", CreatePost, Topic),
        (r#"create.*(?:post|article|blog).*titled?\s+['"](.+)['"]"#, CreatePost, PostTitle),
        (r"generate.*(?:content|article).*using\s+(\w+).*about\s+(.+)", CreatePost, AiContent),
        // Node operations
        (r#"edit.*(?:title|node)\s+([0-9]+).*to\s+['"](.+)['"]"#, EditNode, NodeTitle),
        (r#"update.*node\s+([0-9]+).*body.*['"](.+)['"]"#, EditNode, NodeBody),
        (r"delete.*node\s+([0-9]+)", DeleteNode, NodeId),
        // Media: the alt-text form must precede the bare upload
        (r#"upload\s+(.+?)\s+.*alt.*['"](.+)['"]"#, UploadMedia, FileAlt),
        (r"upload\s+(.+)", UploadMedia, File),
        // Drush
        (r"clear.*cache", RunDrush, CacheClear),
        (r"rebuild.*cache", RunDrush, CacheRebuild),
        (r"run\s+cron", RunDrush, Cron),
        (r"drush\s+(.+)", RunDrush, CustomDrush),
        (r"enable.*module\s+(.+)", RunDrush, EnableModule),
        (r"disable.*module\s+(.+)", RunDrush, DisableModule),
        // Content queries
        (r"show.*(?:titles?|list).*(?:latest|recent)\s+([0-9]+)\s+(?:blog\s+)?posts?", QueryGraphql, LatestPosts),
        (r"get.*(?:latest|recent)\s+([0-9]+)\s+(?:articles?|posts?)", QueryGraphql, LatestPosts),
        (r"show\s+(?:me\s+)?(?:the\s+)?(?:latest|recent)\s+([0-9]+)\s+(?:blog\s+)?(?:posts?|articles?)", QueryGraphql, LatestPosts),
        (r"find.*(?:posts?|articles?|nodes?).*about\s+(.+)", QueryGraphql, SearchTerm),
        (r"search.*(?:for\s+)?content.*about\s+(.+)", QueryGraphql, SearchTerm),
        (r#"fetch.*(?:article|node).*bodies?.*containing.*word\s+['"]?(\w+)['"]?"#, QueryGraphql, ContentSearch),
        (r#"query.*nodes.*(?:type|content_type)\s+['"]?(\w+)['"]?"#, QueryGraphql, TypeFilter),
        (r#"get.*nodes.*tagged.*['"](.+)['"]"#, QueryGraphql, TaggedContent),
        // User queries: explicit role phrasing before the bare "list <role>s"
        (r#"get.*(?:all\s+)?users.*with\s+role\s+['"]?(\w+)['"]?"#, QueryGraphql, UsersByRole),
        (r"show.*users.*with\s+role\s+(\w+)", QueryGraphql, UsersByRole),
        (r"list.*users.*with\s+role\s+(\w+)", QueryGraphql, UsersByRole),
        (r"list\s+(?:all\s+)?(\w+?)s?\s*$", QueryGraphql, UsersByRole),
    ];

    let mut owned: Vec<(String, Intent, Template)> = rules
        .into_iter()
        .map(|(p, i, t)| (p.to_string(), i, t))
        .collect();

    // Site creation
    owned.extend([
        (format!(r"create.*site.*(?:named?|called)\s+{NAME}"), CreateSite, Project),
        (
            format!(r#"create.*(?:new|site).*(?:ddev|lando).*(?:named?|called)\s+['"]?{NAME}"#),
            CreateSite,
            Project,
        ),
        (
            format!(r"create.*(?:site|new).*(?:named?|called)\s+{NAME}.*(?:using|with)\s+(?:ddev|lando)"),
            CreateSite,
            Project,
        ),
        (
            format!(r#"set\s?up.*(?:ddev|lando).*site\s+(?:for\s+)?(?:(?:named?|called)\s+)?['"]?{NAME}"#),
            CreateSite,
            Project,
        ),
    ]);

    // Site lifecycle. "restart" contains "start", so restart rules come
    // first. Within a verb the "site"/"project" and "of"/"for" keyword forms
    // precede the loose form, which would otherwise capture filler words.
    owned.extend([
        (format!(r"restart.*\s(?:site|project)\s+{NAME}"), RestartSite, Project),
        (format!(r"restart\s+(?:site\s+)?{NAME}"), RestartSite, Project),
        (format!(r"start.*\s(?:site|project)\s+{NAME}"), StartSite, Project),
        (format!(r"start\s+(?:site\s+)?{NAME}"), StartSite, Project),
        (format!(r"stop.*\s(?:site|project)\s+{NAME}"), StopSite, Project),
        (format!(r"stop\s+(?:site\s+)?{NAME}"), StopSite, Project),
        (format!(r"status.*\s(?:site|project)\s+{NAME}"), StatusSite, Project),
        (format!(r"status.*\b(?:of|for)\s+(?:site\s+)?{NAME}"), StatusSite, Project),
        (format!(r"status\s+(?:site\s+)?{NAME}"), StatusSite, Project),
    ]);

    owned
}

/// Immutable, ordered rule list. Share it between parsers with `Arc`.
#[derive(Debug, Clone)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    /// Build a table from already compiled rules, keeping their order.
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// The built-in Drupal command rules.
    pub fn builtin() -> CoreResult<Self> {
        let rules = builtin_rules()
            .into_iter()
            .map(|(pattern, intent, template)| PatternRule::new(&pattern, intent, template))
            .collect::<CoreResult<Vec<_>>>()?;

        tracing::debug!(rules = rules.len(), "compiled intent pattern table");
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule, in table order, whose pattern occurs in `text`.
    pub fn find_match<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            rule.captures(text).map(|captures| RuleMatch {
                index,
                rule,
                captures,
            })
        })
    }
}
