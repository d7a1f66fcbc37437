//! Intent Parser Integration Tests
//!
//! Pattern-only parsing of operator commands.

use drupal_agent::services::intent::{extract_for_intent, IntentParser};
use drupal_agent_core::{Intent, ParseSource};

fn parser() -> IntentParser {
    IntentParser::builtin().unwrap()
}

// ============================================================================
// Content and node commands
// ============================================================================

#[tokio::test]
async fn test_create_blog_post_about_topic() {
    let cmd = parser().parse("create a blog post about AI in Drupal").await;
    assert_eq!(cmd.intent, Intent::CreatePost);
    assert_eq!(cmd.param_str("topic"), Some("ai in drupal"));
    assert!(matches!(cmd.source, ParseSource::Pattern { .. }));
}

#[tokio::test]
async fn test_clear_cache_maps_to_drush() {
    let cmd = parser().parse("Clear Drupal cache").await;
    assert_eq!(cmd.intent, Intent::RunDrush);
    assert_eq!(cmd.param_str("command"), Some("cache:clear"));
}

#[tokio::test]
async fn test_edit_node_title() {
    let cmd = parser()
        .parse("Edit the title of node 45 to 'Headless CMS in 2025'")
        .await;
    assert_eq!(cmd.intent, Intent::EditNode);
    assert_eq!(cmd.param_i64("node_id"), Some(45));
    assert_eq!(cmd.param_str("title"), Some("headless cms in 2025"));
    assert_eq!(cmd.params.len(), 2);
}

#[tokio::test]
async fn test_delete_node() {
    let cmd = parser().parse("please delete node 12").await;
    assert_eq!(cmd.intent, Intent::DeleteNode);
    assert_eq!(cmd.param_i64("node_id"), Some(12));
}

#[tokio::test]
async fn test_enable_module() {
    let cmd = parser().parse("Enable the module pathauto").await;
    assert_eq!(cmd.intent, Intent::RunDrush);
    assert_eq!(cmd.param_str("command"), Some("pm:enable"));
    assert_eq!(cmd.param_str("module"), Some("pathauto"));
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_show_latest_posts() {
    let cmd = parser().parse("show latest 10 posts").await;
    assert_eq!(cmd.intent, Intent::QueryGraphql);
    assert_eq!(cmd.param_str("query_type"), Some("latest_nodes"));
    assert_eq!(cmd.param_i64("limit"), Some(10));
}

#[tokio::test]
async fn test_users_with_role() {
    let cmd = parser().parse("get users with role editor").await;
    assert_eq!(cmd.intent, Intent::QueryGraphql);
    assert_eq!(cmd.param_str("query_type"), Some("users_by_role"));
    assert_eq!(cmd.param_str("role"), Some("editor"));

    let cmd = parser().parse("list all users with role admin").await;
    assert_eq!(cmd.param_str("role"), Some("admin"));
}

#[tokio::test]
async fn test_large_limit_is_capped_in_second_stage() {
    let cmd = parser().parse("get the latest 500 articles").await;
    assert_eq!(cmd.param_i64("limit"), Some(500));

    let extracted = extract_for_intent(cmd.intent, &cmd.params).unwrap();
    let json = serde_json::to_value(&extracted).unwrap();
    assert_eq!(json["limit"], 100);
}

// ============================================================================
// Local sites
// ============================================================================

#[tokio::test]
async fn test_site_verbs_resolve_to_their_own_intent() {
    let cases = [
        ("restart my-site", Intent::RestartSite),
        ("start my-site", Intent::StartSite),
        ("stop my-site", Intent::StopSite),
        ("status of my-site", Intent::StatusSite),
        ("restart site my-site", Intent::RestartSite),
        ("start site my-site", Intent::StartSite),
        ("please restart the project my-site", Intent::RestartSite),
        ("please start the project my-site", Intent::StartSite),
        ("what is the status of site my-site", Intent::StatusSite),
        ("status for my-site", Intent::StatusSite),
    ];

    let parser = parser();
    for (text, expected) in cases {
        let cmd = parser.parse(text).await;
        assert_eq!(cmd.intent, expected, "command: {}", text);
        assert_eq!(cmd.param_str("project_name"), Some("my-site"), "command: {}", text);
    }
}

#[tokio::test]
async fn test_status_for_and_setup_for_capture_the_name() {
    let parser = parser();

    let cmd = parser.parse("Check status for blog").await;
    assert_eq!(cmd.intent, Intent::StatusSite);
    assert_eq!(cmd.param_str("project_name"), Some("blog"));

    let cmd = parser.parse("Set up lando site for blog").await;
    assert_eq!(cmd.intent, Intent::CreateSite);
    assert_eq!(cmd.param_str("project_name"), Some("blog"));
    assert_eq!(cmd.param_str("platform"), Some("lando"));
}

#[tokio::test]
async fn test_non_ascii_digits_are_not_node_ids() {
    let cmd = parser().parse("delete node \u{664}\u{665}").await;
    assert!(cmd.is_unknown());
}

#[tokio::test]
async fn test_restart_never_parses_as_start() {
    let cmd = parser().parse("Restart blog").await;
    assert_eq!(cmd.intent, Intent::RestartSite);
    assert_ne!(cmd.intent, Intent::StartSite);
}

#[tokio::test]
async fn test_create_site_picks_platform() {
    let cmd = parser().parse("create a new site named My_Shop with lando").await;
    assert_eq!(cmd.intent, Intent::CreateSite);
    assert_eq!(cmd.param_str("platform"), Some("lando"));

    let extracted = extract_for_intent(cmd.intent, &cmd.params).unwrap();
    let json = serde_json::to_value(&extracted).unwrap();
    assert_eq!(json["project_name"], "my-shop");

    let cmd = parser().parse("create site called demo").await;
    assert_eq!(cmd.param_str("platform"), Some("ddev"));
}

#[tokio::test]
async fn test_lifecycle_intents_carry_no_platform() {
    let cmd = parser().parse("stop lando-site").await;
    assert_eq!(cmd.intent, Intent::StopSite);
    assert!(cmd.param_str("platform").is_none());
}

// ============================================================================
// Whole-parser properties
// ============================================================================

#[tokio::test]
async fn test_parse_is_case_insensitive() {
    let commands = [
        "create a blog post about AI in Drupal",
        "Clear Drupal cache",
        "Edit the title of node 45 to 'Headless CMS in 2025'",
        "restart my-site",
        "show latest 5 posts",
        "something nobody understands",
    ];

    let parser = parser();
    for text in commands {
        let lower = parser.parse(text).await;
        let upper = parser.parse(&text.to_uppercase()).await;
        assert_eq!(lower, upper, "command: {}", text);
    }
}

#[tokio::test]
async fn test_unmatched_without_fallback_degrades() {
    let cmd = parser().parse("  Make Me A Sandwich ").await;
    assert!(cmd.is_unknown());
    assert_eq!(cmd.source, ParseSource::Degraded);
    assert_eq!(cmd.param_str("raw_command"), Some("make me a sandwich"));
}

#[tokio::test]
async fn test_every_result_is_in_vocabulary() {
    let parser = parser();
    for text in ["upload /tmp/logo.png", "run cron", "drush updb", "", "???"] {
        let cmd = parser.parse(text).await;
        assert!(Intent::ALL.contains(&cmd.intent));
    }
}
