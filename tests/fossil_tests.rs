mod common;

use common::MockEnvironment;
use powerline_segments::*;
use std::sync::Arc;

const STATUS_OUTPUT: &str = "
    repository:   /Users/jan/Downloads/myclone.fossil
    local-root:   /Users/jan/Projects/fossil/
    config-db:    /Users/jan/.config/fossil.db
    checkout:     0fabc4f3566c7e7d9e528b17253de42e14dd5c7b 2022-06-05 04:06:17 UTC
    parent:       e8a051e6a943a26c9c33a30df8ceda069c06c174 2022-06-04 23:09:02 UTC
    tags:         trunk
    comment:      In the /setup_skin page, add a mention of/link to /skins, per request in the forum. (user: stephan)
    CONFLICT             test.tst
    DELETED\t             test.tst
    MISSING              test.tst
    ADDED                test.tst
    ADDED_BY_INTEGRATE   test.tst
    ADDED_BY_MERGE       test.tst
    EDITED               auto.def
    UPDATED              test.tst
    UPDATED_BY_INTEGRATE test.tst
    UPDATED_BY_MERGE \t test.tst
    CHANGED \t         test.tst
    RENAMED \t\t     test.tst
";

fn fossil_env(output: Result<&str, &str>) -> Arc<MockEnvironment> {
    Arc::new(
        MockEnvironment::new()
            .with_command(FOSSIL_COMMAND)
            .with_output(FOSSIL_COMMAND, FOSSIL_STATUS_ARGS, output),
    )
}

#[tokio::test]
async fn test_not_installed_runs_nothing() {
    let env = Arc::new(MockEnvironment::new().with_output(
        FOSSIL_COMMAND,
        FOSSIL_STATUS_ARGS,
        Ok(STATUS_OUTPUT),
    ));

    let mut segment = FossilSegment::new(FossilConfig::default(), env.clone());

    assert!(!segment.enabled().await);
    assert!(matches!(
        segment.state().disabled_reason(),
        Some(Disabled::ToolUnavailable(_))
    ));
    assert!(env.command_calls().is_empty());
    assert_eq!(segment.render(), None);
}

#[tokio::test]
async fn test_command_error_disables() {
    let env = fossil_env(Err("not within an open checkout"));
    let mut segment = FossilSegment::new(FossilConfig::default(), env.clone());

    assert!(!segment.enabled().await);
    assert!(matches!(
        segment.state().disabled_reason(),
        Some(Disabled::ExecutionError(ProbeError::ExitStatus { .. }))
    ));
    assert_eq!(env.command_calls(), vec!["fossil status".to_string()]);
}

#[tokio::test]
async fn test_default_status() {
    let mut segment = FossilSegment::new(FossilConfig::default(), fossil_env(Ok(STATUS_OUTPUT)));

    assert!(segment.enabled().await);

    let info = segment.state().model().unwrap();
    assert_eq!(info.branch, "trunk");
    assert_eq!(info.status, "+3 ~5 -2 >1 !1");
    assert!(info.changed);
    assert_eq!(
        (info.added, info.modified, info.deleted, info.renamed, info.conflicted),
        (3, 5, 2, 1, 1)
    );

    assert_eq!(segment.render().as_deref(), Some("\u{e725} trunk +3 ~5 -2 >1 !1"));
}

#[tokio::test]
async fn test_clean_checkout_is_still_enabled() {
    let output = "repository: /tmp/x.fossil\ntags: trunk\n";
    let mut segment = FossilSegment::new(FossilConfig::default(), fossil_env(Ok(output)));

    assert!(segment.enabled().await);
    let info = segment.state().model().unwrap();
    assert_eq!(info.status, "");
    assert!(!info.changed);
    assert_eq!(segment.render().as_deref(), Some("\u{e725} trunk"));
}

#[tokio::test]
async fn test_empty_output_is_enabled_with_no_branch() {
    let mut segment = FossilSegment::new(FossilConfig::default(), fossil_env(Ok("")));

    assert!(segment.enabled().await);
    let info = segment.state().model().unwrap();
    assert_eq!(info.branch, "");
    assert_eq!(info.status, "");
}

#[test]
fn test_branch_ignores_line_order_and_headers() {
    let with_headers = "checkout: abc\nEDITED a.c\ntags: feature-x\nADDED b.c\nparent: def\n";
    let bare = "ADDED b.c\nEDITED a.c\ntags: feature-x\n";
    let tags_first = "tags: feature-x\nADDED b.c\nEDITED a.c\n";

    for output in [with_headers, bare, tags_first] {
        let status = parse_status(output);
        assert_eq!(status.branch, "feature-x", "{:?}", output);
        assert_eq!(status.counts.to_string(), "+1 ~1", "{:?}", output);
    }
}

#[test]
fn test_summary_lists_only_nonzero_categories() {
    let cases: Vec<(Vec<&str>, &str)> = vec![
        (vec![], ""),
        (vec!["ADDED"], "+1"),
        (vec!["MISSING", "DELETED", "MISSING"], "-3"),
        (vec!["CONFLICT", "ADDED_BY_MERGE"], "+1 !1"),
        (vec!["RENAMED", "CHANGED", "UPDATED_BY_MERGE"], "~2 >1"),
        (vec!["DELETED", "RENAMED", "RENAMED", "EDITED"], "~1 -1 >2"),
        (vec!["UNKNOWN_KEYWORD", "added", "EXTRA"], ""),
    ];

    for (keywords, expected) in cases {
        let output = keywords
            .iter()
            .map(|k| format!("{}  some/file.txt", k))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_status(&output).counts.to_string(), expected, "{:?}", keywords);
    }
}

#[tokio::test]
async fn test_configured_command_and_template() {
    let env = Arc::new(
        MockEnvironment::new()
            .with_command("/opt/fossil/bin/fossil")
            .with_output("/opt/fossil/bin/fossil", &["status"], Ok("tags: trunk\nEDITED x\n")),
    );
    let config = FossilConfig {
        enabled: true,
        command: Some("/opt/fossil/bin/fossil".to_string()),
        template: Some("{{ Branch }}:{{ Modified }}".to_string()),
    };

    let mut segment = FossilSegment::new(config, env.clone());

    assert_eq!(segment.command(), "/opt/fossil/bin/fossil");
    assert!(segment.enabled().await);
    assert_eq!(segment.render().as_deref(), Some("trunk:1"));
    assert_eq!(env.command_calls(), vec!["/opt/fossil/bin/fossil status".to_string()]);
}

#[tokio::test]
async fn test_bad_template_keeps_segment_enabled() {
    let config = FossilConfig {
        template: Some("{{ Branch }} {{ Upstream }}".to_string()),
        ..FossilConfig::default()
    };
    let mut segment = FossilSegment::new(config, fossil_env(Ok(STATUS_OUTPUT)));

    assert!(segment.enabled().await);
    assert_eq!(segment.render().as_deref(), Some(INCORRECT_TEMPLATE));
    assert!(segment.state().is_enabled());
}
