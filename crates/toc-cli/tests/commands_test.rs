//! Command-level tests for essential-toc.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use toc_cli::{follow_lines, format_resolution, handle_build, resolve, send_and_wait, Resolution};
use toc_nav::{ExpansionTracker, Location, SelectionStore, Toc};
use toc_scheduler::DebounceConfig;
use toc_telemetry::mock::{FailingTransport, SlowTransport};
use toc_telemetry::{Diagnostic, RemoteLogger};

const OUTLINE: &str = r#"{
  "title": "Essential Go",
  "chapters": [
    {
      "title": "Strings",
      "url": "5-strings",
      "articles": [
        {
          "title": "Trimming",
          "url": "6-trimming",
          "headings": [{ "text": "TrimSpace", "id": "trimspace" }]
        }
      ]
    }
  ]
}"#;

fn built_toc() -> (tempfile::TempDir, Toc) {
    let dir = tempfile::tempdir().unwrap();
    let outline = dir.path().join("book.json");
    let out = dir.path().join("toc_search.js");
    std::fs::write(&outline, OUTLINE).unwrap();

    handle_build(outline.to_str().unwrap(), Some(out.to_str().unwrap()), true).unwrap();

    let toc = Toc::load(&out).unwrap();
    (dir, toc)
}

#[test]
fn test_build_then_resolve() {
    let (_dir, toc) = built_toc();
    let mut tracker = ExpansionTracker::new();
    let selection = SelectionStore::new();

    let location = Location::new("/essential/go/6-trimming", "#trimspace");
    let resolution = resolve(&toc, &location, &mut tracker, &selection);

    assert_eq!(
        resolution,
        Resolution {
            location: "/essential/go/6-trimming#trimspace".to_string(),
            selected: Some(2),
            expanded: vec![2, 1, 0],
        }
    );
    assert_eq!(selection.get(), Some(2));

    let text = format_resolution(&toc, &resolution);
    assert!(text.contains("selected [2] TrimSpace"));
    assert!(text.contains("expanded [0] Strings (5-strings)"));
}

#[test]
fn test_resolve_no_match() {
    let (_dir, toc) = built_toc();
    let mut tracker = ExpansionTracker::new();
    let selection = SelectionStore::new();

    let resolution = resolve(&toc, &Location::from_path("/missing"), &mut tracker, &selection);

    assert_eq!(resolution.selected, None);
    assert!(resolution.expanded.is_empty());
    assert!(format_resolution(&toc, &resolution).contains("no entry matches"));
}

#[test]
fn test_build_missing_outline() {
    let result = handle_build("/nonexistent/book.json", None, false);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_send_and_wait_reports_failure() {
    let logger = RemoteLogger::with_transport(Arc::new(FailingTransport::new()));

    let diagnostic = send_and_wait(logger, &serde_json::json!({ "a": 1 }), Duration::from_secs(1)).await;

    assert!(matches!(diagnostic, Some(Diagnostic::Failed { .. })));
}

#[tokio::test]
async fn test_send_and_wait_disabled_times_out() {
    let diagnostic = send_and_wait(
        RemoteLogger::disabled(),
        &serde_json::json!({ "a": 1 }),
        Duration::from_millis(50),
    )
    .await;

    assert!(diagnostic.is_none());
}

fn observed(logger: RemoteLogger) -> (RemoteLogger, mpsc::UnboundedReceiver<Diagnostic>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let logger = logger.with_observer(move |d| {
        let _ = tx.send(d.clone());
    });
    (logger, rx)
}

#[tokio::test(start_paused = true)]
async fn test_follow_waits_for_slow_log_delivery() {
    let (_dir, toc) = built_toc();
    let transport = Arc::new(SlowTransport::new(Duration::from_secs(2)));
    let (logger, mut rx) = observed(RemoteLogger::with_transport(transport.clone()));

    let input: &[u8] = b"/essential/go/5-strings\n/essential/go/6-trimming#trimspace\n";
    follow_lines(
        toc,
        ExpansionTracker::new(),
        logger,
        &DebounceConfig::new(50),
        Duration::from_secs(10),
        input,
    )
    .await
    .unwrap();

    // Only the settled location was resolved, and its delivery finished
    assert_eq!(rx.try_recv().unwrap(), Diagnostic::Sent { status: 200 });
    assert!(rx.try_recv().is_err());

    let bodies = transport.bodies();
    assert_eq!(bodies.len(), 1);
    let sent: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(sent["selected"], 2);
    assert_eq!(sent["expanded"], serde_json::json!([2, 1, 0]));
}

#[tokio::test(start_paused = true)]
async fn test_follow_gives_up_on_stuck_delivery() {
    let (_dir, toc) = built_toc();
    let transport = Arc::new(SlowTransport::new(Duration::from_secs(60)));
    let (logger, mut rx) = observed(RemoteLogger::with_transport(transport));

    let input: &[u8] = b"5-strings\n";
    follow_lines(
        toc,
        ExpansionTracker::new(),
        logger,
        &DebounceConfig::new(50),
        Duration::from_secs(1),
        input,
    )
    .await
    .unwrap();

    assert!(rx.try_recv().is_err());
}
