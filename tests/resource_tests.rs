#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use retdec::{
    api::Response, Analysis, ClientError, Decompilation, OnError, ResourceError, ResourceStatus,
};
use serde_json::json;

use common::{instant_polling, status, MockConnection, API_URL};

fn decompilation(conn: &Arc<MockConnection>) -> Decompilation {
    Decompilation::new("123", conn.clone())
        .unwrap()
        .with_polling_policy(instant_polling())
}

fn analysis(conn: &Arc<MockConnection>) -> Analysis {
    Analysis::new("abc", conn.clone())
        .unwrap()
        .with_polling_policy(instant_polling())
}

#[test]
fn test_urls_are_derived_from_id() {
    let conn = MockConnection::new();
    let d = decompilation(&conn);

    assert_eq!(d.id(), "123");
    assert_eq!(
        d.base_url().as_str(),
        format!("{API_URL}/decompiler/decompilations/123")
    );
    assert_eq!(
        d.status_url().as_str(),
        format!("{API_URL}/decompiler/decompilations/123/status")
    );
    assert_eq!(
        d.outputs_url().as_str(),
        format!("{API_URL}/decompiler/decompilations/123/outputs")
    );

    let a = analysis(&conn);
    assert_eq!(
        a.status_url().as_str(),
        format!("{API_URL}/fileinfo/analyses/abc/status")
    );
    assert_eq!(conn.request_count(), 0);
}

#[test]
fn test_unfinished_status_keeps_defaults() {
    let conn = MockConnection::new();
    conn.respond_json(json!({"finished": false}));
    let mut d = decompilation(&conn);

    d.update_status().unwrap();

    assert_eq!(d.status(), &ResourceStatus::default());
    assert!(!d.has_finished_cached());
    assert!(!d.has_succeeded_cached());
    assert!(!d.has_failed_cached());
    assert_eq!(d.error_cached(), "");
    assert_eq!(d.completion_cached(), 0);

    let request = conn.last_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, d.status_url().as_str());
}

#[test]
fn test_update_if_needed_polls_pending_resource_once() {
    let conn = MockConnection::new();
    conn.respond_json(json!({"finished": false, "completion": 30}));
    let mut d = decompilation(&conn);

    d.update_status_if_needed().unwrap();

    assert_eq!(conn.request_count(), 1);
    assert_eq!(d.completion_cached(), 30);
}

#[test]
fn test_update_if_needed_skips_finished_resource() {
    let conn = MockConnection::new();
    conn.respond_json(json!({
        "finished": true,
        "succeeded": true,
        "completion": 100
    }));
    let mut d = decompilation(&conn);

    assert!(d.has_finished().unwrap());
    assert_eq!(conn.request_count(), 1);

    d.update_status_if_needed().unwrap();
    assert!(d.has_succeeded().unwrap());
    assert!(!d.has_failed().unwrap());
    assert_eq!(d.completion().unwrap(), 100);
    assert_eq!(d.error().unwrap(), "");
    assert_eq!(conn.request_count(), 1);
}

#[test]
fn test_update_status_always_polls() {
    let conn = MockConnection::new();
    conn.respond_json(status(true)).respond_json(status(true));
    let mut a = analysis(&conn);

    a.update_status().unwrap();
    a.update_status().unwrap();

    assert_eq!(conn.request_count(), 2);
}

#[test]
fn test_wait_polls_until_finished() {
    let conn = MockConnection::new();
    conn.respond_json(status(false))
        .respond_json(status(false))
        .respond_json(status(true));
    let mut a = analysis(&conn);

    a.wait_until_finished(OnError::Raise).unwrap();

    assert!(a.has_finished_cached());
    assert!(a.has_succeeded_cached());
    assert_eq!(conn.request_count(), 3);
}

#[test]
fn test_wait_on_finished_resource_issues_no_request() {
    let conn = MockConnection::new();
    conn.respond_json(status(true));
    let mut a = analysis(&conn);
    a.update_status().unwrap();

    a.wait_until_finished(OnError::Raise).unwrap();

    assert_eq!(conn.request_count(), 1);
}

#[test]
fn test_wait_suppressing_errors_leaves_failure_readable() {
    let conn = MockConnection::new();
    conn.respond_json(json!({
        "finished": true,
        "succeeded": false,
        "failed": true,
        "error": "Unsupported file format."
    }));
    let mut d = decompilation(&conn);

    d.wait_until_finished(OnError::Suppress).unwrap();

    assert!(d.has_failed().unwrap());
    assert!(!d.has_succeeded().unwrap());
    assert_eq!(d.error().unwrap(), "Unsupported file format.");
    assert_eq!(conn.request_count(), 1);
}

#[test]
fn test_wait_raises_decompilation_failure() {
    let conn = MockConnection::new();
    conn.respond_json(json!({
        "finished": true,
        "failed": true,
        "error": "Unsupported file format."
    }));
    let mut d = decompilation(&conn);

    match d.wait_until_finished(OnError::Raise) {
        Err(ClientError::Resource(ResourceError::Decompilation(error))) => {
            assert_eq!(error, "Unsupported file format.");
        }
        other => panic!("Expected decompilation failure, got {other:?}"),
    }
    assert!(d.has_failed_cached());
}

#[test]
fn test_wait_raises_analysis_failure() {
    let conn = MockConnection::new();
    conn.respond_json(json!({"finished": true, "failed": true, "error": "oops"}));
    let mut a = analysis(&conn);

    let err = a.wait_until_finished(OnError::default()).unwrap_err();

    assert_eq!(err.to_string(), "Analysis failed: oops");
}

#[test]
fn test_api_error_while_polling_aborts_wait() {
    let conn = MockConnection::new();
    conn.respond_json(status(false))
        .respond_error(404, "Not Found", "No such decompilation.")
        .respond_json(status(true));
    let mut d = decompilation(&conn);

    match d.wait_until_finished(OnError::Suppress) {
        Err(ClientError::Api(error)) => {
            assert_eq!(error.code, 404);
            assert_eq!(error.description(), "No such decompilation.");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
    assert_eq!(conn.request_count(), 2);
    assert!(!d.has_finished_cached());
}

#[test]
fn test_malformed_status_aborts_wait() {
    let conn = MockConnection::new();
    conn.respond(Response::new(200, "OK", "not json"));
    let mut a = analysis(&conn);

    assert!(matches!(
        a.wait_until_finished(OnError::Suppress),
        Err(ClientError::JsonDecoding(_))
    ));
}

#[test]
fn test_callback_follows_completion_changes() {
    let conn = MockConnection::new();
    conn.respond_json(json!({"finished": false, "completion": 0}))
        .respond_json(json!({"finished": false, "completion": 20}))
        .respond_json(json!({"finished": false, "completion": 20}))
        .respond_json(json!({"finished": false, "completion": 70}))
        .respond_json(json!({"finished": true, "succeeded": true, "completion": 100}));
    let mut d = decompilation(&conn);

    let mut seen = Vec::new();
    d.wait_until_finished_with(|d| seen.push(d.completion_cached()), OnError::Raise)
        .unwrap();

    assert_eq!(seen, vec![20, 70, 100]);
    assert_eq!(conn.request_count(), 5);
}

#[test]
fn test_poll_limit_gives_up() {
    let conn = MockConnection::new();
    conn.respond_json(status(false))
        .respond_json(status(false))
        .respond_json(status(false));
    let mut a = analysis(&conn);
    a.set_polling_policy(instant_polling().with_max_polls(3));

    match a.wait_until_finished(OnError::Raise) {
        Err(ClientError::StillRunning { id, polls }) => {
            assert_eq!(id, "abc");
            assert_eq!(polls, 3);
        }
        other => panic!("Expected StillRunning, got {other:?}"),
    }
    assert_eq!(conn.request_count(), 3);
}

#[test]
fn test_hll_output_is_fetched_once() {
    let conn = MockConnection::new();
    conn.respond(
        Response::new(200, "OK", "int main() { return 0; }")
            .with_content_disposition("attachment; filename=test.c"),
    );
    let mut d = decompilation(&conn);

    let file = d.output_hll_file().unwrap();
    assert_eq!(file.name(), "test.c");
    assert_eq!(d.output_hll().unwrap(), "int main() { return 0; }");

    assert_eq!(conn.request_count(), 1);
    assert_eq!(
        conn.last_request().url,
        format!("{API_URL}/decompiler/decompilations/123/outputs/hll")
    );
}

#[test]
fn test_outputs_are_cached_independently() {
    let conn = MockConnection::new();
    conn.respond(Response::new(200, "OK", "int main() {}"))
        .respond(Response::new(200, "OK", "; main"));
    let mut d = decompilation(&conn);

    assert_eq!(d.output_hll().unwrap(), "int main() {}");
    assert_eq!(d.output_dsm().unwrap(), "; main");
    assert_eq!(d.output_hll().unwrap(), "int main() {}");
    assert_eq!(d.output_dsm().unwrap(), "; main");

    let urls: Vec<_> = conn.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{API_URL}/decompiler/decompilations/123/outputs/hll"),
            format!("{API_URL}/decompiler/decompilations/123/outputs/dsm"),
        ]
    );
}

#[test]
fn test_failed_output_download_is_not_cached() {
    let conn = MockConnection::new();
    conn.respond_error(404, "Not Found", "")
        .respond(Response::new(200, "OK", "report"));
    let mut a = analysis(&conn);

    assert!(a.output().is_err());
    assert_eq!(a.output().unwrap(), "report");
    assert_eq!(
        conn.last_request().url,
        format!("{API_URL}/fileinfo/analyses/abc/output")
    );
}

#[test]
fn test_save_output_hll_to_directory() {
    let conn = MockConnection::new();
    conn.respond(
        Response::new(200, "OK", "int main() {}")
            .with_content_disposition("attachment; filename=test.c"),
    );
    let mut d = decompilation(&conn);
    let dir = tempfile::TempDir::new().unwrap();
    let dir_path = camino::Utf8Path::from_path(dir.path()).unwrap();

    let saved = d.save_output_hll_to(dir_path).unwrap();

    assert_eq!(saved, dir_path.join("test.c"));
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "int main() {}");
}

#[test]
fn test_null_flags_do_not_abort_wait() {
    let conn = MockConnection::new();
    conn.respond_json(json!({
        "finished": null,
        "succeeded": null,
        "failed": null,
        "completion": 50.0
    }))
    .respond_json(json!({
        "finished": true,
        "succeeded": null,
        "failed": true,
        "error": "x",
        "completion": 100.0
    }));
    let mut d = decompilation(&conn);

    let mut seen = Vec::new();
    d.wait_until_finished_with(|d| seen.push(d.completion_cached()), OnError::Suppress)
        .unwrap();

    assert_eq!(seen, vec![50, 100]);
    assert!(!d.has_succeeded_cached());
    assert!(d.has_failed_cached());
    assert_eq!(d.error_cached(), "x");
}

#[test]
fn test_poll_limit_reports_status_checks_made() {
    let conn = MockConnection::new();
    conn.respond_json(status(false));
    let mut a = analysis(&conn);
    a.set_polling_policy(instant_polling().with_max_polls(0));

    match a.wait_until_finished(OnError::Raise) {
        Err(ClientError::StillRunning { polls, .. }) => assert_eq!(polls, 1),
        other => panic!("Expected StillRunning, got {other:?}"),
    }
    assert_eq!(conn.request_count(), 1);
}
