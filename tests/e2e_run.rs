
use std::fs;

use serde_json::Value;
use tempfile::tempdir;

use support_single::{run_stagger, spawn_http_server};

fn read_report(path: &std::path::Path) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|err| format!("read report failed: {}", err))?;
    serde_json::from_str(&text).map_err(|err| format!("parse report failed: {}", err))
}

fn failure(output: &std::process::Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_writes_one_outcome_per_slot_in_launch_order() -> Result<(), String> {
    let (url, server) = spawn_http_server(200, r#"{"code":0,"data":{"msg":"完成"}}"#)?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report_path = dir.path().join("result.json");

    let output = run_stagger([
        "-u".to_owned(),
        url,
        "--token".to_owned(),
        "hk-0123456789abcdef".to_owned(),
        "-d".to_owned(),
        r#"{"model":"jimeng-4.5","prompt":"图一为原图"}"#.to_owned(),
        "-n".to_owned(),
        "3".to_owned(),
        "--stagger-min".to_owned(),
        "0".to_owned(),
        "--stagger-max".to_owned(),
        "50ms".to_owned(),
        "--backoff".to_owned(),
        "10ms,10ms,10ms".to_owned(),
        "--timeout".to_owned(),
        "10s".to_owned(),
        "--probe".to_owned(),
        "-o".to_owned(),
        report_path.to_string_lossy().into_owned(),
    ])?;
    if !output.status.success() {
        return Err(failure(&output));
    }

    let report = read_report(&report_path)?;
    let requests = report
        .get("requests")
        .and_then(Value::as_array)
        .ok_or_else(|| "Expected a requests array".to_owned())?;
    let indices: Vec<u64> = requests
        .iter()
        .filter_map(|request| request.get("index").and_then(Value::as_u64))
        .collect();
    if indices != [1, 2, 3] {
        return Err(format!("Unexpected indices: {:?}", indices));
    }
    for request in requests {
        if request.get("status") != Some(&Value::from(200)) {
            return Err(format!("Unexpected outcome: {}", request));
        }
        if request.get("retry_count") != Some(&Value::from(0)) {
            return Err(format!("Unexpected retry count: {}", request));
        }
    }
    if report.get("created").and_then(Value::as_i64).is_none() {
        return Err("Expected a created timestamp".to_owned());
    }
    let probe_ok = report
        .get("connection_test")
        .and_then(|probe| probe.get("success"))
        .and_then(Value::as_bool);
    if probe_ok != Some(true) {
        return Err(format!("Unexpected connection test: {}", report));
    }
    let raw = fs::read_to_string(&report_path).map_err(|err| format!("read failed: {}", err))?;
    if !raw.contains("完成") {
        return Err("Expected unescaped Unicode in the report".to_owned());
    }
    if server.hits() != 3 {
        return Err(format!("Expected 3 requests, got {}", server.hits()));
    }
    Ok(())
}

#[test]
fn e2e_http_errors_still_exit_successfully() -> Result<(), String> {
    let (url, server) = spawn_http_server(500, "internal error")?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report_path = dir.path().join("result.json");

    let output = run_stagger([
        "-u".to_owned(),
        url,
        "-n".to_owned(),
        "2".to_owned(),
        "--stagger-min".to_owned(),
        "0".to_owned(),
        "--stagger-max".to_owned(),
        "0".to_owned(),
        "-o".to_owned(),
        report_path.to_string_lossy().into_owned(),
    ])?;
    if !output.status.success() {
        return Err(failure(&output));
    }

    let report = read_report(&report_path)?;
    let requests = report
        .get("requests")
        .and_then(Value::as_array)
        .ok_or_else(|| "Expected a requests array".to_owned())?;
    if requests.len() != 2 {
        return Err(format!("Expected 2 outcomes: {}", report));
    }
    for request in requests {
        if request.get("error").and_then(Value::as_str) != Some("internal error") {
            return Err(format!("Unexpected outcome: {}", request));
        }
    }
    if server.hits() != 2 {
        return Err(format!("Expected no retries, got {} calls", server.hits()));
    }
    Ok(())
}

#[test]
fn e2e_unwritable_report_fails_the_run() -> Result<(), String> {
    let (url, _server) = spawn_http_server(200, r#"{"code":0}"#)?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report_path = dir.path().join("missing").join("result.json");

    let output = run_stagger([
        "-u".to_owned(),
        url,
        "-n".to_owned(),
        "1".to_owned(),
        "-o".to_owned(),
        report_path.to_string_lossy().into_owned(),
    ])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", failure(&output)));
    }
    Ok(())
}

#[test]
fn e2e_missing_url_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report_path = dir.path().join("result.json");
    let output = run_stagger([
        "-n".to_owned(),
        "1".to_owned(),
        "-o".to_owned(),
        report_path.to_string_lossy().into_owned(),
    ])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", failure(&output)));
    }
    if report_path.exists() {
        return Err("No report should be written without a URL".to_owned());
    }
    Ok(())
}
