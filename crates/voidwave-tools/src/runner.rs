//! Spawns a tool's argv, streams stdout line-by-line classifying each
//! line, and enforces an overall timeout by killing the whole process
//! group. Grounded on the teacher's `csa-process::spawn_tool` +
//! `wait_and_capture_with_idle_timeout` + `kill_child_process_group`,
//! simplified from idle-timeout to an overall deadline (a chain step's
//! `timeout_seconds` bounds total wall time, not silence).
//!
//! Event emission is injected as a callback rather than wired to a
//! concrete event bus, so this crate doesn't need to depend on
//! `voidwave-events` — the same explicit-data-flow preference behind
//! `voidwave-requirements`'s session-aware closures.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

use voidwave_core::{CoreError, CoreResult, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Error,
    Warning,
    Success,
    Info,
}

const ERROR_KEYWORDS: &[&str] = &["error", "failed", "exception", "traceback", "fatal"];
const WARNING_KEYWORDS: &[&str] = &["warning", "warn", "deprecated"];
const SUCCESS_KEYWORDS: &[&str] = &["success", "completed", "found", "cracked", "done"];

pub fn classify_line(line: &str) -> LineClass {
    let lower = line.to_lowercase();
    if ERROR_KEYWORDS.iter().any(|k| lower.contains(k)) {
        LineClass::Error
    } else if WARNING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        LineClass::Warning
    } else if SUCCESS_KEYWORDS.iter().any(|k| lower.contains(k)) {
        LineClass::Success
    } else {
        LineClass::Info
    }
}

/// Run `argv` to completion, classifying each stdout line through
/// `on_line`, and parsing the accumulated stdout with `parse`.
///
/// Returns `Err(CoreError::Timeout)` if the process is still running
/// after `timeout_duration`; the whole process group is killed first.
pub async fn run(
    argv: &[String],
    timeout_duration: Duration,
    mut on_line: impl FnMut(&str, LineClass),
    parse: impl FnOnce(&str) -> serde_json::Value,
) -> CoreResult<ToolOutcome> {
    let Some((program, args)) = argv.split_first() else {
        return Err(CoreError::Configuration {
            chain_id: "<tool-runner>".to_string(),
            reason: "empty argv".to_string(),
        });
    };

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.stdin(Stdio::null());
    cmd.kill_on_drop(true);

    #[cfg(unix)]
    unsafe {
        cmd.pre_exec(|| {
            libc::setsid();
            Ok(())
        });
    }

    let mut child = cmd.spawn().map_err(|_| CoreError::ToolMissing(program.clone()))?;

    let stdout = child.stdout.take().expect("stdout piped");
    let stderr = child.stderr.take().expect("stderr piped");

    let mut output = String::new();
    let mut errors = Vec::new();

    let drain = async {
        let mut out_lines = BufReader::new(stdout).lines();
        let mut err_lines = BufReader::new(stderr).lines();
        loop {
            tokio::select! {
                line = out_lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            let class = classify_line(&line);
                            on_line(&line, class);
                            if class == LineClass::Error {
                                errors.push(line.clone());
                            }
                            output.push_str(&line);
                            output.push('\n');
                        }
                        Ok(None) => break,
                        Err(_) => break,
                    }
                }
                line = err_lines.next_line() => {
                    if let Ok(Some(line)) = line {
                        on_line(&line, LineClass::Warning);
                    }
                }
            }
        }
        (output, errors)
    };

    let (drained, wait_result) = match timeout(timeout_duration, async { (drain.await, child.wait().await) }).await {
        Ok((drained, wait_result)) => (drained, wait_result),
        Err(_) => {
            warn!(timeout_secs = timeout_duration.as_secs(), "killing process group after timeout");
            kill_process_group(&mut child);
            let _ = child.wait().await;
            return Err(CoreError::Timeout {
                step_id: program.clone(),
                seconds: timeout_duration.as_secs(),
            });
        }
    };

    let (output, mut errors) = drained;
    let status = wait_result.map_err(|e| CoreError::StepExecution {
        step_id: program.clone(),
        message: e.to_string(),
    })?;
    let exit_ok = status.success();

    let data = parse(&output);
    if !exit_ok {
        errors.push(format!("process exited with status {status}"));
    }

    Ok(ToolOutcome { success: exit_ok, data, errors })
}

fn kill_process_group(child: &mut tokio::process::Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            unsafe {
                libc::kill(-(pid as i32), libc::SIGTERM);
            }
            return;
        }
    }
    let _ = child.start_kill();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_error_before_warning_keywords() {
        assert_eq!(classify_line("ERROR: connection refused"), LineClass::Error);
        assert_eq!(classify_line("Warning: deprecated flag"), LineClass::Warning);
        assert_eq!(classify_line("scan completed successfully"), LineClass::Success);
        assert_eq!(classify_line("just some status text"), LineClass::Info);
    }

    #[tokio::test]
    async fn runs_a_trivial_command_and_parses_its_output() {
        let argv = vec!["echo".to_string(), "hello world".to_string()];
        let mut lines = Vec::new();
        let outcome = run(
            &argv,
            Duration::from_secs(5),
            |line, _| lines.push(line.to_string()),
            |raw| serde_json::json!({"raw": raw.trim()}),
        )
        .await
        .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.data["raw"], serde_json::json!("hello world"));
    }

    #[tokio::test]
    async fn kills_process_group_on_timeout() {
        let argv = vec!["sleep".to_string(), "5".to_string()];
        let result = run(&argv, Duration::from_millis(50), |_, _| {}, |raw| serde_json::json!(raw)).await;
        assert!(matches!(result, Err(CoreError::Timeout { .. })));
    }
}
