/*
 * This file is part of Ideactl.
 *
 * Copyright (C) 2025 Ideactl contributors
 *
 * Ideactl is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Ideactl is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Ideactl. If not, see <https://www.gnu.org/licenses/>.
 */

use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;
use std::sync::mpsc::Sender;
use std::thread;

use serde_json::json;
use thiserror::Error;

use crate::logger;
use crate::options;

/// How a write reaches the driver file. Selected per attempt from live
/// settings, never cached at controller construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Write with the process's own permissions. Only useful when already
    /// running with rights on the sysfs attribute.
    Direct,
    /// Redirect the value into the file through `pkexec bash -c`.
    Escalated,
}

/// One requested state change, captured synchronously in the UI event
/// handler before any suspension point.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub option: String,
    pub device_path: String,
    /// State the user asked for.
    pub requested: bool,
    /// Ground truth read immediately before dispatch; the rollback target.
    pub previous: bool,
    pub strategy: WriteStrategy,
}

/// Resolution of a dispatched write, delivered back over the outcome channel.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub option: String,
    pub requested: bool,
    pub previous: bool,
    pub success: bool,
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to launch privilege helper: {0}")]
    Spawn(io::Error),
    #[error("privilege helper exited with status {0}")]
    HelperFailed(i32),
}

fn encode(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Quote-escape a path for embedding in a single-quoted shell string: each
/// `'` becomes `'\''` (close quote, literal quote, reopen quote).
pub fn escape_single_quotes(path: &str) -> String {
    path.replace('\'', "'\\''")
}

fn write_direct(path: &Path, value: bool) -> Result<(), WriteError> {
    fs::write(path, encode(value))?;
    Ok(())
}

fn write_escalated(path: &Path, value: bool) -> Result<(), WriteError> {
    let escaped = escape_single_quotes(&path.to_string_lossy());
    let script = format!("echo {} > '{}'", encode(value), escaped);
    let status = Command::new("pkexec")
        .args(["bash", "-c", script.as_str()])
        .status()
        .map_err(WriteError::Spawn)?;
    if status.success() {
        Ok(())
    } else {
        Err(WriteError::HelperFailed(status.code().unwrap_or(-1)))
    }
}

/// Perform one write synchronously and collapse every cause of failure
/// (permission, missing helper, non-zero exit, spawn error) into a single
/// boolean. The diagnostic goes to the structured log; callers need no
/// finer-grained recovery.
pub fn perform_write(req: &WriteRequest) -> bool {
    let path = options::option_path(&req.device_path, &req.option);
    let result = match req.strategy {
        WriteStrategy::Direct => write_direct(&path, req.requested),
        WriteStrategy::Escalated => write_escalated(&path, req.requested),
    };
    match result {
        Ok(()) => {
            logger::log_event(
                "write_result",
                json!({ "option": req.option, "value": encode(req.requested), "success": true }),
            );
            true
        }
        Err(e) => {
            logger::log_event(
                "write_result",
                json!({
                    "option": req.option,
                    "value": encode(req.requested),
                    "success": false,
                    "error": e.to_string(),
                }),
            );
            false
        }
    }
}

/// Dispatch a write on a background thread. The helper wait is the only
/// blocking step in the program; parking it on its own thread keeps every
/// other toggle's event handling live while this one is pending. Outcomes
/// come back through `tx` and are drained by the event loop each tick.
///
/// No ordering is imposed between concurrent dispatches. Two overlapping
/// writes to the same option race, and the last completion wins; see the
/// controller's opt-in serialization for the hardened mode.
pub fn spawn_write(req: WriteRequest, tx: Sender<WriteOutcome>) {
    thread::spawn(move || {
        let success = perform_write(&req);
        // Receiver may be gone if the UI was torn down mid-write
        let _ = tx.send(WriteOutcome {
            option: req.option,
            requested: req.requested,
            previous: req.previous,
            success,
        });
    });
}
