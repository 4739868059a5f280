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

use std::process::Command;

use serde_json::json;

use crate::logger;
use crate::options;

pub const NOTIFY_TITLE: &str = "Ideapad Controls";

/// Outcome messages shown to the user. Fire-and-forget: no delivery
/// guarantee, and a sink failure never affects toggle handling.
pub trait NotificationSink {
    fn notify(&self, title: &str, body: &str);
}

/// Body for a successful state change, e.g. "Enabled Camera Power".
pub fn success_body(option_id: &str, enabled: bool) -> String {
    if enabled {
        format!("Enabled {}", options::display_name(option_id))
    } else {
        format!("Disabled {}", options::display_name(option_id))
    }
}

/// Body for a failed state change. Uniform regardless of the root cause.
pub fn failure_body(option_id: &str) -> String {
    format!("Could not change {}", options::display_name(option_id))
}

/// Sends through `notify-send` when a desktop session is around, and always
/// mirrors the message into the structured log.
pub struct DesktopNotifier;

impl NotificationSink for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        let _ = Command::new("notify-send").args([title, body]).spawn();
        logger::log_event("notify", json!({ "title": title, "body": body }));
    }
}

/// Swallows everything; used by the non-interactive CLI paths that already
/// print to stdout/stderr.
pub struct NullNotifier;

impl NotificationSink for NullNotifier {
    fn notify(&self, _title: &str, _body: &str) {}
}
