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

use std::sync::mpsc::Sender;

use serde_json::json;

use crate::logger;
use crate::notify::{self, NotificationSink, NOTIFY_TITLE};
use crate::options;
use crate::writer::{self, WriteOutcome, WriteRequest, WriteStrategy};

/// Dispatch boundary between a controller and the privileged writer, kept
/// behind a trait so controllers can be driven in tests without touching
/// the filesystem or pkexec.
#[cfg_attr(test, mockall::automock)]
pub trait OptionWriter {
    fn dispatch(&self, req: WriteRequest);
}

/// Production writer: hands each request to a background thread and reports
/// the outcome on the app's channel.
pub struct ThreadedWriter {
    tx: Sender<WriteOutcome>,
}

impl ThreadedWriter {
    pub fn new(tx: Sender<WriteOutcome>) -> Self {
        ThreadedWriter { tx }
    }
}

impl OptionWriter for ThreadedWriter {
    fn dispatch(&self, req: WriteRequest) {
        writer::spawn_write(req, self.tx.clone());
    }
}

/// Per-attempt write parameters, read fresh from settings on every toggle.
#[derive(Debug, Clone, Copy)]
pub struct WriteContext<'a> {
    pub device_path: &'a str,
    pub strategy: WriteStrategy,
    /// Opt-in hardening: hold a single-slot queue per option instead of
    /// letting rapid repeated toggles race. Off by default.
    pub serialize: bool,
}

/// One controller per supported option. `displayed` is a lazy cache of the
/// file state: it is set on construction and on user interaction, and may
/// be stale in between. Every toggle re-derives ground truth from the file
/// before deciding whether to write.
pub struct ToggleController {
    option: String,
    pub displayed: bool,
    in_flight: bool,
    queued: Option<bool>,
}

impl ToggleController {
    pub fn new(option: &str, device_path: &str) -> Self {
        ToggleController {
            option: option.to_string(),
            displayed: options::read_option(device_path, option),
            in_flight: false,
            queued: None,
        }
    }

    pub fn option(&self) -> &str {
        &self.option
    }

    pub fn display_name(&self) -> String {
        options::display_name(&self.option)
    }

    pub fn config_key(&self) -> String {
        options::config_key(&self.option)
    }

    /// Handle a user toggle. The visible control has already flipped to
    /// `desired` by the time its event fires, so the optimistic state is
    /// recorded first; a failed write rolls it back in `apply_outcome`.
    pub fn request_toggle(&mut self, desired: bool, ctx: &WriteContext, writer: &dyn OptionWriter) {
        self.displayed = desired;
        if ctx.serialize && self.in_flight {
            // Latest request wins the slot; it dispatches when the pending
            // write resolves.
            self.queued = Some(desired);
            return;
        }
        self.dispatch_if_needed(desired, ctx, writer);
    }

    fn dispatch_if_needed(&mut self, desired: bool, ctx: &WriteContext, writer: &dyn OptionWriter) {
        let actual = options::read_option(ctx.device_path, &self.option);
        if desired == actual {
            // The file already holds the requested state (the cache had
            // drifted in the right direction); zero writes issued.
            self.displayed = desired;
            return;
        }
        self.in_flight = true;
        logger::log_event(
            "write_dispatch",
            json!({ "option": self.option, "requested": desired, "previous": actual }),
        );
        writer.dispatch(WriteRequest {
            option: self.option.clone(),
            device_path: ctx.device_path.to_string(),
            requested: desired,
            previous: actual,
            strategy: ctx.strategy,
        });
    }

    /// Reconcile the visible state with a resolved write.
    ///
    /// Success keeps the requested state and notifies only when success
    /// notifications are enabled. Failure forces the control back to the
    /// pre-toggle ground truth and notifies unconditionally: the UI must
    /// never durably claim a state the file doesn't hold.
    pub fn apply_outcome(
        &mut self,
        outcome: &WriteOutcome,
        send_success: bool,
        ctx: &WriteContext,
        writer: &dyn OptionWriter,
        sink: &dyn NotificationSink,
    ) {
        self.in_flight = false;
        if outcome.success {
            self.displayed = outcome.requested;
            if send_success {
                sink.notify(NOTIFY_TITLE, &notify::success_body(&self.option, outcome.requested));
            }
        } else {
            self.displayed = outcome.previous;
            sink.notify(NOTIFY_TITLE, &notify::failure_body(&self.option));
        }
        if let Some(next) = self.queued.take() {
            self.displayed = next;
            self.dispatch_if_needed(next, ctx, writer);
        }
    }
}
