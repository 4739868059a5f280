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

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant, SystemTime};

use serde_json::json;

use crate::config::{self, Settings};
use crate::controller::{ToggleController, WriteContext, ThreadedWriter};
use crate::logger;
use crate::notify::NotificationSink;
use crate::options;
use crate::writer::{WriteOutcome, WriteStrategy};

pub struct App {
    pub settings: Settings,
    settings_stamp: Option<SystemTime>,
    pub controllers: Vec<ToggleController>,
    /// Index into the *visible* rows, not the controller list.
    pub selected: usize,
    pub status: String,
    pub tick_interval: Duration,
    pub last_tick: Instant,
    outcome_rx: Receiver<WriteOutcome>,
    writer: ThreadedWriter,
    pub notifier: Box<dyn NotificationSink>,
}

impl App {
    pub fn new(notifier: Box<dyn NotificationSink>) -> App {
        let settings = config::load_saved_settings().unwrap_or_default();
        let mut app = Self::with_settings(settings, notifier);
        app.settings_stamp = config::settings_stamp();
        app
    }

    pub fn with_settings(settings: Settings, notifier: Box<dyn NotificationSink>) -> App {
        let (tx, rx) = mpsc::channel();
        let mut app = App {
            settings,
            settings_stamp: None,
            controllers: Vec::new(),
            selected: 0,
            status: String::new(),
            tick_interval: Duration::from_millis(250),
            last_tick: Instant::now(),
            outcome_rx: rx,
            writer: ThreadedWriter::new(tx),
            notifier,
        };
        app.rebuild();
        app
    }

    /// Run discovery and reconstruct one controller per supported option.
    /// Called once per enable-cycle: startup, explicit refresh, and
    /// whenever the settings file changes.
    pub fn rebuild(&mut self) {
        let supported = options::supported_options(&self.settings.sysfs_path);
        self.controllers = supported
            .iter()
            .map(|id| ToggleController::new(id, &self.settings.sysfs_path))
            .collect();
        logger::log_event(
            "menu_rebuild",
            json!({ "sysfs_path": self.settings.sysfs_path, "options": supported }),
        );
        if self.controllers.is_empty() {
            self.status = format!("no supported options under {}", self.settings.sysfs_path);
        }
        let visible = self.visible_rows().len();
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
    }

    /// Controller indexes of the rows the settings allow to be shown.
    pub fn visible_rows(&self) -> Vec<usize> {
        self.controllers
            .iter()
            .enumerate()
            .filter(|(_, c)| self.settings.option_visible(&c.config_key()))
            .map(|(i, _)| i)
            .collect()
    }

    fn strategy(&self) -> WriteStrategy {
        if self.settings.use_pkexec {
            WriteStrategy::Escalated
        } else {
            WriteStrategy::Direct
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible_rows().len() {
            self.selected += 1;
        }
    }

    /// Flip the selected toggle. The desired state is captured here,
    /// synchronously, before the write suspends on its worker thread.
    pub fn toggle_selected(&mut self) {
        let Some(idx) = self.visible_rows().get(self.selected).copied() else {
            return;
        };
        let strategy = self.strategy();
        let ctx = WriteContext {
            device_path: &self.settings.sysfs_path,
            strategy,
            serialize: self.settings.serialize_writes,
        };
        let controller = &mut self.controllers[idx];
        let desired = !controller.displayed;
        controller.request_toggle(desired, &ctx, &self.writer);
        self.status = format!(
            "{} -> {}",
            options::display_name(self.controllers[idx].option()),
            if desired { "on" } else { "off" }
        );
    }

    /// Apply every write outcome that has landed since the last tick.
    /// Routed by option identity; options resolve independently of each
    /// other's timing.
    pub fn drain_outcomes(&mut self) {
        loop {
            let outcome = match self.outcome_rx.try_recv() {
                Ok(o) => o,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            let strategy = self.strategy();
            let ctx = WriteContext {
                device_path: &self.settings.sysfs_path,
                strategy,
                serialize: self.settings.serialize_writes,
            };
            if let Some(controller) = self
                .controllers
                .iter_mut()
                .find(|c| c.option() == outcome.option)
            {
                controller.apply_outcome(
                    &outcome,
                    self.settings.send_success_notifications,
                    &ctx,
                    &self.writer,
                    self.notifier.as_ref(),
                );
                self.status = if outcome.success {
                    format!(
                        "{} is now {}",
                        options::display_name(&outcome.option),
                        if outcome.requested { "on" } else { "off" }
                    )
                } else {
                    format!(
                        "could not change {}, reverted",
                        options::display_name(&outcome.option)
                    )
                };
            }
        }
    }

    /// Change subscription over the settings store: a stamp change reloads
    /// settings and rebuilds the whole toggle menu (placement, visibility,
    /// device path may all have moved).
    pub fn maybe_reload_settings(&mut self) {
        let stamp = config::settings_stamp();
        if stamp == self.settings_stamp {
            return;
        }
        self.settings_stamp = stamp;
        if let Some(settings) = config::load_saved_settings() {
            self.settings = settings;
        }
        self.rebuild();
        logger::log_event("config_reload", json!({}));
        self.status = "settings reloaded".to_string();
    }
}
