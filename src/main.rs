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

use std::io::stdout;
use std::time::Instant;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;

use ideactl::app::App;
use ideactl::config;
use ideactl::events::handle_key_event;
use ideactl::logger;
use ideactl::notify::{DesktopNotifier, NotificationSink};
use ideactl::options;
use ideactl::ui::ui;
use ideactl::writer::{perform_write, WriteRequest, WriteStrategy};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Optional structured logging under the user's state directory
    let logging_enabled = args.iter().any(|a| a == "--logging");
    if logging_enabled {
        logger::init_logging();
        logger::log_event("startup", serde_json::json!({
            "args": args,
            "euid": unsafe { libc::geteuid() },
        }));
    }

    let positional: Vec<&str> = args
        .iter()
        .skip(1)
        .filter(|a| !a.starts_with("--"))
        .map(|a| a.as_str())
        .collect();

    // `ideactl list` prints option states and exits
    if positional.first() == Some(&"list") {
        return run_list();
    }

    // `ideactl set <option> <on|off>` performs one synchronous toggle
    if positional.first() == Some(&"set") {
        match (positional.get(1), positional.get(2)) {
            (Some(option), Some(value)) => return run_set(option, value),
            _ => {
                eprintln!("usage: ideactl set <option> <on|off>");
                std::process::exit(2);
            }
        }
    }

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
        if logging_enabled {
            logger::log_event("fatal_error", serde_json::json!({ "error": err.to_string() }));
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>) -> anyhow::Result<()> {
    let notifier: Box<dyn NotificationSink> = Box::new(DesktopNotifier);
    let mut app = App::new(notifier);

    // Direct writes to sysfs need rights the desktop session usually lacks
    if !app.settings.use_pkexec && unsafe { libc::geteuid() } != 0 {
        app.status = "running unprivileged with direct writes; enable use_pkexec or run as root".to_string();
    }

    loop {
        terminal.draw(|f| ui(f, &app))?;

        let timeout = app.tick_interval.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout).unwrap_or(false) {
            if let Event::Key(key_event) = event::read()? {
                if handle_key_event(&mut app, key_event)? {
                    return Ok(());
                }
            }
        }

        if app.last_tick.elapsed() >= app.tick_interval {
            app.last_tick = Instant::now();
            // Pending privileged writes resolve here; the wait itself
            // happens off-thread, so other toggles stayed live
            app.drain_outcomes();
            app.maybe_reload_settings();
        }
    }
}

fn run_list() -> anyhow::Result<()> {
    let settings = config::load_saved_settings().unwrap_or_default();
    let supported = options::supported_options(&settings.sysfs_path);
    if supported.is_empty() {
        eprintln!("no supported options under {}", settings.sysfs_path);
        std::process::exit(1);
    }
    for id in supported {
        let state = if options::read_option(&settings.sysfs_path, &id) { "on" } else { "off" };
        println!("{: <20} {}", id, state);
    }
    Ok(())
}

fn run_set(option: &str, value: &str) -> anyhow::Result<()> {
    let settings = config::load_saved_settings().unwrap_or_default();
    let supported = options::supported_options(&settings.sysfs_path);
    if !supported.iter().any(|id| id == option) {
        eprintln!("unknown or unsupported option '{}' (try: ideactl list)", option);
        std::process::exit(1);
    }

    let desired = match value {
        "on" | "1" | "true" => true,
        "off" | "0" | "false" => false,
        _ => {
            eprintln!("invalid value '{}', expected on/off", value);
            std::process::exit(2);
        }
    };

    let actual = options::read_option(&settings.sysfs_path, option);
    if actual == desired {
        println!("{} already {}", option, value);
        return Ok(());
    }

    let strategy = if settings.use_pkexec { WriteStrategy::Escalated } else { WriteStrategy::Direct };
    let success = perform_write(&WriteRequest {
        option: option.to_string(),
        device_path: settings.sysfs_path.clone(),
        requested: desired,
        previous: actual,
        strategy,
    });

    if success {
        println!("{} -> {}", option, if desired { "on" } else { "off" });
        Ok(())
    } else {
        eprintln!("could not change {}", options::display_name(option));
        std::process::exit(1);
    }
}
