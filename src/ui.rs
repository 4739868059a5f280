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

use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

use crate::app::App;
use crate::config::{self, Placement};

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    // Placement decides whether the toggle panel sits above or below the
    // status area.
    let mut constraints = vec![Constraint::Length(3)]; // title
    match app.settings.placement {
        Placement::Top => constraints.extend([Constraint::Min(4), Constraint::Length(3)]),
        Placement::Bottom => constraints.extend([Constraint::Length(3), Constraint::Min(4)]),
    }
    if app.settings.settings_hint {
        constraints.push(Constraint::Length(1));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    let (toggles_area, status_area) = match app.settings.placement {
        Placement::Top => (chunks[1], chunks[2]),
        Placement::Bottom => (chunks[2], chunks[1]),
    };

    let title = Paragraph::new("Ideapad Controls")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(title, chunks[0]);

    let visible = app.visible_rows();
    let mut items: Vec<ListItem> = Vec::new();
    if visible.is_empty() {
        items.push(ListItem::new("(no toggles available) check sysfs_path in settings"));
    } else {
        for (row, idx) in visible.iter().enumerate() {
            let controller = &app.controllers[*idx];
            let sel = if row == app.selected { "> " } else { "  " };
            let state = if controller.displayed { " on" } else { "off" };
            let style = if controller.displayed {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            items.push(ListItem::new(Line::from(vec![
                Span::raw(format!("{}{: <24}", sel, controller.display_name())),
                Span::styled(state, style),
            ])));
        }
    }

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected.min(visible.len().saturating_sub(1))));
    }
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Toggles "),
    );
    f.render_stateful_widget(list, toggles_area, &mut state);

    let status = Paragraph::new(app.status.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Status "),
    );
    f.render_widget(status, status_area);

    if app.settings.settings_hint {
        let hint = Paragraph::new(format!(
            "↑/↓ select  |  Space toggle  |  r rescan  |  q quit  |  settings: {}",
            config::config_path().display()
        ))
        .style(Style::default().fg(Color::Gray));
        f.render_widget(hint, chunks[3]);
    }
}
