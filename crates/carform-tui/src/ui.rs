//! UI rendering with Ratatui.

use crate::app::{App, InputMode};
use carform_core::{CarFormModal, Field};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    render_car_list(frame, app, chunks[0]);
    render_status_line(frame, app, chunks[1]);

    match app.input_mode {
        InputMode::Search => render_search_overlay(frame, app, area),
        InputMode::Modal => {
            if let Some(ref modal) = app.modal {
                render_modal(frame, app, modal, area);
            }
        }
        InputMode::Normal => {}
    }
}

/// Render the car list.
fn render_car_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.input_mode == InputMode::Normal;
    let border_color = if is_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .title(format!(" 🚗 Cars ({}) ", app.cars.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.cars.is_empty() {
        let message = Paragraph::new("No cars yet. Press n to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(message, centered_rect(inner.width, 1, inner));
        return;
    }

    let header = format!(
        "{:<12} {:<8} {:<12} {:<16} {:<6} {}",
        "Plate", "Color", "Manufacturer", "Model", "Year", "Active"
    );
    let mut items = vec![ListItem::new(Line::from(header)).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )];

    items.extend(app.cars.cars().iter().enumerate().map(|(i, car)| {
        let content = format!(
            "{:<12} {:<8} {:<12} {:<16} {:<6} {}",
            car.license_plate_number,
            car.color,
            car.manufacturer,
            car.model,
            car.year,
            if car.active { "yes" } else { "no" }
        );

        let style = if i == app.selected_index {
            Style::default()
                .bg(Color::Rgb(60, 60, 80))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        ListItem::new(Line::from(content)).style(style)
    }));

    frame.render_widget(List::new(items), inner);
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.status_message {
        Some(ref message) => message.clone(),
        None => match app.input_mode {
            InputMode::Modal => {
                "Tab/↑↓: field | ←→/space: choose | Enter: save | Esc: close".to_string()
            }
            _ => "n: new | e/Enter: edit | r: reload | /: search | q: quit".to_string(),
        },
    };
    let status = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

/// Render the car dialog.
fn render_modal(frame: &mut Frame, app: &App, modal: &CarFormModal, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = (Field::ALL.len() as u16 * 2 + 6).min(area.height.saturating_sub(2));
    let dialog_area = centered_rect(dialog_width, dialog_height, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(format!(" {} ", modal.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    // Each field takes a value line and an error line
    let mut constraints: Vec<Constraint> = Field::ALL
        .iter()
        .flat_map(|_| [Constraint::Length(1), Constraint::Length(1)])
        .collect();
    constraints.push(Constraint::Length(1)); // Server error
    constraints.push(Constraint::Length(1)); // Buttons
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(inner);

    let focused = app.focused_field();
    for (i, field) in Field::ALL.into_iter().enumerate() {
        render_form_field(frame, modal, field, field == focused, chunks[i * 2]);

        if let Some(message) = modal.field_error(field) {
            let error = Paragraph::new(format!("  * {message}"))
                .style(Style::default().fg(Color::Red));
            frame.render_widget(error, chunks[i * 2 + 1]);
        }
    }

    let server_error = modal.server_error();
    if server_error.visible {
        let banner = Paragraph::new(format!("* {}", server_error.message))
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
        frame.render_widget(banner, chunks[Field::ALL.len() * 2]);
    }

    let save_label = if modal.is_loading() {
        "[ Saving... ]"
    } else {
        "[ Save: Enter ]"
    };
    let buttons = Line::from(vec![
        Span::styled(save_label, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled("[ Close: Esc ]", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(buttons), chunks[Field::ALL.len() * 2 + 1]);
}

fn render_form_field(
    frame: &mut Frame,
    modal: &CarFormModal,
    field: Field,
    is_focused: bool,
    area: Rect,
) {
    let value = modal.form().display_value(field);
    let value_style = if is_focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(if is_focused { "▸ " } else { "  " }, value_style),
        Span::styled(
            format!("{:<22}", format!("{}:", field.label())),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if field.is_text() {
        spans.push(Span::styled(value, value_style));
        if is_focused {
            spans.push(Span::styled(
                "_",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }
    } else {
        spans.push(Span::styled(format!("‹ {value} ›"), value_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the search overlay.
fn render_search_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the search dialog
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 15.min(area.height.saturating_sub(4));
    let dialog_area = centered_rect(dialog_width, dialog_height, area);

    // Clear background
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" 🔍 Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    // Search input
    let input_line = Line::from(vec![
        Span::styled("▸ ", Style::default().fg(Color::Magenta)),
        Span::styled(&app.search_query, Style::default().fg(Color::White)),
        Span::styled(
            "_",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if !app.search_results.is_empty() {
        let items: Vec<ListItem> = app
            .search_results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let style = if i == app.search_selected_index {
                    Style::default()
                        .bg(Color::Rgb(60, 40, 80))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let line = Line::from(vec![
                    Span::styled(&result.car.license_plate_number, style),
                    Span::styled(" ", Style::default()),
                    Span::styled(
                        format!("{} {}", result.car.manufacturer, result.car.model),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);

                ListItem::new(line).style(style)
            })
            .collect();

        frame.render_widget(List::new(items), chunks[1]);
    } else if !app.search_query.is_empty() {
        let no_results = Paragraph::new("No results found")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(no_results, chunks[1]);
    }
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
