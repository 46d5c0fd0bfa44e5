// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod controller;
mod list_view;

pub use controller::{Controller, UserAction};
pub use list_view::{COLUMNS, ListRow, ListView, sanitize_cell};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use projsync_app::{
    AppEvent, FormController, Messages, Notification, NotificationKind, ProjectField, ProjectId,
    ProjectService,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(2600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub notification_ttl: Duration,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearNotification { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ViewData {
    notification_token: u64,
    busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyOutcome {
    Quit,
    Act(UserAction),
    Events(Vec<AppEvent>),
    Consumed,
    Ignored,
}

pub fn run_app<S: ProjectService>(
    controller: &mut Controller<S>,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let result = event_loop(&mut terminal, controller, options);

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn event_loop<B: Backend, S: ProjectService>(
    terminal: &mut Terminal<B>,
    controller: &mut Controller<S>,
    options: UiOptions,
) -> Result<()> {
    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    view_data.busy = true;
    draw(terminal, controller, &view_data)?;
    let events = controller.start();
    view_data.busy = false;
    track_notifications(&events, &mut view_data, &internal_tx, options);

    loop {
        process_internal_events(controller, &view_data, &internal_rx);
        draw(terminal, controller, &view_data)?;

        if !event::poll(Duration::from_millis(120)).context("poll event")? {
            continue;
        }
        let Event::Key(key) = event::read().context("read event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key_event(controller, key) {
            KeyOutcome::Quit => break,
            KeyOutcome::Act(action) => {
                if action.hits_service() {
                    view_data.busy = true;
                    draw(terminal, controller, &view_data)?;
                }
                let events = controller.handle(action);
                view_data.busy = false;
                track_notifications(&events, &mut view_data, &internal_tx, options);
            }
            KeyOutcome::Events(events) => {
                track_notifications(&events, &mut view_data, &internal_tx, options);
            }
            KeyOutcome::Consumed | KeyOutcome::Ignored => {}
        }
    }
    Ok(())
}

fn draw<B: Backend, S>(
    terminal: &mut Terminal<B>,
    controller: &Controller<S>,
    view_data: &ViewData,
) -> Result<()> {
    terminal
        .draw(|frame| render(frame, controller, view_data))
        .context("draw frame")?;
    Ok(())
}

fn process_internal_events<S: ProjectService>(
    controller: &mut Controller<S>,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearNotification { token }
                if token == view_data.notification_token =>
            {
                controller.clear_notification();
            }
            InternalEvent::ClearNotification { .. } => {}
        }
    }
}

fn track_notifications(
    events: &[AppEvent],
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: UiOptions,
) {
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::Notified(_)))
    {
        view_data.notification_token = view_data.notification_token.saturating_add(1);
        schedule_notification_clear(
            internal_tx,
            view_data.notification_token,
            options.notification_ttl,
        );
    }
}

fn schedule_notification_clear(internal_tx: &Sender<InternalEvent>, token: u64, after: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = sender.send(InternalEvent::ClearNotification { token });
    });
}

fn handle_key_event<S: ProjectService>(
    controller: &mut Controller<S>,
    key: KeyEvent,
) -> KeyOutcome {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }

    if controller.state().pending_delete.is_some() {
        return match key.code {
            KeyCode::Char('y') => KeyOutcome::Act(UserAction::Confirm),
            KeyCode::Char('n') | KeyCode::Esc => KeyOutcome::Act(UserAction::Decline),
            _ => KeyOutcome::Ignored,
        };
    }

    if controller.form().is_open() {
        return handle_form_key(controller.form_mut(), key);
    }

    handle_table_key(controller, key)
}

fn handle_form_key(form: &mut FormController, key: KeyEvent) -> KeyOutcome {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => KeyOutcome::Act(UserAction::Cancel),
        (KeyCode::Char('s'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            KeyOutcome::Act(UserAction::Submit)
        }
        (KeyCode::Enter, _) if form.on_last_field() => KeyOutcome::Act(UserAction::Submit),
        (KeyCode::Enter | KeyCode::Tab | KeyCode::Down, _) => {
            form.focus_next();
            KeyOutcome::Consumed
        }
        (KeyCode::BackTab | KeyCode::Up, _) => {
            form.focus_prev();
            KeyOutcome::Consumed
        }
        (KeyCode::Backspace, _) => {
            form.pop_char();
            KeyOutcome::Consumed
        }
        (KeyCode::Char(ch), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            form.push_char(ch);
            KeyOutcome::Consumed
        }
        _ => KeyOutcome::Ignored,
    }
}

fn handle_table_key<S: ProjectService>(
    controller: &mut Controller<S>,
    key: KeyEvent,
) -> KeyOutcome {
    match key.code {
        KeyCode::Char('q') => KeyOutcome::Quit,
        KeyCode::Char('r') => KeyOutcome::Act(UserAction::Refresh),
        KeyCode::Char('n') => KeyOutcome::Act(UserAction::New),
        KeyCode::Char('e') | KeyCode::Enter => on_selected(controller, UserAction::Edit),
        KeyCode::Char('d') => on_selected(controller, UserAction::Delete),
        KeyCode::Char('j') | KeyCode::Down => {
            controller.list_mut().move_selection(1);
            KeyOutcome::Consumed
        }
        KeyCode::Char('k') | KeyCode::Up => {
            controller.list_mut().move_selection(-1);
            KeyOutcome::Consumed
        }
        KeyCode::Char('g') | KeyCode::Home => {
            controller.list_mut().select_first();
            KeyOutcome::Consumed
        }
        KeyCode::Char('G') | KeyCode::End => {
            controller.list_mut().select_last();
            KeyOutcome::Consumed
        }
        _ => KeyOutcome::Ignored,
    }
}

fn on_selected<S: ProjectService>(
    controller: &mut Controller<S>,
    action: fn(ProjectId) -> UserAction,
) -> KeyOutcome {
    match controller.list().selected_id() {
        Some(id) => KeyOutcome::Act(action(id)),
        None => {
            let message = controller.messages().no_selection.clone();
            KeyOutcome::Events(controller.notify(Notification::info(message)))
        }
    }
}

fn render<S>(frame: &mut ratatui::Frame<'_>, controller: &Controller<S>, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());
    let messages = controller.messages();

    let header = Paragraph::new(header_text(controller, view_data)).block(
        Block::default()
            .title(messages.app_title.as_str())
            .borders(Borders::ALL),
    );
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], controller.list(), messages);

    let status_style = match controller.state().notification.as_ref().map(|n| n.kind) {
        Some(NotificationKind::Error) => Style::default().fg(Color::Red),
        Some(NotificationKind::Success) => Style::default().fg(Color::Green),
        Some(NotificationKind::Info) | None => Style::default().fg(Color::Yellow),
    };
    let status = Paragraph::new(status_text(controller))
        .style(status_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    let form = controller.form();
    if form.is_open() {
        let area = centered_rect(60, 40, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(render_form_text(form)).block(
            Block::default()
                .title(messages.form_title(form.mode()))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(overlay, area);
    }

    if let Some(id) = controller.state().pending_delete {
        let area = centered_rect(44, 24, frame.area());
        frame.render_widget(Clear, area);
        let text = format!("{}\n\n{}", messages.confirm_delete(id), messages.confirm_hints);
        let overlay = Paragraph::new(text).block(
            Block::default()
                .title("confirm")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(overlay, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, list: &ListView, messages: &Messages) {
    if list.is_empty_visible() {
        let empty = Paragraph::new(messages.empty_state.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(COLUMNS.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let selected = list.selected_index();
    let rows = list.rows().iter().enumerate().map(|(index, row)| {
        let style = if Some(index) == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(row.cells.iter().map(|cell| Cell::from(cell.as_str()))).style(style)
    });
    let widths = [
        Constraint::Length(6),
        Constraint::Min(12),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Min(12),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn header_text<S>(controller: &Controller<S>, view_data: &ViewData) -> String {
    let rows = controller.list().rows().len();
    let noun = if rows == 1 { "project" } else { "projects" };
    if controller.state().loading || view_data.busy {
        format!("{rows} {noun} | {}", controller.messages().loading)
    } else {
        format!("{rows} {noun}")
    }
}

fn status_text<S>(controller: &Controller<S>) -> String {
    if let Some(notification) = &controller.state().notification {
        return sanitize_cell(&notification.message);
    }
    let messages = controller.messages();
    if controller.state().pending_delete.is_some() {
        messages.confirm_hints.clone()
    } else if controller.form().is_open() {
        messages.form_hints.clone()
    } else {
        messages.table_hints.clone()
    }
}

fn render_form_text(form: &FormController) -> String {
    let focused = form.focused_field();
    ProjectField::ALL
        .iter()
        .map(|field| {
            let value = sanitize_cell(form.fields().get(*field));
            if *field == focused {
                format!("> {:<12} {value}_", field.label())
            } else {
                format!("  {:<12} {value}", field.label())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
