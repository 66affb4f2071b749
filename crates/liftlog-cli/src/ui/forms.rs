//! Input panes: weight entry, lift records, profile image and the
//! superadmin request list.

use liftlog_client::role_gate::Panel;
use liftlog_core::lift::Lift;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph},
};

use super::pane;
use crate::app::{App, Focus};

fn field<'a>(label: &'a str, value: &str, active: bool) -> Line<'a> {
  let style = if active {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
  } else {
    Style::default()
  };
  let cursor = if active { "_" } else { "" };
  Line::from(vec![
    Span::styled(format!("{label:>12}: "), Style::default().fg(Color::DarkGray)),
    Span::styled(format!("{value}{cursor}"), style),
  ])
}

pub fn draw_weight_form(f: &mut Frame, area: Rect, app: &App) {
  let focused = app.focus == Focus::WeightForm;
  let form = &app.weight_form;
  let lines = vec![
    field("Date", &form.date, focused && !form.on_weight),
    field("Weight (kg)", &form.weight, focused && form.on_weight),
  ];
  f.render_widget(
    Paragraph::new(lines).block(pane(" Add weight (YYYY-MM-DD) ".into(), focused)),
    area,
  );
}

pub fn draw_lift_form(f: &mut Frame, area: Rect, app: &App) {
  let focused = app.focus == Focus::LiftForm;
  let form = &app.lift_form;
  let lines: Vec<Line> = Lift::all()
    .enumerate()
    .map(|(i, lift)| field(lift.label(), form.inputs.get(lift), focused && i == form.cursor))
    .collect();
  f.render_widget(
    Paragraph::new(lines).block(pane(" Personal records ".into(), focused)),
    area,
  );
}

/// Profile image on top, pending admin requests below for superadmins.
pub fn draw_side(f: &mut Frame, area: Rect, app: &App) {
  if !app.view().panels.is_visible(Panel::SuperAdmin) {
    return draw_image(f, area, app);
  }
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(5), Constraint::Min(3)])
    .split(area);
  draw_image(f, rows[0], app);
  draw_pending(f, rows[1], app);
}

fn draw_image(f: &mut Frame, area: Rect, app: &App) {
  let focused = app.focus == Focus::Image;
  let view = app.view();
  let current = match &view.profile_image {
    Some(url) => Line::from(Span::styled(url.clone(), Style::default().fg(Color::Cyan))),
    None => Line::styled("No profile image.", Style::default().fg(Color::DarkGray)),
  };
  let pending = view.profile.as_ref().is_some_and(|p| p.pending_admin);
  let mut lines = vec![current, field("Upload file", &app.image_path, focused)];
  if pending {
    lines.push(Line::styled("Admin request pending.", Style::default().fg(Color::Yellow)));
  }
  f.render_widget(
    Paragraph::new(lines).block(pane(" Profile image ".into(), focused)),
    area,
  );
}

fn draw_pending(f: &mut Frame, area: Rect, app: &App) {
  let focused = app.focus == Focus::Pending;
  let pending = &app.view().pending_admins;
  let block = pane(format!(" Admin requests ({}) ", pending.len()), focused);

  let items: Vec<ListItem> = pending
    .iter()
    .map(|p| {
      let name = if p.name.is_empty() { p.email.as_str() } else { p.name.as_str() };
      ListItem::new(Line::from(vec![
        Span::raw(name.to_owned()),
        Span::styled(format!("  {} / {}", p.team, p.region), Style::default().fg(Color::DarkGray)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!pending.is_empty()).then_some(app.pending_cursor));
  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::Blue).fg(Color::White)),
    area,
    &mut state,
  );
}
