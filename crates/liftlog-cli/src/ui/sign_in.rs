//! Sign-in / sign-up form.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use super::pane;
use crate::app::{App, SIGN_IN_FIELDS};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Min(0),
      Constraint::Length(52),
      Constraint::Min(0),
    ])
    .split(area);
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(0),
      Constraint::Length(SIGN_IN_FIELDS.len() as u16 + 4),
      Constraint::Min(0),
    ])
    .split(cols[1]);

  let form = &app.sign_in;
  let mut lines: Vec<Line> = SIGN_IN_FIELDS
    .iter()
    .zip(&form.values)
    .enumerate()
    .map(|(i, (label, value))| {
      let shown = if i == 1 { "*".repeat(value.chars().count()) } else { value.clone() };
      let focused = i == form.field;
      let value_style = if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      let cursor = if focused { "_" } else { "" };
      Line::from(vec![
        Span::styled(format!("{label:>9}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{shown}{cursor}"), value_style),
      ])
    })
    .collect();
  lines.push(Line::raw(""));
  lines.push(Line::styled(
    "Region, team and name are only needed to sign up.",
    Style::default().fg(Color::DarkGray),
  ));

  f.render_widget(
    Paragraph::new(lines).block(pane(" Liftlog ".into(), true)),
    rows[1],
  );
}
