//! Weight history accordion: left pane.

use liftlog_client::accordion::RowState;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState},
};

use super::pane;
use crate::app::{App, Focus};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let accordion = &app.view().weights;
  let focused = app.focus == Focus::Weights;
  let title = format!(
    " Weights ({})  [e] {} ",
    accordion.len(),
    accordion.next_bulk_action().label()
  );
  let block = pane(title, focused);

  if accordion.is_empty() {
    f.render_widget(
      ratatui::widgets::Paragraph::new(Span::styled(
        "No entries yet. Tab to the form below to add one.",
        Style::default().fg(Color::DarkGray),
      ))
      .block(block),
      area,
    );
    return;
  }

  let items: Vec<ListItem> = accordion
    .rows()
    .iter()
    .map(|row| {
      let open = row.state == RowState::Open;
      let marker = if open { "▾ " } else { "▸ " };
      let mut lines = vec![Line::from(vec![
        Span::raw(marker),
        Span::raw(row.sample.date.to_string()),
      ])];
      if open {
        lines.push(Line::from(Span::styled(
          format!("    {} kg   [d] delete", row.sample.weight),
          Style::default().fg(Color::Yellow),
        )));
      }
      ListItem::new(lines)
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.weight_cursor));

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(if focused {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default().add_modifier(Modifier::BOLD)
      }),
    area,
    &mut state,
  );
}
