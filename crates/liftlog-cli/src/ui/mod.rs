//! TUI rendering: orchestrates all panes.

pub mod charts;
pub mod forms;
pub mod sign_in;
pub mod weight_list;

use chrono::Local;
use liftlog_client::dashboard::NoticeLevel;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Focus, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::SignIn => sign_in::draw(f, rows[1], app),
    Screen::Dashboard => draw_dashboard(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

/// Border style for a pane, highlighted when it has focus.
pub fn pane(title: String, focused: bool) -> Block<'static> {
  let color = if focused { Color::Cyan } else { Color::DarkGray };
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(color))
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let view = app.view();
  let who = match (&view.session, view.panels.visible()) {
    (Some(s), Some(panel)) => format!(" liftlog  {}  [{}]", s.user.email, panel.title()),
    (Some(s), None) => format!(" liftlog  {}  [no profile]", s.user.email),
    (None, _) => " liftlog".to_owned(),
  };
  let left = Span::styled(
    who,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{} ", Local::now().format("%Y-%m-%d")),
    Style::default().fg(Color::DarkGray),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);
  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
  if app.view().panels.visible().is_none() {
    let msg = "Your account has no player profile yet. Ask an administrator to set one up.";
    f.render_widget(
      Paragraph::new(msg).block(pane(" Dashboard ".into(), false)),
      area,
    );
    return;
  }

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  let left = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(5), Constraint::Length(4)])
    .split(cols[0]);
  weight_list::draw(f, left[0], app);
  forms::draw_weight_form(f, left[1], app);

  let right = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(cols[1]);
  let charts_row = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(right[0]);
  charts::draw_weight_chart(f, charts_row[0], app.view());
  charts::draw_lift_chart(f, charts_row[1], app.view());

  let bottom = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(right[1]);
  forms::draw_lift_form(f, bottom[0], app);
  forms::draw_side(f, bottom[1], app);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    Screen::SignIn => ("SIGN IN", "Tab next field  Enter sign in  Ctrl-S sign up  Esc quit"),
    Screen::Dashboard => (
      app.focus.label(),
      match app.focus {
        Focus::Weights => {
          "jk move  Enter open  e expand/collapse  d delete  a request admin  o sign out  Tab next  q quit"
        }
        Focus::WeightForm => "↑↓ field  Ctrl-T today  Enter save  Tab next  Esc back",
        Focus::LiftForm => "↑↓ lift  Enter save all  Tab next  Esc back",
        Focus::Image => "type a file path  Enter upload  Ctrl-D delete  Tab next  Esc back",
        Focus::Pending => "jk move  Enter approve  r refresh  Tab next  Esc back",
      },
    ),
  };

  let (text, style) = if let Some(confirm) = app.confirm {
    (confirm.prompt().to_owned(), Style::default().fg(Color::Yellow))
  } else if let Some(notice) = &app.view().notice {
    let color = match notice.level {
      NoticeLevel::Info => Color::Green,
      NoticeLevel::Error => Color::Red,
    };
    (notice.text.clone(), Style::default().fg(color))
  } else {
    (hints.to_owned(), Style::default().fg(Color::DarkGray))
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let line = Line::from(vec![mode_span, Span::styled(format!("  {text}"), style)]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
