//! Draws the two chart slots from the [`ChartRegistry`] the dashboard
//! renders into.

use liftlog_client::{
  charts::{ChartData, ChartRegistry},
  dashboard::Dashboard,
};
use ratatui::{
  Frame,
  layout::{Direction, Rect},
  style::{Color, Style},
  symbols,
  text::Span,
  widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType, Paragraph},
};

use super::pane;

pub fn draw_weight_chart(f: &mut Frame, area: Rect, view: &Dashboard<ChartRegistry>) {
  let block = pane(" Body weight ".into(), false);
  let samples = match view.charts.weight_data() {
    Some(ChartData::WeightLine(samples)) if !samples.is_empty() => samples,
    _ => return empty(f, area, block, "No weights logged."),
  };

  // x is days since the first sample.
  let first = samples[0].0;
  let points: Vec<(f64, f64)> = samples
    .iter()
    .map(|(date, kg)| ((*date - first).num_days() as f64, *kg))
    .collect();
  let x_max = points.last().map_or(1.0, |p| p.0.max(1.0));
  let (lo, hi) = points
    .iter()
    .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.1), hi.max(p.1)));
  let (y_min, y_max) = ((lo - 1.0).floor(), (hi + 1.0).ceil());
  let last = samples[samples.len() - 1].0;

  let dataset = Dataset::default()
    .name("kg")
    .marker(symbols::Marker::Braille)
    .graph_type(GraphType::Line)
    .style(Style::default().fg(Color::Cyan))
    .data(&points);

  let chart = Chart::new(vec![dataset])
    .block(block)
    .x_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, x_max])
        .labels([first.to_string(), last.to_string()]),
    )
    .y_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([y_min, y_max])
        .labels([format!("{y_min}"), format!("{y_max}")]),
    );
  f.render_widget(chart, area);
}

pub fn draw_lift_chart(f: &mut Frame, area: Rect, view: &Dashboard<ChartRegistry>) {
  let block = pane(" Lift records (kg) ".into(), false);
  let Some(ChartData::LiftBar(values)) = view.charts.lift_data() else {
    return empty(f, area, block, "No lift records saved.");
  };

  let bars: Vec<Bar> = values
    .iter()
    .map(|(lift, kg)| {
      Bar::default()
        .value(kg.round() as u64)
        .text_value(format!("{kg}"))
        .label(lift.label().into())
    })
    .collect();

  // Horizontal bars leave room for the full lift names.
  let chart = BarChart::default()
    .block(block)
    .direction(Direction::Horizontal)
    .bar_width(1)
    .bar_gap(1)
    .bar_style(Style::default().fg(Color::Magenta))
    .value_style(Style::default().fg(Color::Black).bg(Color::Magenta))
    .data(BarGroup::default().bars(&bars));
  f.render_widget(chart, area);
}

fn empty(f: &mut Frame, area: Rect, block: ratatui::widgets::Block<'static>, msg: &str) {
  f.render_widget(
    Paragraph::new(Span::styled(msg.to_owned(), Style::default().fg(Color::DarkGray)))
      .block(block),
    area,
  );
}
