//! Attendance history for one selected day.

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Paragraph, Row, Table, TableState},
};

use super::{panel, status_color, status_span};
use crate::app::Portal;

pub fn draw(f: &mut Frame, area: Rect, portal: &Portal) {
  let history = &portal.history;
  let [filters, body] =
    Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
  let [table_area, side] =
    Layout::horizontal([Constraint::Min(40), Constraint::Length(30)]).areas(body);

  let criteria = &history.criteria;
  let filter_line = Line::from(vec![
    Span::styled(" Day ", Style::default().fg(Color::DarkGray)),
    Span::styled(
      criteria.day.format("%a %b %-d, %Y").to_string(),
      Style::default().add_modifier(Modifier::BOLD),
    ),
    Span::styled("   Status ", Style::default().fg(Color::DarkGray)),
    Span::raw(criteria.status.to_string()),
    Span::styled("   Course ", Style::default().fg(Color::DarkGray)),
    Span::raw(criteria.course.to_string()),
  ]);
  f.render_widget(Paragraph::new(filter_line).block(panel("Attendance History")), filters);

  let visible = history.visible();
  let rows: Vec<Row> = visible
    .iter()
    .map(|r| {
      let entry = r
        .entry_time
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "—".into());
      Row::new(vec![
        Line::from(r.course_code.clone()),
        Line::from(r.course_name.clone()),
        Line::from(r.date.with_timezone(&Local).format("%H:%M").to_string()),
        Line::from(entry),
        Line::from(status_span(r.status)),
      ])
    })
    .collect();
  let title = format!("Records ({})", visible.len());
  let table = Table::new(rows, [
    Constraint::Length(9),
    Constraint::Min(20),
    Constraint::Length(7),
    Constraint::Length(7),
    Constraint::Length(8),
  ])
  .header(
    Row::new(["Code", "Course", "Class", "Entry", "Status"])
      .style(Style::default().add_modifier(Modifier::BOLD)),
  )
  .row_highlight_style(Style::default().bg(Color::DarkGray))
  .block(panel(title));
  let mut state = TableState::default()
    .with_selected((!visible.is_empty()).then_some(history.scroll));
  f.render_stateful_widget(table, table_area, &mut state);

  if visible.is_empty() {
    let inner = panel("").inner(table_area);
    let msg = Paragraph::new(Span::styled(
      "  No records for this day and filter.",
      Style::default().fg(Color::DarkGray),
    ));
    if inner.height > 1 {
      let below_header = Rect { y: inner.y + 1, height: inner.height - 1, ..inner };
      f.render_widget(msg, below_header);
    }
  }

  draw_side(f, side, portal);
}

fn draw_side(f: &mut Frame, area: Rect, portal: &Portal) {
  let history = &portal.history;
  let [day, month] =
    Layout::vertical([Constraint::Length(7), Constraint::Min(0)]).areas(area);

  let counts = history.day_summary();
  let mut lines: Vec<Line> = history
    .marked_days()
    .into_iter()
    .map(|(status, _)| {
      Line::from(vec![
        Span::raw(format!(" {:<8}", status.label())),
        Span::styled(
          counts.get(status).to_string(),
          Style::default().fg(status_color(status)),
        ),
      ])
    })
    .collect();
  lines.push(Line::from(format!(" {:<8}{}", "Total", counts.total())));
  f.render_widget(Paragraph::new(lines).block(panel("This Day")), day);

  let lines: Vec<Line> = history
    .marked_days()
    .into_iter()
    .map(|(status, days)| {
      Line::from(vec![
        Span::raw(format!(" {:<8}", status.label())),
        Span::styled(
          format!("{days} day(s)"),
          Style::default().fg(status_color(status)),
        ),
      ])
    })
    .collect();
  f.render_widget(Paragraph::new(lines).block(panel("This Month")), month);
}
