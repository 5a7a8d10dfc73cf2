//! Report-an-issue form and past issues.

use fras_core::issue::IssueStatus;
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, Paragraph, Wrap},
};

use super::panel;
use crate::{app::Portal, screens::ReportField};

pub fn draw(f: &mut Frame, area: Rect, portal: &Portal) {
  let [form_area, past_area] =
    Layout::vertical([Constraint::Length(10), Constraint::Min(0)]).areas(area);

  let form = &portal.report;
  let row = |label: &str, value: String, which: ReportField| {
    let focused = form.focus == which;
    let value_style = match (focused, form.editing) {
      (true, true) => Style::default().fg(Color::Black).bg(Color::Cyan),
      (true, false) => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
      _ => Style::default(),
    };
    Line::from(vec![
      Span::styled(format!(" {label:<8}"), Style::default().fg(Color::DarkGray)),
      Span::styled(value, value_style),
    ])
  };

  let course = form
    .course
    .and_then(|i| portal.history.courses.get(i))
    .map_or_else(|| "Select a course".to_string(), |c| format!("◀ {c} ▶"));
  let placeholder = |v: &str, hint: &str| {
    if v.is_empty() { hint.to_string() } else { v.to_string() }
  };

  let lines = vec![
    row("Date", format!("◀ {} ▶", form.date.format("%Y-%m-%d")), ReportField::Date),
    row("Course", course, ReportField::Course),
    row("Time", placeholder(&form.time.value, "HH:MM"), ReportField::Time),
    row(
      "Reason",
      placeholder(&form.reason.value, "Describe what went wrong"),
      ReportField::Reason,
    ),
    Line::default(),
    row("", "[ Submit Report ]".to_string(), ReportField::Submit),
  ];
  f.render_widget(
    Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .block(panel("Report an Issue")),
    form_area,
  );

  let items: Vec<ListItem> = portal
    .past_issues
    .iter()
    .map(|issue| {
      let status_color = match issue.status {
        IssueStatus::Pending => Color::Yellow,
        IssueStatus::Resolved => Color::Green,
      };
      let time = issue
        .time
        .map(|t| t.format(" %H:%M").to_string())
        .unwrap_or_default();
      let mut lines = vec![
        Line::from(vec![
          Span::styled(format!(" {:<9}", issue.status), Style::default().fg(status_color)),
          Span::styled(
            format!("{}{time}  {}", issue.date.format("%Y-%m-%d"), issue.course),
            Style::default().add_modifier(Modifier::BOLD),
          ),
        ]),
        Line::from(format!("          {}", issue.reason)),
      ];
      if let Some(response) = &issue.response {
        lines.push(Line::from(Span::styled(
          format!("          ↳ {response}"),
          Style::default().fg(Color::Gray),
        )));
      }
      ListItem::new(lines)
    })
    .collect();
  f.render_widget(List::new(items).block(panel("Past Issues")), past_area);
}
