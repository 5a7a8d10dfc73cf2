//! Role-specific dashboard.

use chrono::{Local, Utc};
use fras_core::{
  attendance::{AttendanceStatus, ClassPhase, ClassSchedule},
  dashboard::{Dashboard, DashboardView, FacultyDashboard, StudentDashboard},
  query::StatusCounts,
};
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, Paragraph, Row, Table},
};
use strum::IntoEnumIterator;

use super::{notifications::age, panel, status_color, status_span};
use crate::app::Portal;

pub fn draw(f: &mut Frame, area: Rect, portal: &Portal) {
  let [cards, rest] =
    Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);
  draw_summary(f, cards, portal.dashboard.heading(), portal.dashboard.summary());

  match &portal.dashboard {
    Dashboard::Student(d) => draw_student(f, rest, d),
    Dashboard::Faculty(d) => draw_faculty(f, rest, d),
  }
}

fn draw_summary(f: &mut Frame, area: Rect, heading: &str, counts: StatusCounts) {
  let cols = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
  for (status, col) in AttendanceStatus::iter().zip(cols.iter()) {
    let line = Line::from(vec![
      Span::styled(
        format!(" {}", counts.get(status)),
        Style::default()
          .fg(status_color(status))
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(format!(" of {}", counts.total())),
    ]);
    let title = if status == AttendanceStatus::Present {
      format!("{heading} · {}", status.label())
    } else {
      status.label().to_string()
    };
    f.render_widget(Paragraph::new(line).block(panel(title)), *col);
  }
}

fn phase_span(class: &ClassSchedule) -> Span<'static> {
  match class.phase(Utc::now()) {
    ClassPhase::Upcoming => Span::styled("upcoming", Style::default().fg(Color::Gray)),
    ClassPhase::InProgress => Span::styled(
      "in progress",
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    ClassPhase::Finished => Span::styled("finished", Style::default().fg(Color::DarkGray)),
  }
}

fn class_cells(class: &ClassSchedule) -> Vec<String> {
  let start = class.start.with_timezone(&Local).format("%H:%M");
  let end = class.end.with_timezone(&Local).format("%H:%M");
  vec![
    format!("{start}–{end}"),
    format!("{} {}", class.course_code, class.course_name),
    format!("{}, {}", class.room, class.building),
  ]
}

fn draw_student(f: &mut Frame, area: Rect, d: &StudentDashboard) {
  let [classes, recent] =
    Layout::vertical([Constraint::Min(6), Constraint::Length(6)]).areas(area);

  let now = Utc::now();
  let rows: Vec<Row> = d
    .classes
    .iter()
    .map(|class| {
      let mut cells: Vec<Line> =
        class_cells(class).into_iter().map(Line::from).collect();
      cells.push(Line::from(phase_span(class)));
      cells.push(match d.class_status(class, now) {
        Some(status) => Line::from(status_span(status)),
        None => Line::from("—"),
      });
      Row::new(cells)
    })
    .collect();
  let table = Table::new(rows, [
    Constraint::Length(12),
    Constraint::Min(24),
    Constraint::Min(20),
    Constraint::Length(12),
    Constraint::Length(8),
  ])
  .header(
    Row::new(["Time", "Course", "Location", "Phase", "Status"])
      .style(Style::default().add_modifier(Modifier::BOLD)),
  )
  .block(panel("Today's Classes"));
  f.render_widget(table, classes);

  let items: Vec<ListItem> = d
    .notifications
    .iter()
    .map(|n| {
      let marker = if n.read { "  " } else { "● " };
      ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(n.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", age(n.timestamp)), Style::default().fg(Color::DarkGray)),
      ]))
    })
    .collect();
  f.render_widget(List::new(items).block(panel("Recent Notifications")), recent);
}

fn draw_faculty(f: &mut Frame, area: Rect, d: &FacultyDashboard) {
  let [classes, roster] =
    Layout::vertical([Constraint::Length(6), Constraint::Min(0)]).areas(area);

  let items: Vec<ListItem> = d
    .classes
    .iter()
    .enumerate()
    .map(|(i, class)| {
      let style = if d.selected == Some(i) {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      let mut spans: Vec<Span> = class_cells(class)
        .into_iter()
        .map(|c| Span::styled(format!("{c}  "), style))
        .collect();
      spans.push(phase_span(class));
      ListItem::new(Line::from(spans))
    })
    .collect();
  f.render_widget(List::new(items).block(panel("Today's Classes")), classes);

  let title = match d.selected_class() {
    Some(class) => format!("Students · {}", class.course_code),
    None => "Students".to_string(),
  };
  let rows: Vec<Row> = d
    .roster
    .iter()
    .map(|s| {
      Row::new(vec![
        Line::from(s.id.clone()),
        Line::from(s.name.clone()),
        Line::from(status_span(s.status)),
      ])
    })
    .collect();
  let table = Table::new(rows, [
    Constraint::Length(10),
    Constraint::Min(20),
    Constraint::Length(10),
  ])
  .header(
    Row::new(["ID", "Name", "Status"])
      .style(Style::default().add_modifier(Modifier::BOLD)),
  )
  .block(panel(title));
  f.render_widget(table, roster);
}
