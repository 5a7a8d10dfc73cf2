//! TUI rendering: header, sidebar, active screen and status bar.

pub mod dashboard;
pub mod history;
pub mod login;
pub mod notifications;
pub mod report;
pub mod settings;

use chrono::Local;
use fras_core::attendance::AttendanceStatus;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, Paragraph},
};
use strum::IntoEnumIterator;

use crate::app::{App, Portal, Screen};

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
  match &app.portal {
    Some(portal) => draw_portal(f, rows[1], portal),
    None => login::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

/// Colour used for a status everywhere it is shown.
pub fn status_color(status: AttendanceStatus) -> Color {
  match status {
    AttendanceStatus::Present => Color::Green,
    AttendanceStatus::Late => Color::Yellow,
    AttendanceStatus::Absent => Color::Red,
    AttendanceStatus::Grace => Color::Blue,
  }
}

pub fn status_span(status: AttendanceStatus) -> Span<'static> {
  Span::styled(
    status.label(),
    Style::default()
      .fg(status_color(status))
      .add_modifier(Modifier::BOLD),
  )
}

/// Bordered block in the shared style.
pub fn panel(title: impl Into<String>) -> Block<'static> {
  Block::default()
    .title(format!(" {} ", title.into()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%A, %B %-d, %Y").to_string();

  let mut left = vec![Span::styled(
    " FRAS  Facial Recognition Attendance",
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  )];
  if let Some(portal) = &app.portal {
    left.push(Span::styled(
      format!("  {} ({})", portal.identity.name, portal.identity.role),
      Style::default().fg(Color::Gray),
    ));
  }
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let left_width: usize = left.iter().map(|s| s.content.chars().count()).sum();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.content.chars().count());
  left.push(Span::raw(" ".repeat(pad)));
  left.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(left)), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_portal(f: &mut Frame, area: Rect, portal: &Portal) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Length(24), Constraint::Min(0)])
    .split(area);

  draw_sidebar(f, cols[0], portal);
  match portal.screen {
    Screen::Dashboard => dashboard::draw(f, cols[1], portal),
    Screen::History => history::draw(f, cols[1], portal),
    Screen::ReportIssue => report::draw(f, cols[1], portal),
    Screen::Notifications => notifications::draw(f, cols[1], portal),
    Screen::Settings => settings::draw(f, cols[1], portal),
  }
}

fn draw_sidebar(f: &mut Frame, area: Rect, portal: &Portal) {
  let unread = portal.unread();
  let items: Vec<ListItem> = Screen::iter()
    .map(|screen| {
      let style = if screen == portal.screen {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      let mut spans = vec![Span::styled(
        format!(" {} {} ", screen.hotkey(), screen.title()),
        style,
      )];
      if screen == Screen::Notifications && unread > 0 {
        spans.push(Span::styled(
          format!(" {unread} "),
          Style::default().fg(Color::White).bg(Color::Red),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let role_tag = format!("FRAS · {}", portal.identity.role);
  f.render_widget(List::new(items).block(panel(role_tag)), area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.portal {
    None if app.is_authenticating() => ("LOGIN", "Authenticating…"),
    None => ("LOGIN", "Tab next field  Space toggle role  Enter sign in  Esc quit"),
    Some(portal) if portal.is_editing() => ("EDIT", "Type to edit  Enter done  Esc cancel"),
    Some(portal) => (
      "NORMAL",
      match portal.screen {
        Screen::Dashboard => "1-5 screens  jk select class  o logout  q quit",
        Screen::History => "hl day  HL week  t today  s status  c course  x clear  q quit",
        Screen::ReportIssue => "jk field  hl change  Enter edit/submit  q quit",
        Screen::Notifications => "jk scroll  1-5 screens  q quit",
        Screen::Settings => "Tab switch tab  jk move  Enter edit/toggle  s save  q quit",
      },
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span =
    Span::styled(format!("  {status}"), Style::default().fg(Color::Gray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
