//! Sign-in form, centred in the body.

use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use super::panel;
use crate::{app::App, screens::LoginField};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let [column] = Layout::horizontal([Constraint::Length(52)])
    .flex(Flex::Center)
    .areas(area);
  let [card] = Layout::vertical([Constraint::Length(12)])
    .flex(Flex::Center)
    .areas(column);

  let form = &app.login;
  let field = |label: &str, value: String, which: LoginField| {
    let focused = form.focus == which && !app.is_authenticating();
    let style = if focused {
      Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
      Span::styled(format!(" {label:<10}"), Style::default().fg(Color::DarkGray)),
      Span::styled(format!("{value}{cursor}"), style),
    ])
  };

  let footer = if app.is_authenticating() {
    Span::styled(" Authenticating…", Style::default().fg(Color::Yellow))
  } else {
    Span::styled(" Press Enter to sign in", Style::default().fg(Color::DarkGray))
  };

  let lines = vec![
    Line::from(Span::styled(
      " Sign in to your account",
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Line::default(),
    field("Email", form.email.display(), LoginField::Email),
    field("Password", form.password.display(), LoginField::Password),
    field("Role", format!("◀ {} ▶", form.role), LoginField::Role),
    Line::default(),
    Line::from(footer),
    Line::default(),
    Line::from(Span::styled(
      " Demo: student@example.com / faculty@example.com",
      Style::default().fg(Color::DarkGray),
    )),
    Line::from(Span::styled(
      "       password: password",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  f.render_widget(Paragraph::new(lines).block(panel("FRAS Login")), card);
}
