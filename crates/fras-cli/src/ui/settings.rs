//! Profile and notification-preference tabs.

use fras_core::settings::{NotificationPref, ProfileForm, initials};
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Paragraph, Tabs},
};
use strum::IntoEnumIterator;

use super::panel;
use crate::{
  app::Portal,
  screens::{ProfileField, SettingsTab},
};

pub fn draw(f: &mut Frame, area: Rect, portal: &Portal) {
  let view = &portal.settings;
  let [tabs_area, body] =
    Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

  let selected = match view.tab {
    SettingsTab::Profile => 0,
    SettingsTab::Notifications => 1,
  };
  let tabs = Tabs::new(["Profile", "Notifications"])
    .select(selected)
    .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .block(panel("Settings"));
  f.render_widget(tabs, tabs_area);

  match view.tab {
    SettingsTab::Profile => draw_profile(f, body, portal),
    SettingsTab::Notifications => draw_prefs(f, body, portal),
  }
}

fn draw_profile(f: &mut Frame, area: Rect, portal: &Portal) {
  let view = &portal.settings;
  let identity = &portal.identity;

  let mut lines = vec![
    Line::from(vec![
      Span::styled(
        format!(" [{}] ", initials(&identity.name)),
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
      ),
      Span::styled(
        format!(" {}  ·  {}", identity.name, identity.role),
        Style::default().add_modifier(Modifier::BOLD),
      ),
    ]),
    Line::default(),
  ];

  for field in ProfileField::iter() {
    let focused = view.focus == field;
    let locked = field == ProfileField::StudentId
      && !ProfileForm::student_id_editable(identity.role);
    let value = match (&view.edit, focused) {
      (Some(buffer), true) => format!("{}▏", buffer.value),
      _ => view.value(field).to_string(),
    };
    let style = if focused {
      Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else if locked {
      Style::default().fg(Color::DarkGray)
    } else {
      Style::default()
    };
    let mut spans = vec![
      Span::styled(format!(" {:<12}", field.label()), Style::default().fg(Color::DarkGray)),
      Span::styled(value, style),
    ];
    if locked {
      spans.push(Span::styled("  (locked)", Style::default().fg(Color::DarkGray)));
    }
    lines.push(Line::from(spans));
  }

  f.render_widget(Paragraph::new(lines).block(panel("Profile")), area);
}

fn draw_prefs(f: &mut Frame, area: Rect, portal: &Portal) {
  let view = &portal.settings;
  let lines: Vec<Line> = NotificationPref::iter()
    .enumerate()
    .map(|(i, pref)| {
      let on = view.prefs.get(pref);
      let switch = if on {
        Span::styled(" [on]  ", Style::default().fg(Color::Green))
      } else {
        Span::styled(" [off] ", Style::default().fg(Color::DarkGray))
      };
      let style = if i == view.pref_cursor {
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
      } else {
        Style::default()
      };
      Line::from(vec![switch, Span::styled(pref.to_string(), style)])
    })
    .collect();

  f.render_widget(Paragraph::new(lines).block(panel("Notification Preferences")), area);
}
