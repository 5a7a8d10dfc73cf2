//! Full notification list.

use chrono::{DateTime, Utc};
use fras_core::attendance::NotificationKind;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState},
};

use super::panel;
use crate::app::Portal;

/// "5 minutes ago" style age of a timestamp.
pub fn age(at: DateTime<Utc>) -> String {
  let minutes = (Utc::now() - at).num_minutes().max(0);
  match minutes {
    0 => "just now".into(),
    1..60 => format!("{minutes} min ago"),
    60..1440 => format!("{} h ago", minutes / 60),
    _ => format!("{} d ago", minutes / 1440),
  }
}

fn kind_color(kind: NotificationKind) -> Color {
  match kind {
    NotificationKind::Info => Color::Cyan,
    NotificationKind::Warning => Color::Yellow,
    NotificationKind::Error => Color::Red,
    NotificationKind::Success => Color::Green,
  }
}

pub fn draw(f: &mut Frame, area: Rect, portal: &Portal) {
  let items: Vec<ListItem> = portal
    .notifications
    .iter()
    .map(|n| {
      let title_style = if n.read {
        Style::default()
      } else {
        Style::default().add_modifier(Modifier::BOLD)
      };
      ListItem::new(vec![
        Line::from(vec![
          Span::styled(
            format!(" {:<8}", n.kind),
            Style::default().fg(kind_color(n.kind)),
          ),
          Span::styled(n.title.clone(), title_style),
          Span::styled(format!("  {}", age(n.timestamp)), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
          format!("          {}", n.message),
          Style::default().fg(Color::Gray),
        )),
      ])
    })
    .collect();

  let title = format!("Notifications ({} unread)", portal.unread());
  let list = List::new(items)
    .block(panel(title))
    .highlight_style(Style::default().bg(Color::DarkGray));
  let mut state = ListState::default().with_selected(Some(portal.notification_scroll));
  f.render_stateful_widget(list, area, &mut state);
}
