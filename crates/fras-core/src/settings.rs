//! Account settings: the editable profile and notification preferences.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{
  Error, Result,
  identity::{Identity, Role},
};

const DEFAULT_PHONE: &str = "123-456-7890";
const DEFAULT_STUDENT_ID: &str = "STU12345";

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
  pub name:       String,
  pub email:      String,
  pub phone:      String,
  pub student_id: String,
}

impl ProfileForm {
  pub fn for_identity(identity: &Identity) -> Self {
    Self {
      name:       identity.name.clone(),
      email:      identity.email.clone(),
      phone:      DEFAULT_PHONE.into(),
      student_id: DEFAULT_STUDENT_ID.into(),
    }
  }

  /// Students cannot change their own student ID.
  pub fn student_id_editable(role: Role) -> bool { role != Role::Student }

  pub fn set_student_id(
    &mut self,
    role: Role,
    value: impl Into<String>,
  ) -> Result<()> {
    if !Self::student_id_editable(role) {
      return Err(Error::ProfileLocked("Student ID"));
    }
    self.student_id = value.into();
    Ok(())
  }
}

/// Avatar fallback: the first letter of each word, uppercased.
pub fn initials(name: &str) -> String {
  name
    .split_whitespace()
    .filter_map(|part| part.chars().next())
    .flat_map(char::to_uppercase)
    .collect()
}

// ─── Notification preferences ────────────────────────────────────────────────

/// One switch on the notifications tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum NotificationPref {
  #[strum(to_string = "Email notifications")]
  Email,
  #[strum(to_string = "Push notifications")]
  Push,
  #[strum(to_string = "Missed check-in alerts")]
  MissedCheckin,
  #[strum(to_string = "Upcoming class reminders")]
  UpcomingClass,
  #[strum(to_string = "Attendance status updates")]
  AttendanceUpdate,
  #[strum(to_string = "Academic announcements")]
  AcademicAnnouncements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPrefs {
  pub email_notifications:    bool,
  pub push_notifications:     bool,
  pub missed_checkin:         bool,
  pub upcoming_class:         bool,
  pub attendance_update:      bool,
  pub academic_announcements: bool,
}

impl Default for NotificationPrefs {
  fn default() -> Self {
    Self {
      email_notifications:    true,
      push_notifications:     true,
      missed_checkin:         true,
      upcoming_class:         true,
      attendance_update:      true,
      academic_announcements: false,
    }
  }
}

impl NotificationPrefs {
  pub fn get(&self, pref: NotificationPref) -> bool { *self.field(pref) }

  pub fn toggle(&mut self, pref: NotificationPref) {
    let field = self.field_mut(pref);
    *field = !*field;
  }

  fn field(&self, pref: NotificationPref) -> &bool {
    match pref {
      NotificationPref::Email => &self.email_notifications,
      NotificationPref::Push => &self.push_notifications,
      NotificationPref::MissedCheckin => &self.missed_checkin,
      NotificationPref::UpcomingClass => &self.upcoming_class,
      NotificationPref::AttendanceUpdate => &self.attendance_update,
      NotificationPref::AcademicAnnouncements => &self.academic_announcements,
    }
  }

  fn field_mut(&mut self, pref: NotificationPref) -> &mut bool {
    match pref {
      NotificationPref::Email => &mut self.email_notifications,
      NotificationPref::Push => &mut self.push_notifications,
      NotificationPref::MissedCheckin => &mut self.missed_checkin,
      NotificationPref::UpcomingClass => &mut self.upcoming_class,
      NotificationPref::AttendanceUpdate => &mut self.attendance_update,
      NotificationPref::AcademicAnnouncements => {
        &mut self.academic_announcements
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  fn alex() -> Identity {
    Identity {
      id:              "student1".into(),
      name:            "Alex Student".into(),
      email:           "student@example.com".into(),
      role:            Role::Student,
      profile_picture: None,
    }
  }

  #[test]
  fn initials_take_first_letter_of_each_word() {
    assert_eq!(initials("Alex Student"), "AS");
    assert_eq!(initials("Dr. Morgan Faculty"), "DMF");
    assert_eq!(initials("  ada   lovelace "), "AL");
    assert_eq!(initials(""), "");
  }

  #[test]
  fn students_cannot_change_student_id() {
    let mut form = ProfileForm::for_identity(&alex());
    assert_eq!(form.student_id, "STU12345");
    let err = form.set_student_id(Role::Student, "STU99999").unwrap_err();
    assert!(matches!(err, Error::ProfileLocked(_)));
    assert_eq!(form.student_id, "STU12345");

    form.set_student_id(Role::Faculty, "STU99999").unwrap();
    assert_eq!(form.student_id, "STU99999");
  }

  #[test]
  fn prefs_default_to_everything_but_announcements() {
    let prefs = NotificationPrefs::default();
    let on: Vec<_> = NotificationPref::iter().filter(|p| prefs.get(*p)).collect();
    assert_eq!(on.len(), 5);
    assert!(!prefs.get(NotificationPref::AcademicAnnouncements));
  }

  #[test]
  fn toggle_flips_one_switch() {
    let mut prefs = NotificationPrefs::default();
    prefs.toggle(NotificationPref::Push);
    assert!(!prefs.push_notifications);
    prefs.toggle(NotificationPref::Push);
    assert_eq!(prefs, NotificationPrefs::default());
  }
}
