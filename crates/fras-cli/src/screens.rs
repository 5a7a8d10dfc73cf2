//! Per-screen state and key handling. Everything here is synchronous; side
//! effects are returned to [`crate::app::App`] as an [`Action`].

use chrono::{Duration, Local, NaiveDate};
use crossterm::event::KeyCode;
use fras_core::{
  attendance::{AttendanceRecord, AttendanceStatus},
  identity::{Identity, Role},
  issue::{IssueDraft, ValidatedIssue},
  query::{
    FilterCriteria, Selector, StatusCounts, aggregate_by_status,
    distinct_courses, days_with_status,
  },
  settings::{NotificationPref, NotificationPrefs, ProfileForm},
};
use strum::{EnumIter, IntoEnumIterator};

use crate::form::TextField;

// ─── Actions ──────────────────────────────────────────────────────────────────

/// Something a key press asks the application to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  None,
  Quit,
  Logout,
  Status(String),
  SubmitIssue(ValidatedIssue),
  SaveProfile(ProfileForm),
  SavePrefs(NotificationPrefs),
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Step through the variants of a field enum, wrapping at either end.
pub fn step<T: IntoEnumIterator + PartialEq + Copy>(current: T, forward: bool) -> T {
  let all: Vec<T> = T::iter().collect();
  let n = all.len();
  let i = all.iter().position(|x| *x == current).unwrap_or(0);
  if forward { all[(i + 1) % n] } else { all[(i + n - 1) % n] }
}

/// `All` → first option → … → last option → `All`.
pub fn cycle<T: Clone + PartialEq>(current: &Selector<T>, options: &[T]) -> Selector<T> {
  let next = match current {
    Selector::All => options.first(),
    Selector::Only(v) => options
      .iter()
      .position(|o| o == v)
      .and_then(|i| options.get(i + 1)),
  };
  next.cloned().map_or(Selector::All, Selector::Only)
}

fn shift(day: NaiveDate, days: i64) -> NaiveDate {
  day.checked_add_signed(Duration::days(days)).unwrap_or(day)
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum LoginField {
  Email,
  Password,
  Role,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
  pub email:    TextField,
  pub password: TextField,
  pub role:     Role,
  pub focus:    LoginField,
}

impl Default for LoginForm {
  fn default() -> Self {
    Self {
      email:    TextField::default(),
      password: TextField::masked(),
      role:     Role::Student,
      focus:    LoginField::Email,
    }
  }
}

impl LoginForm {
  /// Edit the form. `Enter` and `Esc` are left to the caller.
  pub fn handle_key(&mut self, code: KeyCode) {
    match code {
      KeyCode::Tab | KeyCode::Down => self.focus = step(self.focus, true),
      KeyCode::BackTab | KeyCode::Up => self.focus = step(self.focus, false),
      code => match self.focus {
        LoginField::Email => {
          self.email.handle(code);
        }
        LoginField::Password => {
          self.password.handle(code);
        }
        LoginField::Role => {
          if matches!(code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
            self.role = self.role.toggled();
          }
        }
      },
    }
  }
}

// ─── History ──────────────────────────────────────────────────────────────────

/// The attendance history screen: one day of records at a time.
#[derive(Debug, Clone)]
pub struct HistoryView {
  pub records:  Vec<AttendanceRecord>,
  pub criteria: FilterCriteria,
  /// Course codes in first-seen order, for the course filter.
  pub courses:  Vec<String>,
  pub scroll:   usize,
}

impl HistoryView {
  pub fn new(records: Vec<AttendanceRecord>, day: NaiveDate) -> Self {
    let courses = distinct_courses(&records);
    Self { records, criteria: FilterCriteria::for_day(day), courses, scroll: 0 }
  }

  pub fn visible(&self) -> Vec<&AttendanceRecord> {
    self.criteria.apply(&self.records, &Local)
  }

  /// Counts for the selected day, ignoring the status and course filters.
  pub fn day_summary(&self) -> StatusCounts {
    aggregate_by_status(&self.records, self.criteria.day, &Local)
  }

  /// Number of distinct days in the month carrying each status.
  pub fn marked_days(&self) -> Vec<(AttendanceStatus, usize)> {
    AttendanceStatus::iter()
      .map(|s| (s, days_with_status(&self.records, s, &Local).len()))
      .collect()
  }

  pub fn handle_key(&mut self, code: KeyCode, today: NaiveDate) -> Action {
    let criteria = &mut self.criteria;
    match code {
      KeyCode::Left | KeyCode::Char('h') => criteria.day = shift(criteria.day, -1),
      KeyCode::Right | KeyCode::Char('l') => criteria.day = shift(criteria.day, 1),
      KeyCode::Char('H') => criteria.day = shift(criteria.day, -7),
      KeyCode::Char('L') => criteria.day = shift(criteria.day, 7),
      KeyCode::Char('t') => criteria.day = today,
      KeyCode::Char('s') => {
        let statuses: Vec<_> = AttendanceStatus::iter().collect();
        criteria.status = cycle(&criteria.status, &statuses);
      }
      KeyCode::Char('c') => criteria.course = cycle(&criteria.course, &self.courses),
      KeyCode::Char('x') => *criteria = FilterCriteria::for_day(criteria.day),
      KeyCode::Down | KeyCode::Char('j') => {
        let last = self.visible().len().saturating_sub(1);
        self.scroll = (self.scroll + 1).min(last);
        return Action::None;
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.scroll = self.scroll.saturating_sub(1);
        return Action::None;
      }
      _ => return Action::None,
    }
    self.scroll = 0;
    Action::None
  }
}

// ─── Report issue ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum ReportField {
  Date,
  Course,
  Time,
  Reason,
  Submit,
}

#[derive(Debug, Clone)]
pub struct ReportForm {
  pub date:    NaiveDate,
  /// Index into the course list; `None` until one is picked.
  pub course:  Option<usize>,
  pub time:    TextField,
  pub reason:  TextField,
  pub focus:   ReportField,
  /// Keys go to the focused text field.
  pub editing: bool,
}

impl ReportForm {
  pub fn new(date: NaiveDate) -> Self {
    Self {
      date,
      course: None,
      time: TextField::default(),
      reason: TextField::default(),
      focus: ReportField::Date,
      editing: false,
    }
  }

  pub fn draft(&self, courses: &[String]) -> IssueDraft {
    IssueDraft {
      date:   Some(self.date),
      course: self
        .course
        .and_then(|i| courses.get(i))
        .cloned()
        .unwrap_or_default(),
      time:   self.time.value.clone(),
      reason: self.reason.value.clone(),
    }
  }

  pub fn handle_key(&mut self, code: KeyCode, courses: &[String]) -> Action {
    if self.editing {
      let field = match self.focus {
        ReportField::Time => &mut self.time,
        ReportField::Reason => &mut self.reason,
        _ => {
          self.editing = false;
          return Action::None;
        }
      };
      if matches!(code, KeyCode::Enter | KeyCode::Esc) {
        self.editing = false;
      } else {
        field.handle(code);
      }
      return Action::None;
    }

    match code {
      KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
        self.focus = step(self.focus, true)
      }
      KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
        self.focus = step(self.focus, false)
      }
      KeyCode::Left | KeyCode::Char('h') => self.adjust(-1, courses.len()),
      KeyCode::Right | KeyCode::Char('l') => self.adjust(1, courses.len()),
      KeyCode::Enter => match self.focus {
        ReportField::Time | ReportField::Reason => self.editing = true,
        ReportField::Submit => {
          return match self.draft(courses).validate() {
            Ok(issue) => Action::SubmitIssue(issue),
            Err(e) => Action::Status(e.to_string()),
          };
        }
        _ => self.focus = step(self.focus, true),
      },
      _ => {}
    }
    Action::None
  }

  fn adjust(&mut self, delta: i64, course_count: usize) {
    match self.focus {
      ReportField::Date => self.date = shift(self.date, delta),
      ReportField::Course if course_count > 0 => {
        // `None` sits between the last and the first course.
        let slots = course_count as i64 + 1;
        let pos = self.course.map_or(0, |i| i as i64 + 1);
        let next = (pos + delta).rem_euclid(slots);
        self.course = (next > 0).then(|| next as usize - 1);
      }
      _ => {}
    }
  }
}

// ─── Settings ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTab {
  Profile,
  Notifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum ProfileField {
  Name,
  Email,
  Phone,
  StudentId,
}

impl ProfileField {
  pub fn label(self) -> &'static str {
    match self {
      Self::Name => "Full name",
      Self::Email => "Email",
      Self::Phone => "Phone",
      Self::StudentId => "Student ID",
    }
  }
}

#[derive(Debug, Clone)]
pub struct SettingsView {
  pub tab:         SettingsTab,
  pub profile:     ProfileForm,
  pub focus:       ProfileField,
  /// Edit buffer for the focused profile field.
  pub edit:        Option<TextField>,
  pub prefs:       NotificationPrefs,
  pub pref_cursor: usize,
}

impl SettingsView {
  pub fn new(identity: &Identity, prefs: NotificationPrefs) -> Self {
    Self {
      tab: SettingsTab::Profile,
      profile: ProfileForm::for_identity(identity),
      focus: ProfileField::Name,
      edit: None,
      prefs,
      pref_cursor: 0,
    }
  }

  pub fn value(&self, field: ProfileField) -> &str {
    match field {
      ProfileField::Name => &self.profile.name,
      ProfileField::Email => &self.profile.email,
      ProfileField::Phone => &self.profile.phone,
      ProfileField::StudentId => &self.profile.student_id,
    }
  }

  pub fn selected_pref(&self) -> Option<NotificationPref> {
    NotificationPref::iter().nth(self.pref_cursor)
  }

  pub fn handle_key(&mut self, code: KeyCode, role: Role) -> Action {
    if self.edit.is_some() {
      return self.handle_edit_key(code, role);
    }
    if code == KeyCode::Tab {
      self.tab = match self.tab {
        SettingsTab::Profile => SettingsTab::Notifications,
        SettingsTab::Notifications => SettingsTab::Profile,
      };
      return Action::None;
    }
    match self.tab {
      SettingsTab::Profile => self.handle_profile_key(code, role),
      SettingsTab::Notifications => self.handle_prefs_key(code),
    }
  }

  fn handle_profile_key(&mut self, code: KeyCode, role: Role) -> Action {
    match code {
      KeyCode::Down | KeyCode::Char('j') => self.focus = step(self.focus, true),
      KeyCode::Up | KeyCode::Char('k') => self.focus = step(self.focus, false),
      KeyCode::Enter => {
        if self.focus == ProfileField::StudentId
          && !ProfileForm::student_id_editable(role)
        {
          return Action::Status(
            fras_core::Error::ProfileLocked(ProfileField::StudentId.label())
              .to_string(),
          );
        }
        self.edit = Some(TextField::new(self.value(self.focus)));
      }
      KeyCode::Char('s') => return Action::SaveProfile(self.profile.clone()),
      _ => {}
    }
    Action::None
  }

  fn handle_edit_key(&mut self, code: KeyCode, role: Role) -> Action {
    match code {
      KeyCode::Esc => self.edit = None,
      KeyCode::Enter => {
        if let Some(buffer) = self.edit.take() {
          return self.commit(buffer.value, role);
        }
      }
      code => {
        if let Some(buffer) = self.edit.as_mut() {
          buffer.handle(code);
        }
      }
    }
    Action::None
  }

  fn commit(&mut self, value: String, role: Role) -> Action {
    match self.focus {
      ProfileField::Name => self.profile.name = value,
      ProfileField::Email => self.profile.email = value,
      ProfileField::Phone => self.profile.phone = value,
      ProfileField::StudentId => {
        if let Err(e) = self.profile.set_student_id(role, value) {
          return Action::Status(e.to_string());
        }
      }
    }
    Action::None
  }

  fn handle_prefs_key(&mut self, code: KeyCode) -> Action {
    let count = NotificationPref::iter().count();
    match code {
      KeyCode::Down | KeyCode::Char('j') => {
        self.pref_cursor = (self.pref_cursor + 1).min(count - 1)
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.pref_cursor = self.pref_cursor.saturating_sub(1)
      }
      KeyCode::Char(' ') | KeyCode::Enter => {
        if let Some(pref) = self.selected_pref() {
          self.prefs.toggle(pref);
        }
      }
      KeyCode::Char('s') => return Action::SavePrefs(self.prefs),
      _ => {}
    }
    Action::None
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 4, d).unwrap() }

  fn type_text(form: &mut ReportForm, courses: &[String], text: &str) {
    for c in text.chars() {
      form.handle_key(KeyCode::Char(c), courses);
    }
  }

  fn courses() -> Vec<String> { vec!["CS101".into(), "MATH104".into()] }

  #[test]
  fn step_wraps_both_ways() {
    assert_eq!(step(LoginField::Role, true), LoginField::Email);
    assert_eq!(step(LoginField::Email, false), LoginField::Role);
  }

  #[test]
  fn cycle_returns_to_all() {
    let opts = vec!["a".to_string(), "b".to_string()];
    let s = cycle(&Selector::All, &opts);
    assert_eq!(s, Selector::Only("a".to_string()));
    let s = cycle(&s, &opts);
    assert_eq!(s, Selector::Only("b".to_string()));
    assert_eq!(cycle(&s, &opts), Selector::All);
    assert_eq!(cycle(&Selector::<String>::All, &[]), Selector::All);
  }

  #[test]
  fn login_role_toggles_only_on_role_field() {
    let mut form = LoginForm::default();
    form.handle_key(KeyCode::Char(' '));
    assert_eq!(form.email.value, " ");
    assert_eq!(form.role, Role::Student);

    form.handle_key(KeyCode::Tab);
    form.handle_key(KeyCode::Tab);
    assert_eq!(form.focus, LoginField::Role);
    form.handle_key(KeyCode::Char(' '));
    assert_eq!(form.role, Role::Faculty);
  }

  #[test]
  fn history_keys_move_day_and_filters() {
    let at = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap();
    let record = AttendanceRecord::new(
      "r1", "class1", at, AttendanceStatus::Present, Some(at), "CS101", "Intro",
    );
    let mut view = HistoryView::new(vec![record], day(2));

    view.handle_key(KeyCode::Char('h'), day(3));
    assert_eq!(view.criteria.day, day(1));
    view.handle_key(KeyCode::Char('t'), day(3));
    assert_eq!(view.criteria.day, day(3));

    view.handle_key(KeyCode::Char('s'), day(3));
    assert_eq!(view.criteria.status, Selector::Only(AttendanceStatus::Present));
    view.handle_key(KeyCode::Char('c'), day(3));
    assert_eq!(view.criteria.course, Selector::Only("CS101".to_string()));

    view.handle_key(KeyCode::Char('x'), day(3));
    assert_eq!(view.criteria, FilterCriteria::for_day(day(3)));
  }

  #[test]
  fn report_submit_reports_the_first_problem() {
    let courses = courses();
    let mut form = ReportForm::new(day(1));
    form.focus = ReportField::Submit;
    assert_eq!(
      form.handle_key(KeyCode::Enter, &courses),
      Action::Status("Please select a course".into())
    );
  }

  #[test]
  fn report_form_builds_a_valid_issue() {
    let courses = courses();
    let mut form = ReportForm::new(day(1));

    form.handle_key(KeyCode::Down, &courses);
    form.handle_key(KeyCode::Right, &courses);
    form.handle_key(KeyCode::Right, &courses);
    assert_eq!(form.course, Some(1));

    form.handle_key(KeyCode::Down, &courses);
    form.handle_key(KeyCode::Enter, &courses);
    type_text(&mut form, &courses, "09:15");
    form.handle_key(KeyCode::Enter, &courses);

    form.handle_key(KeyCode::Down, &courses);
    form.handle_key(KeyCode::Enter, &courses);
    type_text(&mut form, &courses, "scanner did not see me");
    form.handle_key(KeyCode::Esc, &courses);

    form.handle_key(KeyCode::Down, &courses);
    let Action::SubmitIssue(issue) = form.handle_key(KeyCode::Enter, &courses)
    else {
      panic!("expected a submission");
    };
    assert_eq!(issue.course, "MATH104");
    assert_eq!(issue.date, day(1));
    assert_eq!(issue.time.format("%H:%M").to_string(), "09:15");
  }

  #[test]
  fn course_picker_wraps_through_unselected() {
    let courses = courses();
    let mut form = ReportForm::new(day(1));
    form.focus = ReportField::Course;
    form.handle_key(KeyCode::Left, &courses);
    assert_eq!(form.course, Some(1));
    form.handle_key(KeyCode::Right, &courses);
    assert_eq!(form.course, None);
  }

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
  fn students_cannot_edit_their_student_id() {
    let mut view = SettingsView::new(&alex(), NotificationPrefs::default());
    view.focus = ProfileField::StudentId;
    assert_eq!(
      view.handle_key(KeyCode::Enter, Role::Student),
      Action::Status("Student ID cannot be changed".into())
    );
    assert!(view.edit.is_none());
  }

  #[test]
  fn profile_edit_commits_on_enter_and_cancels_on_esc() {
    let mut view = SettingsView::new(&alex(), NotificationPrefs::default());
    view.focus = ProfileField::Phone;

    view.handle_key(KeyCode::Enter, Role::Student);
    view.handle_key(KeyCode::Backspace, Role::Student);
    view.handle_key(KeyCode::Char('1'), Role::Student);
    view.handle_key(KeyCode::Enter, Role::Student);
    assert_eq!(view.profile.phone, "123-456-7891");

    view.handle_key(KeyCode::Enter, Role::Student);
    view.handle_key(KeyCode::Char('9'), Role::Student);
    view.handle_key(KeyCode::Esc, Role::Student);
    assert_eq!(view.profile.phone, "123-456-7891");

    assert_eq!(
      view.handle_key(KeyCode::Char('s'), Role::Student),
      Action::SaveProfile(view.profile.clone())
    );
  }

  #[test]
  fn prefs_tab_toggles_the_selected_switch() {
    let mut view = SettingsView::new(&alex(), NotificationPrefs::default());
    view.handle_key(KeyCode::Tab, Role::Student);
    assert_eq!(view.tab, SettingsTab::Notifications);

    view.handle_key(KeyCode::Char(' '), Role::Student);
    assert!(!view.prefs.email_notifications);
    assert!(view.prefs.push_notifications);
  }
}
