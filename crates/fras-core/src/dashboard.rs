//! Role-specific dashboards.
//!
//! The variant is chosen once, from the identity's role, right after
//! authentication. Views that only need the common surface go through
//! [`DashboardView`]; anything role-specific matches on [`Dashboard`].

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::{
  Error, Result,
  attendance::{
    AttendanceRecord, AttendanceStatus, ClassPhase, ClassSchedule,
    Notification, StudentEntry,
  },
  identity::Role,
  query::{StatusCounts, calendar_day},
  supplier::RecordSupplier,
};

/// How many notifications the student dashboard shows.
pub const RECENT_NOTIFICATIONS: usize = 3;

/// What every dashboard can show.
pub trait DashboardView {
  fn heading(&self) -> &'static str;

  fn classes(&self) -> &[ClassSchedule];

  /// The headline status tally.
  fn summary(&self) -> StatusCounts;
}

// ─── Student ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StudentDashboard {
  pub classes:       Vec<ClassSchedule>,
  /// Newest first, at most [`RECENT_NOTIFICATIONS`].
  pub notifications: Vec<Notification>,
  pub counts:        StatusCounts,
  /// Today's records, used to badge finished classes.
  today_records:     Vec<AttendanceRecord>,
}

impl StudentDashboard {
  pub fn new(
    classes: Vec<ClassSchedule>,
    mut notifications: Vec<Notification>,
    records: &[AttendanceRecord],
    today: NaiveDate,
    tz: &impl TimeZone,
  ) -> Self {
    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    notifications.truncate(RECENT_NOTIFICATIONS);

    Self {
      classes,
      notifications,
      counts: StatusCounts::tally(records.iter().map(|r| r.status)),
      today_records: records
        .iter()
        .filter(|r| calendar_day(r.date, tz) == today)
        .cloned()
        .collect(),
    }
  }

  /// Attendance outcome for a class that has already finished. Upcoming and
  /// running classes have none yet.
  pub fn class_status(
    &self,
    class: &ClassSchedule,
    now: DateTime<Utc>,
  ) -> Option<AttendanceStatus> {
    if class.phase(now) != ClassPhase::Finished {
      return None;
    }
    self
      .today_records
      .iter()
      .find(|r| r.class_id == class.id)
      .map(|r| r.status)
  }
}

impl DashboardView for StudentDashboard {
  fn heading(&self) -> &'static str { "Student Dashboard" }

  fn classes(&self) -> &[ClassSchedule] { &self.classes }

  fn summary(&self) -> StatusCounts { self.counts }
}

// ─── Faculty ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FacultyDashboard {
  pub classes:  Vec<ClassSchedule>,
  /// Index into `classes`; the first class is selected by default.
  pub selected: Option<usize>,
  pub roster:   Vec<StudentEntry>,
}

impl FacultyDashboard {
  pub fn new(classes: Vec<ClassSchedule>, roster: Vec<StudentEntry>) -> Self {
    let selected = (!classes.is_empty()).then_some(0);
    Self { classes, selected, roster }
  }

  pub fn selected_class(&self) -> Option<&ClassSchedule> {
    self.selected.and_then(|i| self.classes.get(i))
  }

  /// Move the selection forward, wrapping around.
  pub fn select_next(&mut self) {
    if let Some(i) = self.selected {
      self.selected = Some((i + 1) % self.classes.len());
    }
  }

  /// Move the selection back, wrapping around.
  pub fn select_prev(&mut self) {
    if let Some(i) = self.selected {
      let len = self.classes.len();
      self.selected = Some((i + len - 1) % len);
    }
  }
}

impl DashboardView for FacultyDashboard {
  fn heading(&self) -> &'static str { "Faculty Dashboard" }

  fn classes(&self) -> &[ClassSchedule] { &self.classes }

  fn summary(&self) -> StatusCounts { StatusCounts::of_roster(&self.roster) }
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Dashboard {
  Student(StudentDashboard),
  Faculty(FacultyDashboard),
}

impl Dashboard {
  /// Fetch what the dashboard for `role` needs from `supplier`.
  pub async fn load<R, Tz>(
    role: Role,
    supplier: &R,
    today: NaiveDate,
    tz: &Tz,
  ) -> Result<Self>
  where
    R: RecordSupplier,
    Tz: TimeZone,
  {
    let classes = supplier.today_classes(role).await.map_err(Error::supplier)?;

    match role {
      Role::Student => {
        let notifications =
          supplier.notifications().await.map_err(Error::supplier)?;
        let records =
          supplier.monthly_attendance().await.map_err(Error::supplier)?;
        Ok(Self::Student(StudentDashboard::new(
          classes,
          notifications,
          &records,
          today,
          tz,
        )))
      }
      Role::Faculty => {
        let roster = supplier.student_list().await.map_err(Error::supplier)?;
        Ok(Self::Faculty(FacultyDashboard::new(classes, roster)))
      }
    }
  }

  pub fn role(&self) -> Role {
    match self {
      Self::Student(_) => Role::Student,
      Self::Faculty(_) => Role::Faculty,
    }
  }

  fn view(&self) -> &dyn DashboardView {
    match self {
      Self::Student(d) => d,
      Self::Faculty(d) => d,
    }
  }
}

impl DashboardView for Dashboard {
  fn heading(&self) -> &'static str { self.view().heading() }

  fn classes(&self) -> &[ClassSchedule] { self.view().classes() }

  fn summary(&self) -> StatusCounts { self.view().summary() }
}
