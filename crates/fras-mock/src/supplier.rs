//! [`MockSupplier`]: the in-process stand-in for a FRAS backend.

use std::{
  convert::Infallible,
  sync::{Mutex, MutexGuard, PoisonError},
  time::Duration,
};

use chrono::{Local, NaiveDate, Utc};
use fras_core::{
  attendance::{AttendanceRecord, ClassSchedule, Notification, StudentEntry},
  identity::Role,
  issue::{IssueReport, ValidatedIssue},
  settings::{NotificationPrefs, ProfileForm},
  supplier::{RecordSupplier, ServiceDesk},
};
use rand::{SeedableRng, rngs::StdRng};
use uuid::Uuid;

use crate::generate;

/// How long the desk pretends a write takes.
pub const DEFAULT_SUBMIT_LATENCY: Duration = Duration::from_millis(1500);

/// Generates the month of attendance once, at construction, so every view
/// sees the same records for the lifetime of the process. The calendar day,
/// timetable and notifications follow the wall clock on each call, so a
/// process left running past midnight gets the new day's classes while the
/// records stay anchored to [`generated_for`](Self::generated_for).
pub struct MockSupplier {
  /// Fixed calendar day; `None` follows the local clock.
  pinned:        Option<NaiveDate>,
  generated_for: NaiveDate,
  records:       Vec<AttendanceRecord>,
  latency: Duration,
  issues:  Mutex<Vec<IssueReport>>,
  profile: Mutex<Option<ProfileForm>>,
  prefs:   Mutex<NotificationPrefs>,
}

impl MockSupplier {
  /// Build for the local calendar. `seed` makes the month reproducible.
  pub fn new(seed: Option<u64>) -> Self {
    let today = Local::now().date_naive();
    let mut rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let records = generate::monthly_attendance(&Local, today, &mut rng);
    tracing::debug!(%today, records = records.len(), ?seed, "generated mock month");
    Self::build(today, None, records)
  }

  /// Build around an explicit record set, e.g. one generated in a fixed zone.
  /// The calendar day stays at `today` instead of following the clock.
  pub fn from_parts(today: NaiveDate, records: Vec<AttendanceRecord>) -> Self {
    Self::build(today, Some(today), records)
  }

  fn build(
    generated_for: NaiveDate,
    pinned: Option<NaiveDate>,
    records: Vec<AttendanceRecord>,
  ) -> Self {
    Self {
      pinned,
      generated_for,
      records,
      latency: DEFAULT_SUBMIT_LATENCY,
      issues: Mutex::new(generate::seed_issues()),
      profile: Mutex::new(None),
      prefs: Mutex::new(NotificationPrefs::default()),
    }
  }

  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  /// The current local calendar day, or the pinned one.
  pub fn today(&self) -> NaiveDate {
    self.pinned.unwrap_or_else(|| Local::now().date_naive())
  }

  /// The calendar day the month of records was generated for.
  pub fn generated_for(&self) -> NaiveDate { self.generated_for }

  /// The last profile accepted by [`ServiceDesk::update_profile`].
  pub fn profile(&self) -> Option<ProfileForm> { lock(&self.profile).clone() }

  pub fn notification_prefs(&self) -> NotificationPrefs { *lock(&self.prefs) }

  async fn pause(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ─── RecordSupplier impl ─────────────────────────────────────────────────────

impl RecordSupplier for MockSupplier {
  type Error = Infallible;

  async fn today_classes(
    &self,
    role: Role,
  ) -> Result<Vec<ClassSchedule>, Infallible> {
    Ok(generate::today_classes(&Local, self.today(), role))
  }

  async fn monthly_attendance(
    &self,
  ) -> Result<Vec<AttendanceRecord>, Infallible> {
    Ok(self.records.clone())
  }

  async fn notifications(&self) -> Result<Vec<Notification>, Infallible> {
    Ok(generate::notifications(Utc::now()))
  }

  async fn student_list(&self) -> Result<Vec<StudentEntry>, Infallible> {
    Ok(generate::student_list())
  }
}

// ─── ServiceDesk impl ────────────────────────────────────────────────────────

impl ServiceDesk for MockSupplier {
  type Error = Infallible;

  async fn past_issues(&self) -> Result<Vec<IssueReport>, Infallible> {
    Ok(lock(&self.issues).clone())
  }

  async fn submit_issue(
    &self,
    issue: ValidatedIssue,
  ) -> Result<IssueReport, Infallible> {
    self.pause().await;
    let report = issue.into_report(format!("issue-{}", Uuid::new_v4().simple()));
    tracing::info!(id = %report.id, course = %report.course, "issue report filed");
    lock(&self.issues).insert(0, report.clone());
    Ok(report)
  }

  async fn update_profile(&self, profile: ProfileForm) -> Result<(), Infallible> {
    self.pause().await;
    tracing::info!(name = %profile.name, "profile updated");
    *lock(&self.profile) = Some(profile);
    Ok(())
  }

  async fn save_notification_prefs(
    &self,
    prefs: NotificationPrefs,
  ) -> Result<(), Infallible> {
    self.pause().await;
    tracing::info!(?prefs, "notification preferences saved");
    *lock(&self.prefs) = prefs;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveTime;
  use fras_core::{
    identity::Identity,
    issue::{IssueDraft, IssueStatus},
    settings::NotificationPref,
  };

  use super::*;

  fn supplier() -> MockSupplier { MockSupplier::new(Some(42)) }

  #[tokio::test]
  async fn seeded_suppliers_agree() {
    let a = supplier().monthly_attendance().await.unwrap();
    let b = supplier().monthly_attendance().await.unwrap();
    assert_eq!(a, b);
  }

  #[tokio::test]
  async fn repeated_reads_are_stable() {
    let s = MockSupplier::new(None);
    let first = s.monthly_attendance().await.unwrap();
    assert_eq!(first, s.monthly_attendance().await.unwrap());
  }

  #[tokio::test(start_paused = true)]
  async fn submitted_issue_is_listed_first_and_pending() {
    let s = supplier();
    let issue = IssueDraft {
      date:   Some(s.today()),
      course: "ENG202".into(),
      time:   "14:05".into(),
      reason: "Camera was covered during the lecture".into(),
    }
    .validate()
    .unwrap();

    let started = tokio::time::Instant::now();
    let report = s.submit_issue(issue).await.unwrap();
    assert!(started.elapsed() >= DEFAULT_SUBMIT_LATENCY);
    assert_eq!(report.status, IssueStatus::Pending);
    assert_eq!(report.time, NaiveTime::from_hms_opt(14, 5, 0));

    let past = s.past_issues().await.unwrap();
    assert_eq!(past.len(), 3);
    assert_eq!(past[0], report);
    assert_eq!(past[1].id, "issue1");
  }

  #[tokio::test]
  async fn settings_are_kept() {
    let s = supplier().with_latency(Duration::ZERO);
    let identity = Identity {
      id:              "faculty1".into(),
      name:            "Dr. Morgan Faculty".into(),
      email:           "faculty@example.com".into(),
      role:            Role::Faculty,
      profile_picture: None,
    };
    let mut profile = ProfileForm::for_identity(&identity);
    profile.phone = "555-0100".into();
    s.update_profile(profile.clone()).await.unwrap();
    assert_eq!(s.profile(), Some(profile));

    let mut prefs = NotificationPrefs::default();
    prefs.toggle(NotificationPref::AcademicAnnouncements);
    s.save_notification_prefs(prefs).await.unwrap();
    assert!(s.notification_prefs().academic_announcements);
  }

  #[tokio::test]
  async fn today_follows_the_local_clock() {
    let s = supplier();
    let before = Local::now().date_naive();
    let today = s.today();
    let after = Local::now().date_naive();
    assert!(before <= today && today <= after);
    assert!(s.generated_for() <= today);

    let classes = s.today_classes(Role::Student).await.unwrap();
    let day = classes[0].start.with_timezone(&Local).date_naive();
    assert!(before <= day && day <= Local::now().date_naive());
  }

  #[tokio::test]
  async fn pinned_supplier_keeps_its_day() {
    let day = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let s = MockSupplier::from_parts(day, Vec::new());
    assert_eq!(s.today(), day);
    assert_eq!(s.generated_for(), day);

    let classes = s.today_classes(Role::Faculty).await.unwrap();
    assert_eq!(classes.len(), 3);
    for c in classes {
      assert_eq!(c.start.with_timezone(&Local).date_naive(), day);
    }
  }

  #[tokio::test]
  async fn both_roles_get_todays_timetable() {
    let s = supplier();
    let student = s.today_classes(Role::Student).await.unwrap();
    let faculty = s.today_classes(Role::Faculty).await.unwrap();
    assert_eq!(student.len(), 3);
    assert_eq!(student, faculty);
    assert_eq!(s.student_list().await.unwrap().len(), 10);
  }
}
