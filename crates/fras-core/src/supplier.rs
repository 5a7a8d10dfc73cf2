//! Collaborators that feed the views: the record supplier and the service
//! desk.
//!
//! The core makes no assumption about how these are backed. `fras-mock`
//! synthesises everything locally; a remote API would implement the same
//! traits and surface network failures through `Self::Error`.

use std::future::Future;

use crate::{
  attendance::{AttendanceRecord, ClassSchedule, Notification, StudentEntry},
  identity::Role,
  issue::{IssueReport, ValidatedIssue},
  settings::{NotificationPrefs, ProfileForm},
};

/// Read-only attendance data.
pub trait RecordSupplier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Today's timetable as seen by `role`.
  fn today_classes(
    &self,
    role: Role,
  ) -> impl Future<Output = Result<Vec<ClassSchedule>, Self::Error>> + Send + '_;

  /// Roughly the last month of attendance records.
  fn monthly_attendance(
    &self,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  fn notifications(
    &self,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  /// Roster of the class a faculty member is looking at.
  fn student_list(
    &self,
  ) -> impl Future<Output = Result<Vec<StudentEntry>, Self::Error>> + Send + '_;
}

/// Write-side requests: issue reports and settings.
pub trait ServiceDesk: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Previously filed reports, newest first.
  fn past_issues(
    &self,
  ) -> impl Future<Output = Result<Vec<IssueReport>, Self::Error>> + Send + '_;

  fn submit_issue(
    &self,
    issue: ValidatedIssue,
  ) -> impl Future<Output = Result<IssueReport, Self::Error>> + Send + '_;

  fn update_profile(
    &self,
    profile: ProfileForm,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn save_notification_prefs(
    &self,
    prefs: NotificationPrefs,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
