//! Attendance data as produced by a [`RecordSupplier`](crate::supplier::RecordSupplier).
//!
//! Everything here is a read-only snapshot; consumers never mutate records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Outcome of one class for one student.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
  Present,
  Absent,
  Late,
  /// An administrative exception was applied instead of marking the student
  /// absent or late.
  Grace,
}

impl AttendanceStatus {
  /// Capitalised label for display, e.g. `"Present"`.
  pub fn label(self) -> &'static str {
    match self {
      Self::Present => "Present",
      Self::Absent => "Absent",
      Self::Late => "Late",
      Self::Grace => "Grace",
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One attendance outcome for one class meeting.
///
/// An absent record never carries an `entry_time`. [`new`](Self::new) and
/// deserialization both enforce this; code building the struct literally
/// must do the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawRecord")]
pub struct AttendanceRecord {
  pub id:          String,
  pub class_id:    String,
  /// Scheduled start of the class meeting.
  pub date:        DateTime<Utc>,
  pub status:      AttendanceStatus,
  /// Only ever set when `status` is not [`AttendanceStatus::Absent`].
  pub entry_time:  Option<DateTime<Utc>>,
  pub course_code: String,
  pub course_name: String,
}

impl AttendanceRecord {
  /// Build a record, dropping `entry_time` for absences.
  pub fn new(
    id: impl Into<String>,
    class_id: impl Into<String>,
    date: DateTime<Utc>,
    status: AttendanceStatus,
    entry_time: Option<DateTime<Utc>>,
    course_code: impl Into<String>,
    course_name: impl Into<String>,
  ) -> Self {
    let entry_time = match status {
      AttendanceStatus::Absent => None,
      _ => entry_time,
    };
    Self {
      id: id.into(),
      class_id: class_id.into(),
      date,
      status,
      entry_time,
      course_code: course_code.into(),
      course_name: course_name.into(),
    }
  }
}

/// Wire shape of [`AttendanceRecord`], normalised through
/// [`AttendanceRecord::new`] on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
  id:          String,
  class_id:    String,
  date:        DateTime<Utc>,
  status:      AttendanceStatus,
  #[serde(default)]
  entry_time:  Option<DateTime<Utc>>,
  course_code: String,
  course_name: String,
}

impl From<RawRecord> for AttendanceRecord {
  fn from(raw: RawRecord) -> Self {
    Self::new(
      raw.id,
      raw.class_id,
      raw.date,
      raw.status,
      raw.entry_time,
      raw.course_code,
      raw.course_name,
    )
  }
}

// ─── Schedule ────────────────────────────────────────────────────────────────

/// Where a class sits relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassPhase {
  Upcoming,
  InProgress,
  Finished,
}

/// A class meeting on today's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchedule {
  pub id:          String,
  pub course_code: String,
  pub course_name: String,
  pub instructor:  String,
  pub start:       DateTime<Utc>,
  pub end:         DateTime<Utc>,
  pub room:        String,
  pub building:    String,
}

impl ClassSchedule {
  /// Both bounds count as in progress.
  pub fn phase(&self, now: DateTime<Utc>) -> ClassPhase {
    if now < self.start {
      ClassPhase::Upcoming
    } else if now <= self.end {
      ClassPhase::InProgress
    } else {
      ClassPhase::Finished
    }
  }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

/// A student's status in the class a faculty member is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentEntry {
  pub id:     String,
  pub name:   String,
  pub status: AttendanceStatus,
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
  Info,
  Warning,
  Error,
  Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub id:        String,
  pub title:     String,
  pub message:   String,
  pub timestamp: DateTime<Utc>,
  pub read:      bool,
  #[serde(rename = "type")]
  pub kind:      NotificationKind,
}

/// Number of notifications not yet read. Derived, never stored.
pub fn unread_count(notifications: &[Notification]) -> usize {
  notifications.iter().filter(|n| !n.read).count()
}
