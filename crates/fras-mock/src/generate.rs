//! Pure generators for the mock data set.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use fras_core::{
  attendance::{
    AttendanceRecord, AttendanceStatus, ClassSchedule, Notification,
    NotificationKind, StudentEntry,
  },
  identity::Role,
  issue::{IssueReport, IssueStatus},
};
use rand::Rng;

/// `(code, name)` of every course in the mock timetable.
pub const COURSES: [(&str, &str); 3] = [
  ("CS101", "Introduction to Computer Science"),
  ("MATH104", "Linear Algebra"),
  ("ENG202", "Technical Writing"),
];

/// How far back [`monthly_attendance`] reaches, today included.
pub const HISTORY_DAYS: i64 = 30;

/// Drawn uniformly, so present is three times as likely as anything else.
const STATUS_POOL: [AttendanceStatus; 6] = [
  AttendanceStatus::Present,
  AttendanceStatus::Present,
  AttendanceStatus::Present,
  AttendanceStatus::Late,
  AttendanceStatus::Absent,
  AttendanceStatus::Grace,
];

/// `date` at `hour:minute` wall-clock time in `tz`. `None` only if that time
/// does not exist there (a DST gap).
fn wall_clock<Tz: TimeZone>(
  tz: &Tz,
  date: NaiveDate,
  hour: u32,
  minute: u32,
) -> Option<DateTime<Utc>> {
  let naive = date.and_hms_opt(hour, minute, 0)?;
  tz.from_local_datetime(&naive)
    .earliest()
    .map(|dt| dt.with_timezone(&Utc))
}

// ─── Attendance ──────────────────────────────────────────────────────────────

/// One record per course per weekday over the last [`HISTORY_DAYS`] days.
///
/// Course `n` (0-based) meets at `9 + 2n` o'clock. Besides the random draw:
/// today's last course is always absent (it has not happened yet), and
/// MATH104 is late every seventh day counting back from today.
pub fn monthly_attendance<Tz: TimeZone, R: Rng>(
  tz: &Tz,
  today: NaiveDate,
  rng: &mut R,
) -> Vec<AttendanceRecord> {
  let mut records = Vec::new();

  for days_ago in (0..=HISTORY_DAYS).rev() {
    let date = today - Duration::days(days_ago);
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
      continue;
    }

    for (index, (code, name)) in COURSES.iter().enumerate() {
      let mut status = STATUS_POOL[rng.gen_range(0..STATUS_POOL.len())];
      if days_ago == 0 && index > 1 {
        status = AttendanceStatus::Absent;
      }
      if days_ago % 7 == 0 && *code == "MATH104" {
        status = AttendanceStatus::Late;
      }

      let hour = 9 + 2 * index as u32;
      let Some(start) = wall_clock(tz, date, hour, 0) else {
        continue;
      };
      let entry_time = (status != AttendanceStatus::Absent)
        .then(|| start + Duration::seconds(rng.gen_range(0..=30 * 60)));

      records.push(AttendanceRecord::new(
        format!("att-{days_ago}-{index}"),
        format!("class{}", index + 1),
        start,
        status,
        entry_time,
        *code,
        *name,
      ));
    }
  }

  records
}

// ─── Timetable ───────────────────────────────────────────────────────────────

/// Today's three classes. Both roles see the same timetable.
pub fn today_classes<Tz: TimeZone>(
  tz: &Tz,
  today: NaiveDate,
  _role: Role,
) -> Vec<ClassSchedule> {
  let slots = [
    ("class1", 0, "Dr. Morgan Faculty", (9, 0), (10, 30), "Room 201", "Science Building"),
    ("class2", 1, "Dr. Sarah Johnson", (11, 0), (12, 30), "Room 105", "Mathematics Building"),
    ("class3", 2, "Prof. James Wilson", (14, 0), (15, 30), "Room 303", "Arts Building"),
  ];

  slots
    .into_iter()
    .filter_map(|(id, course, instructor, start, end, room, building)| {
      let (code, name) = COURSES[course];
      Some(ClassSchedule {
        id:          id.into(),
        course_code: code.into(),
        course_name: name.into(),
        instructor:  instructor.into(),
        start:       wall_clock(tz, today, start.0, start.1)?,
        end:         wall_clock(tz, today, end.0, end.1)?,
        room:        room.into(),
        building:    building.into(),
      })
    })
    .collect()
}

// ─── Notifications ───────────────────────────────────────────────────────────

/// Five notifications, newest first, two of them unread.
pub fn notifications(now: DateTime<Utc>) -> Vec<Notification> {
  let entries = [
    (
      "notif1",
      "Missed Check-in",
      "You missed the periodic check-in for CS101 at 9:45 AM.",
      288,
      false,
      NotificationKind::Warning,
    ),
    (
      "notif2",
      "Attendance Marked",
      "You have been marked present for MATH104 today.",
      432,
      true,
      NotificationKind::Success,
    ),
    (
      "notif3",
      "Class Reminder",
      "Your ENG202 class will start in 15 minutes.",
      720,
      false,
      NotificationKind::Info,
    ),
    (
      "notif4",
      "Grace Applied",
      "Your attendance for last Wednesday's CS101 has been updated to 'Grace'.",
      1440,
      true,
      NotificationKind::Info,
    ),
    (
      "notif5",
      "Issue Report Resolved",
      "Your issue report for MATH104 on April 2nd has been resolved.",
      2880,
      true,
      NotificationKind::Success,
    ),
  ];

  entries
    .into_iter()
    .map(|(id, title, message, minutes_ago, read, kind)| Notification {
      id: id.into(),
      title: title.into(),
      message: message.into(),
      timestamp: now - Duration::minutes(minutes_ago),
      read,
      kind,
    })
    .collect()
}

// ─── Roster ──────────────────────────────────────────────────────────────────

pub fn student_list() -> Vec<StudentEntry> {
  use AttendanceStatus::*;

  [
    ("std1", "Alex Johnson", Present),
    ("std2", "Taylor Smith", Present),
    ("std3", "Jordan Williams", Late),
    ("std4", "Casey Brown", Absent),
    ("std5", "Riley Davis", Present),
    ("std6", "Avery Miller", Grace),
    ("std7", "Quinn Wilson", Present),
    ("std8", "Morgan Taylor", Present),
    ("std9", "Jamie Rodriguez", Late),
    ("std10", "Blake Martinez", Absent),
  ]
  .into_iter()
  .map(|(id, name, status)| StudentEntry {
    id: id.into(),
    name: name.into(),
    status,
  })
  .collect()
}

// ─── Issues ──────────────────────────────────────────────────────────────────

/// The two reports every student starts with, newest first.
pub fn seed_issues() -> Vec<IssueReport> {
  vec![
    IssueReport {
      id:       "issue1".into(),
      date:     NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default(),
      course:   "CS101".into(),
      time:     None,
      reason:   "Face recognition system failed to detect me at entrance".into(),
      status:   IssueStatus::Resolved,
      response: Some(
        "Verified with security camera footage. Attendance corrected.".into(),
      ),
    },
    IssueReport {
      id:       "issue2".into(),
      date:     NaiveDate::from_ymd_opt(2024, 3, 25).unwrap_or_default(),
      course:   "MATH104".into(),
      time:     None,
      reason:   "Bluetooth beacon not working during class".into(),
      status:   IssueStatus::Pending,
      response: None,
    },
  ]
}

#[cfg(test)]
mod tests {
  use fras_core::{
    attendance::unread_count,
    query::{StatusCounts, aggregate_by_status, distinct_courses},
  };
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  /// A Wednesday.
  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 4, 3).unwrap() }

  fn month(seed: u64) -> Vec<AttendanceRecord> {
    monthly_attendance(&Utc, today(), &mut StdRng::seed_from_u64(seed))
  }

  #[test]
  fn same_seed_same_month() {
    assert_eq!(month(7), month(7));
  }

  #[test]
  fn weekends_are_skipped_and_every_course_meets_daily() {
    let records = month(1);
    assert!(records.iter().all(|r| {
      !matches!(r.date.weekday(), Weekday::Sat | Weekday::Sun)
    }));
    // 2024-03-04 ..= 2024-04-03 holds 23 weekdays.
    assert_eq!(records.len(), 23 * COURSES.len());
    assert_eq!(distinct_courses(&records), ["CS101", "MATH104", "ENG202"]);
  }

  #[test]
  fn entry_time_only_for_attended_classes() {
    for seed in 0..20 {
      for r in month(seed) {
        assert_eq!(
          r.entry_time.is_some(),
          r.status != AttendanceStatus::Absent,
          "{}",
          r.id
        );
        if let Some(entry) = r.entry_time {
          assert!(entry >= r.date && entry <= r.date + Duration::minutes(30));
        }
      }
    }
  }

  #[test]
  fn fixed_patterns_hold_for_any_seed() {
    for seed in 0..20 {
      let records = month(seed);
      let by_id = |id: &str| {
        records.iter().find(|r| r.id == id).map(|r| r.status)
      };
      assert_eq!(by_id("att-0-2"), Some(AttendanceStatus::Absent));
      assert_eq!(by_id("att-0-1"), Some(AttendanceStatus::Late));
      assert_eq!(by_id("att-7-1"), Some(AttendanceStatus::Late));
      assert_eq!(by_id("att-14-1"), Some(AttendanceStatus::Late));
    }
  }

  #[test]
  fn todays_records_are_three() {
    let counts = aggregate_by_status(&month(3), today(), &Utc);
    assert_eq!(counts.total(), 3);
  }

  #[test]
  fn timetable_runs_nine_to_half_three() {
    let classes = today_classes(&Utc, today(), Role::Student);
    assert_eq!(classes.len(), 3);
    assert_eq!(classes[0].start, Utc.with_ymd_and_hms(2024, 4, 3, 9, 0, 0).unwrap());
    assert_eq!(classes[2].end, Utc.with_ymd_and_hms(2024, 4, 3, 15, 30, 0).unwrap());
    assert_eq!(classes[1].course_code, "MATH104");
  }

  #[test]
  fn two_of_five_notifications_are_unread() {
    let now = Utc::now();
    let list = notifications(now);
    assert_eq!(list.len(), 5);
    assert_eq!(unread_count(&list), 2);
    assert!(list.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
  }

  #[test]
  fn roster_tally() {
    let counts = StatusCounts::of_roster(&student_list());
    assert_eq!(
      counts,
      StatusCounts { present: 5, late: 2, absent: 2, grace: 1 }
    );
  }
}
