//! The attendance query engine: day/status/course filtering and per-status
//! tallies over an in-memory record set.
//!
//! All functions are pure. The calendar day of a record is taken in the
//! supplied [`TimeZone`]; callers normally pass [`chrono::Local`], or a fixed
//! institution offset when records should not follow the host's zone.

use std::{
  collections::{BTreeSet, HashSet},
  convert::Infallible,
  fmt,
  str::FromStr,
};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::attendance::{AttendanceRecord, AttendanceStatus, StudentEntry};

// ─── Selector ────────────────────────────────────────────────────────────────

/// Either every value, or exactly one. The UI spells the first one `"all"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T> {
  All,
  Only(T),
}

impl<T> Default for Selector<T> {
  fn default() -> Self { Self::All }
}

impl<T: PartialEq> Selector<T> {
  pub fn matches(&self, value: &T) -> bool {
    match self {
      Self::All => true,
      Self::Only(wanted) => wanted == value,
    }
  }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("all"),
      Self::Only(v) => v.fmt(f),
    }
  }
}

impl FromStr for Selector<AttendanceStatus> {
  type Err = strum::ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.eq_ignore_ascii_case("all") {
      Ok(Self::All)
    } else {
      s.parse().map(Self::Only)
    }
  }
}

impl FromStr for Selector<String> {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.eq_ignore_ascii_case("all") {
      Ok(Self::All)
    } else {
      Ok(Self::Only(s.to_owned()))
    }
  }
}

pub type StatusFilter = Selector<AttendanceStatus>;
pub type CourseFilter = Selector<String>;

// ─── Criteria ────────────────────────────────────────────────────────────────

/// The filter state owned by the history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
  pub day:    NaiveDate,
  pub status: StatusFilter,
  pub course: CourseFilter,
}

impl FilterCriteria {
  /// Everything on `day`.
  pub fn for_day(day: NaiveDate) -> Self {
    Self { day, status: Selector::All, course: Selector::All }
  }

  pub fn apply<'a, Tz: TimeZone>(
    &self,
    records: &'a [AttendanceRecord],
    tz: &Tz,
  ) -> Vec<&'a AttendanceRecord> {
    filter(records, self.day, &self.status, &self.course, tz)
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// The calendar day `at` falls on in `tz`.
pub fn calendar_day<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> NaiveDate {
  at.with_timezone(tz).date_naive()
}

/// Records on `day` matching both selectors, in input order.
///
/// The three predicates are independent, so the result never depends on the
/// order they are applied in.
pub fn filter<'a, Tz: TimeZone>(
  records: &'a [AttendanceRecord],
  day: NaiveDate,
  status: &StatusFilter,
  course: &CourseFilter,
  tz: &Tz,
) -> Vec<&'a AttendanceRecord> {
  let matched: Vec<_> = records
    .iter()
    .filter(|r| calendar_day(r.date, tz) == day)
    .filter(|r| status.matches(&r.status))
    .filter(|r| course.matches(&r.course_code))
    .collect();

  tracing::debug!(
    %day,
    %status,
    %course,
    matched = matched.len(),
    total = records.len(),
    "filtered attendance records",
  );
  matched
}

/// Per-status counts of the records on `day`, ignoring status and course
/// filters.
pub fn aggregate_by_status<Tz: TimeZone>(
  records: &[AttendanceRecord],
  day: NaiveDate,
  tz: &Tz,
) -> StatusCounts {
  StatusCounts::tally(
    records
      .iter()
      .filter(|r| calendar_day(r.date, tz) == day)
      .map(|r| r.status),
  )
}

/// Course codes in first-seen order.
pub fn distinct_courses(records: &[AttendanceRecord]) -> Vec<String> {
  let mut seen = HashSet::new();
  records
    .iter()
    .filter(|r| seen.insert(r.course_code.as_str()))
    .map(|r| r.course_code.clone())
    .collect()
}

/// Days with at least one record of `status`; drives the calendar markers.
pub fn days_with_status<Tz: TimeZone>(
  records: &[AttendanceRecord],
  status: AttendanceStatus,
  tz: &Tz,
) -> BTreeSet<NaiveDate> {
  records
    .iter()
    .filter(|r| r.status == status)
    .map(|r| calendar_day(r.date, tz))
    .collect()
}

// ─── Counts ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct StatusCounts {
  pub present: usize,
  pub late:    usize,
  pub absent:  usize,
  pub grace:   usize,
}

impl StatusCounts {
  pub fn tally(statuses: impl IntoIterator<Item = AttendanceStatus>) -> Self {
    statuses.into_iter().fold(Self::default(), |mut acc, s| {
      *acc.slot_mut(s) += 1;
      acc
    })
  }

  /// Tally a class roster.
  pub fn of_roster(students: &[StudentEntry]) -> Self {
    Self::tally(students.iter().map(|s| s.status))
  }

  pub fn get(&self, status: AttendanceStatus) -> usize {
    match status {
      AttendanceStatus::Present => self.present,
      AttendanceStatus::Late => self.late,
      AttendanceStatus::Absent => self.absent,
      AttendanceStatus::Grace => self.grace,
    }
  }

  pub fn total(&self) -> usize {
    self.present + self.late + self.absent + self.grace
  }

  fn slot_mut(&mut self, status: AttendanceStatus) -> &mut usize {
    match status {
      AttendanceStatus::Present => &mut self.present,
      AttendanceStatus::Late => &mut self.late,
      AttendanceStatus::Absent => &mut self.absent,
      AttendanceStatus::Grace => &mut self.grace,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::FixedOffset;
  use strum::IntoEnumIterator;

  use super::*;

  fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
  }

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn record(
    id: &str,
    date: DateTime<Utc>,
    status: AttendanceStatus,
    course: &str,
  ) -> AttendanceRecord {
    AttendanceRecord::new(
      id,
      "class1",
      date,
      status,
      Some(date),
      course,
      format!("{course} course"),
    )
  }

  /// One present and one absent on 2024-04-01, one late on 2024-04-02.
  fn sample() -> Vec<AttendanceRecord> {
    vec![
      record("a", at(2024, 4, 1, 9), AttendanceStatus::Present, "CS101"),
      record("b", at(2024, 4, 1, 11), AttendanceStatus::Absent, "MATH104"),
      record("c", at(2024, 4, 2, 9), AttendanceStatus::Late, "CS101"),
    ]
  }

  fn wider() -> Vec<AttendanceRecord> {
    let mut records = sample();
    records.extend([
      record("d", at(2024, 4, 1, 14), AttendanceStatus::Grace, "ENG202"),
      record("e", at(2024, 4, 1, 15), AttendanceStatus::Present, "MATH104"),
      record("f", at(2024, 4, 3, 9), AttendanceStatus::Present, "ENG202"),
    ]);
    records
  }

  fn ids(records: &[&AttendanceRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
  }

  #[test]
  fn filter_by_day_keeps_exactly_that_day() {
    let records = sample();
    let got = filter(
      &records,
      day(2024, 4, 1),
      &Selector::All,
      &Selector::All,
      &Utc,
    );
    assert_eq!(ids(&got), ["a", "b"]);
  }

  #[test]
  fn aggregate_for_sample_day() {
    let counts = aggregate_by_status(&sample(), day(2024, 4, 1), &Utc);
    assert_eq!(
      counts,
      StatusCounts { present: 1, late: 0, absent: 1, grace: 0 }
    );
  }

  #[test]
  fn status_and_course_filters_narrow_the_day() {
    let records = wider();
    let d = day(2024, 4, 1);

    let present = filter(
      &records,
      d,
      &Selector::Only(AttendanceStatus::Present),
      &Selector::All,
      &Utc,
    );
    assert_eq!(ids(&present), ["a", "e"]);

    let math = filter(
      &records,
      d,
      &Selector::All,
      &Selector::Only("MATH104".to_string()),
      &Utc,
    );
    assert_eq!(ids(&math), ["b", "e"]);

    let both = filter(
      &records,
      d,
      &Selector::Only(AttendanceStatus::Present),
      &Selector::Only("MATH104".to_string()),
      &Utc,
    );
    assert_eq!(ids(&both), ["e"]);
  }

  #[test]
  fn filtered_results_are_a_subset_of_the_unfiltered_day() {
    let records = wider();
    let courses = distinct_courses(&records);
    for d in [day(2024, 4, 1), day(2024, 4, 2), day(2024, 4, 3)] {
      let everything =
        ids(&filter(&records, d, &Selector::All, &Selector::All, &Utc));
      let statuses = std::iter::once(Selector::All)
        .chain(AttendanceStatus::iter().map(Selector::Only));
      for s in statuses {
        let course_filters = std::iter::once(Selector::All)
          .chain(courses.iter().cloned().map(Selector::Only));
        for c in course_filters {
          for id in ids(&filter(&records, d, &s, &c, &Utc)) {
            assert!(everything.contains(&id), "{id} escaped {d} {s} {c}");
          }
        }
      }
    }
  }

  #[test]
  fn aggregate_total_matches_day_count() {
    let records = wider();
    for d in [day(2024, 4, 1), day(2024, 4, 2), day(2024, 4, 4)] {
      let counts = aggregate_by_status(&records, d, &Utc);
      let on_day = records
        .iter()
        .filter(|r| calendar_day(r.date, &Utc) == d)
        .count();
      assert_eq!(counts.total(), on_day);
    }
  }

  #[test]
  fn calendar_day_follows_the_supplied_zone() {
    // 23:00 UTC on the 1st is already the 2nd two hours east.
    let records = vec![record(
      "late-night",
      at(2024, 4, 1, 23),
      AttendanceStatus::Present,
      "CS101",
    )];
    let east = FixedOffset::east_opt(2 * 3600).unwrap();

    let utc_hits =
      filter(&records, day(2024, 4, 1), &Selector::All, &Selector::All, &Utc);
    let east_hits =
      filter(&records, day(2024, 4, 2), &Selector::All, &Selector::All, &east);
    assert_eq!(utc_hits.len(), 1);
    assert_eq!(east_hits.len(), 1);
  }

  #[test]
  fn distinct_courses_is_first_seen_and_stable() {
    let records = wider();
    let first = distinct_courses(&records);
    assert_eq!(first, ["CS101", "MATH104", "ENG202"]);
    assert_eq!(first, distinct_courses(&records));
  }

  #[test]
  fn days_with_status_collects_calendar_markers() {
    let records = wider();
    let present = days_with_status(&records, AttendanceStatus::Present, &Utc);
    assert_eq!(
      present.into_iter().collect::<Vec<_>>(),
      [day(2024, 4, 1), day(2024, 4, 3)]
    );
    assert!(days_with_status(&records, AttendanceStatus::Late, &Utc)
      .contains(&day(2024, 4, 2)));
  }

  #[test]
  fn criteria_apply_matches_free_function() {
    let records = wider();
    let mut criteria = FilterCriteria::for_day(day(2024, 4, 1));
    criteria.course = "ENG202".parse().unwrap();
    assert_eq!(ids(&criteria.apply(&records, &Utc)), ["d"]);
  }

  #[test]
  fn selectors_parse_all_and_values() {
    assert_eq!("ALL".parse::<StatusFilter>().unwrap(), Selector::All);
    assert_eq!(
      "late".parse::<StatusFilter>().unwrap(),
      Selector::Only(AttendanceStatus::Late)
    );
    assert!("tardy".parse::<StatusFilter>().is_err());
    assert_eq!(
      "CS101".parse::<CourseFilter>().unwrap(),
      Selector::Only("CS101".to_string())
    );
  }

  #[test]
  fn roster_tally() {
    let roster = [
      AttendanceStatus::Present,
      AttendanceStatus::Present,
      AttendanceStatus::Late,
      AttendanceStatus::Grace,
    ]
    .into_iter()
    .enumerate()
    .map(|(i, status)| StudentEntry {
      id: format!("std{i}"),
      name: format!("Student {i}"),
      status,
    })
    .collect::<Vec<_>>();
    let counts = StatusCounts::of_roster(&roster);
    assert_eq!(counts.get(AttendanceStatus::Present), 2);
    assert_eq!(counts.total(), 4);
  }
}
