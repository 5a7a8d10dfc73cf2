//! Attendance issue reports: the draft a student fills in, its validation,
//! and the report a service desk hands back.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{Error, Result};

/// Shortest acceptable reason, in characters, after trimming.
pub const MIN_REASON_CHARS: usize = 10;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueStatus {
  Pending,
  Resolved,
}

/// A submitted report, as listed under "past issues".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
  pub id:       String,
  pub date:     NaiveDate,
  pub course:   String,
  pub time:     Option<NaiveTime>,
  pub reason:   String,
  pub status:   IssueStatus,
  /// Staff reply, once there is one.
  pub response: Option<String>,
}

/// The report form as typed. Nothing here is trusted until
/// [`validate`](Self::validate) says so.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueDraft {
  pub date:   Option<NaiveDate>,
  pub course: String,
  /// `HH:MM`, 24-hour.
  pub time:   String,
  pub reason: String,
}

/// A draft that passed validation; the only thing a desk will accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIssue {
  pub date:   NaiveDate,
  pub course: String,
  pub time:   NaiveTime,
  pub reason: String,
}

impl IssueDraft {
  /// Fields are checked in form order and the first problem is reported.
  pub fn validate(&self) -> Result<ValidatedIssue> {
    let date = self
      .date
      .ok_or_else(|| Error::InvalidIssue("Please select a date".into()))?;

    let course = self.course.trim();
    if course.is_empty() {
      return Err(Error::InvalidIssue("Please select a course".into()));
    }

    let time = self.time.trim();
    if time.is_empty() {
      return Err(Error::InvalidIssue("Please enter a time".into()));
    }
    let time = NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
      Error::InvalidIssue(format!("Time must be HH:MM, got {time:?}"))
    })?;

    let reason = self.reason.trim();
    if reason.chars().count() < MIN_REASON_CHARS {
      return Err(Error::InvalidIssue(
        "Please provide a detailed reason for the issue".into(),
      ));
    }

    Ok(ValidatedIssue {
      date,
      course: course.to_owned(),
      time,
      reason: reason.to_owned(),
    })
  }
}

impl ValidatedIssue {
  /// A freshly filed report: pending, no response yet.
  pub fn into_report(self, id: impl Into<String>) -> IssueReport {
    IssueReport {
      id:       id.into(),
      date:     self.date,
      course:   self.course,
      time:     Some(self.time),
      reason:   self.reason,
      status:   IssueStatus::Pending,
      response: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn complete() -> IssueDraft {
    IssueDraft {
      date:   NaiveDate::from_ymd_opt(2024, 4, 1),
      course: "CS101".into(),
      time:   "09:15".into(),
      reason: "Scanner at the door did not pick me up".into(),
    }
  }

  fn message(draft: &IssueDraft) -> String {
    draft.validate().unwrap_err().to_string()
  }

  #[test]
  fn complete_draft_validates() {
    let issue = complete().validate().unwrap();
    assert_eq!(issue.time, NaiveTime::from_hms_opt(9, 15, 0).unwrap());
    let report = issue.into_report("issue3");
    assert_eq!(report.status, IssueStatus::Pending);
    assert!(report.response.is_none());
  }

  #[test]
  fn problems_are_reported_in_form_order() {
    assert_eq!(message(&IssueDraft::default()), "Please select a date");

    let mut draft = complete();
    draft.course = "  ".into();
    draft.time.clear();
    assert_eq!(message(&draft), "Please select a course");

    let mut draft = complete();
    draft.time.clear();
    assert_eq!(message(&draft), "Please enter a time");

    let mut draft = complete();
    draft.time = "quarter past".into();
    assert!(message(&draft).starts_with("Time must be HH:MM"));

    let mut draft = complete();
    draft.reason = "   too short  ".into();
    assert_eq!(
      message(&draft),
      "Please provide a detailed reason for the issue"
    );
  }

  #[test]
  fn reason_length_counts_characters_not_bytes() {
    let mut draft = complete();
    draft.reason = "ééééééééé".into();
    assert!(draft.validate().is_err());
    draft.reason.push('é');
    assert!(draft.validate().is_ok());
  }
}
