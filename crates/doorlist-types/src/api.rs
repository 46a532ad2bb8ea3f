use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// -- Check-in --

/// Attendee display fields carried by successful and re-entry outcomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeInfo {
    pub name: String,
    pub id: String,
    pub ticket_type: String,
    pub start_time: String,
}

/// Outcome of a single check-in attempt.
///
/// A re-entry (scanning a ticket that was already used) is a `Warning`, not
/// an error: it is recorded in the row's history and the frontend shows the
/// original check-in time. Only the fields relevant to each case exist on
/// that case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status")]
pub enum CheckInOutcome {
    #[serde(rename = "SUCCESS")]
    Success {
        #[serde(flatten)]
        attendee: AttendeeInfo,
        #[serde(rename = "checkInTime")]
        check_in_time: String,
    },
    #[serde(rename = "WARNING")]
    Warning {
        #[serde(flatten)]
        attendee: AttendeeInfo,
        /// The original check-in time, not the time of this attempt.
        #[serde(rename = "checkInTime")]
        check_in_time: String,
        message: String,
    },
    #[serde(rename = "ERROR")]
    Error { message: String },
}

impl CheckInOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

// -- Dashboard --

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub total: usize,
    pub checked_in: usize,
}

/// Attendance counts for the live dashboard. Pure function of the current
/// store scan; the frontend polls this continuously.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: usize,
    pub checked_in: usize,
    pub not_checked_in: usize,
    pub breakdown: BTreeMap<String, TypeCount>,
}
