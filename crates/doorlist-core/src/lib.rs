pub mod checkin;
pub mod dashboard;
pub mod reconcile;
pub mod taxonomy;
pub mod ticketing;
pub mod token;

use chrono::Local;

/// Timestamp format used for check-in times and re-entry history. Staff
/// read these directly off the dashboard, so they stay human-readable
/// local time.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now_stamp() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}
