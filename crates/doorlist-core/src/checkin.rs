use doorlist_db::Database;
use doorlist_db::models::AttendeeRow;
use doorlist_types::api::{AttendeeInfo, CheckInOutcome};
use tracing::{info, warn};

use crate::now_stamp;

const ALREADY_CHECKED_IN: &str = "Already checked in";

fn attendee_info(row: &AttendeeRow) -> AttendeeInfo {
    AttendeeInfo {
        name: row.name.clone(),
        id: row.member_id.clone(),
        ticket_type: row.ticket_type.clone(),
        start_time: row.start_time.clone(),
    }
}

/// Scan-based check-in: the QR code carries the ticket token.
pub fn check_in_by_token(db: &Database, token: &str) -> CheckInOutcome {
    if token.trim().is_empty() {
        return CheckInOutcome::error("token not provided");
    }

    let row = match db.find_by_token(token) {
        Ok(Some(row)) => row,
        Ok(None) => return CheckInOutcome::error("invalid ticket"),
        Err(e) => return CheckInOutcome::error(e.to_string()),
    };

    match &row.check_in_time {
        Some(first_time) => record_re_entry(db, &row, first_time.clone()),
        None => record_first_entry(db, &row),
    }
}

/// Fallback for unreadable codes: staff type the member id. A member may
/// hold several tickets; the first open row in scan order is checked in.
/// When every row is already used, the re-entry lands on the last row in
/// scan order.
pub fn check_in_by_id(db: &Database, member_id: &str) -> CheckInOutcome {
    if member_id.trim().is_empty() {
        return CheckInOutcome::error("member id not provided");
    }

    let rows = match db.find_by_member_id(member_id) {
        Ok(rows) => rows,
        Err(e) => return CheckInOutcome::error(e.to_string()),
    };

    if let Some(open) = rows.iter().find(|r| r.check_in_time.is_none()) {
        return record_first_entry(db, open);
    }

    match rows.last() {
        Some(row) => {
            // rows.last() has a check-in time here: the find above ruled
            // out open rows.
            let first_time = row.check_in_time.clone().unwrap_or_default();
            record_re_entry(db, row, first_time)
        }
        None => CheckInOutcome::error("member id not found"),
    }
}

fn record_first_entry(db: &Database, row: &AttendeeRow) -> CheckInOutcome {
    let now = now_stamp();
    if let Err(e) = db.set_check_in_time(row.rowid, &now) {
        return CheckInOutcome::error(e.to_string());
    }
    info!(member_id = %row.member_id, ticket_type = %row.ticket_type, "checked in");
    CheckInOutcome::Success {
        attendee: attendee_info(row),
        check_in_time: now,
    }
}

fn record_re_entry(db: &Database, row: &AttendeeRow, first_time: String) -> CheckInOutcome {
    if let Err(e) = db.append_re_entry(row.rowid, &now_stamp()) {
        return CheckInOutcome::error(e.to_string());
    }
    warn!(member_id = %row.member_id, first_time = %first_time, "re-entry");
    CheckInOutcome::Warning {
        attendee: attendee_info(row),
        check_in_time: first_time,
        message: ALREADY_CHECKED_IN.to_string(),
    }
}
