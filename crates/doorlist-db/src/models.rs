/// Database row types — these map positionally to the attendees table.
/// The positional translation lives here so the engines only ever see
/// named fields.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeRow {
    /// SQLite rowid; doubles as the row's scan position for token
    /// derivation and scan-order tie-breaking.
    pub rowid: i64,
    pub member_id: String,
    pub name: String,
    pub email: String,
    pub token: String,
    pub check_in_time: Option<String>,
    pub email_sent: bool,
    pub ticket_type: String,
    pub start_time: String,
    pub re_entry_history: String,
    pub inviter: String,
    pub note: String,
}

/// Insert shape for rows synthesized by reconciliation (or added by an
/// operator). Token, check-in time and history start empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendee {
    pub member_id: String,
    pub name: String,
    pub email: String,
    pub ticket_type: String,
    pub start_time: String,
    pub note: String,
}
