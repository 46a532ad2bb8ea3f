use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Column order is the interop contract with previously exported
        -- sheets: ID, Name, Email, Token, CheckInTime, EmailSent,
        -- TicketType, StartTime, ReEntryHistory, Inviter, Note.
        CREATE TABLE IF NOT EXISTS attendees (
            member_id           TEXT NOT NULL,
            name                TEXT NOT NULL,
            email               TEXT NOT NULL DEFAULT '',
            token               TEXT NOT NULL DEFAULT '',
            check_in_time       TEXT,
            email_sent          INTEGER NOT NULL DEFAULT 0,
            ticket_type         TEXT NOT NULL DEFAULT '',
            start_time          TEXT NOT NULL DEFAULT '',
            re_entry_history    TEXT NOT NULL DEFAULT '',
            inviter             TEXT NOT NULL DEFAULT '',
            note                TEXT NOT NULL DEFAULT ''
        );

        -- member_id is not unique: one member may hold several tickets.
        CREATE INDEX IF NOT EXISTS idx_attendees_member
            ON attendees(member_id);

        -- Issued tokens are unique; unissued rows keep an empty token.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_attendees_token
            ON attendees(token) WHERE token <> '';
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
