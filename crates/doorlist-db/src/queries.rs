use crate::Database;
use crate::models::{AttendeeRow, NewAttendee};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

const ROW_COLUMNS: &str = "rowid, member_id, name, email, token, check_in_time, email_sent, \
     ticket_type, start_time, re_entry_history, inviter, note";

impl Database {
    // -- Scans --

    /// Full table scan in rowid order. Reconciliation and the dashboard
    /// both work off this snapshot.
    pub fn list_attendees(&self) -> Result<Vec<AttendeeRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {ROW_COLUMNS} FROM attendees ORDER BY rowid");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], row_from_sql)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// First row carrying this token, in scan order. Issued tokens are
    /// unique so at most one row matches in practice.
    pub fn find_by_token(&self, token: &str) -> Result<Option<AttendeeRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {ROW_COLUMNS} FROM attendees WHERE token = ?1 ORDER BY rowid LIMIT 1"
            );
            query_optional(conn, &sql, token)
        })
    }

    /// Every row held by this member, in scan order.
    pub fn find_by_member_id(&self, member_id: &str) -> Result<Vec<AttendeeRow>> {
        self.with_conn(|conn| {
            let sql =
                format!("SELECT {ROW_COLUMNS} FROM attendees WHERE member_id = ?1 ORDER BY rowid");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([member_id], row_from_sql)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Rows not yet marked sent, in scan order. The ticketing engine
    /// decides what to do with rows that have no address.
    pub fn list_pending_tickets(&self) -> Result<Vec<AttendeeRow>> {
        self.with_conn(|conn| {
            let sql =
                format!("SELECT {ROW_COLUMNS} FROM attendees WHERE email_sent = 0 ORDER BY rowid");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], row_from_sql)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Writes --

    /// Append a reconciliation batch in one transaction; either every row
    /// lands or none do. Existing rows are never touched.
    pub fn append_attendees(&self, batch: &[NewAttendee]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO attendees \
                     (member_id, name, email, ticket_type, start_time, note) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for row in batch {
                    stmt.execute(rusqlite::params![
                        row.member_id,
                        row.name,
                        row.email,
                        row.ticket_type,
                        row.start_time,
                        row.note,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Record the first check-in. Write-once: a row that already carries a
    /// check-in time is left untouched and the call fails.
    pub fn set_check_in_time(&self, rowid: i64, time: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE attendees SET check_in_time = ?1 \
                 WHERE rowid = ?2 AND check_in_time IS NULL",
                rusqlite::params![time, rowid],
            )?;
            if updated != 1 {
                return Err(anyhow!("row {} already checked in or missing", rowid));
            }
            Ok(())
        })
    }

    /// Append one timestamp to the row's re-entry history. Entries are
    /// newline-joined and never removed or reordered.
    pub fn append_re_entry(&self, rowid: i64, time: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE attendees SET re_entry_history = \
                 CASE WHEN re_entry_history = '' THEN ?1 \
                      ELSE re_entry_history || char(10) || ?1 END \
                 WHERE rowid = ?2",
                rusqlite::params![time, rowid],
            )?;
            if updated != 1 {
                return Err(anyhow!("no attendee row {}", rowid));
            }
            Ok(())
        })
    }

    pub fn set_token(&self, rowid: i64, token: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE attendees SET token = ?1 WHERE rowid = ?2",
                rusqlite::params![token, rowid],
            )?;
            if updated != 1 {
                return Err(anyhow!("no attendee row {}", rowid));
            }
            Ok(())
        })
    }

    pub fn mark_email_sent(&self, rowid: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE attendees SET email_sent = 1 WHERE rowid = ?1",
                [rowid],
            )?;
            if updated != 1 {
                return Err(anyhow!("no attendee row {}", rowid));
            }
            Ok(())
        })
    }
}

fn query_optional(conn: &Connection, sql: &str, param: &str) -> Result<Option<AttendeeRow>> {
    let mut stmt = conn.prepare(sql)?;
    match stmt.query_row([param], row_from_sql) {
        Ok(row) => Ok(Some(row)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn row_from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<AttendeeRow> {
    Ok(AttendeeRow {
        rowid: row.get(0)?,
        member_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        token: row.get(4)?,
        check_in_time: row.get(5)?,
        email_sent: row.get::<_, i64>(6)? != 0,
        ticket_type: row.get(7)?,
        start_time: row.get(8)?,
        re_entry_history: row.get(9)?,
        inviter: row.get(10)?,
        note: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(member_id: &str, ticket_type: &str) -> NewAttendee {
        NewAttendee {
            member_id: member_id.to_string(),
            name: format!("Member {}", member_id),
            email: format!("{}@example.com", member_id),
            ticket_type: ticket_type.to_string(),
            start_time: "19:00-19:30".to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn append_and_scan_preserves_order() {
        let db = Database::open_in_memory().unwrap();
        db.append_attendees(&[sample("a", "General"), sample("b", "VIP Pass")])
            .unwrap();
        db.append_attendees(&[sample("c", "General")]).unwrap();

        let rows = db.list_attendees().unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.member_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(rows.iter().all(|r| r.token.is_empty()));
        assert!(rows.iter().all(|r| r.check_in_time.is_none()));
    }

    #[test]
    fn check_in_time_is_write_once() {
        let db = Database::open_in_memory().unwrap();
        db.append_attendees(&[sample("a", "General")]).unwrap();
        let rowid = db.list_attendees().unwrap()[0].rowid;

        db.set_check_in_time(rowid, "2026-08-26 19:02:11").unwrap();
        assert!(db.set_check_in_time(rowid, "2026-08-26 19:05:00").is_err());

        let row = &db.list_attendees().unwrap()[0];
        assert_eq!(row.check_in_time.as_deref(), Some("2026-08-26 19:02:11"));
    }

    #[test]
    fn re_entry_history_is_newline_joined() {
        let db = Database::open_in_memory().unwrap();
        db.append_attendees(&[sample("a", "General")]).unwrap();
        let rowid = db.list_attendees().unwrap()[0].rowid;

        db.append_re_entry(rowid, "2026-08-26 19:10:00").unwrap();
        db.append_re_entry(rowid, "2026-08-26 19:12:30").unwrap();

        let row = &db.list_attendees().unwrap()[0];
        assert_eq!(
            row.re_entry_history,
            "2026-08-26 19:10:00\n2026-08-26 19:12:30"
        );
    }

    #[test]
    fn issued_tokens_are_unique() {
        let db = Database::open_in_memory().unwrap();
        db.append_attendees(&[sample("a", "General"), sample("b", "General")])
            .unwrap();
        let rows = db.list_attendees().unwrap();

        db.set_token(rows[0].rowid, "tok-1").unwrap();
        assert!(db.set_token(rows[1].rowid, "tok-1").is_err());
        // Empty tokens may repeat freely.
        assert!(db.find_by_token("tok-1").unwrap().is_some());
        assert!(db.find_by_token("missing").unwrap().is_none());
    }

    #[test]
    fn pending_tickets_excludes_sent_rows() {
        let db = Database::open_in_memory().unwrap();
        db.append_attendees(&[sample("a", "General"), sample("b", "General")])
            .unwrap();

        let rows = db.list_attendees().unwrap();
        db.mark_email_sent(rows[0].rowid).unwrap();

        let pending = db.list_pending_tickets().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].member_id, "b");
    }
}
