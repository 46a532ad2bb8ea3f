use anyhow::Result;
use doorlist_db::Database;
use doorlist_db::models::AttendeeRow;
use doorlist_types::models::SendReport;
use tracing::{error, info};

use crate::token;

/// The external delivery sink. Real delivery lives outside this crate;
/// the engine only needs a success/failure outcome per ticket.
pub trait TicketSender {
    fn send(&self, row: &AttendeeRow, token: &str) -> Result<()>;
}

/// Stand-in sender that logs instead of emailing.
pub struct LogSender;

impl TicketSender for LogSender {
    fn send(&self, row: &AttendeeRow, token: &str) -> Result<()> {
        info!(member_id = %row.member_id, email = %row.email, token = %token, "ticket issued");
        Ok(())
    }
}

/// Issue tickets for every row with a known address that has not been
/// marked sent. `pace` runs between items; the CLI passes a fixed-delay
/// sleep to respect the mail provider's rate limit.
///
/// A failed send is logged and counted; the batch keeps going. The row is
/// only marked sent after the sender reports success, so a re-run picks up
/// exactly the failures.
pub fn send_tickets<S: TicketSender>(
    db: &Database,
    sender: &S,
    mut pace: impl FnMut(),
) -> Result<SendReport> {
    let pending = db.list_pending_tickets()?;
    let mut report = SendReport::default();

    let mut sent_any = false;
    for row in &pending {
        if row.email.is_empty() {
            report.skipped += 1;
            continue;
        }
        if sent_any {
            pace();
        }
        sent_any = true;

        let token = if row.token.is_empty() {
            let token = token::generate(&row.member_id, row.rowid);
            db.set_token(row.rowid, &token)?;
            token
        } else {
            // Token survives from an earlier run whose send failed.
            row.token.clone()
        };

        match sender.send(row, &token) {
            Ok(()) => {
                db.mark_email_sent(row.rowid)?;
                report.sent += 1;
            }
            Err(e) => {
                error!(member_id = %row.member_id, email = %row.email, "send failed: {e:#}");
                report.failed += 1;
            }
        }
    }

    info!(
        sent = report.sent,
        failed = report.failed,
        skipped = report.skipped,
        "ticket batch done"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use doorlist_db::models::NewAttendee;
    use std::cell::Cell;
    use std::cell::RefCell;

    fn seed(db: &Database, rows: &[(&str, &str)]) {
        let batch: Vec<NewAttendee> = rows
            .iter()
            .map(|(id, email)| NewAttendee {
                member_id: id.to_string(),
                name: format!("Member {}", id),
                email: email.to_string(),
                ticket_type: "General".to_string(),
                start_time: "19:00-19:30".to_string(),
                note: String::new(),
            })
            .collect();
        db.append_attendees(&batch).unwrap();
    }

    struct FlakySender {
        fail_for: String,
        calls: RefCell<Vec<String>>,
    }

    impl TicketSender for FlakySender {
        fn send(&self, row: &AttendeeRow, _token: &str) -> Result<()> {
            self.calls.borrow_mut().push(row.member_id.clone());
            if row.member_id == self.fail_for {
                return Err(anyhow!("mail provider rejected"));
            }
            Ok(())
        }
    }

    #[test]
    fn sends_pending_rows_and_paces_between_items() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, &[("a", "a@x"), ("b", ""), ("c", "c@x")]);

        let sender = FlakySender {
            fail_for: String::new(),
            calls: RefCell::new(vec![]),
        };
        let paced = Cell::new(0);
        let report = send_tickets(&db, &sender, || paced.set(paced.get() + 1)).unwrap();

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.skipped, 1);
        // Pacing runs between sends, not after the last one.
        assert_eq!(paced.get(), 1);
        assert_eq!(*sender.calls.borrow(), vec!["a", "c"]);

        let rows = db.list_attendees().unwrap();
        assert!(rows[0].email_sent && !rows[0].token.is_empty());
        assert!(!rows[1].email_sent && rows[1].token.is_empty());
        assert!(rows[2].email_sent);
    }

    #[test]
    fn failed_send_keeps_row_pending_with_its_token() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, &[("a", "a@x"), ("b", "b@x")]);

        let sender = FlakySender {
            fail_for: "a".to_string(),
            calls: RefCell::new(vec![]),
        };
        let report = send_tickets(&db, &sender, || {}).unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 1);

        let rows = db.list_attendees().unwrap();
        assert!(!rows[0].email_sent);
        let kept_token = rows[0].token.clone();
        assert!(!kept_token.is_empty());

        // Re-run picks up exactly the failure and reuses its token.
        let sender = FlakySender {
            fail_for: String::new(),
            calls: RefCell::new(vec![]),
        };
        let report = send_tickets(&db, &sender, || {}).unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(*sender.calls.borrow(), vec!["a"]);
        assert_eq!(db.list_attendees().unwrap()[0].token, kept_token);
    }
}
