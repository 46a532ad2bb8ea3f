use std::collections::HashMap;
use std::path::Path;

use doorlist_db::Database;
use doorlist_db::models::{AttendeeRow, NewAttendee};
use doorlist_types::models::{MemberEntry, OrderLine};
use thiserror::Error;
use tracing::info;

use crate::taxonomy::{GUEST_NOTE, TicketTaxonomy};

/// Input failures abort the whole batch before any write.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// What a reconciliation run would append, plus the email lookup tally.
#[derive(Debug, Default)]
pub struct ReconcilePlan {
    pub new_rows: Vec<NewAttendee>,
    pub matched_emails: usize,
    pub missing_emails: usize,
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct DemandKey {
    member_id: String,
    ticket_type: String,
}

struct Demand {
    name: String,
    start_time: String,
    quantity: u32,
}

/// Compute the shortfall between ordered tickets and existing rows.
///
/// Demand is keyed by (member id, canonical ticket type) with quantities
/// summed across order lines; existing rows count toward the same key, so
/// re-running after a partial run or manual row additions only ever adds
/// the missing quantity. Never mutates existing rows.
pub fn plan(
    orders: &[OrderLine],
    directory: &[MemberEntry],
    existing: &[AttendeeRow],
    taxonomy: &TicketTaxonomy,
) -> ReconcilePlan {
    // id -> email, last directory entry wins on duplicates
    let mut emails: HashMap<&str, &str> = HashMap::new();
    for entry in directory {
        emails.insert(entry.id.as_str(), entry.email.as_str());
    }

    // Accumulate demand in first-seen key order so output is stable.
    let mut demand: HashMap<DemandKey, Demand> = HashMap::new();
    let mut key_order: Vec<DemandKey> = Vec::new();
    for line in orders {
        let canonical = taxonomy.normalize(&line.ticket_type).to_string();
        let key = DemandKey {
            member_id: line.id.clone(),
            ticket_type: canonical.clone(),
        };
        let entry = demand.entry(key.clone()).or_insert_with(|| {
            key_order.push(key);
            Demand {
                name: line.name.clone(),
                start_time: taxonomy.reception_window(&canonical).to_string(),
                quantity: 0,
            }
        });
        entry.quantity += line.effective_quantity();
    }

    let mut supplied: HashMap<DemandKey, u32> = HashMap::new();
    for row in existing {
        let key = DemandKey {
            member_id: row.member_id.clone(),
            ticket_type: row.ticket_type.clone(),
        };
        *supplied.entry(key).or_insert(0) += 1;
    }

    let mut out = ReconcilePlan::default();
    for key in &key_order {
        let wanted = &demand[key];
        let have = supplied.get(key).copied().unwrap_or(0);
        if wanted.quantity <= have {
            continue;
        }

        let email = emails.get(key.member_id.as_str()).copied().unwrap_or("");
        if email.is_empty() {
            out.missing_emails += 1;
        } else {
            out.matched_emails += 1;
        }

        let guest = taxonomy.is_guest(&key.ticket_type);
        let name = if guest {
            format!("{} (Guest)", wanted.name)
        } else {
            wanted.name.clone()
        };
        let note = if guest { GUEST_NOTE } else { "" };

        for _ in 0..(wanted.quantity - have) {
            out.new_rows.push(NewAttendee {
                member_id: key.member_id.clone(),
                name: name.clone(),
                email: email.to_string(),
                ticket_type: key.ticket_type.clone(),
                start_time: wanted.start_time.clone(),
                note: note.to_string(),
            });
        }
    }
    out
}

/// Plan against the current store snapshot and append the shortfall in one
/// batch write.
pub fn run(
    db: &Database,
    orders: &[OrderLine],
    directory: &[MemberEntry],
    taxonomy: &TicketTaxonomy,
) -> Result<ReconcilePlan, ReconcileError> {
    let existing = db.list_attendees()?;
    let plan = plan(orders, directory, &existing, taxonomy);
    db.append_attendees(&plan.new_rows)?;
    info!(
        new_rows = plan.new_rows.len(),
        matched_emails = plan.matched_emails,
        missing_emails = plan.missing_emails,
        "reconcile complete"
    );
    Ok(plan)
}

pub fn load_orders(path: &Path) -> Result<Vec<OrderLine>, ReconcileError> {
    load_json(path)
}

pub fn load_members(path: &Path) -> Result<Vec<MemberEntry>, ReconcileError> {
    load_json(path)
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ReconcileError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReconcileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ReconcileError::Parse {
        path: path.display().to_string(),
        source,
    })
}
