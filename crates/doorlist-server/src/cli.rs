use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::info;

use doorlist_core::reconcile;
use doorlist_core::taxonomy::TicketTaxonomy;
use doorlist_core::ticketing::{self, LogSender};
use doorlist_db::Database;

/// Delay between ticket sends; the mail provider throttles bursts.
const SEND_PACING: Duration = Duration::from_millis(1000);

pub fn run(db: &Database, command: &str, args: &[String]) -> Result<()> {
    match command {
        "reconcile" => {
            let [orders_path, members_path] = args else {
                bail!("usage: doorlist reconcile <orders.json> <members.json>");
            };
            let orders = reconcile::load_orders(Path::new(orders_path))?;
            let members = reconcile::load_members(Path::new(members_path))?;
            let taxonomy = TicketTaxonomy::default();

            let plan = reconcile::run(db, &orders, &members, &taxonomy)?;
            info!(
                "reconciled: {} new rows, {} emails matched, {} missing",
                plan.new_rows.len(),
                plan.matched_emails,
                plan.missing_emails
            );
            Ok(())
        }
        "send-tickets" => {
            let report =
                ticketing::send_tickets(db, &LogSender, || std::thread::sleep(SEND_PACING))?;
            info!(
                "tickets: {} sent, {} failed, {} skipped (no address)",
                report.sent, report.failed, report.skipped
            );
            Ok(())
        }
        other => bail!("unknown command: {other} (expected serve, reconcile or send-tickets)"),
    }
}
