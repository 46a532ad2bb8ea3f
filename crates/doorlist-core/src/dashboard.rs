use doorlist_db::models::AttendeeRow;
use doorlist_types::api::DashboardSummary;

/// Label shown for rows whose ticket type was never filled in.
const UNSET_TYPE: &str = "(未設定)";

/// Single linear scan over the current rows. Rows without a member id are
/// placeholders and do not count.
pub fn aggregate(rows: &[AttendeeRow]) -> DashboardSummary {
    let mut summary = DashboardSummary::default();
    for row in rows {
        if row.member_id.is_empty() {
            continue;
        }
        summary.total += 1;
        let checked_in = row.check_in_time.is_some();
        if checked_in {
            summary.checked_in += 1;
        }

        let label = if row.ticket_type.is_empty() {
            UNSET_TYPE
        } else {
            row.ticket_type.as_str()
        };
        let entry = summary.breakdown.entry(label.to_string()).or_default();
        entry.total += 1;
        if checked_in {
            entry.checked_in += 1;
        }
    }
    summary.not_checked_in = summary.total - summary.checked_in;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(member_id: &str, ticket_type: &str, checked_in: bool) -> AttendeeRow {
        AttendeeRow {
            rowid: 0,
            member_id: member_id.to_string(),
            name: String::new(),
            email: String::new(),
            token: String::new(),
            check_in_time: checked_in.then(|| "2026-08-26 19:00:00".to_string()),
            email_sent: false,
            ticket_type: ticket_type.to_string(),
            start_time: String::new(),
            re_entry_history: String::new(),
            inviter: String::new(),
            note: String::new(),
        }
    }

    #[test]
    fn empty_store_aggregates_to_zero() {
        let summary = aggregate(&[]);
        assert_eq!(summary, DashboardSummary::default());
        assert!(summary.breakdown.is_empty());
    }

    #[test]
    fn counts_split_by_type_and_check_in() {
        let rows = vec![
            row("A1", "VIP Pass", true),
            row("A2", "General", false),
            row("A3", "General", true),
            row("A4", "", false),
        ];
        let summary = aggregate(&rows);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.checked_in, 2);
        assert_eq!(summary.not_checked_in, 2);
        assert_eq!(summary.breakdown["VIP Pass"].total, 1);
        assert_eq!(summary.breakdown["VIP Pass"].checked_in, 1);
        assert_eq!(summary.breakdown["General"].total, 2);
        assert_eq!(summary.breakdown["General"].checked_in, 1);
        assert_eq!(summary.breakdown["(未設定)"].total, 1);
    }

    #[test]
    fn rows_without_member_id_are_ignored() {
        let rows = vec![row("", "General", true), row("A1", "General", false)];
        let summary = aggregate(&rows);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.checked_in, 0);
        assert_eq!(summary.breakdown["General"].total, 1);
    }
}
