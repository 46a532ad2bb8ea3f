/// Ticket type normalization and reception windows.
///
/// Order exports accumulated several generations of labels for the same
/// ticket: raw price codes from the shop, old free-text labels, and the
/// current canonical names. The taxonomy folds all of them onto a fixed
/// canonical set and assigns each canonical type its reception window.
///
/// The mapping is total: an unrecognized label passes through unchanged
/// and receives the default window instead of failing.

pub const GUEST_TYPE: &str = "GuestPass";
pub const GUEST_NOTE: &str = "同伴者チケット";

/// Immutable taxonomy value, injected into the engines at construction.
#[derive(Debug, Clone)]
pub struct TicketTaxonomy {
    /// Ordered alias table; first match wins.
    aliases: Vec<(&'static str, &'static str)>,
    windows: Vec<(&'static str, &'static str)>,
    default_window: &'static str,
}

impl TicketTaxonomy {
    pub fn normalize<'a>(&self, raw: &'a str) -> &'a str {
        let trimmed = raw.trim();
        for &(alias, canonical) in &self.aliases {
            if alias == trimmed {
                return canonical;
            }
        }
        raw
    }

    pub fn reception_window(&self, canonical: &str) -> &'static str {
        for &(ty, window) in &self.windows {
            if ty == canonical {
                return window;
            }
        }
        self.default_window
    }

    pub fn is_guest(&self, canonical: &str) -> bool {
        canonical == GUEST_TYPE
    }
}

impl Default for TicketTaxonomy {
    fn default() -> Self {
        Self {
            aliases: vec![
                // Shop price codes
                ("15400", "PriorityPass"),
                ("8800", "General"),
                ("0", GUEST_TYPE),
                // Historical free-text labels
                ("役員招待枠", "VIP Pass"),
                ("優先入場枠", "PriorityPass"),
                ("一般参加枠", "General"),
                ("同伴者枠", GUEST_TYPE),
                ("VIP", "VIP Pass"),
            ],
            windows: vec![
                ("VIP Pass", "18:30-19:00"),
                ("PriorityPass", "18:30-19:00"),
                ("General", "19:00-19:30"),
                (GUEST_TYPE, "19:00-19:30"),
            ],
            default_window: "19:00-19:30",
        }
    }
}
