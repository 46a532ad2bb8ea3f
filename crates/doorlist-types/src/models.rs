use serde::{Deserialize, Serialize};

/// One line of the external order export. A member may appear on several
/// lines, possibly with different ticket types and quantities.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: String,
    pub name: String,
    pub ticket_type: String,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl OrderLine {
    /// Quantity, defaulting to 1 when the export left it blank or the value
    /// is not a positive number.
    pub fn effective_quantity(&self) -> u32 {
        match self.quantity {
            Some(q) if q >= 1 => q as u32,
            _ => 1,
        }
    }
}

/// One entry of the member directory used to look up delivery addresses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Report of a ticket-send batch run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReport {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}
