use std::collections::HashMap;

use crate::models::VlanRecord;

/// Quote a string as a SQL literal, doubling any embedded single quotes.
/// e.g., "bldg1" -> "'bldg1'", "o'hare" -> "'o''hare'"
pub fn sql_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Tracks VLANs already emitted so repeats can be reported.
/// vlan is the table's primary key, so a repeat will be rejected at load time.
#[derive(Debug, Default)]
pub struct VlanTracker {
    seen: HashMap<i64, (String, String)>,
}

impl VlanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a VLAN. Returns the (location, network_function) that first
    /// claimed it when this is a repeat.
    pub fn observe(&mut self, record: &VlanRecord) -> Option<&(String, String)> {
        if self.seen.contains_key(&record.vlan) {
            return self.seen.get(&record.vlan);
        }
        self.seen.insert(
            record.vlan,
            (record.location.clone(), record.network_function.clone()),
        );
        None
    }
}
