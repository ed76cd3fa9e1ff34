mod network;

pub use network::*;

/// Names used in the generated vlandata table
pub mod vlan_table {
    pub const TABLE: &str = "vlandata";
    pub const COLUMNS: &[&str] = &["vlan", "network_location", "network_function"];
}
