use anyhow::{Context, Result};

use crate::models::NetworkMap;

/// Built-in network map: location -> network type -> attributes.
/// Used when NETWORK_MAP is not set.
pub const DEFAULT_NETWORK_MAP: &str = r#"{
    "ring": {
        "mgmt":  {"vlan": 10,  "subnet": "10.0.10.0/24"},
        "epics": {"vlan": 11,  "subnet": "10.0.11.0/24"},
        "ipmi":  {"vlan": 12,  "subnet": "10.0.12.0/24"}
    },
    "linac": {
        "mgmt":  {"vlan": 20,  "subnet": "10.0.20.0/24"},
        "epics": {"vlan": 21,  "subnet": "10.0.21.0/24"}
    },
    "booster": {
        "mgmt":  {"vlan": 30,  "subnet": "10.0.30.0/24"},
        "epics": {"vlan": 31,  "subnet": "10.0.31.0/24"}
    },
    "bldg1": {
        "data":  {"vlan": 100, "subnet": "10.1.0.0/22"},
        "voip":  {"vlan": 101, "subnet": "10.1.4.0/24"},
        "wifi":  {"vlan": 102, "subnet": "10.1.8.0/22"}
    },
    "lob1": {
        "data":  {"vlan": 200, "subnet": "10.2.0.0/24"},
        "instr": {"vlan": 201, "subnet": "10.2.1.0/24"}
    },
    "lob2": {
        "data":  {"vlan": 210, "subnet": "10.2.10.0/24"},
        "instr": {"vlan": 211, "subnet": "10.2.11.0/24"}
    }
}"#;

/// Parse the built-in network map
pub fn default_network_map() -> Result<NetworkMap> {
    NetworkMap::from_json(DEFAULT_NETWORK_MAP).context("Built-in network map is invalid")
}
