use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Typed error for a network map entry that cannot be turned into a VLAN
/// record. Emission stops at the first one; callers can downcast to it.
#[derive(Debug)]
pub struct MalformedEntryError {
    pub location: String,
    pub network: Option<String>,
    pub reason: String,
}

impl MalformedEntryError {
    pub fn new(location: &str, network: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            location: location.to_string(),
            network: network.map(|n| n.to_string()),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for MalformedEntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.network {
            Some(network) => write!(
                f,
                "malformed network entry {}/{}: {}",
                self.location, network, self.reason
            ),
            None => write!(f, "malformed location {}: {}", self.location, self.reason),
        }
    }
}

impl std::error::Error for MalformedEntryError {}

/// Attributes attached to one network-type under a location.
/// Only `vlan` is consumed; other keys (subnet, gateway, ...) are skipped.
/// Any integer is accepted and written as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkAttrs {
    pub vlan: i64,
}

/// One row of the vlandata table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanRecord {
    pub vlan: i64,
    pub location: String,
    pub network_function: String,
}

impl VlanRecord {
    /// Build a record from a location and its network-type name.
    /// The network-type is stored uppercased, which is how it lands in the table.
    pub fn new(vlan: i64, location: &str, network_type: &str) -> Self {
        Self {
            vlan,
            location: location.to_string(),
            network_function: network_type.to_uppercase(),
        }
    }
}

/// NetworkMap maps location -> network-type -> attributes, in file order.
///
/// Only the top level is checked on load. Inner shapes are checked while
/// iterating `records()`, so everything before a bad entry still comes out.
#[derive(Debug, Clone, Default)]
pub struct NetworkMap {
    locations: Map<String, Value>,
}

impl NetworkMap {
    /// Parse a JSON object, keeping key order at every level
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("Failed to parse network map JSON")?;
        match value {
            Value::Object(locations) => Ok(Self { locations }),
            other => anyhow::bail!(
                "Network map must be a JSON object of locations, got {}",
                json_kind(&other)
            ),
        }
    }

    /// Read and parse a network map file
    pub fn load(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read network map {}", path))?;
        Self::from_json(&text).with_context(|| format!("Invalid network map {}", path))
    }

    pub fn locations(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.locations.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of (location, network-type) pairs. Locations that are not
    /// objects contribute nothing.
    pub fn leaf_count(&self) -> usize {
        self.locations
            .values()
            .filter_map(Value::as_object)
            .map(Map::len)
            .sum()
    }

    /// Walk the map locations-outer, types-inner, yielding one record per leaf.
    /// The first malformed entry yields an error carrying a `MalformedEntryError`.
    pub fn records(&self) -> impl Iterator<Item = Result<VlanRecord>> + '_ {
        self.locations.iter().flat_map(|(location, nets)| {
            let items: Box<dyn Iterator<Item = Result<VlanRecord>> + '_> = match nets.as_object() {
                Some(nets) => Box::new(
                    nets.iter()
                        .map(move |(network, attrs)| record_for(location, network, attrs)),
                ),
                None => Box::new(std::iter::once(Err::<VlanRecord, anyhow::Error>(
                    MalformedEntryError::new(
                        location,
                        None,
                        format!("expected an object of network types, got {}", json_kind(nets)),
                    )
                    .into(),
                ))),
            };
            items
        })
    }
}

fn record_for(location: &str, network: &str, attrs: &Value) -> Result<VlanRecord> {
    if !attrs.is_object() {
        return Err(MalformedEntryError::new(
            location,
            Some(network),
            format!("expected an attributes object, got {}", json_kind(attrs)),
        )
        .into());
    }
    let attrs = NetworkAttrs::deserialize(attrs)
        .map_err(|e| MalformedEntryError::new(location, Some(network), e.to_string()))?;
    Ok(VlanRecord::new(attrs.vlan, location, network))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed(err: anyhow::Error) -> MalformedEntryError {
        err.downcast::<MalformedEntryError>()
            .expect("expected MalformedEntryError")
    }

    #[test]
    fn test_records_follow_insertion_order() {
        let map = NetworkMap::from_json(
            r#"{"zeta": {"mgmt": {"vlan": 30}, "data": {"vlan": 31}},
                "alpha": {"ipmi": {"vlan": 5}}}"#,
        )
        .unwrap();
        let records: Vec<VlanRecord> = map.records().collect::<Result<_>>().unwrap();
        assert_eq!(
            records,
            vec![
                VlanRecord::new(30, "zeta", "mgmt"),
                VlanRecord::new(31, "zeta", "data"),
                VlanRecord::new(5, "alpha", "ipmi"),
            ]
        );
    }

    #[test]
    fn test_network_function_is_uppercased() {
        assert_eq!(VlanRecord::new(1, "bldg1", "mgmt").network_function, "MGMT");
        assert_eq!(VlanRecord::new(1, "bldg1", "Epics-Ca").network_function, "EPICS-CA");
        assert_eq!(VlanRecord::new(1, "bldg1", "DATA").network_function, "DATA");
    }

    #[test]
    fn test_extra_attributes_are_ignored() {
        let map = NetworkMap::from_json(
            r#"{"bldg1": {"data": {"subnet": "10.0.0.0/24", "vlan": 100, "gateway": "10.0.0.1"}}}"#,
        )
        .unwrap();
        let records: Vec<VlanRecord> = map.records().collect::<Result<_>>().unwrap();
        assert_eq!(records, vec![VlanRecord::new(100, "bldg1", "data")]);
    }

    #[test]
    fn test_leaf_count() {
        let map = NetworkMap::from_json(
            r#"{"a": {"x": {"vlan": 1}, "y": {"vlan": 2}}, "b": {}, "c": {"z": {"vlan": 3}}}"#,
        )
        .unwrap();
        assert_eq!(map.leaf_count(), 3);
        assert!(!map.is_empty());
        assert_eq!(NetworkMap::from_json("{}").unwrap().leaf_count(), 0);
        assert!(NetworkMap::from_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert!(NetworkMap::from_json("[1, 2]").is_err());
        assert!(NetworkMap::from_json("42").is_err());
        assert!(NetworkMap::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_vlan_is_malformed() {
        let map = NetworkMap::from_json(
            r#"{"bldg1": {"data": {"vlan": 100}, "mgmt": {"subnet": "10.1.0.0/24"}}}"#,
        )
        .unwrap();
        let mut records = map.records();
        assert_eq!(records.next().unwrap().unwrap(), VlanRecord::new(100, "bldg1", "data"));
        let err = malformed(records.next().unwrap().unwrap_err());
        assert_eq!(err.location, "bldg1");
        assert_eq!(err.network.as_deref(), Some("mgmt"));
        assert!(err.reason.contains("vlan"), "reason was {}", err.reason);
    }

    #[test]
    fn test_non_integer_vlan_is_malformed() {
        for bad in [r#""100""#, "1.5", "1e3", "null", "[100]"] {
            let json = format!(r#"{{"bldg1": {{"data": {{"vlan": {}}}}}}}"#, bad);
            let map = NetworkMap::from_json(&json).unwrap();
            let err = map.records().next().unwrap().unwrap_err();
            assert!(err.downcast_ref::<MalformedEntryError>().is_some(), "vlan {}", bad);
        }
    }

    #[test]
    fn test_out_of_range_vlan_passes_through() {
        for vlan in [70000_i64, 40000, -1, 0] {
            let json = format!(r#"{{"bldg1": {{"data": {{"vlan": {}}}}}}}"#, vlan);
            let map = NetworkMap::from_json(&json).unwrap();
            let records: Vec<VlanRecord> = map.records().collect::<Result<_>>().unwrap();
            assert_eq!(records, vec![VlanRecord::new(vlan, "bldg1", "data")]);
        }
    }

    #[test]
    fn test_location_must_be_object() {
        let map = NetworkMap::from_json(r#"{"bldg1": [1, 2, 3]}"#).unwrap();
        let err = malformed(map.records().next().unwrap().unwrap_err());
        assert_eq!(err.location, "bldg1");
        assert!(err.network.is_none());
        assert_eq!(
            err.to_string(),
            "malformed location bldg1: expected an object of network types, got an array"
        );
    }

    #[test]
    fn test_attributes_must_be_object() {
        let map = NetworkMap::from_json(r#"{"bldg1": {"data": 100}}"#).unwrap();
        let err = malformed(map.records().next().unwrap().unwrap_err());
        assert_eq!(
            err.to_string(),
            "malformed network entry bldg1/data: expected an attributes object, got a number"
        );
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bldg1": {{"data": {{"vlan": 100}}}}}}"#).unwrap();
        let map = NetworkMap::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(map.leaf_count(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = NetworkMap::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to read network map"));
    }
}
