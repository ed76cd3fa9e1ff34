use anyhow::{Context, Result};
use std::io::Write;

use crate::models::{vlan_table, NetworkMap, VlanRecord};
use crate::utils::{sql_quote, VlanTracker};

/// Table definition for vlandata. vlan is the primary key.
pub const VLANDATA_DDL: &str = "\
DROP TABLE IF EXISTS vlandata;
CREATE TABLE vlandata(
    vlan              SMALLINT NOT NULL,
    network_location  VARCHAR(256) NOT NULL,
    network_function  VARCHAR(256) NOT NULL,
    PRIMARY KEY (vlan)
);
";

/// Render the schema block: a blank line, the optional `USE` line, the DDL,
/// then a line holding four spaces.
pub fn schema_ddl(database: Option<&str>) -> String {
    let mut out = String::from("\n");
    if let Some(db) = database {
        out.push_str(&format!("USE {};\n", db));
    }
    out.push_str(VLANDATA_DDL);
    out.push_str("    \n");
    out
}

/// Render the INSERT statement for one record, header and VALUES on separate lines
pub fn insert_statement(record: &VlanRecord) -> String {
    format!(
        "INSERT INTO {} ({})\nVALUES ({}, {}, {});\n",
        vlan_table::TABLE,
        vlan_table::COLUMNS.join(", "),
        record.vlan,
        sql_quote(&record.location),
        sql_quote(&record.network_function),
    )
}

/// Write the schema block
pub fn emit_schema<W: Write>(out: &mut W, database: Option<&str>) -> Result<()> {
    out.write_all(schema_ddl(database).as_bytes())
        .context("Failed to write schema")?;
    out.flush().context("Failed to flush schema")?;
    Ok(())
}

/// Write one INSERT per (location, network-type) leaf, in map order.
/// Returns the number of statements written.
///
/// Stops at the first malformed entry. Statements already written are
/// flushed before the error is returned.
pub fn emit_inserts<W: Write>(out: &mut W, network_map: &NetworkMap) -> Result<usize> {
    let mut tracker = VlanTracker::new();
    let mut count = 0;

    for record in network_map.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                out.flush().context("Failed to flush inserts")?;
                return Err(e);
            }
        };

        if let Some((location, function)) = tracker.observe(&record) {
            tracing::warn!(
                "VLAN {} for {}/{} already used by {}/{} (primary key will reject it)",
                record.vlan,
                record.location,
                record.network_function,
                location,
                function
            );
        }

        tracing::debug!(
            "vlan={} location={} function={}",
            record.vlan,
            record.location,
            record.network_function
        );
        out.write_all(insert_statement(&record).as_bytes())
            .context("Failed to write insert")?;
        count += 1;
    }

    out.flush().context("Failed to flush inserts")?;
    Ok(count)
}
