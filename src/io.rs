//! CSV input/output: friendship edge lists, cost tables, and seed submissions.
//!
//! All readers expect a header row. Malformed rows fail the whole read; there is no partial
//! recovery.

use crate::cost::CostTable;
use crate::graph::{GraphBuilder, NodeId, SocialGraph};
use crate::{Error, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    col: usize,
    what: &str,
) -> Result<T> {
    let raw = record.get(col).ok_or_else(|| Error::InvalidRecord {
        line: line_of(record),
        reason: format!("missing {what} column"),
    })?;
    raw.trim().parse().map_err(|_| Error::InvalidRecord {
        line: line_of(record),
        reason: format!("cannot parse {what} from {raw:?}"),
    })
}

/// Read an undirected edge list: header row, then one `a,b` pair of node ids per row.
pub fn read_edge_list_from<R: Read>(reader: R) -> Result<SocialGraph> {
    let mut reader = csv_reader(reader);
    let mut builder = GraphBuilder::new();
    for result in reader.records() {
        let record = result?;
        let a: NodeId = parse_field(&record, 0, "source node")?;
        let b: NodeId = parse_field(&record, 1, "target node")?;
        builder.add_edge(a, b);
    }
    Ok(builder.build())
}

pub fn read_edge_list(path: impl AsRef<Path>) -> Result<SocialGraph> {
    let graph = read_edge_list_from(File::open(path.as_ref())?)?;
    tracing::info!(
        path = %path.as_ref().display(),
        nodes = graph.ids().len(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

/// Read a cost table with `user` and `cost` header columns (any order, extra columns ignored).
pub fn read_cost_table_from<R: Read>(reader: R) -> Result<CostTable> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let user_col = column("user")?;
    let cost_col = column("cost")?;

    let mut table = CostTable::new();
    for result in reader.records() {
        let record = result?;
        let user: NodeId = parse_field(&record, user_col, "user")?;
        let cost: f64 = parse_field(&record, cost_col, "cost")?;
        table.insert(user, cost).map_err(|e| Error::InvalidRecord {
            line: line_of(&record),
            reason: e.to_string(),
        })?;
    }
    Ok(table)
}

pub fn read_cost_table(path: impl AsRef<Path>) -> Result<CostTable> {
    let table = read_cost_table_from(File::open(path.as_ref())?)?;
    tracing::info!(path = %path.as_ref().display(), entries = table.len(), "loaded cost table");
    Ok(table)
}

/// Write `seeds` as a single comma-separated row.
pub fn write_seed_row<W: Write>(writer: W, seeds: &[NodeId]) -> Result<()> {
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    w.write_record(seeds.iter().map(|id| id.to_string()))?;
    w.flush()?;
    Ok(())
}

/// Write the submission file `{dir}/{first}_{second}.csv` and return its path.
pub fn write_submission(
    dir: impl AsRef<Path>,
    first: &str,
    second: &str,
    seeds: &[NodeId],
) -> Result<PathBuf> {
    let path = dir.as_ref().join(format!("{first}_{second}.csv"));
    write_seed_row(File::create(&path)?, seeds)?;
    tracing::info!(path = %path.display(), seeds = seeds.len(), "wrote submission");
    Ok(path)
}
