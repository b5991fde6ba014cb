use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::term::{Term, TermStats};

const FOLD_ENRICHMENT_HEADER: &str = "fold enrichment";

#[derive(Debug)]
pub(super) struct ParsedReport {
    pub(super) metadata: BTreeMap<String, String>,
    pub(super) terms: Vec<Term>,
}

#[derive(Debug)]
struct PendingRow {
    term_id: String,
    term_name: String,
    count: u32,
    expected: f64,
    fold_enrichment: f64,
    p_value: f64,
    fdr: f64,
    gene_ratio: Option<f64>,
    over_represented: bool,
}

struct ColumnMap {
    count: usize,
    expected: usize,
    direction: Option<usize>,
    fold_enrichment: usize,
    p_value: usize,
    fdr: Option<usize>,
    list_size: Option<u32>,
}

impl ColumnMap {
    fn from_header(fields: &[&str]) -> Result<Self> {
        let lowered = fields
            .iter()
            .map(|field| field.trim().to_ascii_lowercase())
            .collect::<Vec<_>>();
        let find = |needle: &str| lowered.iter().position(|field| field.contains(needle));

        let expected = find("(expected)")
            .ok_or_else(|| anyhow!("report header has no \"(expected)\" column"))?;
        if expected < 2 {
            bail!("report header has no gene count column before \"(expected)\"");
        }
        let count = expected - 1;
        let fold_enrichment = find(FOLD_ENRICHMENT_HEADER)
            .ok_or_else(|| anyhow!("report header has no fold enrichment column"))?;
        let p_value = find("raw p-value")
            .or_else(|| find("p-value"))
            .ok_or_else(|| anyhow!("report header has no p-value column"))?;

        Ok(Self {
            count,
            expected,
            direction: find("over/under"),
            fold_enrichment,
            p_value,
            fdr: find("fdr"),
            list_size: parenthesized_number(fields[count]),
        })
    }
}

/// Parses a PANTHER overrepresentation export: `Key:\tValue` metadata lines,
/// one tab-separated column header, then one row per term.
pub(super) fn parse_panther_report(raw: &str, fold_ceiling: f64) -> Result<ParsedReport> {
    let mut metadata = BTreeMap::new();
    let mut columns = None;
    let mut lines = raw
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    for (line_no, line) in lines.by_ref() {
        if line.to_ascii_lowercase().contains(FOLD_ENRICHMENT_HEADER) {
            let fields = line.split('\t').collect::<Vec<_>>();
            columns = Some(
                ColumnMap::from_header(&fields)
                    .with_context(|| format!("line {line_no}: invalid column header"))?,
            );
            break;
        }

        if let Some((key, value)) = line.split_once(':') {
            metadata.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    let columns = columns.ok_or_else(|| anyhow!("no fold enrichment column header found"))?;

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let fields = line.split('\t').collect::<Vec<_>>();
        if let Some(row) = parse_row(&fields, &columns, line_no, fold_ceiling)? {
            rows.push(row);
        }
    }

    let terms = finish_rows(rows, columns.list_size);
    Ok(ParsedReport { metadata, terms })
}

fn parse_row(
    fields: &[&str],
    columns: &ColumnMap,
    line_no: usize,
    fold_ceiling: f64,
) -> Result<Option<PendingRow>> {
    let (term_name, term_id) = split_term_cell(fields[0]);
    if term_name.eq_ignore_ascii_case("unclassified") {
        debug!(line = line_no, "skipping unclassified row");
        return Ok(None);
    }

    let count: u32 = parse_cell(fields, columns.count, line_no, "count")?;
    if count == 0 {
        debug!(line = line_no, term = %term_name, "skipping term without genes");
        return Ok(None);
    }

    let expected: f64 = parse_cell(fields, columns.expected, line_no, "expected")?;
    let fold_enrichment = fields
        .get(columns.fold_enrichment)
        .map(|cell| parse_fold_enrichment(cell, fold_ceiling))
        .unwrap_or(fold_ceiling);
    let p_value = parse_probability(fields, columns.p_value, line_no, "p-value")?;
    let fdr = match columns.fdr {
        Some(index) => parse_probability(fields, index, line_no, "FDR")?,
        None => p_value,
    };
    let over_represented = columns
        .direction
        .and_then(|index| fields.get(index))
        .is_none_or(|cell| cell.trim() != "-");

    Ok(Some(PendingRow {
        term_id,
        term_name,
        count,
        expected,
        fold_enrichment,
        p_value,
        fdr,
        gene_ratio: None,
        over_represented,
    }))
}

#[derive(Debug, Deserialize)]
struct RawTermRecord {
    term_name: String,
    #[serde(default)]
    term_id: Option<String>,
    count: u32,
    #[serde(default)]
    expected: f64,
    #[serde(default)]
    fold_enrichment: Option<f64>,
    p_value: f64,
    #[serde(default)]
    fdr: Option<f64>,
    #[serde(default)]
    gene_ratio: Option<f64>,
    #[serde(default = "default_over_represented")]
    over_represented: bool,
}

fn default_over_represented() -> bool {
    true
}

/// Parses JSON term records, either a bare array or an object with a `terms` array.
pub(super) fn parse_json_records(raw: &str, fold_ceiling: f64) -> Result<ParsedReport> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON term records")?;

    let (records, metadata) = match &parsed {
        Value::Array(records) => (records.as_slice(), BTreeMap::new()),
        Value::Object(object) => {
            let records = object
                .get("terms")
                .and_then(Value::as_array)
                .ok_or_else(|| anyhow!("JSON object has no \"terms\" array"))?;
            let metadata = object
                .iter()
                .filter(|(key, _)| key.as_str() != "terms")
                .filter_map(|(key, value)| {
                    value.as_str().map(|value| (key.clone(), value.to_string()))
                })
                .collect();
            (records.as_slice(), metadata)
        }
        _ => bail!("unexpected JSON type for term records"),
    };

    let mut rows = Vec::with_capacity(records.len());
    for (index, value) in records.iter().enumerate() {
        let record = RawTermRecord::deserialize(value)
            .with_context(|| format!("invalid term record at index {index}"))?;
        if record.count == 0 {
            debug!(index, term = %record.term_name, "skipping term without genes");
            continue;
        }
        if !(0.0..=1.0).contains(&record.p_value) {
            bail!("term record at index {index} has p-value {} outside [0, 1]", record.p_value);
        }

        let fold_enrichment = record
            .fold_enrichment
            .filter(|value| value.is_finite() && *value > 0.0)
            .map_or(fold_ceiling, |value| value.min(fold_ceiling));
        let fdr = record.fdr.unwrap_or(record.p_value);
        if !(0.0..=1.0).contains(&fdr) {
            bail!("term record at index {index} has FDR {fdr} outside [0, 1]");
        }

        rows.push(PendingRow {
            term_id: record.term_id.unwrap_or_else(|| record.term_name.clone()),
            term_name: record.term_name,
            count: record.count,
            expected: record.expected,
            fold_enrichment,
            p_value: record.p_value,
            fdr,
            gene_ratio: record.gene_ratio,
            over_represented: record.over_represented,
        });
    }

    Ok(ParsedReport {
        metadata,
        terms: finish_rows(rows, None),
    })
}

fn finish_rows(rows: Vec<PendingRow>, list_size: Option<u32>) -> Vec<Term> {
    let denominator = list_size
        .filter(|size| *size > 0)
        .or_else(|| rows.iter().map(|row| row.count).max())
        .unwrap_or(1);

    rows.into_iter()
        .map(|row| {
            let gene_ratio = row
                .gene_ratio
                .unwrap_or(f64::from(row.count) / f64::from(denominator));
            Term::new(
                row.term_id,
                row.term_name,
                TermStats {
                    count: row.count,
                    expected: row.expected,
                    fold_enrichment: row.fold_enrichment,
                    p_value: row.p_value,
                    fdr: row.fdr,
                    gene_ratio,
                    over_represented: row.over_represented,
                },
            )
        })
        .collect()
}

fn parse_cell<T>(fields: &[&str], index: usize, line_no: usize, column: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let cell = fields
        .get(index)
        .map(|cell| cell.trim())
        .ok_or_else(|| anyhow!("line {line_no}: missing {column} column"))?;
    cell.parse::<T>()
        .with_context(|| format!("line {line_no}: invalid {column} value {cell:?}"))
}

fn parse_probability(fields: &[&str], index: usize, line_no: usize, column: &str) -> Result<f64> {
    let value: f64 = parse_cell(fields, index, line_no, column)?;
    if !(0.0..=1.0).contains(&value) {
        bail!("line {line_no}: {column} {value} is outside [0, 1]");
    }
    Ok(value)
}

/// `cell adhesion (GO:0007155)` splits into name and id; cells without a
/// trailing parenthesized id use the whole cell for both.
pub(super) fn split_term_cell(cell: &str) -> (String, String) {
    let cell = cell.trim();
    if let Some(stripped) = cell.strip_suffix(')')
        && let Some((name, id)) = stripped.rsplit_once(" (")
        && !name.trim().is_empty()
        && !id.trim().is_empty()
    {
        return (name.trim().to_string(), id.trim().to_string());
    }

    (cell.to_string(), cell.to_string())
}

pub(super) fn parse_fold_enrichment(cell: &str, ceiling: f64) -> f64 {
    let cell = cell.trim();
    if cell.starts_with('>') {
        return ceiling;
    }

    match cell.strip_prefix('<').unwrap_or(cell).trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.min(ceiling),
        _ => ceiling,
    }
}

fn parenthesized_number(header: &str) -> Option<u32> {
    let (_, rest) = header.rsplit_once('(')?;
    let (number, _) = rest.split_once(')')?;
    number.trim().parse().ok()
}
