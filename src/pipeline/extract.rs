//! CSV extract → zip of per-evaluation JSON documents.
//!
//! Each CSV row carries the full house file in its `RAW_XML` column. The
//! house file is cut into snippets and merged with the row's other columns;
//! the result is written to the archive under the row's `EVAL_ID`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::constants::{EVAL_ID, RAW_XML};
use crate::error::{EnerguideError, Result};
use crate::fragment::Element;
use crate::pipeline::processing::snippets::{
    snip_codes, snip_energy_upgrades, snip_house, snip_other_data, Codes, EnergyUpgradesSnippet,
    HouseSnippet,
};
use crate::pipeline::processing::validator::RawRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub written: usize,
    pub failed: usize,
}

/// Read every row of a CSV export and turn it into an extract document.
/// Rows whose house file does not parse come back as errors.
pub fn extract_data<P: AsRef<Path>>(infile: P) -> Result<Vec<Result<RawRecord>>> {
    let mut reader = csv::Reader::from_path(infile.as_ref())?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawRecord::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), Value::String(value.to_string()));
        }
        rows.push(snip_row(row));
    }
    Ok(rows)
}

/// Replace the row's `RAW_XML` column with the snippets cut from it.
pub fn snip_row(mut row: RawRecord) -> Result<RawRecord> {
    let raw_xml = match row.remove(RAW_XML) {
        Some(Value::String(text)) => text,
        _ => return Err(EnerguideError::MissingValue(format!("row has no {} column", RAW_XML))),
    };
    let house_file = Element::from_string(&raw_xml)?;

    let house = house_file
        .find("House")
        .map(snip_house)
        .unwrap_or_else(HouseSnippet::empty);
    let codes = house_file
        .find("Codes")
        .map(snip_codes)
        .unwrap_or_else(Codes::empty);
    let upgrades = house_file
        .find("EnergyUpgrades")
        .map(snip_energy_upgrades)
        .unwrap_or_else(EnergyUpgradesSnippet::empty);
    let other = snip_other_data(&house_file);

    merge(&mut row, &house)?;
    merge(&mut row, &upgrades)?;
    merge(&mut row, &other)?;
    row.insert("codes".to_string(), serde_json::to_value(&codes)?);
    Ok(row)
}

fn merge<T: Serialize>(row: &mut RawRecord, snippet: &T) -> Result<()> {
    if let Value::Object(fields) = serde_json::to_value(snippet)? {
        row.extend(fields);
    }
    Ok(())
}

/// Write successful rows into a zip archive, one entry per `EVAL_ID`.
pub fn write_data<P, I>(rows: I, outfile: P) -> Result<ExtractSummary>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Result<RawRecord>>,
{
    let mut writer = ZipWriter::new(File::create(outfile.as_ref())?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut summary = ExtractSummary::default();

    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "Failed to extract row");
                summary.failed += 1;
                continue;
            }
        };

        let Some(name) = row.get(EVAL_ID).and_then(entry_name) else {
            warn!("Extracted row has no {}, skipping", EVAL_ID);
            summary.failed += 1;
            continue;
        };

        writer.start_file(name, options)?;
        writer.write_all(serde_json::to_string(&row)?.as_bytes())?;
        summary.written += 1;
    }

    writer.finish()?;
    Ok(summary)
}

fn entry_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `extract` command: CSV in, zip out.
pub fn run_extract(infile: &Path, outfile: &Path) -> Result<ExtractSummary> {
    info!(infile = %infile.display(), outfile = %outfile.display(), "Extracting data");
    if outfile.exists() {
        warn!(outfile = %outfile.display(), "Output file exists, overwriting");
    }

    let rows = extract_data(infile)?;
    let summary = write_data(rows, outfile)?;
    info!(
        written = summary.written,
        failed = summary.failed,
        "Finished extracting data"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingestion::reader::read_zip;
    use serde_json::json;
    use tempfile::tempdir;

    const HOUSE_FILE: &str = r#"<HouseFile>
        <ProgramInformation><Client><StreetAddress><PostalCode>K1P 0A6</PostalCode></StreetAddress></Client></ProgramInformation>
        <House><Components><HotWater><Primary /></HotWater></Components></House>
        <EnergyUpgrades><Settings><Ceilings cost="0" priority="12" /></Settings></EnergyUpgrades>
    </HouseFile>"#;

    #[test]
    fn test_snip_row() {
        let row = json!({"EVAL_ID": "123", "RAW_XML": HOUSE_FILE})
            .as_object()
            .cloned()
            .unwrap();
        let output = snip_row(row).unwrap();

        assert!(output.get(RAW_XML).is_none());
        assert_eq!(output["forwardSortationArea"], json!("K1P"));
        assert_eq!(output["upgrades"], json!([r#"<Ceilings cost="0" priority="12"/>"#]));
        assert_eq!(output["waterHeatings"], json!("<HotWater><Primary/></HotWater>"));
        assert_eq!(output["codes"], json!({"wall": [], "window": []}));
    }

    #[test]
    fn test_extract_round_trip() {
        let dir = tempdir().unwrap();
        let infile = dir.path().join("extract.csv");
        let outfile = dir.path().join("extract.zip");

        let mut csv_writer = csv::Writer::from_path(&infile).unwrap();
        csv_writer.write_record(["EVAL_ID", "HOUSE_ID", "RAW_XML"]).unwrap();
        csv_writer.write_record(["1", "10", HOUSE_FILE]).unwrap();
        csv_writer.write_record(["2", "10", "<HouseFile>"]).unwrap();
        csv_writer.flush().unwrap();

        let summary = run_extract(&infile, &outfile).unwrap();
        assert_eq!(summary, ExtractSummary { written: 1, failed: 1 });

        let records: Vec<RawRecord> = read_zip(&outfile).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["HOUSE_ID"], json!("10"));
    }
}
