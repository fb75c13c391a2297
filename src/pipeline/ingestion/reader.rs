//! Raw record sources.
//!
//! An extract archive is a zip with one JSON object per entry; a JSON-lines
//! file holds one object per line. Both yield [`RawRecord`]s in file order,
//! which [`grouper`] then clusters into per-house runs.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::iter::Peekable;
use std::path::Path;

use serde_json::Value;
use tracing::debug;
use zip::ZipArchive;

use crate::error::Result;
use crate::pipeline::processing::validator::RawRecord;

/// Iterator over the JSON documents of a zip archive.
pub struct ZipRecords {
    archive: ZipArchive<File>,
    next_index: usize,
}

impl Iterator for ZipRecords {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_index < self.archive.len() {
            let index = self.next_index;
            self.next_index += 1;

            let mut entry = match self.archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            if entry.is_dir() {
                continue;
            }

            let mut contents = String::new();
            if let Err(e) = entry.read_to_string(&mut contents) {
                return Some(Err(e.into()));
            }
            debug!(entry = %entry.name(), bytes = contents.len(), "Read archive entry");
            return Some(serde_json::from_str::<RawRecord>(&contents).map_err(Into::into));
        }
        None
    }
}

pub fn read_zip<P: AsRef<Path>>(path: P) -> Result<ZipRecords> {
    let file = File::open(path.as_ref())?;
    let archive = ZipArchive::new(file)?;
    debug!(path = %path.as_ref().display(), entries = archive.len(), "Opened extract archive");
    Ok(ZipRecords {
        archive,
        next_index: 0,
    })
}

/// Records from a JSON-lines file. Blank lines are skipped.
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<impl Iterator<Item = Result<RawRecord>>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str::<RawRecord>(&line).map_err(Into::into)),
        Err(e) => Some(Err(e.into())),
    }))
}

/// Runs of consecutive records sharing the same value for a key field.
pub struct Grouper<I: Iterator<Item = RawRecord>> {
    records: Peekable<I>,
    field: String,
}

impl<I: Iterator<Item = RawRecord>> Iterator for Grouper<I> {
    type Item = Vec<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.records.next()?;
        let key: Option<Value> = first.get(&self.field).cloned();
        let mut group = vec![first];

        while let Some(record) = self
            .records
            .next_if(|record| record.get(&self.field) == key.as_ref())
        {
            group.push(record);
        }
        Some(group)
    }
}

/// Cluster records into runs keyed by `field`. Records are not sorted, so
/// input must already be ordered by the key. Records without the field
/// group with their missing-key neighbours.
pub fn grouper<I>(records: I, field: &str) -> Grouper<I::IntoIter>
where
    I: IntoIterator<Item = RawRecord>,
{
    Grouper {
        records: records.into_iter().peekable(),
        field: field.to_string(),
    }
}
