use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::app::ports::DwellingOutputPort;
use crate::domain::ToDict;
use crate::pipeline::processing::dwelling::Dwelling;

/// File-based implementation of DwellingOutputPort
/// Writes one dwelling document per line
pub struct JsonlDwellingOutputAdapter {
    writer: BufWriter<std::fs::File>,
    file_path: PathBuf,
}

impl JsonlDwellingOutputAdapter {
    pub fn new(file_path: &Path) -> Result<Self> {
        if let Some(dir) = file_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        info!("Creating dwelling output file: {}", file_path.display());

        let writer = BufWriter::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(file_path)?,
        );

        Ok(Self {
            writer,
            file_path: file_path.to_path_buf(),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl DwellingOutputPort for JsonlDwellingOutputAdapter {
    fn write_dwelling(&mut self, dwelling: &Dwelling) -> Result<()> {
        let json_line = serde_json::to_string(&dwelling.to_dict())?;
        writeln!(self.writer, "{}", json_line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
