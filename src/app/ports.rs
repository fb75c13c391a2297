use anyhow::Result;

use crate::pipeline::processing::dwelling::Dwelling;

/// Sink for transformed dwellings.
pub trait DwellingOutputPort: Send {
    fn write_dwelling(&mut self, dwelling: &Dwelling) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
