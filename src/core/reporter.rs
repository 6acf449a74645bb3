use crate::domain::model::{Coordinate, GeoRecord};
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Timestamp is the moment of the fix, truncated to whole seconds.
pub fn build_record(fixed_at: DateTime<Local>, coordinate: Coordinate, address: String) -> GeoRecord {
    GeoRecord::new(fixed_at, coordinate, address)
}

pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn emit(&mut self, record: &GeoRecord) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", record)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, record)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
