//! Output module
//!
//! Delivers emitted points to a time-series store.
//!
//! # Overview
//!
//! - `InfluxWriter`: InfluxDB line protocol over HTTP
//! - `JsonLinesWriter`: one JSON object per point (dry runs)
//! - `MemoryWriter`: in-process collection

mod line_protocol;
mod writer;

pub use line_protocol::{encode_point, encode_points};
pub use writer::{InfluxWriter, JsonLinesWriter, MemoryWriter, PointWriter};

use crate::config::{Config, OutputKind};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Build the writer selected by the configuration.
///
/// `dry_run` forces JSON lines on stdout regardless of the configured kind.
pub fn build_writer(config: &Config, dry_run: bool) -> Result<Arc<dyn PointWriter>> {
    if dry_run {
        return Ok(Arc::new(JsonLinesWriter::stdout()));
    }
    match config.output.kind {
        OutputKind::Stdout => Ok(Arc::new(JsonLinesWriter::stdout())),
        OutputKind::Influx => {
            let influx = config
                .output
                .influx
                .as_ref()
                .ok_or_else(|| Error::missing_field("output.influx"))?;
            Ok(Arc::new(InfluxWriter::new(influx, &config.http)?))
        }
    }
}
