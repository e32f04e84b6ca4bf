//! sink.rs — PDW output collaborators
//!
//! spec.md §9, "Scenario as global sink": the sink is an explicit
//! collaborator (`write`/`close`) rather than an ambient redirect, so the
//! driver can be tested against an in-memory sink as well as a real CSV
//! file. spec.md §6 fixes the CSV header and column order. Per §7, a
//! truncated run still leaves a parseable CSV up to the failure point; the
//! truncation notice itself is the caller's concern (the optional run log,
//! see main.rs), not a line injected into the CSV.

use crate::error::SimResult;
use crate::pdw::Pdw;
use std::io::Write;

pub trait PdwSink {
    fn write(&mut self, pdw: &Pdw) -> SimResult<()>;
    fn close(self: Box<Self>) -> SimResult<()>;
}

/// Buffered CSV sink, `csv::Writer` over any `Write` — a file in
/// production, a `Vec<u8>` or `tempfile::NamedTempFile` in tests.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

const HEADER: [&str; 8] = [
    "Time",
    "SensorID",
    "RadarID",
    "TOA",
    "Amplitude",
    "Frequency",
    "PulseWidth",
    "AOA",
];

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> SimResult<Self> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(CsvSink { writer })
    }
}

impl CsvSink<std::fs::File> {
    pub fn create(path: &std::path::Path) -> SimResult<Self> {
        Self::new(std::fs::File::create(path)?)
    }
}

impl<W: Write> PdwSink for CsvSink<W> {
    fn write(&mut self, pdw: &Pdw) -> SimResult<()> {
        self.writer.write_record(&[
            pdw.time_emitted.to_string(),
            pdw.sensor_id.clone(),
            pdw.radar_id.clone(),
            pdw.toa.to_string(),
            pdw.amplitude.to_string(),
            pdw.frequency.to_string(),
            pdw.pulse_width.to_string(),
            pdw.aoa.to_string(),
        ])?;
        Ok(())
    }

    /// Flush and close. Called whether the run completed or aborted early —
    /// a partial CSV is valid output, per spec.md §7.
    fn close(mut self: Box<Self>) -> SimResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory sink for tests (spec.md §9's explicit-collaborator redesign
/// exists precisely to enable this).
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<Pdw>,
}

impl PdwSink for MemorySink {
    fn write(&mut self, pdw: &Pdw) -> SimResult<()> {
        self.records.push(pdw.clone());
        Ok(())
    }

    fn close(self: Box<Self>) -> SimResult<()> {
        Ok(())
    }
}
