use super::Dispatcher;
use crate::trace::VmRequest;
use anyhow::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes each batch as a single JSON array line
pub struct JsonLinesDispatcher<W: Write> {
    out: W,
    batches_written: u64,
    requests_written: u64,
}

impl JsonLinesDispatcher<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesDispatcher<W> {
    pub fn new(out: W) -> Self {
        JsonLinesDispatcher {
            out,
            batches_written: 0,
            requests_written: 0,
        }
    }

    /// Flush and return `(batches, requests)` written.
    pub fn finish(mut self) -> Result<(u64, u64)> {
        self.out.flush()?;
        Ok((self.batches_written, self.requests_written))
    }
}

impl<W: Write> Dispatcher for JsonLinesDispatcher<W> {
    fn dispatch(&mut self, batch: &[VmRequest]) -> Result<()> {
        serde_json::to_writer(&mut self.out, batch)?;
        self.out.write_all(b"\n")?;
        // Consumers tail the output while the replay sleeps.
        self.out.flush()?;

        self.batches_written += 1;
        self.requests_written += batch.len() as u64;
        Ok(())
    }
}
