use super::{Distribution, TraceError, TraceRow};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// CSV shape of a trace row before distribution cells are decoded
#[derive(Debug, Deserialize)]
struct RawTraceRow {
    time: f64,
    request_count: f64,
    regular_vm_count: f64,
    evictable_vm_count: f64,
    lifetime_distribution: String,
    vcpu_distribution: String,
}

/// A trace restricted to a time window
pub struct TraceReader {
    rows: Vec<TraceRow>,
}

impl TraceReader {
    /// Load `path` keeping only rows with `t_start <= time <= t_stop`.
    pub fn new<P: AsRef<Path>>(path: P, t_start: f64, t_stop: f64) -> Result<Self, TraceError> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader, t_start, t_stop)
    }

    pub fn from_reader<R: Read>(input: R, t_start: f64, t_stop: f64) -> Result<Self, TraceError> {
        Self::from_csv(csv::Reader::from_reader(input), t_start, t_stop)
    }

    fn from_csv<R: Read>(
        mut reader: csv::Reader<R>,
        t_start: f64,
        t_stop: f64,
    ) -> Result<Self, TraceError> {
        let mut rows = Vec::new();

        for (idx, record) in reader.deserialize::<RawTraceRow>().enumerate() {
            let raw = record?;
            // Header is line 1
            let row = idx + 2;
            // Every cell is decoded so a malformed row aborts the load even
            // when it lies outside the window.
            let lifetime_distribution =
                decode_cell(row, "lifetime_distribution", raw.lifetime_distribution)?;
            let vcpu_distribution = decode_cell(row, "vcpu_distribution", raw.vcpu_distribution)?;

            if t_start <= raw.time && raw.time <= t_stop {
                rows.push(TraceRow {
                    time: raw.time,
                    request_count: raw.request_count,
                    regular_vm_count: raw.regular_vm_count,
                    evictable_vm_count: raw.evictable_vm_count,
                    lifetime_distribution,
                    vcpu_distribution,
                });
            }
        }

        tracing::info!(
            "Loaded {} trace rows in window [{}, {}]",
            rows.len(),
            t_start,
            t_stop
        );

        Ok(TraceReader { rows })
    }

    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    /// Distinct timestamps of the retained rows in ascending order
    pub fn timestamps(&self) -> Vec<f64> {
        let mut times: Vec<f64> = self.rows.iter().map(|r| r.time).collect();
        times.sort_by(f64::total_cmp);
        times.dedup();
        times
    }

    /// First row recorded at exactly `time`
    pub fn row_at(&self, time: f64) -> Option<&TraceRow> {
        let mut matching = self.rows.iter().filter(|r| r.time == time);
        let first = matching.next()?;
        let extra = matching.count();
        if extra > 0 {
            tracing::warn!(
                "{} additional rows share time {}, using the first",
                extra,
                time
            );
        }
        Some(first)
    }
}

fn decode_cell(row: usize, column: &'static str, cell: String) -> Result<Distribution, TraceError> {
    Distribution::parse(&cell).map_err(|reason| TraceError::Distribution {
        row,
        column,
        cell,
        reason,
    })
}
