use crate::sampler::{self, SampleError};
use crate::trace::{Distribution, TraceRow, VmRequest, VmType};
use rand::Rng;

/// Requests synthesized for one timestep
#[derive(Debug, Default)]
pub struct Batch {
    pub requests: Vec<VmRequest>,
    pub regular: usize,
    pub evictable: usize,
    /// Requests dropped because their vCPU count rounded to zero
    pub skipped: usize,
}

/// Turns trace rows into VM requests
pub struct RequestGenerator {
    max_rq_cnt: f64,
    max_lft: f64,
    max_vcpu_cnt: f64,
}

impl RequestGenerator {
    pub fn new(max_rq_cnt: f64, max_lft: f64, max_vcpu_cnt: f64) -> Self {
        RequestGenerator {
            max_rq_cnt,
            max_lft,
            max_vcpu_cnt,
        }
    }

    /// Number of regular and evictable requests to attempt for `row`.
    ///
    /// Both counts are rounded independently, so they need not add up to
    /// the rounded total.
    pub fn request_counts(&self, row: &TraceRow) -> (usize, usize) {
        let total = row.request_count * self.max_rq_cnt;
        (
            round_count(total * row.regular_vm_count),
            round_count(total * row.evictable_vm_count),
        )
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        row: &TraceRow,
        rng: &mut R,
    ) -> Result<Batch, SampleError> {
        let (reg_rq_cnt, evct_rq_cnt) = self.request_counts(row);
        let mut batch = Batch::default();
        batch.requests.reserve(reg_rq_cnt + evct_rq_cnt);

        for (vm_type, count) in [(VmType::Regular, reg_rq_cnt), (VmType::Evictable, evct_rq_cnt)] {
            for idx in 0..count {
                match self.synthesize(row, vm_type, idx, rng)? {
                    Some(rq) => {
                        match vm_type {
                            VmType::Regular => batch.regular += 1,
                            VmType::Evictable => batch.evictable += 1,
                        }
                        batch.requests.push(rq);
                    }
                    None => batch.skipped += 1,
                }
            }
        }

        tracing::debug!(
            "t={} regular={} evictable={} skipped={}",
            row.time,
            batch.regular,
            batch.evictable,
            batch.skipped
        );

        Ok(batch)
    }

    fn synthesize<R: Rng + ?Sized>(
        &self,
        row: &TraceRow,
        vm_type: VmType,
        idx: usize,
        rng: &mut R,
    ) -> Result<Option<VmRequest>, SampleError> {
        let lifetime = draw(&row.lifetime_distribution, rng)? * self.max_lft;
        let vcpu = (draw(&row.vcpu_distribution, rng)? * self.max_vcpu_cnt).round_ties_even();

        if vcpu <= 0.0 {
            tracing::debug!("Skipping {} request {} at t={}: vcpu={}", vm_type, idx, row.time, vcpu);
            return Ok(None);
        }

        Ok(Some(VmRequest {
            name: VmRequest::request_name(row.time, vm_type, idx),
            vm_type,
            // KDE draws can fall below zero.
            lifetime: lifetime.max(0.0),
            vcpu: vcpu as u32,
        }))
    }
}

fn draw<R: Rng + ?Sized>(dist: &Distribution, rng: &mut R) -> Result<f64, SampleError> {
    sampler::sample(dist.values(), rng)
}

/// Round half to even, clamping negative and NaN to zero.
fn round_count(value: f64) -> usize {
    let rounded = value.round_ties_even();
    if rounded > 0.0 {
        rounded as usize
    } else {
        0
    }
}
