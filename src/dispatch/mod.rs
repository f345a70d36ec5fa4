//! Delivery of synthesized request batches

pub mod command;
pub mod writer;

pub use command::CommandDispatcher;
pub use writer::JsonLinesDispatcher;

use crate::trace::VmRequest;
use anyhow::Result;

/// Receives every batch of requests produced by a replay, in order.
///
/// Calls are synchronous: the replay does not advance until `dispatch`
/// returns, and an error ends the replay.
pub trait Dispatcher {
    fn dispatch(&mut self, batch: &[VmRequest]) -> Result<()>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for &mut D {
    fn dispatch(&mut self, batch: &[VmRequest]) -> Result<()> {
        (**self).dispatch(batch)
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn dispatch(&mut self, batch: &[VmRequest]) -> Result<()> {
        (**self).dispatch(batch)
    }
}

/// Logs each request instead of submitting it anywhere
#[derive(Debug, Default)]
pub struct LogDispatcher {
    batches: u64,
    requests: u64,
}

impl LogDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> u64 {
        self.batches
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl Dispatcher for LogDispatcher {
    fn dispatch(&mut self, batch: &[VmRequest]) -> Result<()> {
        for rq in batch {
            tracing::info!(
                name = %rq.name,
                vm_type = %rq.vm_type,
                lifetime = rq.lifetime,
                vcpu = rq.vcpu,
                "dispatch"
            );
        }
        self.batches += 1;
        self.requests += batch.len() as u64;
        Ok(())
    }
}
