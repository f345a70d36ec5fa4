pub mod dispatch;
pub mod replay;
pub mod sampler;
pub mod trace;

pub use trace::{TraceRow, VmRequest, VmType};
