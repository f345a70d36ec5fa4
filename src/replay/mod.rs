//! Replay and request synthesis logic

pub mod config;
pub mod generator;
pub mod main;
pub mod pacer;

pub use config::{ConfigError, ReplayConfig};
pub use generator::{Batch, RequestGenerator};
pub use main::{replay, run, status_line, wait_between, ReplaySummary, SECONDS_PER_DAY};
pub use pacer::{NoWait, Pacer, ThreadPacer};
