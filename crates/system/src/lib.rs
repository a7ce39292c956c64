//! Everything that talks to the operating system: the metric sampler and
//! its sysinfo-backed source, plus the one-shot views (host overview,
//! disks, battery, process table).

pub mod battery;
pub mod cpu;
pub mod disk;
pub mod memory;
pub mod overview;
pub mod process;
pub mod sampler;
pub mod source;

pub use process::{ProcessQuery, ProcessTable};
pub use sampler::{MetricSource, Sampler};
pub use source::SysinfoSource;
