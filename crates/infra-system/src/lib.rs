// Netprobe Infrastructure - System Adapters
// Implements: ProcessRunner; host details for startup logging

pub mod host_info;
pub mod subprocess_runner;

pub use host_info::HostInfo;
pub use subprocess_runner::SubprocessRunner;
