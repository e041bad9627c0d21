// Netprobe Core - Diagnostic Dispatch & Ports
// NO infrastructure dependencies (hexagonal layout)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::DiagnosticService;
pub use error::{DiagnosticError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
