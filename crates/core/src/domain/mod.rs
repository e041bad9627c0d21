// Domain Layer - Diagnostic requests, results and the host platform

pub mod kind;
pub mod platform;
pub mod request;
pub mod result;

// Re-exports
pub use kind::DiagnosticKind;
pub use platform::{Platform, PlatformFamily};
pub use request::DiagnosticRequest;
pub use result::{format_duration, ConnectionInfo, DiagnosticResult};
