// Application Layer - Strategy selection, execution and normalization

pub mod capability;
pub mod constants;
pub mod diagnostic;
pub mod strategy;
pub mod verdict;

// Re-exports
pub use capability::{Capability, CapabilityTable, ExitPolicy, OperandForm};
pub use diagnostic::DiagnosticService;
pub use strategy::{plan, render_template, strip_scheme, ExecutionPlan};
pub use verdict::{merge_output, Verdict};
