// Diagnostic Service - the executor behind every /api/test call

use crate::application::capability::CapabilityTable;
use crate::application::strategy;
use crate::application::verdict::Verdict;
use crate::domain::result::{METADATA_COMMAND_TYPE, METADATA_EXECUTION_TIME};
use crate::domain::{
    format_duration, ConnectionInfo, DiagnosticRequest, DiagnosticResult, Platform,
};
use crate::port::{IdProvider, ProcessRunner, TimeProvider};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};

/// Diagnostic Executor
///
/// Stateless between calls: each `run` builds its own plan, spawns at most one
/// subprocess and returns a fully formed result. Safe to share across tasks.
pub struct DiagnosticService {
    runner: Arc<dyn ProcessRunner>,
    platform: Platform,
    capabilities: CapabilityTable,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
}

impl DiagnosticService {
    /// Create a service with the default capability table for `platform`
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        platform: Platform,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
    ) -> Self {
        let capabilities = CapabilityTable::for_platform(&platform);
        Self {
            runner,
            platform,
            capabilities,
            time_provider,
            id_provider,
        }
    }

    /// Replace the capability table (e.g. with overridden deadlines)
    pub fn with_capabilities(mut self, capabilities: CapabilityTable) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// Run one diagnostic
    ///
    /// Never fails: unknown kinds, missing templates, spawn errors, non-zero
    /// exits and timeouts all come back as `succeeded == false` results.
    pub async fn run(&self, request: DiagnosticRequest) -> DiagnosticResult {
        let started = Instant::now();
        let run_id = self.id_provider.generate_id();
        let connection = ConnectionInfo {
            target: request.target().to_string(),
            started_at: self.time_provider.now(),
            host_os: self.platform.os().to_string(),
        };

        let span = info_span!("diagnostic", run_id = %run_id, command = %request.command());
        let verdict = self.execute(&request).instrument(span.clone()).await;
        let duration = started.elapsed();

        let _entered = span.enter();
        info!(
            succeeded = verdict.succeeded,
            duration = %format_duration(duration),
            error = ?verdict.error.as_ref().map(ToString::to_string),
            "Diagnostic completed"
        );

        let mut metadata = BTreeMap::new();
        metadata.insert(METADATA_COMMAND_TYPE.to_string(), request.command().to_string());
        metadata.insert(METADATA_EXECUTION_TIME.to_string(), format_duration(duration));

        DiagnosticResult {
            succeeded: verdict.succeeded,
            command: request.command().to_string(),
            kind: request.kind().ok(),
            raw_output: verdict.output,
            error_message: verdict.error.map(|e| e.to_string()),
            duration,
            connection,
            metadata,
        }
    }

    async fn execute(&self, request: &DiagnosticRequest) -> Verdict {
        let plan = match strategy::plan(&self.capabilities, request) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, "Diagnostic rejected before execution");
                return Verdict::rejected(e);
            }
        };

        info!(
            kind = %plan.kind,
            target = %request.target(),
            program = %plan.invocation.program,
            deadline = ?plan.invocation.deadline,
            "Starting diagnostic"
        );

        let outcome = self.runner.run(&plan.invocation).await;

        Verdict::from_outcome(
            outcome,
            plan.capability.exit_policy,
            plan.capability.error_context,
        )
    }
}
