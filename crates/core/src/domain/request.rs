// Diagnostic request (one per inbound call)

use crate::domain::DiagnosticKind;
use crate::error::Result;

/// A diagnostic request as received from a caller
///
/// The command label is kept verbatim so that an unsupported label can be
/// echoed back in the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRequest {
    command: String,
    target: String,
    custom_template: Option<String>,
}

impl DiagnosticRequest {
    pub fn new(command: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            target: target.into(),
            custom_template: None,
        }
    }

    /// Attach a `{url}` template (only used by the `custom` kind)
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.custom_template = Some(template.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Template, if one was given and it is not blank
    pub fn custom_template(&self) -> Option<&str> {
        self.custom_template
            .as_deref()
            .filter(|template| !template.trim().is_empty())
    }

    /// Resolve the command label to a kind
    ///
    /// # Errors
    /// - DiagnosticError::UnknownCommand for any unsupported label
    pub fn kind(&self) -> Result<DiagnosticKind> {
        self.command.parse()
    }
}
