// Strategy selection: request -> concrete subprocess invocation

use crate::application::capability::{Capability, CapabilityTable, OperandForm};
use crate::application::constants::{STRIPPED_SCHEMES, URL_PLACEHOLDER};
use crate::domain::{DiagnosticKind, DiagnosticRequest};
use crate::error::{DiagnosticError, Result};
use crate::port::ProcessInvocation;

/// A request resolved against the capability table
#[derive(Debug, Clone)]
pub struct ExecutionPlan<'a> {
    pub kind: DiagnosticKind,
    pub capability: &'a Capability,
    pub invocation: ProcessInvocation,
}

/// Resolve a request to the invocation to run
///
/// Pure: nothing is spawned here.
///
/// # Errors
/// - DiagnosticError::UnknownCommand if the label is not a known kind
/// - DiagnosticError::MissingTemplate for `custom` without a template
pub fn plan<'a>(
    table: &'a CapabilityTable,
    request: &DiagnosticRequest,
) -> Result<ExecutionPlan<'a>> {
    let kind = request.kind()?;
    let capability = table.get(kind);

    let operand = match capability.operand_form {
        OperandForm::Verbatim => request.target().to_string(),
        OperandForm::HostOnly => strip_scheme(request.target()).to_string(),
        OperandForm::ShellTemplate => {
            let template = request
                .custom_template()
                .ok_or(DiagnosticError::MissingTemplate)?;
            render_template(template, request.target())
        }
    };

    Ok(ExecutionPlan {
        kind,
        capability,
        invocation: capability.invocation(&operand),
    })
}

/// Strip a leading `http://`, then a leading `https://`
///
/// Prefix match only and case-sensitive; anything else is returned unchanged.
pub fn strip_scheme(target: &str) -> &str {
    STRIPPED_SCHEMES
        .iter()
        .fold(target, |rest, scheme| rest.strip_prefix(scheme).unwrap_or(rest))
}

/// Substitute the target for every `{url}` in the template
///
/// SECURITY: the substitution is textual and the result is handed to a shell.
/// Metacharacters in either the template or the target are interpreted by
/// that shell. Nothing is escaped; this is an operator tool and escaping would
/// change the meaning of existing templates.
pub fn render_template(template: &str, target: &str) -> String {
    template.replace(URL_PLACEHOLDER, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Platform, PlatformFamily};

    fn posix_table() -> CapabilityTable {
        CapabilityTable::for_family(PlatformFamily::Posix)
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("http://example.com"), "example.com");
        assert_eq!(strip_scheme("https://example.com"), "example.com");
        assert_eq!(strip_scheme("ftp://example.com"), "ftp://example.com");
        assert_eq!(strip_scheme("example.com"), "example.com");
        // Case-sensitive prefix match only
        assert_eq!(strip_scheme("HTTP://example.com"), "HTTP://example.com");
        assert_eq!(
            strip_scheme("example.com/?next=http://other"),
            "example.com/?next=http://other"
        );
        // Stripped in order, once each
        assert_eq!(strip_scheme("http://https://example.com"), "example.com");
        assert_eq!(
            strip_scheme("https://http://example.com"),
            "http://example.com"
        );
    }

    #[test]
    fn test_render_template_replaces_every_placeholder() {
        assert_eq!(render_template("echo {url}", "test123"), "echo test123");
        assert_eq!(
            render_template("curl {url} && ping {url}", "h"),
            "curl h && ping h"
        );
        assert_eq!(render_template("uptime", "ignored"), "uptime");
    }

    #[test]
    fn test_render_template_does_not_escape() {
        // Documented hardening gap: shell syntax passes straight through
        assert_eq!(
            render_template("echo {url}", "a; rm -rf /tmp/x"),
            "echo a; rm -rf /tmp/x"
        );
        assert_eq!(render_template("echo $(id) {url}", "`x`"), "echo $(id) `x`");
    }

    #[test]
    fn test_plan_ping_strips_scheme() {
        let table = posix_table();
        let req = DiagnosticRequest::new("ping", "https://example.com");
        let plan = plan(&table, &req).unwrap();

        assert_eq!(plan.kind, DiagnosticKind::Ping);
        assert_eq!(plan.invocation.args, vec!["-c", "4", "example.com"]);
    }

    #[test]
    fn test_plan_fetch_keeps_target() {
        let table = posix_table();
        let req = DiagnosticRequest::new("curl", "https://example.com/path");
        let plan = plan(&table, &req).unwrap();

        assert_eq!(
            plan.invocation.args.last().unwrap(),
            "https://example.com/path"
        );
    }

    #[test]
    fn test_plan_traceroute_on_windows() {
        let table = CapabilityTable::for_platform(&Platform::windows());
        let req = DiagnosticRequest::new("tracert", "http://example.com");
        let plan = plan(&table, &req).unwrap();

        assert_eq!(plan.invocation.program, "tracert");
        assert_eq!(plan.invocation.args, vec!["example.com"]);
    }

    #[test]
    fn test_plan_custom() {
        let table = posix_table();
        let req = DiagnosticRequest::new("custom", "test123").with_template("echo {url}");
        let plan = plan(&table, &req).unwrap();

        assert_eq!(plan.invocation.program, "sh");
        assert_eq!(plan.invocation.args, vec!["-c", "echo test123"]);
    }

    #[test]
    fn test_plan_rejections() {
        let table = posix_table();

        let err = plan(&table, &DiagnosticRequest::new("foo", "x")).unwrap_err();
        assert_eq!(err, DiagnosticError::UnknownCommand("foo".to_string()));

        let err = plan(&table, &DiagnosticRequest::new("custom", "x")).unwrap_err();
        assert_eq!(err, DiagnosticError::MissingTemplate);
    }
}
