use crate::launcher::{BROWSER_PROGRAM, NO_AGENT, PLAIN_SHELL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyStatus {
    pub name: String,
    pub available: bool,
    pub required: bool,
}

/// Whether `program` resolves to an executable on `$PATH`.
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Programs a launch with this terminal mode and agent needs, in checklist order.
pub fn declared_dependencies(terminal: &str, agent: &str) -> Vec<String> {
    let mut names = vec![BROWSER_PROGRAM.to_string(), "tmux".to_string()];
    if !terminal.is_empty() && terminal != PLAIN_SHELL {
        names.push(terminal.to_string());
    }
    if !agent.is_empty() && agent != NO_AGENT {
        names.push(agent.to_string());
    }
    names
}

pub fn check_dependencies(
    terminal: &str,
    agent: &str,
    exists: impl Fn(&str) -> bool,
) -> Vec<DependencyStatus> {
    declared_dependencies(terminal, agent)
        .into_iter()
        .map(|name| DependencyStatus {
            available: exists(&name),
            name,
            required: true,
        })
        .collect()
}

pub fn all_available(deps: &[DependencyStatus]) -> bool {
    deps.iter().all(|d| !d.required || d.available)
}
