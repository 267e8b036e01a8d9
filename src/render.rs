//! Renders a [`SwitchDecision`] into the manager's command grammar.
//!
//! The output is a single semicolon-joined command string; the manager
//! executes the parts in order. Criteria selectors (`[workspace="…"]`) aim
//! the move commands at workspaces that are not focused.

use crate::planner::SwitchDecision;

/// Default command-length cap, from the manager's own comfortable limit for
/// a single command line. Overridable through the config file.
pub const DEFAULT_MAX_COMMAND_LEN: usize = 512;

/// The rendered command would exceed the cap.
///
/// There is deliberately no truncation path: a truncated window-manager
/// command could still parse and execute a different, unintended action.
#[derive(Debug, thiserror::Error)]
#[error("rendered command is {len} bytes, exceeds maximum {max}")]
pub struct RenderError {
    pub len: usize,
    pub max: usize,
}

/// Format the command chain for `decision`, enforcing `max_len`.
pub fn render(
    decision: &SwitchDecision<'_>,
    wanted: &str,
    max_len: usize,
) -> Result<String, RenderError> {
    let command = match decision {
        SwitchDecision::Create => format!("workspace {wanted}"),
        SwitchDecision::Pull { current_output } => format!(
            "[workspace=\"{wanted}\"] move workspace to output {current_output}; \
             workspace {wanted}"
        ),
        SwitchDecision::Swap {
            current_output,
            current_workspace,
            wanted_output,
        } => format!(
            "[workspace=\"{wanted}\"] move workspace to output {current_output}; \
             [workspace=\"{current_workspace}\"] move workspace to output {wanted_output}; \
             workspace {wanted}"
        ),
    };
    if command.len() > max_len {
        return Err(RenderError {
            len: command.len(),
            max: max_len,
        });
    }
    Ok(command)
}

//  Tests
