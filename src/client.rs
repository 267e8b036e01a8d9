//! The session object that runs the whole switch pipeline.
//!
//! [`SwitchClient`] owns the IPC connection and the effective configuration.
//! One call to [`SwitchClient::switch_to`] performs the entire run: query the
//! workspace list, tokenize the reply, plan the decision, render the command,
//! send it, and check the manager's verdict. The reply buffer, its token
//! array, and the borrowed decision all live inside that one call.

use crate::config::Config;
use crate::nav::skip_subtree;
use crate::planner::{self, PlanError};
use crate::render::{self, RenderError};
use crate::tokens::{self, Kind, ParseError};
use crate::transport::{Connection, MessageType, TransportError};
use log::{debug, info};
use std::path::Path;

/// Anything that can go wrong during a switch. All variants end the run.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("workspace reply: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("manager rejected command: {0}")]
    CommandRejected(String),
}

/// A connected switching session.
pub struct SwitchClient {
    connection: Connection,
    max_command_len: usize,
}

impl SwitchClient {
    /// Connect to the manager's socket at `path`.
    pub fn connect(path: &Path, config: &Config) -> Result<Self, SwitchError> {
        let connection = Connection::connect(path)?;
        Ok(Self {
            connection,
            max_command_len: config.max_command_len,
        })
    }

    /// Switch to the workspace named `wanted`.
    ///
    /// Returns the command string that was sent, mainly so the binary can log
    /// it. Fails if the manager reports any part of the command chain as
    /// unsuccessful.
    pub fn switch_to(&mut self, wanted: &str) -> Result<String, SwitchError> {
        let reply = self
            .connection
            .request(MessageType::GetWorkspaces, b"")?;
        let token_array = tokens::parse(&reply)?;
        debug!(
            "workspace reply: {} bytes, {} tokens",
            reply.len(),
            token_array.len()
        );

        let decision = planner::plan(&reply, &token_array, wanted)?;
        debug!("decision: {:?}", decision);

        let command = render::render(&decision, wanted, self.max_command_len)?;
        info!("sending: {}", command);

        let verdict = self
            .connection
            .request(MessageType::RunCommand, command.as_bytes())?;
        check_command_reply(&verdict)?;
        Ok(command)
    }
}

/// Check the manager's reply to a command: a JSON array with one result
/// object per semicolon-separated part, each carrying a `success` flag and,
/// on failure, an `error` message.
fn check_command_reply(reply: &[u8]) -> Result<(), SwitchError> {
    let token_array = tokens::parse(reply)?;
    if token_array.first().map(|t| t.kind) != Some(Kind::Array) {
        return Err(SwitchError::CommandRejected(
            "malformed command reply".into(),
        ));
    }

    let mut i = 1;
    while i < token_array.len() {
        let result = &token_array[i];
        if result.kind != Kind::Object {
            return Err(SwitchError::CommandRejected(
                "malformed command reply".into(),
            ));
        }
        let end = skip_subtree(&token_array, i);
        let mut success = false;
        let mut error_text: Option<String> = None;
        let mut j = i + 1;
        while j < end {
            let key = &token_array[j];
            if key.kind != Kind::String || key.children != 1 || j + 1 >= end {
                break;
            }
            let value = &token_array[j + 1];
            match key.text(reply) {
                b"success" => success = value.text(reply) == b"true",
                b"error" => {
                    error_text = Some(String::from_utf8_lossy(value.text(reply)).into_owned())
                }
                _ => {}
            }
            j = skip_subtree(&token_array, j + 1);
        }
        if !success {
            return Err(SwitchError::CommandRejected(
                error_text.unwrap_or_else(|| "no error message in reply".into()),
            ));
        }
        i = end;
    }
    Ok(())
}

//  Tests
