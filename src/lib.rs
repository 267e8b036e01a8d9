//! **swayhop** — a visibility-aware workspace switcher for i3 and Sway.
//!
//! Given a workspace name, swayhop asks the window manager for its current
//! workspace list over the IPC socket, works out where that workspace lives
//! relative to the focused one, and sends back the single command chain that
//! brings it to the output you are looking at:
//!
//! * the workspace does not exist yet → create it here,
//! * it exists on another output but is hidden → pull it over and focus it,
//! * it is visible on another output → swap the two workspaces and focus it.
//!
//! # Architecture
//!
//! The pipeline is one straight line, each stage a module:
//!
//! * [`transport`] — the `i3-ipc` length-prefixed framing over a Unix socket.
//! * [`tokens`] — a flat, parent-linked JSON tokenizer over the raw reply
//!   buffer; no tree is ever built and no field text is copied.
//! * [`nav`] — subtree skipping over the token array, so the planner can hop
//!   between sibling workspace records without descending into geometry.
//! * [`planner`] — classifies the wanted workspace against the focused one
//!   and produces a [`planner::SwitchDecision`].
//! * [`render`] — formats the decision into the manager's command grammar.
//! * [`client`] — the session object that runs the pipeline end to end.
//!
//! [`config`] supplies the optional configuration file read by the binary.

pub mod client;
pub mod config;
pub mod nav;
pub mod planner;
pub mod render;
pub mod tokens;
pub mod transport;
