//! Decides what the manager must do to show the wanted workspace.
//!
//! The workspace query returns one object per workspace. Exactly one of them
//! is both `focused` and `visible` — the workspace the user is looking at on
//! the output the pointer lives on. The planner walks the reply once,
//! collects that **current** workspace plus the **wanted** one (if it
//! exists), and classifies the relationship into a [`SwitchDecision`]:
//!
//! | wanted workspace…               | decision                       |
//! |---------------------------------|--------------------------------|
//! | does not exist                  | [`SwitchDecision::Create`]     |
//! | exists, hidden on some output   | [`SwitchDecision::Pull`]       |
//! | visible on another output       | [`SwitchDecision::Swap`]       |
//! | is the current workspace itself | `Swap` with equal outputs      |
//!
//! The walk never descends into a workspace's nested containers (`rect` and
//! friends) — [`skip_subtree`] hops over them — and it stops as soon as both
//! the current and the wanted workspace are known. Whether a current
//! workspace is missing can only be decided at the end of the array, so that
//! check runs strictly after the loop; a *second* focused-and-visible
//! workspace is a manager-invariant violation and fails immediately when
//! seen.
//!
//! All names in the decision are `&str` slices into the reply buffer — the
//! decision must be rendered before the buffer is dropped, and the borrow
//! checker holds us to it.

use crate::nav::skip_subtree;
use crate::tokens::{Kind, Token};
use log::debug;

/// What the manager must be told, derived from one workspace reply.
///
/// Borrows all names from the reply buffer it was planned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchDecision<'a> {
    /// The wanted workspace does not exist; a bare `workspace` command makes
    /// the manager create it on the current output.
    Create,
    /// The wanted workspace exists but is not shown anywhere: move it to the
    /// current output, then focus it.
    Pull { current_output: &'a str },
    /// The wanted workspace is visible on `wanted_output`: move it to the
    /// current output, move the displaced current workspace the other way,
    /// then focus. When `wanted_output == current_output` the moves are
    /// no-ops and only the focus matters.
    Swap {
        current_output: &'a str,
        current_workspace: &'a str,
        wanted_output: &'a str,
    },
}

/// Planning failures. Each one means the reply violated the shape or the
/// invariants the manager guarantees, so all are fatal.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("reply is not a workspace array")]
    NotAnArray,
    #[error("workspace entry at byte {0} is not an object")]
    NotAnObject(usize),
    #[error("workspace field at byte {0} has an unexpected type")]
    FieldType(usize),
    #[error("workspace field is not valid UTF-8: {0}")]
    FieldEncoding(#[from] std::str::Utf8Error),
    #[error("workspace record is missing name or output")]
    IncompleteRecord,
    #[error("more than one focused and visible workspace")]
    DoubleFocus,
    #[error("no focused/visible current workspace found")]
    NoCurrentWorkspace,
}

/// The fields of one workspace object, collected while scanning its direct
/// children. Discarded as soon as the object is classified.
#[derive(Debug, Default)]
struct WorkspaceRecord<'a> {
    name: Option<&'a str>,
    output: Option<&'a str>,
    focused: bool,
    visible: bool,
}

/// Walk the workspace reply and derive the [`SwitchDecision`] for `wanted`.
pub fn plan<'a>(
    buf: &'a [u8],
    tokens: &[Token],
    wanted: &str,
) -> Result<SwitchDecision<'a>, PlanError> {
    let root = tokens.first().ok_or(PlanError::NotAnArray)?;
    if root.kind != Kind::Array {
        return Err(PlanError::NotAnArray);
    }

    // (name, output) of the focused+visible workspace.
    let mut current: Option<(&'a str, &'a str)> = None;
    // (output, visible) of the wanted workspace.
    let mut found: Option<(&'a str, bool)> = None;

    let mut i = 1;
    while i < tokens.len() {
        if tokens[i].kind != Kind::Object {
            return Err(PlanError::NotAnObject(tokens[i].start));
        }
        let record = scan_workspace(buf, tokens, i)?;

        if record.focused && record.visible {
            if current.is_some() {
                return Err(PlanError::DoubleFocus);
            }
            let name = record.name.ok_or(PlanError::IncompleteRecord)?;
            let output = record.output.ok_or(PlanError::IncompleteRecord)?;
            debug!("current workspace {:?} on {:?}", name, output);
            current = Some((name, output));
            if name == wanted {
                // The wanted workspace is the one already focused — visible,
                // on the current output.
                found = Some((output, true));
            }
        } else if record.name == Some(wanted) {
            let output = record.output.ok_or(PlanError::IncompleteRecord)?;
            debug!("wanted workspace on {:?}, visible: {}", output, record.visible);
            found = Some((output, record.visible));
        }

        // Nothing after this point can change the decision; the missing-
        // current check below must still only fire at end-of-array.
        if current.is_some() && found.is_some() {
            break;
        }
        i = skip_subtree(tokens, i);
    }

    let (current_workspace, current_output) = current.ok_or(PlanError::NoCurrentWorkspace)?;

    Ok(match found {
        None => SwitchDecision::Create,
        Some((_, false)) => SwitchDecision::Pull { current_output },
        Some((wanted_output, true)) => SwitchDecision::Swap {
            current_output,
            current_workspace,
            wanted_output,
        },
    })
}

/// Collect `name`, `output`, `focused`, `visible` from the direct key/value
/// pairs of the workspace object at `obj`, hopping over nested containers.
fn scan_workspace<'a>(
    buf: &'a [u8],
    tokens: &[Token],
    obj: usize,
) -> Result<WorkspaceRecord<'a>, PlanError> {
    let mut record = WorkspaceRecord::default();
    let end = skip_subtree(tokens, obj);

    let mut i = obj + 1;
    while i < end {
        let key = &tokens[i];
        // Direct keys have the object as parent and exactly one value.
        debug_assert_eq!(key.parent, Some(obj));
        if key.kind != Kind::String || key.children != 1 || i + 1 >= end {
            return Err(PlanError::FieldType(key.start));
        }
        let value = &tokens[i + 1];
        match key.text(buf) {
            b"name" => record.name = Some(string_value(buf, value)?),
            b"output" => record.output = Some(string_value(buf, value)?),
            b"focused" => record.focused = bool_value(buf, value)?,
            b"visible" => record.visible = bool_value(buf, value)?,
            _ => {}
        }
        // Past the value's whole subtree, onto the next key.
        i = skip_subtree(tokens, i + 1);
    }
    Ok(record)
}

fn string_value<'a>(buf: &'a [u8], token: &Token) -> Result<&'a str, PlanError> {
    if token.kind != Kind::String {
        return Err(PlanError::FieldType(token.start));
    }
    Ok(std::str::from_utf8(token.text(buf))?)
}

fn bool_value(buf: &[u8], token: &Token) -> Result<bool, PlanError> {
    if token.kind != Kind::Primitive {
        return Err(PlanError::FieldType(token.start));
    }
    Ok(token.text(buf) == b"true")
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::parse;

    fn plan_str<'a>(buf: &'a [u8], wanted: &str) -> Result<SwitchDecision<'a>, PlanError> {
        let tokens = parse(buf).unwrap();
        plan(buf, &tokens, wanted)
    }

    /// Fixture: "1" focused+visible on A; "2" visible on B; nothing else.
    /// Nested rects make sure the planner actually skips subtrees.
    const THREE_WS: &[u8] = br#"[
        {"num": 1, "name": "1", "visible": true, "focused": true,
         "rect": {"x": 0, "y": 0, "width": 2560, "height": 1440},
         "output": "A", "urgent": false},
        {"num": 2, "name": "2", "visible": true, "focused": false,
         "rect": {"x": 2560, "y": 0, "width": 1920, "height": 1080},
         "output": "B", "urgent": false}
    ]"#;

    #[test]
    fn missing_workspace_is_created() {
        assert_eq!(plan_str(THREE_WS, "3").unwrap(), SwitchDecision::Create);
    }

    #[test]
    fn visible_workspace_is_swapped() {
        assert_eq!(
            plan_str(THREE_WS, "2").unwrap(),
            SwitchDecision::Swap {
                current_output: "A",
                current_workspace: "1",
                wanted_output: "B",
            }
        );
    }

    #[test]
    fn current_workspace_degenerates_to_same_output_swap() {
        assert_eq!(
            plan_str(THREE_WS, "1").unwrap(),
            SwitchDecision::Swap {
                current_output: "A",
                current_workspace: "1",
                wanted_output: "A",
            }
        );
    }

    #[test]
    fn hidden_workspace_is_pulled() {
        let buf = br#"[
            {"name": "1", "visible": true, "focused": true, "output": "A"},
            {"name": "mail", "visible": false, "focused": false, "output": "B"}
        ]"#;
        assert_eq!(
            plan_str(buf, "mail").unwrap(),
            SwitchDecision::Pull { current_output: "A" }
        );
    }

    #[test]
    fn unrelated_workspaces_are_ignored() {
        // An extra record that is neither current nor wanted must not change
        // the outcome, whatever its flags say.
        let buf = br#"[
            {"name": "scratch", "visible": false, "focused": false, "output": "B"},
            {"name": "1", "visible": true, "focused": true, "output": "A"},
            {"name": "2", "visible": true, "focused": false, "output": "B"}
        ]"#;
        assert_eq!(
            plan_str(buf, "2").unwrap(),
            SwitchDecision::Swap {
                current_output: "A",
                current_workspace: "1",
                wanted_output: "B",
            }
        );
    }

    #[test]
    fn wanted_before_current_is_still_found() {
        let buf = br#"[
            {"name": "web", "visible": false, "focused": false, "output": "B"},
            {"name": "1", "visible": true, "focused": true, "output": "A"}
        ]"#;
        assert_eq!(
            plan_str(buf, "web").unwrap(),
            SwitchDecision::Pull { current_output: "A" }
        );
    }

    #[test]
    fn no_current_workspace_is_fatal() {
        let buf = br#"[
            {"name": "1", "visible": true, "focused": false, "output": "A"},
            {"name": "2", "visible": false, "focused": false, "output": "B"}
        ]"#;
        assert!(matches!(
            plan_str(buf, "2"),
            Err(PlanError::NoCurrentWorkspace)
        ));
    }

    #[test]
    fn empty_reply_has_no_current_workspace() {
        assert!(matches!(
            plan_str(b"[]", "1"),
            Err(PlanError::NoCurrentWorkspace)
        ));
    }

    #[test]
    fn two_focused_visible_workspaces_are_fatal() {
        let buf = br#"[
            {"name": "1", "visible": true, "focused": true, "output": "A"},
            {"name": "2", "visible": true, "focused": true, "output": "B"}
        ]"#;
        // Wanted is absent, so the scan reaches the second record.
        assert!(matches!(plan_str(buf, "9"), Err(PlanError::DoubleFocus)));
    }

    #[test]
    fn focused_but_not_visible_is_not_current() {
        // focused alone is not enough; both flags are required.
        let buf = br#"[
            {"name": "1", "visible": false, "focused": true, "output": "A"}
        ]"#;
        assert!(matches!(
            plan_str(buf, "1"),
            Err(PlanError::NoCurrentWorkspace)
        ));
    }

    #[test]
    fn current_without_name_is_fatal() {
        let buf = br#"[{"visible": true, "focused": true, "output": "A"}]"#;
        assert!(matches!(
            plan_str(buf, "1"),
            Err(PlanError::IncompleteRecord)
        ));
    }

    #[test]
    fn non_array_reply_is_rejected() {
        assert!(matches!(
            plan_str(br#"{"name": "1"}"#, "1"),
            Err(PlanError::NotAnArray)
        ));
    }

    #[test]
    fn non_object_entry_is_rejected() {
        assert!(matches!(
            plan_str(b"[1, 2]", "1"),
            Err(PlanError::NotAnObject(1))
        ));
    }

    #[test]
    fn string_typed_flag_is_rejected() {
        let buf = br#"[{"name": "1", "visible": "yes", "focused": true, "output": "A"}]"#;
        assert!(matches!(plan_str(buf, "1"), Err(PlanError::FieldType(_))));
    }
}
