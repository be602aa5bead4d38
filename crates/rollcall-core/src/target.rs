// crates/rollcall-core/src/target.rs - Who a command affects
//
// A Target is built per command invocation from parsed input and resolved
// fresh against the current roster on every execution; nothing is cached
// across commands. It also owns all user-facing result phrasing, so the
// command layer only ever supplies success/skip counts.

use thiserror::Error;

use crate::field::{AssignmentName, PersonName, TuitionClass};
use crate::roster::Roster;

/// Errors raised when a target matches no students
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no student named '{0}' found")]
    UnknownStudent(String),

    #[error("no students found in class '{0}'")]
    EmptyClass(String),

    #[error("no students hold assignment '{0}'")]
    UnknownAssignment(String),

    #[error("index {index} is out of range ({shown} student(s) shown)")]
    IndexOutOfRange { index: usize, shown: usize },
}

/// The operation a result message describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOp {
    Assign,
    Unassign,
    Mark,
    Unmark,
    Label,
    Unlabel,
    View,
    Delete,
}

impl TargetOp {
    /// "already satisfied" phrasing used for skip notes and the
    /// all-skipped failure. `subject` is the assignment or label text.
    fn already(self, subject: &str) -> String {
        match self {
            TargetOp::Assign => format!("already has '{subject}'"),
            TargetOp::Unassign => format!("does not have '{subject}'"),
            TargetOp::Mark => format!("already has '{subject}' marked done"),
            TargetOp::Unmark => format!("already has '{subject}' unmarked"),
            TargetOp::Label => format!("already carries the label '{subject}'"),
            TargetOp::Unlabel => "has no label".to_string(),
            TargetOp::View => "is already shown".to_string(),
            TargetOp::Delete => "is already gone".to_string(),
        }
    }
}

/// Which student(s) a command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Exactly one student by name.
    ByName(PersonName),
    /// Every student in a class; must resolve to at least one.
    ByClass(TuitionClass),
    /// Every student holding an assignment; must resolve to at least one.
    ByAssignment(AssignmentName),
}

impl Target {
    /// Single-student targets have no skip path: a per-student conflict is
    /// promoted directly to a command failure.
    pub fn is_single(&self) -> bool {
        matches!(self, Target::ByName(_))
    }

    /// Resolve against the current roster to the affected student names.
    pub fn resolve(&self, roster: &Roster) -> Result<Vec<PersonName>, ResolveError> {
        match self {
            Target::ByName(name) => match roster.get(name) {
                Some(student) => Ok(vec![student.name().clone()]),
                None => Err(ResolveError::UnknownStudent(name.to_string())),
            },
            Target::ByClass(class) => {
                let names = roster.in_class(class);
                if names.is_empty() {
                    return Err(ResolveError::EmptyClass(class.to_string()));
                }
                Ok(names)
            }
            Target::ByAssignment(assignment) => {
                let names = roster.holding(assignment);
                if names.is_empty() {
                    return Err(ResolveError::UnknownAssignment(assignment.to_string()));
                }
                Ok(names)
            }
        }
    }

    fn scope(&self) -> String {
        match self {
            Target::ByName(name) => name.to_string(),
            Target::ByClass(class) => format!("class {class}"),
            Target::ByAssignment(assignment) => format!("holders of '{assignment}'"),
        }
    }

    /// Success message for an operation over this target. `subject` is the
    /// assignment or label text (empty for unlabel/view/delete); `done` and
    /// `skipped` are the bulk accounting counts.
    pub fn report(&self, op: TargetOp, subject: &str, done: usize, skipped: usize) -> String {
        match self {
            Target::ByName(name) => match op {
                TargetOp::Assign => format!("Assigned '{subject}' to {name}"),
                TargetOp::Unassign => format!("Unassigned '{subject}' from {name}"),
                TargetOp::Mark => format!("Marked '{subject}' as done for {name}"),
                TargetOp::Unmark => format!("Marked '{subject}' as not done for {name}"),
                TargetOp::Label => format!("Labelled {name} as '{subject}'"),
                TargetOp::Unlabel => format!("Removed label from {name}"),
                TargetOp::View => format!("Viewing {name}"),
                TargetOp::Delete => format!("Deleted student: {name}"),
            },
            Target::ByClass(_) | Target::ByAssignment(_) => {
                let action = match op {
                    TargetOp::Assign => format!("Assigned '{subject}' to"),
                    TargetOp::Unassign => format!("Unassigned '{subject}' from"),
                    TargetOp::Mark => format!("Marked '{subject}' as done for"),
                    TargetOp::Unmark => format!("Marked '{subject}' as not done for"),
                    TargetOp::Label => format!("Labelled with '{subject}'"),
                    TargetOp::Unlabel => "Removed label from".to_string(),
                    TargetOp::View => "Viewing".to_string(),
                    TargetOp::Delete => "Deleted".to_string(),
                };
                if skipped > 0 {
                    format!(
                        "{} {}: {} updated, {} skipped ({})",
                        action,
                        self.scope(),
                        done,
                        skipped,
                        op.already(subject)
                    )
                } else {
                    format!("{} {}: {} updated", action, self.scope(), done)
                }
            }
        }
    }

    /// Failure message when every resolved student was skipped.
    pub fn all_skipped(&self, op: TargetOp, subject: &str) -> String {
        format!(
            "nothing to update: every student in {} {}",
            self.scope(),
            op.already(subject)
        )
    }
}
