// crates/rollcall-core/src/command.rs - Command variants and execution
//
// One variant per user-facing verb. Execution mutates the roster through
// the bulk mutation protocol: per-student conflicts are counted as skips
// for group targets, promoted to command failures for single targets, and
// an all-skipped bulk run fails as a whole. Replacements are computed
// before any is committed, so a failing command leaves the roster as it
// was.

use thiserror::Error;

use crate::field::{AssignmentName, Email, FieldError, Label, PersonName, Phone, Tag, TuitionClass};
use crate::roster::{Filter, Roster};
use crate::student::{Assignment, ConflictError, ConflictResult, Student};
use crate::target::{ResolveError, Target, TargetOp};

/// Errors surfaced to the user by parsing or execution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("no command given")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("{problem}\nUsage: {usage}")]
    Usage {
        problem: String,
        usage: &'static str,
    },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("{0}")]
    AllSkipped(String),

    #[error("internal inconsistency: {0}")]
    Internal(String),
}

/// What a successfully executed command tells the surrounding shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub should_exit: bool,
    pub show_help: bool,
    /// True when the roster changed and should be persisted.
    pub mutated: bool,
}

impl Outcome {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            should_exit: false,
            show_help: false,
            mutated: false,
        }
    }

    fn mutation(message: impl Into<String>) -> Self {
        Self {
            mutated: true,
            ..Self::message(message)
        }
    }

    fn help(message: impl Into<String>) -> Self {
        Self {
            show_help: true,
            ..Self::message(message)
        }
    }

    fn exit() -> Self {
        Self {
            should_exit: true,
            ..Self::message("Exiting")
        }
    }
}

/// Which student a delete addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteRef {
    /// 1-based index into the filtered view.
    Index(usize),
    Name(PersonName),
}

/// Replacement values for an edit; fields left as None are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentEdits {
    pub name: Option<PersonName>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub class: Option<TuitionClass>,
    pub tags: Option<Vec<Tag>>,
    pub assignments: Option<Vec<AssignmentName>>,
}

impl StudentEdits {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.class.is_none()
            && self.tags.is_none()
            && self.assignments.is_none()
    }
}

/// A fully parsed command, ready to execute against a roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { student: Student },
    Edit { index: usize, edits: StudentEdits },
    Delete(DeleteRef),
    Assign { assignment: AssignmentName, target: Target },
    Unassign { assignment: AssignmentName, target: Target },
    Mark { assignment: AssignmentName, name: PersonName },
    Unmark { assignment: AssignmentName, name: PersonName },
    Label { label: Label, name: PersonName },
    Unlabel { target: Target },
    View { name: PersonName },
    Find { keywords: Vec<String> },
    List,
    Clear,
    Help,
    Exit,
}

impl Command {
    pub fn execute(self, roster: &mut Roster) -> Result<Outcome, CommandError> {
        match self {
            Command::Add { student } => {
                let summary = student.to_string();
                roster.add(student)?;
                roster.reset_filter();
                Ok(Outcome::mutation(format!("Added student: {summary}")))
            }
            Command::Edit { index, edits } => execute_edit(roster, index, edits),
            Command::Delete(reference) => execute_delete(roster, reference),
            Command::Assign { assignment, target } => {
                let subject = assignment.to_string();
                run_bulk(roster, &target, TargetOp::Assign, &subject, |student| {
                    student.with_assignment(Assignment::new(assignment.clone()))
                })
            }
            Command::Unassign { assignment, target } => {
                let subject = assignment.to_string();
                run_bulk(roster, &target, TargetOp::Unassign, &subject, |student| {
                    student.without_assignment(&assignment)
                })
            }
            Command::Mark { assignment, name } => {
                let subject = assignment.to_string();
                let target = Target::ByName(name);
                run_bulk(roster, &target, TargetOp::Mark, &subject, |student| {
                    student.with_marked(&assignment)
                })
            }
            Command::Unmark { assignment, name } => {
                let subject = assignment.to_string();
                let target = Target::ByName(name);
                run_bulk(roster, &target, TargetOp::Unmark, &subject, |student| {
                    student.with_unmarked(&assignment)
                })
            }
            Command::Label { label, name } => {
                let subject = label.to_string();
                let target = Target::ByName(name);
                run_bulk(roster, &target, TargetOp::Label, &subject, |student| {
                    student.with_label(label.clone())
                })
            }
            Command::Unlabel { target } => {
                run_bulk(roster, &target, TargetOp::Unlabel, "", |student| {
                    student.without_label()
                })
            }
            Command::View { name } => {
                let target = Target::ByName(name);
                let resolved = target.resolve(roster)?;
                let name = resolved
                    .first()
                    .ok_or_else(|| CommandError::Internal("empty resolution".to_string()))?;
                let summary = roster
                    .get(name)
                    .ok_or_else(|| vanished(name))?
                    .to_string();
                roster.set_filter(Filter::Name(name.clone()));
                Ok(Outcome::message(summary))
            }
            Command::Find { keywords } => {
                roster.set_filter(Filter::Keywords(keywords));
                let count = roster.visible().len();
                Ok(Outcome::message(format!("{count} student(s) found")))
            }
            Command::List => {
                roster.reset_filter();
                if roster.is_empty() {
                    return Ok(Outcome::message("No students in the roster"));
                }
                let mut lines: Vec<String> = roster
                    .students()
                    .iter()
                    .enumerate()
                    .map(|(position, student)| format!("{}. {}", position + 1, student))
                    .collect();
                lines.push(format!("Listed {} student(s)", roster.len()));
                Ok(Outcome::message(lines.join("\n")))
            }
            Command::Clear => {
                roster.clear();
                Ok(Outcome::mutation("Roster cleared"))
            }
            Command::Help => Ok(Outcome::help(crate::parser::help_text())),
            Command::Exit => Ok(Outcome::exit()),
        }
    }
}

fn vanished(name: &PersonName) -> CommandError {
    CommandError::Internal(format!("student '{name}' vanished during execution"))
}

/// The bulk mutation protocol. Resolve the target, attempt the per-student
/// mutation for each match, and commit every replacement only once the
/// whole group has been processed. Conflicts are skips for group targets
/// and command failures for single targets; a run where every student was
/// skipped fails as a whole.
fn run_bulk<F>(
    roster: &mut Roster,
    target: &Target,
    op: TargetOp,
    subject: &str,
    mutate: F,
) -> Result<Outcome, CommandError>
where
    F: Fn(&Student) -> ConflictResult<Student>,
{
    let names = target.resolve(roster)?;
    let mut replacements: Vec<(PersonName, Student)> = Vec::new();
    let mut skipped = 0usize;

    for name in &names {
        let student = roster.get(name).ok_or_else(|| vanished(name))?;
        match mutate(student) {
            Ok(updated) => replacements.push((name.clone(), updated)),
            Err(conflict) if target.is_single() => return Err(conflict.into()),
            Err(conflict) => {
                tracing::debug!(student = %name, %conflict, "skipping");
                skipped += 1;
            }
        }
    }

    if replacements.is_empty() {
        return Err(CommandError::AllSkipped(target.all_skipped(op, subject)));
    }

    let done = replacements.len();
    for (name, updated) in replacements {
        // Identity is unchanged by bulk mutations, so replace cannot
        // legitimately fail here.
        match roster.replace(&name, updated) {
            Ok(Some(_)) => {}
            _ => return Err(vanished(&name)),
        }
    }
    roster.reset_filter();
    Ok(Outcome::mutation(target.report(op, subject, done, skipped)))
}

fn execute_edit(
    roster: &mut Roster,
    index: usize,
    edits: StudentEdits,
) -> Result<Outcome, CommandError> {
    let shown = roster.visible().len();
    let (original_name, edited) = {
        let student = roster
            .visible_at(index)
            .ok_or(ResolveError::IndexOutOfRange { index, shown })?;
        (
            student.name().clone(),
            student.edited(
                edits.name,
                edits.phone,
                edits.email,
                edits.class,
                edits.tags,
                edits.assignments,
            ),
        )
    };
    let summary = edited.to_string();
    match roster.replace(&original_name, edited)? {
        Some(_) => {}
        None => return Err(vanished(&original_name)),
    }
    roster.reset_filter();
    Ok(Outcome::mutation(format!("Edited student: {summary}")))
}

fn execute_delete(roster: &mut Roster, reference: DeleteRef) -> Result<Outcome, CommandError> {
    match reference {
        DeleteRef::Index(index) => {
            let shown = roster.visible().len();
            let name = roster
                .visible_at(index)
                .map(|student| student.name().clone())
                .ok_or(ResolveError::IndexOutOfRange { index, shown })?;
            roster.remove(&name).ok_or_else(|| vanished(&name))?;
            roster.reset_filter();
            Ok(Outcome::mutation(format!("Deleted student: {name}")))
        }
        DeleteRef::Name(name) => {
            let target = Target::ByName(name);
            let resolved = target.resolve(roster)?;
            let name = resolved
                .first()
                .ok_or_else(|| CommandError::Internal("empty resolution".to_string()))?;
            roster.remove(name).ok_or_else(|| vanished(name))?;
            roster.reset_filter();
            Ok(Outcome::mutation(target.report(TargetOp::Delete, "", 1, 0)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, class: &str) -> Student {
        Student::new(
            PersonName::parse(name).unwrap(),
            Phone::parse("91234567").unwrap(),
            Email::parse("s@example.com").unwrap(),
            TuitionClass::parse(class).unwrap(),
            vec![],
        )
    }

    fn hw(name: &str) -> AssignmentName {
        AssignmentName::parse(name).unwrap()
    }

    fn person(name: &str) -> PersonName {
        PersonName::parse(name).unwrap()
    }

    /// A class of three where two already hold "HW 1".
    fn class_of_three() -> Roster {
        let mut roster = Roster::new();
        roster.add(student("Alpha", "4A")).unwrap();
        roster.add(student("Beta", "4A")).unwrap();
        roster.add(student("Gamma", "4A")).unwrap();
        for name in ["Alpha", "Beta"] {
            let who = person(name);
            let updated = roster
                .get(&who)
                .unwrap()
                .with_assignment(Assignment::new(hw("HW 1")))
                .unwrap();
            roster.replace(&who, updated).unwrap();
        }
        roster
    }

    #[test]
    fn bulk_assign_counts_skips_and_mutates_only_the_rest() {
        let mut roster = class_of_three();
        let outcome = Command::Assign {
            assignment: hw("HW 1"),
            target: Target::ByClass(TuitionClass::parse("4A").unwrap()),
        }
        .execute(&mut roster)
        .unwrap();

        assert!(outcome.mutated);
        assert!(outcome.message.contains("1 updated"));
        assert!(outcome.message.contains("2 skipped"));
        // Exactly one new assignment was added.
        assert_eq!(roster.holding(&hw("HW 1")).len(), 3);
        assert!(roster.get(&person("Gamma")).unwrap().has_assignment(&hw("HW 1")));
    }

    #[test]
    fn bulk_assign_fails_whole_when_everyone_already_holds_it() {
        let mut roster = class_of_three();
        // Give Gamma the assignment too.
        let gamma = person("Gamma");
        let updated = roster
            .get(&gamma)
            .unwrap()
            .with_assignment(Assignment::new(hw("HW 1")))
            .unwrap();
        roster.replace(&gamma, updated).unwrap();

        let before = roster.clone();
        let err = Command::Assign {
            assignment: hw("HW 1"),
            target: Target::ByClass(TuitionClass::parse("4A").unwrap()),
        }
        .execute(&mut roster)
        .unwrap_err();

        assert!(matches!(err, CommandError::AllSkipped(_)));
        // Not just "0 successes reported": the roster is fully unchanged.
        assert_eq!(roster, before);
    }

    #[test]
    fn single_target_conflict_is_promoted_not_skipped() {
        let mut roster = class_of_three();
        let err = Command::Assign {
            assignment: hw("HW 1"),
            target: Target::ByName(person("Alpha")),
        }
        .execute(&mut roster)
        .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Conflict(ConflictError::DuplicateAssignment { .. })
        ));
    }

    #[test]
    fn mark_on_missing_assignment_fails_not_skips() {
        let mut roster = class_of_three();
        let before = roster.clone();
        let err = Command::Mark {
            assignment: hw("HW 9"),
            name: person("Alpha"),
        }
        .execute(&mut roster)
        .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Conflict(ConflictError::MissingAssignment { .. })
        ));
        assert_eq!(roster, before);
    }

    #[test]
    fn unassign_by_assignment_retires_it_from_all_holders() {
        let mut roster = class_of_three();
        let outcome = Command::Unassign {
            assignment: hw("HW 1"),
            target: Target::ByAssignment(hw("HW 1")),
        }
        .execute(&mut roster)
        .unwrap();
        assert!(outcome.message.contains("2 updated"));
        assert!(roster.holding(&hw("HW 1")).is_empty());
    }

    #[test]
    fn bulk_unlabel_skips_unlabelled_students() {
        let mut roster = class_of_three();
        let alpha = person("Alpha");
        let labelled = roster
            .get(&alpha)
            .unwrap()
            .with_label(Label::parse("ahead").unwrap())
            .unwrap();
        roster.replace(&alpha, labelled).unwrap();

        let outcome = Command::Unlabel {
            target: Target::ByClass(TuitionClass::parse("4A").unwrap()),
        }
        .execute(&mut roster)
        .unwrap();
        assert!(outcome.message.contains("1 updated"));
        assert!(outcome.message.contains("2 skipped"));
        assert!(roster.get(&alpha).unwrap().label().is_none());
    }

    #[test]
    fn resolution_failure_leaves_roster_unchanged() {
        let mut roster = class_of_three();
        let before = roster.clone();
        let err = Command::Assign {
            assignment: hw("HW 1"),
            target: Target::ByClass(TuitionClass::parse("6C").unwrap()),
        }
        .execute(&mut roster)
        .unwrap_err();
        assert!(matches!(err, CommandError::Resolve(ResolveError::EmptyClass(_))));
        assert_eq!(roster, before);
    }

    #[test]
    fn mutation_resets_the_filter() {
        let mut roster = class_of_three();
        roster.set_filter(Filter::Keywords(vec!["alpha".to_string()]));
        Command::Assign {
            assignment: hw("HW 2"),
            target: Target::ByName(person("Beta")),
        }
        .execute(&mut roster)
        .unwrap();
        assert_eq!(roster.visible().len(), 3);
    }

    #[test]
    fn view_installs_a_single_student_filter() {
        let mut roster = class_of_three();
        let outcome = Command::View {
            name: person("beta"),
        }
        .execute(&mut roster)
        .unwrap();
        assert!(!outcome.mutated);
        assert!(outcome.message.contains("Beta"));
        assert_eq!(roster.visible().len(), 1);
    }

    #[test]
    fn delete_by_index_addresses_the_filtered_view() {
        let mut roster = class_of_three();
        roster.set_filter(Filter::Keywords(vec!["gamma".to_string()]));
        let outcome = Command::Delete(DeleteRef::Index(1)).execute(&mut roster).unwrap();
        assert_eq!(outcome.message, "Deleted student: Gamma");
        assert_eq!(roster.len(), 2);

        let err = Command::Delete(DeleteRef::Index(5)).execute(&mut roster).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Resolve(ResolveError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn add_duplicate_identity_is_rejected() {
        let mut roster = class_of_three();
        let before = roster.clone();
        let err = Command::Add {
            student: student("ALPHA", "5B"),
        }
        .execute(&mut roster)
        .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Conflict(ConflictError::DuplicateStudent(_))
        ));
        assert_eq!(roster, before);
    }

    #[test]
    fn help_and_exit_set_their_outcome_flags() {
        let mut roster = Roster::new();
        let help = Command::Help.execute(&mut roster).unwrap();
        assert!(help.show_help);
        assert!(!help.mutated);
        assert!(help.message.contains("assign"));

        let exit = Command::Exit.execute(&mut roster).unwrap();
        assert!(exit.should_exit);
        assert_eq!(exit.message, "Exiting");
    }

    #[test]
    fn edit_renames_and_rejects_identity_collisions() {
        let mut roster = class_of_three();
        let outcome = Command::Edit {
            index: 1,
            edits: StudentEdits {
                name: Some(person("Delta")),
                ..StudentEdits::default()
            },
        }
        .execute(&mut roster)
        .unwrap();
        assert!(outcome.message.contains("Delta"));
        assert!(roster.get(&person("Delta")).is_some());

        let err = Command::Edit {
            index: 1,
            edits: StudentEdits {
                name: Some(person("Beta")),
                ..StudentEdits::default()
            },
        }
        .execute(&mut roster)
        .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Conflict(ConflictError::DuplicateStudent(_))
        ));
    }
}
