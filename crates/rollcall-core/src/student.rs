// crates/rollcall-core/src/student.rs - Immutable student and assignment values
//
// A Student is never mutated in place. Every change produces a new Student
// value or a ConflictError describing why the desired state already holds
// (or cannot hold). The caller replaces the old entry in the Roster.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{AssignmentName, Email, Label, PersonName, Phone, Tag, TuitionClass};

/// Recoverable per-student conditions: the target state already holds the
/// desired property, or lacks the property being removed. Counted as skips
/// in bulk operations, promoted to command failures for single targets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    #[error("{student} already has assignment '{assignment}'")]
    DuplicateAssignment { student: String, assignment: String },

    #[error("{student} does not have assignment '{assignment}'")]
    MissingAssignment { student: String, assignment: String },

    #[error("'{assignment}' is already marked done for {student}")]
    AlreadyMarked { student: String, assignment: String },

    #[error("'{assignment}' is not marked done for {student}")]
    NotMarked { student: String, assignment: String },

    #[error("{student} already carries the label '{label}'")]
    AlreadyLabelled { student: String, label: String },

    #[error("{student} has no label to remove")]
    NoLabel { student: String },

    #[error("a student named '{0}' already exists")]
    DuplicateStudent(String),
}

/// Result type for per-student mutations
pub type ConflictResult<T> = Result<T, ConflictError>;

/// An assignment given to a student: a validated name plus a completion
/// flag. Identity (equality, set membership) is by name only; two
/// assignments with the same name but different completion state are the
/// same entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    name: AssignmentName,
    #[serde(default)]
    done: bool,
}

impl Assignment {
    /// A fresh, not-yet-done assignment.
    pub fn new(name: AssignmentName) -> Self {
        Self { name, done: false }
    }

    pub fn name(&self) -> &AssignmentName {
        &self.name
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Assignment {}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, if self.done { "done" } else { " " })
    }
}

/// An immutable student record. Roster identity is the name,
/// case-insensitively; full equality compares every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    name: PersonName,
    phone: Phone,
    email: Email,
    class: TuitionClass,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    assignments: Vec<Assignment>,
    #[serde(default)]
    label: Option<Label>,
}

impl Student {
    pub fn new(
        name: PersonName,
        phone: Phone,
        email: Email,
        class: TuitionClass,
        tags: Vec<Tag>,
    ) -> Self {
        let mut unique_tags: Vec<Tag> = Vec::new();
        for tag in tags {
            if !unique_tags.contains(&tag) {
                unique_tags.push(tag);
            }
        }
        Self {
            name,
            phone,
            email,
            class,
            tags: unique_tags,
            assignments: Vec::new(),
            label: None,
        }
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn class(&self) -> &TuitionClass {
        &self.class
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn is_named(&self, name: &PersonName) -> bool {
        &self.name == name
    }

    pub fn is_in_class(&self, class: &TuitionClass) -> bool {
        &self.class == class
    }

    pub fn has_assignment(&self, name: &AssignmentName) -> bool {
        self.assignment(name).is_some()
    }

    fn assignment(&self, name: &AssignmentName) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.name() == name)
    }

    /// Add an assignment. Rejected when an assignment with the same name is
    /// already held, regardless of its completion state.
    pub fn with_assignment(&self, assignment: Assignment) -> ConflictResult<Student> {
        if self.has_assignment(assignment.name()) {
            return Err(ConflictError::DuplicateAssignment {
                student: self.name.to_string(),
                assignment: assignment.name().to_string(),
            });
        }
        let mut updated = self.clone();
        updated.assignments.push(assignment);
        Ok(updated)
    }

    /// Remove the assignment with the given name.
    pub fn without_assignment(&self, name: &AssignmentName) -> ConflictResult<Student> {
        if !self.has_assignment(name) {
            return Err(ConflictError::MissingAssignment {
                student: self.name.to_string(),
                assignment: name.to_string(),
            });
        }
        let mut updated = self.clone();
        updated.assignments.retain(|a| a.name() != name);
        Ok(updated)
    }

    /// Mark the named assignment done.
    pub fn with_marked(&self, name: &AssignmentName) -> ConflictResult<Student> {
        self.with_completion(name, true)
    }

    /// Mark the named assignment not done.
    pub fn with_unmarked(&self, name: &AssignmentName) -> ConflictResult<Student> {
        self.with_completion(name, false)
    }

    fn with_completion(&self, name: &AssignmentName, done: bool) -> ConflictResult<Student> {
        let held = self
            .assignment(name)
            .ok_or_else(|| ConflictError::MissingAssignment {
                student: self.name.to_string(),
                assignment: name.to_string(),
            })?;
        if held.is_done() == done {
            return Err(if done {
                ConflictError::AlreadyMarked {
                    student: self.name.to_string(),
                    assignment: name.to_string(),
                }
            } else {
                ConflictError::NotMarked {
                    student: self.name.to_string(),
                    assignment: name.to_string(),
                }
            });
        }
        let mut updated = self.clone();
        for assignment in &mut updated.assignments {
            if assignment.name() == name {
                assignment.done = done;
            }
        }
        Ok(updated)
    }

    /// Set the label. An existing different label is replaced; setting the
    /// identical label again is a conflict.
    pub fn with_label(&self, label: Label) -> ConflictResult<Student> {
        if self.label.as_ref() == Some(&label) {
            return Err(ConflictError::AlreadyLabelled {
                student: self.name.to_string(),
                label: label.to_string(),
            });
        }
        let mut updated = self.clone();
        updated.label = Some(label);
        Ok(updated)
    }

    /// Remove the label.
    pub fn without_label(&self) -> ConflictResult<Student> {
        if self.label.is_none() {
            return Err(ConflictError::NoLabel {
                student: self.name.to_string(),
            });
        }
        let mut updated = self.clone();
        updated.label = None;
        Ok(updated)
    }

    /// Rebuild with replacement field values, keeping everything not
    /// supplied. Replacing the assignment list produces fresh not-done
    /// entries.
    pub fn edited(
        &self,
        name: Option<PersonName>,
        phone: Option<Phone>,
        email: Option<Email>,
        class: Option<TuitionClass>,
        tags: Option<Vec<Tag>>,
        assignments: Option<Vec<AssignmentName>>,
    ) -> Student {
        let mut updated = self.clone();
        if let Some(name) = name {
            updated.name = name;
        }
        if let Some(phone) = phone {
            updated.phone = phone;
        }
        if let Some(email) = email {
            updated.email = email;
        }
        if let Some(class) = class {
            updated.class = class;
        }
        if let Some(tags) = tags {
            let mut unique: Vec<Tag> = Vec::new();
            for tag in tags {
                if !unique.contains(&tag) {
                    unique.push(tag);
                }
            }
            updated.tags = unique;
        }
        if let Some(assignments) = assignments {
            let mut unique: Vec<Assignment> = Vec::new();
            for name in assignments {
                let assignment = Assignment::new(name);
                if !unique.contains(&assignment) {
                    unique.push(assignment);
                }
            }
            updated.assignments = unique;
        }
        updated
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; Phone: {}; Email: {}; Class: {}",
            self.name, self.phone, self.email, self.class
        )?;
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(Tag::as_str).collect();
            write!(f, "; Tags: {}", tags.join(", "))?;
        }
        if let Some(label) = &self.label {
            write!(f, "; Label: {}", label)?;
        }
        if !self.assignments.is_empty() {
            let assignments: Vec<String> =
                self.assignments.iter().map(Assignment::to_string).collect();
            write!(f, "; Assignments: {}", assignments.join(", "))?;
        }
        Ok(())
    }
}
