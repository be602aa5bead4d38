// crates/rollcall-core/src/roster.rs - In-memory student collection
//
// Ordered collection of students (no duplicate identities) plus a derived
// display filter. Index-based commands address the filtered view; the
// filter resets to "show all" after any mutation unless the command
// installs one itself (find/view).

use crate::field::{AssignmentName, PersonName, TuitionClass};
use crate::student::{ConflictError, ConflictResult, Student};

/// Predicate selecting which students the display layer shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    /// Exactly one student, by identity.
    Name(PersonName),
    /// Students whose name contains any keyword as a whole word,
    /// case-insensitively. Keywords are stored lowercased.
    Keywords(Vec<String>),
}

impl Filter {
    fn matches(&self, student: &Student) -> bool {
        match self {
            Filter::All => true,
            Filter::Name(name) => student.is_named(name),
            Filter::Keywords(keywords) => {
                let name = student.name().as_str().to_lowercase();
                let words: Vec<&str> = name.split_whitespace().collect();
                keywords
                    .iter()
                    .any(|keyword| words.iter().any(|word| word == keyword))
            }
        }
    }
}

/// The in-memory roster of all tracked students
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    students: Vec<Student>,
    filter: Filter,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from loaded storage, rejecting duplicate identities.
    pub fn from_students(students: Vec<Student>) -> ConflictResult<Self> {
        let mut roster = Roster::new();
        for student in students {
            roster.add(student)?;
        }
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// The filtered view, in roster order.
    pub fn visible(&self) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|student| self.filter.matches(student))
            .collect()
    }

    /// Resolve a 1-based index into the filtered view.
    pub fn visible_at(&self, index: usize) -> Option<&Student> {
        if index == 0 {
            return None;
        }
        self.visible().into_iter().nth(index - 1)
    }

    pub fn get(&self, name: &PersonName) -> Option<&Student> {
        self.students.iter().find(|student| student.is_named(name))
    }

    /// Names of all students in the given class, in roster order.
    pub fn in_class(&self, class: &TuitionClass) -> Vec<PersonName> {
        self.students
            .iter()
            .filter(|student| student.is_in_class(class))
            .map(|student| student.name().clone())
            .collect()
    }

    /// Names of all students currently holding the named assignment.
    pub fn holding(&self, assignment: &AssignmentName) -> Vec<PersonName> {
        self.students
            .iter()
            .filter(|student| student.has_assignment(assignment))
            .map(|student| student.name().clone())
            .collect()
    }

    pub fn add(&mut self, student: Student) -> ConflictResult<()> {
        if self.get(student.name()).is_some() {
            return Err(ConflictError::DuplicateStudent(student.name().to_string()));
        }
        self.students.push(student);
        Ok(())
    }

    /// Replace the student identified by `name` with a new value, keeping
    /// roster order. Rejected when the replacement is renamed to an
    /// identity another student already holds. Returns the replacement's
    /// position, or None when `name` is not present.
    pub fn replace(
        &mut self,
        name: &PersonName,
        replacement: Student,
    ) -> ConflictResult<Option<usize>> {
        let Some(position) = self.students.iter().position(|s| s.is_named(name)) else {
            return Ok(None);
        };
        let renamed = !replacement.is_named(name);
        if renamed && self.get(replacement.name()).is_some() {
            return Err(ConflictError::DuplicateStudent(
                replacement.name().to_string(),
            ));
        }
        self.students[position] = replacement;
        Ok(Some(position))
    }

    pub fn remove(&mut self, name: &PersonName) -> Option<Student> {
        let position = self.students.iter().position(|s| s.is_named(name))?;
        Some(self.students.remove(position))
    }

    pub fn clear(&mut self) {
        self.students.clear();
        self.filter = Filter::All;
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn reset_filter(&mut self) {
        self.filter = Filter::All;
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Email, Phone};

    fn student(name: &str, class: &str) -> Student {
        Student::new(
            PersonName::parse(name).unwrap(),
            Phone::parse("91234567").unwrap(),
            Email::parse("s@example.com").unwrap(),
            TuitionClass::parse(class).unwrap(),
            vec![],
        )
    }

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.add(student("John Doe", "4A")).unwrap();
        roster.add(student("Jane Tan", "4A")).unwrap();
        roster.add(student("Wei Ming", "5B")).unwrap();
        roster
    }

    #[test]
    fn identity_is_case_insensitive() {
        let mut roster = roster();
        assert!(roster.get(&PersonName::parse("JOHN DOE").unwrap()).is_some());
        assert!(matches!(
            roster.add(student("john doe", "5B")),
            Err(ConflictError::DuplicateStudent(_))
        ));
    }

    #[test]
    fn class_lookup_is_case_insensitive() {
        let roster = roster();
        let names = roster.in_class(&TuitionClass::parse("4a").unwrap());
        assert_eq!(names.len(), 2);
        assert!(roster.in_class(&TuitionClass::parse("6C").unwrap()).is_empty());
    }

    #[test]
    fn holding_finds_assignment_holders() {
        let mut roster = roster();
        let hw = AssignmentName::parse("HW 1").unwrap();
        let john = PersonName::parse("John Doe").unwrap();
        let updated = roster
            .get(&john)
            .unwrap()
            .with_assignment(crate::student::Assignment::new(hw.clone()))
            .unwrap();
        roster.replace(&john, updated).unwrap();
        assert_eq!(roster.holding(&hw), vec![john]);
    }

    #[test]
    fn keyword_filter_matches_whole_words() {
        let mut roster = roster();
        roster.set_filter(Filter::Keywords(vec!["john".to_string()]));
        assert_eq!(roster.visible().len(), 1);
        // "jo" is not a whole word of any name.
        roster.set_filter(Filter::Keywords(vec!["jo".to_string()]));
        assert!(roster.visible().is_empty());
    }

    #[test]
    fn indexing_addresses_the_filtered_view() {
        let mut roster = roster();
        roster.set_filter(Filter::Keywords(vec!["wei".to_string()]));
        let first = roster.visible_at(1).unwrap();
        assert_eq!(first.name().as_str(), "Wei Ming");
        assert!(roster.visible_at(0).is_none());
        assert!(roster.visible_at(2).is_none());
    }

    #[test]
    fn replace_rejects_renaming_onto_an_existing_identity() {
        let mut roster = roster();
        let john = PersonName::parse("John Doe").unwrap();
        let renamed = roster.get(&john).unwrap().edited(
            Some(PersonName::parse("Jane Tan").unwrap()),
            None,
            None,
            None,
            None,
            None,
        );
        assert!(matches!(
            roster.replace(&john, renamed),
            Err(ConflictError::DuplicateStudent(_))
        ));
    }
}
