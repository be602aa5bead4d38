// crates/rollcall-core/src/lib.rs - Core library for the rollcall roster manager
//
// Raw command text flows through this crate in one direction:
// dispatcher -> per-verb parser (tokenizer + field validators) -> Command ->
// execute(&mut Roster) -> Target resolution -> per-student mutation with
// success/skip accounting -> aggregated result message.

pub mod command;
pub mod config;
pub mod field;
pub mod parser;
pub mod roster;
pub mod student;
pub mod target;
pub mod tokenizer;

pub use command::{Command, CommandError, DeleteRef, Outcome, StudentEdits};
pub use config::{ConfigError, RollcallConfig};
pub use field::{
    AssignmentName, Email, FieldError, Label, PersonName, Phone, Tag, TuitionClass,
};
pub use parser::interpret_and_execute;
pub use roster::{Filter, Roster};
pub use student::{Assignment, ConflictError, Student};
pub use target::{ResolveError, Target, TargetOp};
