// crates/rollcall-core/src/parser.rs - Command dispatcher and per-verb grammars
//
// Turns one raw line into a typed Command. The dispatcher trims the line,
// lower-cases the command word, and hands the untouched argument text to
// that verb's own parser. Every verb runs its structural checks (required
// markers, mutually-exclusive markers, preamble, duplicates - in that
// order) before any semantic field validation, so usage-format errors are
// always reported ahead of field-constraint errors, and the first
// structural problem found is the one reported.

use crate::command::{Command, CommandError, DeleteRef, Outcome, StudentEdits};
use crate::field::{AssignmentName, Email, Label, PersonName, Phone, Tag, TuitionClass};
use crate::roster::Roster;
use crate::student::Student;
use crate::target::Target;
use crate::tokenizer::{Marker, TokenMap, tokenize};

pub const USAGE_ADD: &str = "add n=NAME p=PHONE e=EMAIL c=CLASS [t=TAG]...";
pub const USAGE_EDIT: &str =
    "edit INDEX [n=NAME] [p=PHONE] [e=EMAIL] [c=CLASS] [t=TAG]... [a=ASSIGNMENT]...";
pub const USAGE_DELETE: &str = "delete INDEX | delete n=NAME";
pub const USAGE_ASSIGN: &str = "assign a=ASSIGNMENT (n=NAME | c=CLASS)";
pub const USAGE_UNASSIGN: &str = "unassign a=ASSIGNMENT [n=NAME | c=CLASS]";
pub const USAGE_MARK: &str = "mark a=ASSIGNMENT n=NAME";
pub const USAGE_UNMARK: &str = "unmark a=ASSIGNMENT n=NAME";
pub const USAGE_LABEL: &str = "label l=LABEL n=NAME";
pub const USAGE_UNLABEL: &str = "unlabel (n=NAME | c=CLASS)";
pub const USAGE_VIEW: &str = "view n=NAME";
pub const USAGE_FIND: &str = "find KEYWORD [KEYWORD]...";

/// The text shown by the help command.
pub fn help_text() -> String {
    [
        "Commands:",
        &format!("  {USAGE_ADD}"),
        &format!("  {USAGE_EDIT}"),
        &format!("  {USAGE_DELETE}"),
        &format!("  {USAGE_ASSIGN}"),
        &format!("  {USAGE_UNASSIGN}"),
        &format!("  {USAGE_MARK}"),
        &format!("  {USAGE_UNMARK}"),
        &format!("  {USAGE_LABEL}"),
        &format!("  {USAGE_UNLABEL}"),
        &format!("  {USAGE_VIEW}"),
        &format!("  {USAGE_FIND}"),
        "  list",
        "  clear",
        "  help",
        "  exit",
    ]
    .join("\n")
}

/// The single entry point the surrounding shell calls: interpret one line
/// and execute it against the roster.
pub fn interpret_and_execute(line: &str, roster: &mut Roster) -> Result<Outcome, CommandError> {
    let command = parse(line)?;
    tracing::debug!(?command, "dispatching");
    command.execute(roster)
}

/// Parse one raw line into a Command.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    let (word, args) = match line.find(char::is_whitespace) {
        Some(split) => (&line[..split], line[split..].trim_start()),
        None => (line, ""),
    };
    let verb = word.to_lowercase();
    match verb.as_str() {
        "add" => parse_add(args),
        "edit" => parse_edit(args),
        "delete" => parse_delete(args),
        "assign" => parse_assign(args),
        "unassign" => parse_unassign(args),
        "mark" => parse_mark_or_unmark(args, true),
        "unmark" => parse_mark_or_unmark(args, false),
        "label" => parse_label(args),
        "unlabel" => parse_unlabel(args),
        "view" => parse_view(args),
        "find" => parse_find(args),
        // Trailing tokens are ignored for the argument-less verbs.
        "list" => Ok(Command::List),
        "clear" => Ok(Command::Clear),
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        _ => Err(CommandError::Unknown(verb)),
    }
}

fn usage(problem: impl Into<String>, usage: &'static str) -> CommandError {
    CommandError::Usage {
        problem: problem.into(),
        usage,
    }
}

fn require<'a>(
    tokens: &'a TokenMap,
    marker: Marker,
    usage_text: &'static str,
) -> Result<&'a str, CommandError> {
    tokens
        .value(marker)
        .ok_or_else(|| usage(format!("missing required prefix {marker}"), usage_text))
}

/// Exactly one of `first`/`second` must be present; returns the raw value
/// together with which marker carried it.
fn require_one_of(
    tokens: &TokenMap,
    first: Marker,
    second: Marker,
    usage_text: &'static str,
) -> Result<(Marker, String), CommandError> {
    match (tokens.value(first), tokens.value(second)) {
        (Some(_), Some(_)) => Err(usage(
            format!("conflicting prefixes: supply {first} or {second}, not both"),
            usage_text,
        )),
        (Some(value), None) => Ok((first, value.to_string())),
        (None, Some(value)) => Ok((second, value.to_string())),
        (None, None) => Err(usage(
            format!("one of {first} or {second} is required"),
            usage_text,
        )),
    }
}

fn require_empty_preamble(tokens: &TokenMap, usage_text: &'static str) -> Result<(), CommandError> {
    if tokens.preamble().is_empty() {
        Ok(())
    } else {
        Err(usage(
            format!("unexpected text before the first prefix: '{}'", tokens.preamble()),
            usage_text,
        ))
    }
}

fn forbid_duplicates(
    tokens: &TokenMap,
    markers: &[Marker],
    usage_text: &'static str,
) -> Result<(), CommandError> {
    tokens
        .verify_no_duplicates(markers)
        .map_err(|err| usage(err.to_string(), usage_text))
}

/// Parse a name-or-class pair into a Target. `required` controls whether
/// supplying neither is a usage error (assign) or allowed (unassign, where
/// it means "every holder of the assignment").
fn parse_name_or_class(
    tokens: &TokenMap,
    required: bool,
    usage_text: &'static str,
) -> Result<Option<Target>, CommandError> {
    if !required && !tokens.contains(Marker::Name) && !tokens.contains(Marker::Class) {
        return Ok(None);
    }
    let (marker, raw) = require_one_of(tokens, Marker::Name, Marker::Class, usage_text)?;
    let target = match marker {
        Marker::Name => Target::ByName(PersonName::parse(&raw)?),
        _ => Target::ByClass(TuitionClass::parse(&raw)?),
    };
    Ok(Some(target))
}

fn parse_assign(args: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(args, &[Marker::Assignment, Marker::Name, Marker::Class]);
    let raw_assignment = require(&tokens, Marker::Assignment, USAGE_ASSIGN)?.to_string();
    let _ = require_one_of(&tokens, Marker::Name, Marker::Class, USAGE_ASSIGN)?;
    require_empty_preamble(&tokens, USAGE_ASSIGN)?;
    forbid_duplicates(
        &tokens,
        &[Marker::Assignment, Marker::Name, Marker::Class],
        USAGE_ASSIGN,
    )?;

    let assignment = AssignmentName::parse(&raw_assignment)?;
    let target = parse_name_or_class(&tokens, true, USAGE_ASSIGN)?
        .ok_or_else(|| CommandError::Internal("target parsing".to_string()))?;
    Ok(Command::Assign { assignment, target })
}

fn parse_unassign(args: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(args, &[Marker::Assignment, Marker::Name, Marker::Class]);
    let raw_assignment = require(&tokens, Marker::Assignment, USAGE_UNASSIGN)?.to_string();
    if tokens.contains(Marker::Name) && tokens.contains(Marker::Class) {
        return Err(usage(
            format!(
                "conflicting prefixes: supply {} or {}, not both",
                Marker::Name,
                Marker::Class
            ),
            USAGE_UNASSIGN,
        ));
    }
    require_empty_preamble(&tokens, USAGE_UNASSIGN)?;
    forbid_duplicates(
        &tokens,
        &[Marker::Assignment, Marker::Name, Marker::Class],
        USAGE_UNASSIGN,
    )?;

    let assignment = AssignmentName::parse(&raw_assignment)?;
    // With neither n= nor c=, unassign targets every holder.
    let target = parse_name_or_class(&tokens, false, USAGE_UNASSIGN)?
        .unwrap_or_else(|| Target::ByAssignment(assignment.clone()));
    Ok(Command::Unassign { assignment, target })
}

fn parse_mark_or_unmark(args: &str, mark: bool) -> Result<Command, CommandError> {
    let usage_text = if mark { USAGE_MARK } else { USAGE_UNMARK };
    let tokens = tokenize(args, &[Marker::Assignment, Marker::Name]);
    let raw_assignment = require(&tokens, Marker::Assignment, usage_text)?.to_string();
    let raw_name = require(&tokens, Marker::Name, usage_text)?.to_string();
    require_empty_preamble(&tokens, usage_text)?;
    forbid_duplicates(&tokens, &[Marker::Assignment, Marker::Name], usage_text)?;

    let assignment = AssignmentName::parse(&raw_assignment)?;
    let name = PersonName::parse(&raw_name)?;
    Ok(if mark {
        Command::Mark { assignment, name }
    } else {
        Command::Unmark { assignment, name }
    })
}

fn parse_label(args: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(args, &[Marker::Label, Marker::Name]);
    let raw_label = require(&tokens, Marker::Label, USAGE_LABEL)?.to_string();
    let raw_name = require(&tokens, Marker::Name, USAGE_LABEL)?.to_string();
    require_empty_preamble(&tokens, USAGE_LABEL)?;
    forbid_duplicates(&tokens, &[Marker::Label, Marker::Name], USAGE_LABEL)?;

    Ok(Command::Label {
        label: Label::parse(&raw_label)?,
        name: PersonName::parse(&raw_name)?,
    })
}

fn parse_unlabel(args: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(args, &[Marker::Name, Marker::Class]);
    let _ = require_one_of(&tokens, Marker::Name, Marker::Class, USAGE_UNLABEL)?;
    require_empty_preamble(&tokens, USAGE_UNLABEL)?;
    forbid_duplicates(&tokens, &[Marker::Name, Marker::Class], USAGE_UNLABEL)?;

    let target = parse_name_or_class(&tokens, true, USAGE_UNLABEL)?
        .ok_or_else(|| CommandError::Internal("target parsing".to_string()))?;
    Ok(Command::Unlabel { target })
}

fn parse_view(args: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(args, &[Marker::Name]);
    let raw_name = require(&tokens, Marker::Name, USAGE_VIEW)?.to_string();
    require_empty_preamble(&tokens, USAGE_VIEW)?;
    forbid_duplicates(&tokens, &[Marker::Name], USAGE_VIEW)?;

    Ok(Command::View {
        name: PersonName::parse(&raw_name)?,
    })
}

fn parse_add(args: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(
        args,
        &[
            Marker::Name,
            Marker::Phone,
            Marker::Email,
            Marker::Class,
            Marker::Tag,
        ],
    );
    let raw_name = require(&tokens, Marker::Name, USAGE_ADD)?.to_string();
    let raw_phone = require(&tokens, Marker::Phone, USAGE_ADD)?.to_string();
    let raw_email = require(&tokens, Marker::Email, USAGE_ADD)?.to_string();
    let raw_class = require(&tokens, Marker::Class, USAGE_ADD)?.to_string();
    require_empty_preamble(&tokens, USAGE_ADD)?;
    // t= may repeat; everything else is single-valued.
    forbid_duplicates(
        &tokens,
        &[Marker::Name, Marker::Phone, Marker::Email, Marker::Class],
        USAGE_ADD,
    )?;

    let mut tags = Vec::new();
    for raw_tag in tokens.all_values(Marker::Tag) {
        tags.push(Tag::parse(raw_tag)?);
    }
    let student = Student::new(
        PersonName::parse(&raw_name)?,
        Phone::parse(&raw_phone)?,
        Email::parse(&raw_email)?,
        TuitionClass::parse(&raw_class)?,
        tags,
    );
    Ok(Command::Add { student })
}

fn parse_edit(args: &str) -> Result<Command, CommandError> {
    let markers = [
        Marker::Name,
        Marker::Phone,
        Marker::Email,
        Marker::Class,
        Marker::Tag,
        Marker::Assignment,
    ];
    let tokens = tokenize(args, &markers);
    if tokens.preamble().is_empty() {
        return Err(usage("missing the INDEX of the student to edit", USAGE_EDIT));
    }
    if !markers.iter().any(|&marker| tokens.contains(marker)) {
        return Err(usage("at least one field to edit is required", USAGE_EDIT));
    }
    forbid_duplicates(
        &tokens,
        &[Marker::Name, Marker::Phone, Marker::Email, Marker::Class],
        USAGE_EDIT,
    )?;
    let index = parse_index(tokens.preamble(), USAGE_EDIT)?;

    let mut edits = StudentEdits::default();
    if let Some(raw) = tokens.value(Marker::Name) {
        edits.name = Some(PersonName::parse(raw)?);
    }
    if let Some(raw) = tokens.value(Marker::Phone) {
        edits.phone = Some(Phone::parse(raw)?);
    }
    if let Some(raw) = tokens.value(Marker::Email) {
        edits.email = Some(Email::parse(raw)?);
    }
    if let Some(raw) = tokens.value(Marker::Class) {
        edits.class = Some(TuitionClass::parse(raw)?);
    }
    if tokens.contains(Marker::Tag) {
        let mut tags = Vec::new();
        for raw in tokens.all_values(Marker::Tag) {
            tags.push(Tag::parse(raw)?);
        }
        edits.tags = Some(tags);
    }
    if tokens.contains(Marker::Assignment) {
        let mut assignments = Vec::new();
        for raw in tokens.all_values(Marker::Assignment) {
            assignments.push(AssignmentName::parse(raw)?);
        }
        edits.assignments = Some(assignments);
    }
    Ok(Command::Edit { index, edits })
}

fn parse_delete(args: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(args, &[Marker::Name]);
    let has_index = !tokens.preamble().is_empty();
    let has_name = tokens.contains(Marker::Name);
    match (has_index, has_name) {
        (true, true) => Err(usage(
            "conflicting forms: supply an INDEX or n=NAME, not both",
            USAGE_DELETE,
        )),
        (false, false) => Err(usage("an INDEX or n=NAME is required", USAGE_DELETE)),
        (true, false) => {
            let index = parse_index(tokens.preamble(), USAGE_DELETE)?;
            Ok(Command::Delete(DeleteRef::Index(index)))
        }
        (false, true) => {
            forbid_duplicates(&tokens, &[Marker::Name], USAGE_DELETE)?;
            let raw = require(&tokens, Marker::Name, USAGE_DELETE)?;
            Ok(Command::Delete(DeleteRef::Name(PersonName::parse(raw)?)))
        }
    }
}

fn parse_find(args: &str) -> Result<Command, CommandError> {
    let keywords: Vec<String> = args
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if keywords.is_empty() {
        return Err(usage("at least one keyword is required", USAGE_FIND));
    }
    Ok(Command::Find { keywords })
}

fn parse_index(preamble: &str, usage_text: &'static str) -> Result<usize, CommandError> {
    match preamble.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index),
        _ => Err(usage(
            format!("'{preamble}' is not a valid INDEX (a positive number)"),
            usage_text,
        )),
    }
}
