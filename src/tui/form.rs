//! Structured input requests built on `inquire`.
//!
//! Every prompt returns `Ok(None)` when the user presses Esc or Ctrl-C, so
//! callers can treat cancellation as a normal outcome.

use inquire::validator::Validation;
use inquire::{Confirm, InquireError, Select, Text};

use super::view::{Action, Modal};
use crate::catalog::{Catalog, Record, DEFAULT_LIFECYCLE_STATUS};
use crate::git::branches::operations::is_valid_branch_name;

type PromptResult<T> = Result<Option<T>, InquireError>;

fn cancellable<T>(result: Result<T, InquireError>) -> PromptResult<T> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn validate_required(input: &str) -> Validation {
    if input.trim().is_empty() {
        Validation::Invalid("This field is required".into())
    } else {
        Validation::Valid
    }
}

pub fn validate_url(input: &str) -> Validation {
    let input = input.trim();
    if input.is_empty() {
        Validation::Invalid("Enter a repository URL".into())
    } else if input.contains(char::is_whitespace) {
        Validation::Invalid("URLs cannot contain spaces".into())
    } else {
        Validation::Valid
    }
}

/// A new id must be filled in, name a file, and not collide with the catalog
///
/// Both the ids of loaded records and the files already in the products
/// directory count, including files that failed to parse.
pub fn validate_new_id(input: &str, catalog: &Catalog, extension: &str) -> Validation {
    let record = Record::new(input, "-");
    if let Err(e) = record.validate() {
        return Validation::Invalid(e.to_string().into());
    }
    if catalog.iter().any(|entry| entry.record.id == input) {
        return Validation::Invalid(format!("A product with id '{input}' already exists").into());
    }
    let file = record.file_name(extension);
    if catalog.contains_file(&file) {
        return Validation::Invalid(format!("{file} already exists").into());
    }
    Validation::Valid
}

pub fn validate_branch_name(input: &str, existing: &[String]) -> Validation {
    let input = input.trim();
    if input.is_empty() {
        return Validation::Invalid("Enter a workspace name".into());
    }
    if !is_valid_branch_name(input) {
        return Validation::Invalid(format!("'{input}' is not a valid workspace name").into());
    }
    if existing.iter().any(|name| name == input) {
        return Validation::Invalid(format!("Workspace '{input}' already exists").into());
    }
    Validation::Valid
}

/// Build the record a submitted form describes
///
/// Editing starts from the stored record so keys the form does not show are kept.
pub fn apply_form(
    base: Option<&Record>,
    id: &str,
    name: &str,
    description: &str,
    lifecycle_status: &str,
) -> Record {
    let mut record = match base {
        Some(existing) => existing.clone(),
        None => Record::new(id.trim(), ""),
    };
    record.name = name.trim().to_string();
    record.description = Some(description.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    record.lifecycle_status = match lifecycle_status.trim() {
        "" => DEFAULT_LIFECYCLE_STATUS.to_string(),
        status => status.to_string(),
    };
    record
}

/// Startup request for the repository to open
pub fn prompt_remote_url(default: &str) -> PromptResult<String> {
    cancellable(
        Text::new("Git URL:")
            .with_default(default)
            .with_help_message("Enter to use the example catalog")
            .with_validator(|input: &str| Ok(validate_url(input)))
            .prompt(),
    )
    .map(|url| url.map(|u| u.trim().to_string()))
}

pub fn prompt_branch_name(existing: &[String]) -> PromptResult<String> {
    let existing = existing.to_vec();
    cancellable(
        Text::new("New workspace name:")
            .with_validator(move |input: &str| Ok(validate_branch_name(input, &existing)))
            .prompt(),
    )
    .map(|name| name.map(|n| n.trim().to_string()))
}

/// The product form; the id is locked when editing
pub fn prompt_record(modal: &Modal, catalog: &Catalog, extension: &str) -> PromptResult<Record> {
    let base = match modal {
        Modal::Closed => return Ok(None),
        Modal::Create => None,
        Modal::Edit { record, .. } => Some(record),
    };

    let id = match base {
        Some(record) => {
            println!("ID: {} (locked)", record.id);
            record.id.clone()
        }
        None => {
            let catalog = catalog.clone();
            let extension = extension.to_string();
            let Some(id) = cancellable(
                Text::new("ID:")
                    .with_validator(move |input: &str| {
                        Ok(validate_new_id(input, &catalog, &extension))
                    })
                    .prompt(),
            )?
            else {
                return Ok(None);
            };
            id
        }
    };

    let Some(name) = cancellable(
        Text::new("Name:")
            .with_initial_value(base.map(|r| r.name.as_str()).unwrap_or(""))
            .with_validator(|input: &str| Ok(validate_required(input)))
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let Some(description) = cancellable(
        Text::new("Description:")
            .with_initial_value(base.and_then(|r| r.description.as_deref()).unwrap_or(""))
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let Some(status) = cancellable(
        Text::new("Status:")
            .with_initial_value(
                base.map(|r| r.lifecycle_status.as_str())
                    .unwrap_or(DEFAULT_LIFECYCLE_STATUS),
            )
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    Ok(Some(apply_form(base, &id, &name, &description, &status)))
}

pub fn select_action(actions: Vec<Action>) -> PromptResult<Action> {
    cancellable(Select::new("What next?", actions).prompt())
}

pub fn select_branch(branches: &[String], current: &str) -> PromptResult<String> {
    let start = branches.iter().position(|b| b == current).unwrap_or(0);
    cancellable(
        Select::new("Select a workspace:", branches.to_vec())
            .with_starting_cursor(start)
            .prompt(),
    )
}

/// Pick a card; returns its file name
pub fn select_product(catalog: &Catalog) -> PromptResult<String> {
    let labels: Vec<String> = catalog
        .iter()
        .map(|entry| format!("{} ({})", entry.record.name, entry.file))
        .collect();
    let choice = cancellable(Select::new("Select a product:", labels).raw_prompt())?;
    Ok(choice.and_then(|option| catalog.entries.get(option.index).map(|e| e.file.clone())))
}

pub fn confirm(message: &str) -> PromptResult<bool> {
    cancellable(Confirm::new(message).with_default(false).prompt())
}
