//! Entry name validation
//!
//! A name labels one directory entry. Path syntax (separators, `.`/`..`
//! traversal) is resolved by the host before it reaches this core, so a
//! valid name is a single component.

use thiserror::Error;

/// Maximum entry name length in bytes
pub const MAX_NAME_LENGTH: usize = 128;

/// Errors from entry name validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty
    #[error("Empty name")]
    Empty,

    /// Name exceeds MAX_NAME_LENGTH bytes
    #[error("Name too long: {0} bytes (max {MAX_NAME_LENGTH})")]
    TooLong(usize),

    /// Name is a reserved traversal component
    #[error("Reserved name: {0}")]
    Reserved(String),

    /// Name contains a path separator or NUL byte
    #[error("Illegal character in name: {0:?}")]
    IllegalCharacter(char),
}

/// Validates a single entry name
///
/// Rejects empty names, names longer than [`MAX_NAME_LENGTH`] bytes, the
/// traversal components `.` and `..`, and names containing `/` or NUL.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(NameError::TooLong(name.len()));
    }
    if name == "." || name == ".." {
        return Err(NameError::Reserved(name.to_string()));
    }
    if let Some(c) = name.chars().find(|&c| c == '/' || c == '\0') {
        return Err(NameError::IllegalCharacter(c));
    }
    Ok(())
}
