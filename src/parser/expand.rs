use thiserror::Error;

use crate::engine::{Environment, LAST_STATUS_KEY};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("variable names must be wrapped in braces: '${0}'")]
    Unbraced(String),
    #[error("missing '}}' after '${{{0}'")]
    Unterminated(String),
}

/// Expand an echo message into the text to print.
///
/// Substitution rules:
/// - `$?`        → the last exit status
/// - `${VAR}`    → the value of `VAR`, empty when unset
/// - `\n`        → a newline (the only escape sequence)
/// - runs of spaces collapse to one space
/// - any other `$` is an error
pub fn expand_message(input: &str, env: &Environment) -> Result<String, ExpandError> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            ' ' => {
                if !result.ends_with(' ') {
                    result.push(' ');
                }
            }
            '\\' if chars.peek() == Some(&'n') => {
                chars.next();
                result.push('\n');
            }
            '$' => match chars.peek() {
                Some('?') => {
                    chars.next();
                    result.push_str(env.lookup(LAST_STATUS_KEY).unwrap_or("0"));
                }
                Some('{') => {
                    chars.next(); // consume '{'
                    let mut var_name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        var_name.push(c);
                    }
                    if !closed {
                        return Err(ExpandError::Unterminated(var_name));
                    }
                    result.push_str(env.lookup(&var_name).unwrap_or_default());
                }
                _ => {
                    let rest: String = chars.by_ref().take_while(|c| *c != ' ').collect();
                    return Err(ExpandError::Unbraced(rest));
                }
            },
            _ => result.push(ch),
        }
    }

    Ok(result)
}

// ── Tests ──────────────────────────────────────────────────────────────────
