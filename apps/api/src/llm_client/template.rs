//! Prompt templating: `{name}` placeholders filled from a variable map.
//! `{{` and `}}` produce literal braces.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("no value supplied for placeholder '{{{0}}}'")]
    MissingVariable(String),

    #[error("unclosed '{{' at byte {position}")]
    Unclosed { position: usize },

    #[error("unmatched '}}' at byte {position}")]
    UnmatchedClose { position: usize },

    #[error("empty placeholder at byte {position}")]
    EmptyPlaceholder { position: usize },
}

/// Substitutes every placeholder in `template`. Unused variables are ignored.
pub fn fill(template: &str, variables: &HashMap<String, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(TemplateError::Unclosed { position: pos }),
                        _ => name.push(c),
                    }
                }
                if !closed {
                    return Err(TemplateError::Unclosed { position: pos });
                }
                if name.trim().is_empty() {
                    return Err(TemplateError::EmptyPlaceholder { position: pos });
                }
                let value = variables
                    .get(name.as_str())
                    .ok_or(TemplateError::MissingVariable(name))?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::UnmatchedClose { position: pos });
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
