//! Input checks applied before a request leaves the client.
//!
//! The limits match the server's request schemas, so a rejected form never
//! costs a round-trip (or a CSRF refresh).

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

pub const USERNAME_MAX_CHARS: usize = 100;
pub const MESSAGE_MAX_CHARS: usize = 10_000;
pub const QUERY_MAX_CHARS: usize = 1_000;
pub const TOP_K_MAX: u32 = 50;
pub const PROFILE_NAME_MAX_CHARS: usize = 100;
/// Chat attachments (text or image).
pub const ATTACHMENT_MAX_BYTES: usize = 2 * 1024 * 1024;
/// Knowledge-base uploads.
pub const INGEST_MAX_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: u32, max: u32 },
    #[error("endpoint must start with http:// or https://")]
    EndpointScheme,
    #[error("file too large (max {max_bytes} bytes)")]
    FileTooLarge { max_bytes: usize },
    #[error("prompt or file is required")]
    NothingToSend,
}

/// Trimmed username and untouched password.
///
/// # Errors
///
/// Blank or over-long username, or empty password.
pub fn validate_login(username: &str, password: &str) -> Result<(String, String), ValidationError> {
    let username = non_blank("username", username, USERNAME_MAX_CHARS)?;
    if password.is_empty() {
        return Err(ValidationError::Empty { field: "password" });
    }
    Ok((username, password.to_owned()))
}

/// A chat prompt. Blank prompts are allowed only alongside an attachment.
///
/// # Errors
///
/// Over-long prompt, or neither prompt nor attachment.
pub fn validate_chat_prompt(prompt: &str, has_attachment: bool) -> Result<(), ValidationError> {
    if prompt.trim().is_empty() {
        return if has_attachment {
            Ok(())
        } else {
            Err(ValidationError::NothingToSend)
        };
    }
    check_len("message", prompt, MESSAGE_MAX_CHARS)
}

/// Memory / knowledge search parameters.
///
/// # Errors
///
/// Blank or over-long query, or `top_k` outside `1..=50`.
pub fn validate_search(query: &str, top_k: u32) -> Result<String, ValidationError> {
    let query = non_blank("query", query, QUERY_MAX_CHARS)?;
    if !(1..=TOP_K_MAX).contains(&top_k) {
        return Err(ValidationError::OutOfRange {
            field: "top_k",
            min: 1,
            max: TOP_K_MAX,
        });
    }
    Ok(query)
}

/// LLM endpoint base URL, trimmed and without a trailing slash.
///
/// # Errors
///
/// Blank value or a scheme other than http/https.
pub fn validate_endpoint(endpoint: &str) -> Result<String, ValidationError> {
    let clean = endpoint.trim().trim_end_matches('/');
    if clean.is_empty() {
        return Err(ValidationError::Empty { field: "endpoint" });
    }
    if !(clean.starts_with("http://") || clean.starts_with("https://")) {
        return Err(ValidationError::EndpointScheme);
    }
    Ok(clean.to_owned())
}

/// Endpoint profile name.
///
/// # Errors
///
/// Blank or over-long name.
pub fn validate_profile_name(name: &str) -> Result<String, ValidationError> {
    non_blank("profile name", name, PROFILE_NAME_MAX_CHARS)
}

/// Knowledge-base document id, trimmed.
///
/// # Errors
///
/// Blank id.
pub fn validate_doc_id(doc_id: &str) -> Result<String, ValidationError> {
    let trimmed = doc_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: "doc_id" });
    }
    Ok(trimmed.to_owned())
}

/// Replacement text for a re-ingest. Both the id and the text must be present.
///
/// # Errors
///
/// Blank id or blank text.
pub fn validate_reingest(doc_id: &str, text: &str) -> Result<String, ValidationError> {
    let doc_id = validate_doc_id(doc_id)?;
    if text.trim().is_empty() {
        return Err(ValidationError::Empty { field: "text" });
    }
    Ok(doc_id)
}

/// Size guard for uploads.
///
/// # Errors
///
/// `len` above `max_bytes`.
pub fn validate_file_size(len: usize, max_bytes: usize) -> Result<(), ValidationError> {
    if len > max_bytes {
        return Err(ValidationError::FileTooLarge { max_bytes });
    }
    Ok(())
}

fn non_blank(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    check_len(field, value, max)?;
    Ok(trimmed.to_owned())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
