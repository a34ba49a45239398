use super::*;

#[test]
fn login_trims_username_and_requires_password() {
    assert_eq!(
        validate_login("  admin ", "pw"),
        Ok(("admin".to_owned(), "pw".to_owned()))
    );
    assert_eq!(
        validate_login("   ", "pw"),
        Err(ValidationError::Empty { field: "username" })
    );
    assert_eq!(
        validate_login("admin", ""),
        Err(ValidationError::Empty { field: "password" })
    );
}

#[test]
fn login_rejects_overlong_username() {
    let name = "u".repeat(USERNAME_MAX_CHARS + 1);
    assert_eq!(
        validate_login(&name, "pw"),
        Err(ValidationError::TooLong { field: "username", max: 100 })
    );
    assert!(validate_login(&"u".repeat(USERNAME_MAX_CHARS), "pw").is_ok());
}

#[test]
fn chat_prompt_needs_text_or_attachment() {
    assert_eq!(validate_chat_prompt("  ", false), Err(ValidationError::NothingToSend));
    assert_eq!(validate_chat_prompt("", true), Ok(()));
    assert_eq!(validate_chat_prompt("hello", false), Ok(()));
}

#[test]
fn chat_prompt_length_counts_characters_not_bytes() {
    let prompt = "é".repeat(MESSAGE_MAX_CHARS);
    assert_eq!(validate_chat_prompt(&prompt, false), Ok(()));
    let prompt = "é".repeat(MESSAGE_MAX_CHARS + 1);
    assert_eq!(
        validate_chat_prompt(&prompt, false),
        Err(ValidationError::TooLong { field: "message", max: MESSAGE_MAX_CHARS })
    );
}

#[test]
fn search_bounds_top_k() {
    assert_eq!(validate_search(" rust ", 5), Ok("rust".to_owned()));
    assert!(matches!(
        validate_search("rust", 0),
        Err(ValidationError::OutOfRange { field: "top_k", .. })
    ));
    assert!(validate_search("rust", 51).is_err());
    assert!(validate_search("rust", 50).is_ok());
}

#[test]
fn endpoint_requires_http_scheme_and_drops_trailing_slash() {
    assert_eq!(
        validate_endpoint(" http://192.168.5.66:1234/ "),
        Ok("http://192.168.5.66:1234".to_owned())
    );
    assert_eq!(validate_endpoint("ftp://x"), Err(ValidationError::EndpointScheme));
    assert_eq!(
        validate_endpoint(""),
        Err(ValidationError::Empty { field: "endpoint" })
    );
}

#[test]
fn profile_name_is_trimmed() {
    assert_eq!(validate_profile_name(" lab "), Ok("lab".to_owned()));
    assert!(validate_profile_name(" ").is_err());
}

#[test]
fn reingest_needs_id_and_text() {
    assert_eq!(validate_reingest(" d1 ", "body"), Ok("d1".to_owned()));
    assert_eq!(validate_reingest("", "body"), Err(ValidationError::Empty { field: "doc_id" }));
    assert_eq!(validate_reingest("d1", "  "), Err(ValidationError::Empty { field: "text" }));
    assert_eq!(validate_doc_id("\t"), Err(ValidationError::Empty { field: "doc_id" }));
}

#[test]
fn file_size_limits() {
    assert_eq!(validate_file_size(ATTACHMENT_MAX_BYTES, ATTACHMENT_MAX_BYTES), Ok(()));
    assert_eq!(
        validate_file_size(ATTACHMENT_MAX_BYTES + 1, ATTACHMENT_MAX_BYTES),
        Err(ValidationError::FileTooLarge { max_bytes: ATTACHMENT_MAX_BYTES })
    );
    assert!(validate_file_size(INGEST_MAX_BYTES, INGEST_MAX_BYTES).is_ok());
}

#[test]
fn errors_render_readable_messages() {
    assert_eq!(
        ValidationError::Empty { field: "query" }.to_string(),
        "query cannot be empty"
    );
    assert_eq!(
        ValidationError::FileTooLarge { max_bytes: 10 }.to_string(),
        "file too large (max 10 bytes)"
    );
}
