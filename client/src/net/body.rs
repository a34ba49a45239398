//! Request payload variants.
//!
//! DESIGN
//! ======
//! A body is one of three explicit shapes instead of "whatever the caller
//! passed". Only `Json` objects can carry a CSRF field; `Raw` text is sent
//! exactly as given and `Form` payloads are multipart, so neither is ever
//! re-parsed or rewritten by the dispatcher.

#[cfg(test)]
#[path = "body_test.rs"]
mod body_test;

use serde_json::Value;

/// Body field name the server accepts as an alternative to the CSRF header.
pub const CSRF_BODY_FIELD: &str = "csrf_token";

/// Outbound request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Structured JSON value, serialized at dispatch time.
    Json(Value),
    /// Pre-encoded text sent verbatim.
    Raw(String),
    /// Multipart form payload (text fields and file parts).
    Form(FormData),
}

impl RequestBody {
    /// Build a JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be represented as JSON.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Whether this is a multipart form payload.
    pub fn is_form(&self) -> bool {
        matches!(self, Self::Form(_))
    }

    /// Insert the CSRF token into a JSON object body.
    ///
    /// Returns `true` when the token was added. Non-object JSON, raw text and
    /// form bodies are left untouched.
    pub fn attach_csrf(&mut self, token: &str) -> bool {
        match self {
            Self::Json(Value::Object(map)) => {
                map.insert(CSRF_BODY_FIELD.to_owned(), Value::String(token.to_owned()));
                true
            }
            _ => false,
        }
    }

    /// Text encoding for JSON and raw bodies; `None` for form payloads.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Json(value) => Some(value.to_string()),
            Self::Raw(text) => Some(text.clone()),
            Self::Form(_) => None,
        }
    }
}

/// Multipart form payload, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormData {
    parts: Vec<FormPart>,
}

/// One named multipart field.
#[derive(Clone, Debug, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

/// Multipart field content.
#[derive(Clone, Debug, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.to_owned(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    /// Append a file part.
    #[must_use]
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        self.parts.push(FormPart {
            name: name.to_owned(),
            value: FormValue::File {
                file_name: file_name.to_owned(),
                content_type: content_type.to_owned(),
                bytes,
            },
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// First text value for `name`, if any.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            FormValue::Text(value) if part.name == name => Some(value.as_str()),
            _ => None,
        })
    }
}
