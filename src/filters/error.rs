use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to turn a filter string into a [`Condition`](super::condition::Condition)
///
/// Both kinds are client errors: the request should be rejected with a 400
/// and the message shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Malformed expression, or nesting beyond the configured depth limit
    #[error("Invalid filter syntax: {message}")]
    Syntax { message: String, fragment: Option<String> },

    /// Comparison against a field outside the entity's allow-list
    #[error("Invalid filter field: '{field}' (allowed fields: {})", .allowed.join(", "))]
    Security { field: String, allowed: Vec<String> },
}

impl ParseError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        ParseError::Syntax { message: message.into(), fragment: None }
    }

    pub(crate) fn syntax_at(message: impl Into<String>, fragment: &str) -> Self {
        ParseError::Syntax { message: message.into(), fragment: Some(fragment.to_string()) }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax { .. })
    }

    pub fn is_security(&self) -> bool {
        matches!(self, ParseError::Security { .. })
    }

    /// Field rejected by the allow-list, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::Security { field, .. } => Some(field),
            ParseError::Syntax { .. } => None,
        }
    }

    /// HTTP status the API layer should answer with
    pub fn status_code(&self) -> u16 {
        400
    }

    /// OneRoster `imsx_StatusInfo` payload describing this error
    pub fn to_status_info(&self) -> StatusInfo {
        let (name, value) = match self {
            ParseError::Syntax { .. } => ("filter".to_string(), "invalid_data"),
            ParseError::Security { field, .. } => (field.clone(), "invalid_filter_field"),
        };

        StatusInfo {
            code_major: "failure".to_string(),
            severity: "error".to_string(),
            description: self.to_string(),
            code_minor: CodeMinor {
                fields: vec![CodeMinorField { name, value: value.to_string() }],
            },
        }
    }
}

/// OneRoster status envelope returned in 4xx response bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    #[serde(rename = "imsx_codeMajor")]
    pub code_major: String,
    #[serde(rename = "imsx_severity")]
    pub severity: String,
    #[serde(rename = "imsx_description")]
    pub description: String,
    #[serde(rename = "imsx_CodeMinor")]
    pub code_minor: CodeMinor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMinor {
    #[serde(rename = "imsx_codeMinorField")]
    pub fields: Vec<CodeMinorField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMinorField {
    #[serde(rename = "imsx_codeMinorFieldName")]
    pub name: String,
    #[serde(rename = "imsx_codeMinorFieldValue")]
    pub value: String,
}
