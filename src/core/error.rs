use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidYaml,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    ProjectRootNotFound,
    TargetNotFound,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidYaml => "config.invalid_yaml",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::ProjectRootNotFound => "project.root_not_found",
            ErrorCode::TargetNotFound => "target.not_found",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(context) = self.details.get("context").and_then(Value::as_str) {
            write!(f, " ({})", context)?;
        }
        if let Some(error) = self.details.get("error").and_then(Value::as_str) {
            write!(f, ": {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidYamlDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn config_invalid_yaml(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        let details = to_details(ConfigInvalidYamlDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidYaml,
            "Invalid YAML in exclusion config",
            details,
        )
    }

    pub fn project_root_not_found(start: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ProjectRootNotFound,
            "Project root not found",
            to_details(PathDetails { path: start.into() }),
        )
        .with_hint("Run from inside a project containing apps/, packages/, package.json or go.mod")
        .with_hint("Or pass --root <path> explicitly")
    }

    pub fn target_not_found(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::TargetNotFound,
            "Target directory not found",
            to_details(PathDetails { path: path.into() }),
        )
        .with_hint("Run 'recase scan' to list convertible directories")
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_io_display_includes_context_and_cause() {
        let err = Error::internal_io("permission denied", Some("rename a -> b".to_string()));
        assert_eq!(err.to_string(), "IO error (rename a -> b): permission denied");
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn project_root_not_found_carries_hints() {
        let err = Error::project_root_not_found("/tmp/nowhere");
        assert_eq!(err.code, ErrorCode::ProjectRootNotFound);
        assert_eq!(err.details["path"], "/tmp/nowhere");
        assert_eq!(err.hints.len(), 2);
    }

    #[test]
    fn invalid_argument_details_skip_empty_fields() {
        let err = Error::validation_invalid_argument("direction", "unknown", None, None);
        assert_eq!(err.details["field"], "direction");
        assert!(err.details.get("id").is_none());
        assert!(err.details.get("tried").is_none());
    }
}
