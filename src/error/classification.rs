//! Classified error types consumed by UI and logging code
//!
//! A [`ClassifiedError`] is produced once per failed remote call and is
//! immutable afterwards. Its category is always one of the fixed
//! [`ErrorCategory`] values.

use serde::Serialize;

use super::transport::{TransportCode, UnderlyingError};

/// The general category of a failed remote call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// No error. Also the category of unrecognized transport codes.
    None,
    /// The session could not be reached.
    Connection,
    /// The session is temporarily unavailable.
    Unavailable,
    /// The client is not authorized.
    Unauthorized,
    /// A wire-level protocol fault (parse, request, method or parameter).
    Protocol,
    /// The remote method failed while executing.
    Execution,
    /// The response could not be transmitted.
    Transmission,
}

impl ErrorCategory {
    /// Every category, ordered by numeric code.
    pub const ALL: [ErrorCategory; 7] = [
        ErrorCategory::None,
        ErrorCategory::Connection,
        ErrorCategory::Unavailable,
        ErrorCategory::Unauthorized,
        ErrorCategory::Protocol,
        ErrorCategory::Execution,
        ErrorCategory::Transmission,
    ];

    /// Returns the stable numeric code of this category.
    pub const fn code(self) -> i32 {
        match self {
            ErrorCategory::None => 0,
            ErrorCategory::Connection => 1,
            ErrorCategory::Unavailable => 2,
            ErrorCategory::Unauthorized => 3,
            ErrorCategory::Protocol => 4,
            ErrorCategory::Execution => 5,
            ErrorCategory::Transmission => 6,
        }
    }

    /// Returns the stable label used in display strings.
    pub const fn label(self) -> &'static str {
        match self {
            ErrorCategory::None => "NONE",
            ErrorCategory::Connection => "CONNECTION",
            ErrorCategory::Unavailable => "UNAVAILABLE",
            ErrorCategory::Unauthorized => "UNAUTHORIZED",
            ErrorCategory::Protocol => "PROTOCOL",
            ErrorCategory::Execution => "EXECUTION",
            ErrorCategory::Transmission => "TRANSMISSION",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The more specific cause of a classified error, passed through from the
/// endpoint without reclassification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorCause {
    code: i32,
    category: String,
    message: String,
}

impl ErrorCause {
    /// Creates a new cause.
    pub fn new(code: i32, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            category: category.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<UnderlyingError> for ErrorCause {
    fn from(underlying: UnderlyingError) -> Self {
        Self {
            code: underlying.code,
            category: underlying.category,
            message: underlying.message,
        }
    }
}

impl std::fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.category, self.code, self.message)
    }
}

/// The interface downstream code uses to report a server error.
pub trait ServerError: std::fmt::Display {
    /// The classified category.
    fn category(&self) -> ErrorCategory;

    /// The technical, transport-level message.
    fn message(&self) -> &str;

    /// The nested cause, if the endpoint supplied one.
    fn cause(&self) -> Option<&ErrorCause>;

    /// The most specific message available, for end-user surfaces.
    fn user_message(&self) -> &str {
        match self.cause() {
            Some(cause) => cause.message(),
            None => self.message(),
        }
    }

    /// The technical rendering used in diagnostic logs.
    ///
    /// The first line carries the numeric category code, as in
    /// `"5: RPC failed\n"`.
    fn display_string(&self) -> String {
        let mut out = format!("{}: {}\n", self.category().code(), self.message());
        if let Some(cause) = self.cause() {
            out.push_str(&cause.to_string());
        }
        out
    }
}

/// A remote call failure normalized onto the fixed category taxonomy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    category: ErrorCategory,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<ErrorCause>,
    transport_code: i32,
}

impl ClassifiedError {
    /// Creates a classified error.
    ///
    /// `transport_code` is the raw wire code the category was derived from.
    pub fn new(
        category: ErrorCategory,
        message: impl Into<String>,
        cause: Option<ErrorCause>,
        transport_code: i32,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            cause,
            transport_code,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    /// The raw transport code this error was classified from.
    pub fn transport_code(&self) -> i32 {
        self.transport_code
    }

    /// Returns true if the transport code was not a known code.
    ///
    /// Such errors carry [`ErrorCategory::None`] even though the call failed.
    pub fn is_unrecognized(&self) -> bool {
        TransportCode::from_code(self.transport_code).is_none()
    }

    /// Returns the cause message if present, otherwise the top-level message.
    pub fn user_message(&self) -> &str {
        ServerError::user_message(self)
    }

    /// Renders `"<category code>: <message>\n"` followed by the cause, if any.
    pub fn display_string(&self) -> String {
        ServerError::display_string(self)
    }
}

impl ServerError for ClassifiedError {
    fn category(&self) -> ErrorCategory {
        self.category
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl std::error::Error for ClassifiedError {}
