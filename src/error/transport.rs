//! Raw error descriptors produced by the remote call transport
//!
//! These types mirror the JSON-RPC error object returned by the session
//! server. They arrive already deserialized and are classified exactly once,
//! at the boundary, by [`super::ErrorClassifier`].

use serde::{Deserialize, Serialize};

/// Transport-level error codes emitted by the remote call mechanism.
///
/// The numeric values are fixed by the session protocol and are independent
/// of any application-level outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportCode {
    /// The call completed without a transport error.
    Success,
    /// The connection to the session was refused or dropped.
    ConnectionError,
    /// The session is temporarily unavailable.
    Unavailable,
    /// The client is not authorized to call the session.
    Unauthorized,
    /// The client id sent with the request is stale.
    InvalidClientId,
    /// The request body could not be parsed.
    ParseError,
    /// The request was not a valid JSON-RPC request.
    InvalidRequest,
    /// No method with the requested name exists.
    MethodNotFound,
    /// A required parameter was missing.
    ParamMissing,
    /// A parameter had the wrong type.
    ParamTypeMismatch,
    /// A parameter had an invalid value.
    ParamInvalid,
    /// The method was not expected in the current session state.
    MethodUnexpected,
    /// The method failed while executing.
    ExecutionError,
    /// The response could not be transmitted.
    TransmissionError,
}

impl TransportCode {
    /// Every known transport code, in protocol order.
    pub const ALL: [TransportCode; 14] = [
        TransportCode::Success,
        TransportCode::ConnectionError,
        TransportCode::Unavailable,
        TransportCode::Unauthorized,
        TransportCode::InvalidClientId,
        TransportCode::ParseError,
        TransportCode::InvalidRequest,
        TransportCode::MethodNotFound,
        TransportCode::ParamMissing,
        TransportCode::ParamTypeMismatch,
        TransportCode::ParamInvalid,
        TransportCode::MethodUnexpected,
        TransportCode::ExecutionError,
        TransportCode::TransmissionError,
    ];

    /// Returns the wire value of this code.
    pub const fn code(self) -> i32 {
        match self {
            TransportCode::Success => 0,
            TransportCode::ConnectionError => 1,
            TransportCode::Unavailable => 2,
            TransportCode::Unauthorized => 3,
            TransportCode::InvalidClientId => 4,
            TransportCode::ParseError => 5,
            TransportCode::InvalidRequest => 6,
            TransportCode::MethodNotFound => 7,
            TransportCode::ParamMissing => 8,
            TransportCode::ParamTypeMismatch => 9,
            TransportCode::ParamInvalid => 10,
            TransportCode::MethodUnexpected => 11,
            TransportCode::ExecutionError => 12,
            TransportCode::TransmissionError => 13,
        }
    }

    /// Looks up the code with the given wire value.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|known| known.code() == code)
    }

    /// Returns the protocol name of this code.
    pub const fn name(self) -> &'static str {
        match self {
            TransportCode::Success => "SUCCESS",
            TransportCode::ConnectionError => "CONNECTION_ERROR",
            TransportCode::Unavailable => "UNAVAILABLE",
            TransportCode::Unauthorized => "UNAUTHORIZED",
            TransportCode::InvalidClientId => "INVALID_CLIENT_ID",
            TransportCode::ParseError => "PARSE_ERROR",
            TransportCode::InvalidRequest => "INVALID_REQUEST",
            TransportCode::MethodNotFound => "METHOD_NOT_FOUND",
            TransportCode::ParamMissing => "PARAM_MISSING",
            TransportCode::ParamTypeMismatch => "PARAM_TYPE_MISMATCH",
            TransportCode::ParamInvalid => "PARAM_INVALID",
            TransportCode::MethodUnexpected => "METHOD_UNEXPECTED",
            TransportCode::ExecutionError => "EXECUTION_ERROR",
            TransportCode::TransmissionError => "TRANSMISSION_ERROR",
        }
    }
}

impl std::fmt::Display for TransportCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A more specific error supplied by the remote endpoint.
///
/// The category is assigned by the server (for example `"r"` or
/// `"system"`) and is never reinterpreted on the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderlyingError {
    /// Server-side error code within `category`.
    pub code: i32,
    /// Server-assigned category label.
    pub category: String,
    /// Human-relevant explanation of the failure.
    pub message: String,
}

impl UnderlyingError {
    /// Creates a new underlying error.
    pub fn new(code: i32, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            category: category.into(),
            message: message.into(),
        }
    }
}

/// An error descriptor as returned by a failed remote call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransportError {
    /// Transport-defined error code; see [`TransportCode`].
    pub code: i32,
    /// Transport-level message.
    #[serde(default)]
    pub message: String,
    /// Optional nested cause reported by the endpoint.
    #[serde(
        default,
        rename = "error",
        alias = "underlyingError",
        skip_serializing_if = "Option::is_none"
    )]
    pub underlying: Option<UnderlyingError>,
}

impl RawTransportError {
    /// Creates a descriptor without a nested cause.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            underlying: None,
        }
    }

    /// Attaches a nested cause to the descriptor.
    pub fn with_underlying(mut self, underlying: UnderlyingError) -> Self {
        self.underlying = Some(underlying);
        self
    }

    /// Returns the known transport code, if the wire value is recognized.
    pub fn transport_code(&self) -> Option<TransportCode> {
        TransportCode::from_code(self.code)
    }
}
