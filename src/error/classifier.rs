//! Transport code classifier
//!
//! Maps raw transport error descriptors onto the fixed [`ErrorCategory`]
//! taxonomy using a static lookup table. Classification is a pure function:
//! it never fails, never retries, and performs no I/O beyond a tracing event.

use tracing::{debug, warn};

use super::classification::{ClassifiedError, ErrorCategory, ErrorCause};
use super::transport::{RawTransportError, TransportCode};

/// A single entry of the classification table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeMapping {
    /// The transport code matched by this entry.
    pub transport: TransportCode,
    /// The category assigned to errors carrying that code.
    pub category: ErrorCategory,
}

const fn map(transport: TransportCode, category: ErrorCategory) -> CodeMapping {
    CodeMapping {
        transport,
        category,
    }
}

/// The fixed transport code table.
///
/// Codes absent from this table, including `INVALID_CLIENT_ID`, classify as
/// [`ErrorCategory::None`].
pub const TRANSPORT_CODE_TABLE: &[CodeMapping] = &[
    map(TransportCode::Success, ErrorCategory::None),
    map(TransportCode::ConnectionError, ErrorCategory::Connection),
    map(TransportCode::Unavailable, ErrorCategory::Unavailable),
    map(TransportCode::Unauthorized, ErrorCategory::Unauthorized),
    // Wire-level faults are not actionable differently by the UI.
    map(TransportCode::ParseError, ErrorCategory::Protocol),
    map(TransportCode::InvalidRequest, ErrorCategory::Protocol),
    map(TransportCode::MethodNotFound, ErrorCategory::Protocol),
    map(TransportCode::ParamMissing, ErrorCategory::Protocol),
    map(TransportCode::ParamTypeMismatch, ErrorCategory::Protocol),
    map(TransportCode::ParamInvalid, ErrorCategory::Protocol),
    map(TransportCode::MethodUnexpected, ErrorCategory::Protocol),
    map(TransportCode::ExecutionError, ErrorCategory::Execution),
    map(TransportCode::TransmissionError, ErrorCategory::Transmission),
];

/// Classifies raw transport errors against a code table.
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifier {
    table: &'static [CodeMapping],
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorClassifier {
    /// Creates a classifier using [`TRANSPORT_CODE_TABLE`].
    pub const fn new() -> Self {
        Self {
            table: TRANSPORT_CODE_TABLE,
        }
    }

    /// Creates a classifier with a custom table.
    pub const fn with_table(table: &'static [CodeMapping]) -> Self {
        Self { table }
    }

    /// Returns the table this classifier uses.
    pub fn table(&self) -> &'static [CodeMapping] {
        self.table
    }

    /// Returns the category for a raw wire code.
    ///
    /// Unknown codes fall back to [`ErrorCategory::None`].
    pub fn category_for(&self, code: i32) -> ErrorCategory {
        self.table
            .iter()
            .find(|mapping| mapping.transport.code() == code)
            .map(|mapping| mapping.category)
            .unwrap_or(ErrorCategory::None)
    }

    /// Classifies a raw transport error.
    ///
    /// The nested underlying error, if any, is copied verbatim into the cause.
    pub fn classify(&self, raw: &RawTransportError) -> ClassifiedError {
        let category = self.category_for(raw.code);
        let cause = raw.underlying.clone().map(ErrorCause::from);

        if raw.transport_code().is_none() {
            warn!(
                code = raw.code,
                message = %raw.message,
                "unrecognized transport error code, classifying as NONE"
            );
        } else {
            debug!(
                code = raw.code,
                category = %category,
                has_cause = cause.is_some(),
                "classified transport error"
            );
        }

        ClassifiedError::new(category, raw.message.clone(), cause, raw.code)
    }
}

/// Classifies a raw transport error with the default table.
pub fn classify(raw: &RawTransportError) -> ClassifiedError {
    ErrorClassifier::new().classify(raw)
}

/// Returns the message to show an end user for a classified error.
pub fn get_user_message(classified: &ClassifiedError) -> String {
    classified.user_message().to_string()
}

/// Returns the technical rendering of a classified error for logs.
pub fn to_display_string(classified: &ClassifiedError) -> String {
    classified.display_string()
}

impl From<RawTransportError> for ClassifiedError {
    fn from(raw: RawTransportError) -> Self {
        classify(&raw)
    }
}
