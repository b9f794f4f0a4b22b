//! Remote error classification
//!
//! This module maps raw transport-level error descriptors onto a fixed error
//! taxonomy and renders them for end users and for diagnostic logs.

pub mod classification;
pub mod classifier;
pub mod transport;

// Re-export main types for convenient access
pub use classification::{ClassifiedError, ErrorCategory, ErrorCause, ServerError};
pub use classifier::{
    classify, get_user_message, to_display_string, CodeMapping, ErrorClassifier,
    TRANSPORT_CODE_TABLE,
};
pub use transport::{RawTransportError, TransportCode, UnderlyingError};
