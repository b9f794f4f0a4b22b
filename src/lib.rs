//! rpcdiag - remote call error classification and diagnostic logging
//!
//! Failed remote procedure calls produce a [`error::RawTransportError`].
//! [`error::classify`] normalizes it onto a fixed category taxonomy, and the
//! resulting [`error::ClassifiedError`] is either shown to the user
//! ([`error::get_user_message`]) or written to diagnostics through a
//! [`debug::DebugLog`].

pub mod debug;
pub mod error;
pub mod logging;
pub mod settings;
