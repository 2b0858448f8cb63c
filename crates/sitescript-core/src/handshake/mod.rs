//! Page handshake: inbound page context in, finalized script out.
//!
//! A [`HandshakeSession`] lives for one page visit:
//! open (load stored script for the host) → edit → finish (save, then emit the
//! finalize payload). `finish` consumes the session, so a closed session
//! cannot be touched again, and dropping a session early writes nothing.

mod payload;
mod session;
mod template;

pub use payload::{
    FinalizeArgument, FinalizePayload, SessionContext, FINALIZE_ARGUMENT_KEY,
    PREPROCESSING_RESULTS_KEY,
};
pub use session::{Finalized, HandshakeSession, SaveStatus};
pub use template::{find_template, Template, PRINT_PAGE_TITLE, TEMPLATES};

#[cfg(test)]
mod tests;
