use thiserror::Error;

use crate::token::OpaqueToken;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Unknown or already dropped handle {0}")]
    UnknownToken(OpaqueToken),

    #[error("Handle {token} is not a {expected}")]
    TypeMismatch {
        token: OpaqueToken,
        expected: &'static str,
    },

    #[error("Null bridge context")]
    NullContext,

    #[error("Main thread stopped before the job completed")]
    MainThreadGone,
}
