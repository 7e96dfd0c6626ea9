/// Failure classes surfaced by the companion.
///
/// Validation failures are raised before any journal is touched, so a caller
/// that sees one can retry with corrected input and nothing to undo. Timer
/// failures come from the sitting session state machine. Auth failures carry
/// the identity provider's message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompanionError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("timer error: {0}")]
    Timer(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}
