/// Domain-level error for malformed client input.
///
/// Validation failures must be rejected before any side effect;
/// upstream engine and provider failures travel as
/// `fable_engine::EngineError`, not through this type.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}
