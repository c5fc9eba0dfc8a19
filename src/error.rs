use thiserror::Error;

/// Domain errors raised by catalog lookups and checklist edits.
///
/// Unknown schemes and credits indicate a mismatch between the caller and
/// the catalog, so they are surfaced instead of being recovered. Point
/// values typed by a user are normally coerced; `InvalidPointValue` is only
/// produced by the strict parser used on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecklistError {
    #[error("unknown scheme '{key}' (available: {})", .available.join(", "))]
    UnknownScheme { key: String, available: Vec<String> },

    #[error(
        "credit '{credit_id}' not found{} in scheme '{scheme}'",
        .category_id.as_deref().map(|c| format!(" in category '{}'", c)).unwrap_or_default()
    )]
    CreditNotFound {
        scheme: String,
        category_id: Option<String>,
        credit_id: String,
    },

    #[error("invalid point value '{raw}': expected a whole number")]
    InvalidPointValue { raw: String },

    #[error("scoring state belongs to scheme '{state}', not '{scheme}'")]
    SchemeMismatch { state: String, scheme: String },
}
