use thiserror::Error;

/// Everything the loader's public surface can fail with. The taxonomy is
/// flat: a network/resource failure, a parse/validation failure, or the
/// generic wrapper for anything unanticipated - callers never observe a
/// raw transport or parser error.
#[derive(Error, Debug)]
pub enum FindashError {
    /// The statement resource could not be retrieved (non-2xx response).
    #[error("failed to load {url}: HTTP {status}")]
    DataLoad { status: u16, url: String },

    /// The payload was retrieved but is structurally broken or violates
    /// the schema. `violations` carries every accumulated message so a
    /// malformed file can be diagnosed in one pass.
    #[error("{message} ({filename}: {} violation(s))", .violations.len())]
    Parse {
        message: String,
        filename: String,
        violations: Vec<String>,
    },

    /// Anything not covered above, wrapped so the error surface stays
    /// closed. Transport failures and client construction errors land here.
    #[error("unexpected error loading financial data: {0}")]
    Unexpected(anyhow::Error),
}

impl FindashError {
    pub fn parse(message: impl Into<String>, filename: impl Into<String>, violations: Vec<String>) -> Self {
        FindashError::Parse {
            message: message.into(),
            filename: filename.into(),
            violations,
        }
    }

    /// Stable kind tag for logging and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            FindashError::DataLoad { .. } => "data-load",
            FindashError::Parse { .. } => "parse",
            FindashError::Unexpected(_) => "unknown",
        }
    }
}

impl From<reqwest::Error> for FindashError {
    fn from(error: reqwest::Error) -> Self {
        FindashError::Unexpected(error.into())
    }
}
