/// Every failure the tool can hit. None of them are retried: the run stops at
/// the first one and `main` reports it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "Invalid operation `{0}`: expected three binary digits (e.g. 010) or one of \
         intersection, symmetric_difference, union"
    )]
    InvalidOperation(String),

    #[error("Spotify request failed while {context}")]
    Transport {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Not authorized: {reason}")]
    Auth { reason: String },
}

impl Error {
    pub fn transport(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn auth(reason: impl Into<String>) -> Self {
        Self::Auth {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
