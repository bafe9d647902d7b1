use std::{io, path::PathBuf};

use thiserror::Error;

/// The word list could not be turned into a vocabulary.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("word list contains no entries")]
    Empty,

    #[error("malformed row {line}: '{content}' (expected 'term,translation')")]
    MalformedRow { line: usize, content: String },
}

#[derive(Debug, Error)]
#[error("quiz needs at least {required} distinct translations, vocabulary has {available}")]
pub struct InsufficientDataError {
    pub required: usize,
    pub available: usize,
}

/// Callback data that does not describe an answer to one of our questions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedRequest {
    #[error("expected 4 '|'-separated fields, got {0}")]
    FieldCount(usize),

    #[error("unknown payload tag '{0}'")]
    Tag(String),

    #[error("invalid question id '{0}'")]
    QuestionId(String),

    #[error("invalid entry index '{0}'")]
    EntryIndex(String),

    #[error("entry index {0} is outside the vocabulary")]
    UnknownEntry(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN environment variable is not set")]
    MissingToken,

    #[error("{var} can't be parsed: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("WEBHOOK_URL and WEBHOOK_ADDR must be set together")]
    PartialWebhook,
}

/// Everything that stops the bot before it starts polling.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),

    #[error("failed to build a webhook listener: {0}")]
    Webhook(#[from] teloxide::RequestError),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to install log bridge: {0}")]
    Logging(#[from] tracing_log::log::SetLoggerError),
}
