use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out after {waited:?} opening store: {source}")]
    OpenTimeout {
        waited: Duration,
        #[source]
        source: fjall::Error,
    },

    #[error("Corrupt sequence counter for partition '{0}'")]
    CorruptSequence(String),

    #[error("Sequence counter for partition '{0}' is exhausted")]
    SequenceExhausted(String),

    #[error("queue is empty")]
    EmptyQueue,
}

impl StorageError {
    /// True when a dequeue found nothing to hand out.
    ///
    /// Polling loops use this to tell "try again later" apart from a real fault.
    pub fn is_empty_queue(&self) -> bool {
        matches!(self, StorageError::EmptyQueue)
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
