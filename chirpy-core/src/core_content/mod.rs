//! Chirp body validation
//!
//! Runs before a body reaches the store: rejects bodies over the length
//! limit and masks banned words. Words are split on single spaces and
//! compared case-insensitively; a banned word with punctuation attached
//! ("fornax!") is left alone.

use thiserror::Error;

/// Maximum chirp length in bytes
pub const DEFAULT_MAX_CHIRP_LENGTH: usize = 140;

/// Words masked out of chirp bodies by default
pub const DEFAULT_BANNED_WORDS: &[&str] = &["kerfuffle", "sharbert", "fornax"];

const MASK: &str = "****";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Chirp is too long: {len} bytes (max {max})")]
    TooLong { len: usize, max: usize },
}

#[derive(Debug, Clone)]
pub struct ContentFilter {
    max_length: usize,
    banned_words: Vec<String>,
}

impl ContentFilter {
    pub fn new(max_length: usize, banned_words: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        ContentFilter {
            max_length,
            banned_words: banned_words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Validate `body` and return it with banned words masked
    pub fn clean(&self, body: &str) -> Result<String, ContentError> {
        if body.len() > self.max_length {
            return Err(ContentError::TooLong {
                len: body.len(),
                max: self.max_length,
            });
        }

        let cleaned: Vec<&str> = body
            .split(' ')
            .map(|word| if self.is_banned(word) { MASK } else { word })
            .collect();
        Ok(cleaned.join(" "))
    }

    fn is_banned(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.banned_words.iter().any(|b| *b == lower)
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        ContentFilter::new(DEFAULT_MAX_CHIRP_LENGTH, DEFAULT_BANNED_WORDS.iter().copied())
    }
}
