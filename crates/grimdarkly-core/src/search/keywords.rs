// ── Keyword accumulator ──
//
// Turns typed or pasted text into an ordered, deduplicated list of short
// tags. The list is the only stored form; the comma-joined wire string is
// always derived from it.

use thiserror::Error;
use tracing::debug;

pub const MIN_KEYWORD_LEN: usize = 2;
pub const MAX_KEYWORD_LEN: usize = 50;
pub const MAX_KEYWORDS: usize = 10;

/// Characters a keyword may never contain.
pub const DISALLOWED_CHARS: &str = "<>{}[]\\|`~!@#$%^&*()+=/";

/// Why a keyword candidate was not added. The list is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordError {
    #[error("keyword is empty")]
    Empty,

    #[error("keyword must be at least 2 characters")]
    TooShort,

    #[error("keyword must be at most 50 characters")]
    TooLong,

    #[error("keyword contains a disallowed character: '{0}'")]
    DisallowedChar(char),

    #[error("keyword '{0}' is already added")]
    Duplicate(String),

    #[error("at most 10 keywords can be combined")]
    LimitReached,
}

/// Check a candidate against the current list without modifying it.
/// Returns the trimmed keyword on success.
pub fn validate_keyword<'a>(candidate: &'a str, existing: &[String]) -> Result<&'a str, KeywordError> {
    let keyword = candidate.trim();
    if keyword.is_empty() {
        return Err(KeywordError::Empty);
    }

    let len = keyword.chars().count();
    if len < MIN_KEYWORD_LEN {
        return Err(KeywordError::TooShort);
    }
    if len > MAX_KEYWORD_LEN {
        return Err(KeywordError::TooLong);
    }

    if let Some(bad) = keyword.chars().find(|c| DISALLOWED_CHARS.contains(*c)) {
        return Err(KeywordError::DisallowedChar(bad));
    }

    if existing.iter().any(|k| k == keyword) {
        return Err(KeywordError::Duplicate(keyword.to_owned()));
    }

    if existing.len() >= MAX_KEYWORDS {
        return Err(KeywordError::LimitReached);
    }

    Ok(keyword)
}

/// Ordered keyword list plus the text currently being typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordAccumulator {
    keywords: Vec<String>,
    pending: String,
}

impl KeywordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing list, e.g. one parsed from a link.
    /// Entries that fail validation are dropped.
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut acc = Self::new();
        for k in keywords {
            // Invalid entries from outside are skipped.
            let _ = acc.try_add(k.as_ref());
        }
        acc
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// The comma-joined wire form of the list.
    pub fn joined(&self) -> String {
        self.keywords.join(",")
    }

    /// Validate and append a keyword.
    pub fn try_add(&mut self, candidate: &str) -> Result<(), KeywordError> {
        match validate_keyword(candidate, &self.keywords) {
            Ok(keyword) => {
                self.keywords.push(keyword.to_owned());
                Ok(())
            }
            Err(e) => {
                debug!(candidate, error = %e, "keyword rejected");
                Err(e)
            }
        }
    }

    /// Feed the full contents of the input box.
    ///
    /// Every comma-terminated segment is an add candidate; whatever follows
    /// the last comma stays in the pending buffer. Empty segments are
    /// skipped. Returns the rejections encountered.
    pub fn on_text_change(&mut self, text: &str) -> Vec<KeywordError> {
        let mut rejected = Vec::new();
        let mut rest = text;

        while let Some((head, tail)) = rest.split_once(',') {
            if !head.trim().is_empty() {
                if let Err(e) = self.try_add(head) {
                    rejected.push(e);
                }
            }
            rest = tail.trim_start();
        }

        rest.clone_into(&mut self.pending);
        rejected
    }

    /// Enter: commit the whole pending buffer. The buffer is cleared
    /// whether or not the keyword was accepted.
    pub fn on_commit(&mut self) -> Result<(), KeywordError> {
        let candidate = std::mem::take(&mut self.pending);
        self.try_add(&candidate)
    }

    /// Backspace with an empty buffer removes the most recent keyword.
    pub fn on_backspace_empty(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            self.keywords.pop()
        } else {
            None
        }
    }

    /// Remove an exact match at any position.
    pub fn remove(&mut self, keyword: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        self.keywords.len() != before
    }

    /// Drop every keyword and the pending text.
    pub fn clear(&mut self) {
        self.keywords.clear();
        self.pending.clear();
    }
}
