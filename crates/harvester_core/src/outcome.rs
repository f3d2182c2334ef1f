use std::fmt;

/// Pages whose text is this many characters or fewer are treated as failures.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Result of fetching one page, as reported back to the harvest loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success(String),
    Failure(FetchFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The server answered with a status that is never retried.
    PermanentStatus(u16),
    /// Every attempt hit a transient error.
    RetriesExhausted { attempts: u32 },
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::PermanentStatus(code) => write!(f, "permanent http status {code}"),
            FetchFailure::RetriesExhausted { attempts } => {
                write!(f, "gave up after {attempts} attempts")
            }
        }
    }
}

impl FetchResult {
    /// Text worth keeping: a success longer than [`MIN_DESCRIPTION_CHARS`].
    pub fn usable_text(&self) -> Option<&str> {
        match self {
            FetchResult::Success(text) if text.chars().count() > MIN_DESCRIPTION_CHARS => {
                Some(text)
            }
            _ => None,
        }
    }

    pub fn into_usable_text(self) -> Option<String> {
        match self {
            FetchResult::Success(text) if text.chars().count() > MIN_DESCRIPTION_CHARS => {
                Some(text)
            }
            _ => None,
        }
    }
}
