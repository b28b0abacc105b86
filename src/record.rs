use serde::{Serialize, Serializer};
use std::fmt;

/// One URL-shaped cell found in a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    pub url: String,
    pub sheet: String,
    pub row: u32, // 1-based, header is row 1
    pub column: String,
}

/// Result of probing a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    Code(u16),
    ConnectionError,
    Timeout,
    /// Failure reported by the HTTP client itself.
    RequestError(String),
    /// Anything else that kept the request from being made.
    Failed(String),
}

impl StatusOutcome {
    /// Numeric codes from 400 up are broken, and so is every non-numeric outcome.
    pub fn is_broken(&self) -> bool {
        match self {
            StatusOutcome::Code(code) => *code >= 400,
            _ => true,
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            StatusOutcome::Code(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusOutcome::Code(code) => write!(f, "{code}"),
            StatusOutcome::ConnectionError => write!(f, "Connection Error"),
            StatusOutcome::Timeout => write!(f, "Timeout"),
            StatusOutcome::RequestError(msg) | StatusOutcome::Failed(msg) => {
                write!(f, "Error: {msg}")
            }
        }
    }
}

// Codes serialize as numbers, labels as their display text.
impl Serialize for StatusOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatusOutcome::Code(code) => serializer.serialize_u16(*code),
            other => serializer.collect_str(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: UrlRecord,
    pub status: StatusOutcome,
}

impl AnnotatedRecord {
    pub fn is_broken(&self) -> bool {
        self.status.is_broken()
    }
}
