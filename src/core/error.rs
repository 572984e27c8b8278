use thiserror::Error;
use uuid::Uuid;

/// How the host should react to a rejected action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Ignore; the view stays as it was.
    Silent,
    /// Tell the user why nothing happened.
    Surfaced,
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("group name is blank")]
    BlankName,
    #[error("memo has no text")]
    EmptyBody,
    #[error("clipboard is empty")]
    ClipboardEmpty,
    #[error("no selection inside the editor")]
    NoSelection,
    #[error("link or image URL is blank")]
    BlankUrl,
    #[error("unknown group: {0}")]
    UnknownGroup(String),
    #[error("memo {0} not found")]
    UnknownMemo(Uuid),
    #[error("{0} is not a memo color")]
    UnknownColor(String),
    #[error("cancelled")]
    Cancelled,
    #[error("the last group cannot be deleted")]
    LastGroup,
    #[error("group {0} is locked")]
    GroupLocked(String),
}

impl BoardError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::LastGroup | Self::GroupLocked(_) => Severity::Surfaced,
            _ => Severity::Silent,
        }
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_rejections_are_surfaced() {
        assert_eq!(BoardError::LastGroup.severity(), Severity::Surfaced);
        assert_eq!(BoardError::GroupLocked("기본".into()).severity(), Severity::Surfaced);
        assert_eq!(BoardError::EmptyBody.severity(), Severity::Silent);
        assert_eq!(BoardError::Cancelled.severity(), Severity::Silent);
    }

    #[test]
    fn messages_name_the_group() {
        assert_eq!(BoardError::GroupLocked("업무".into()).to_string(), "group 업무 is locked");
    }
}
