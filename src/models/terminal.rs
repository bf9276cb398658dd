//! Terminal output types.

/// A single line of command output.
///
/// Commands never print directly; they return lines and the REPL decides
/// where each kind goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputLine {
    /// Plain text output
    Text(String),
    /// Error message (stderr)
    Error(String),
    /// Success message
    Success(String),
    /// Informational notice
    Info(String),
}

impl OutputLine {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }

    pub fn success(s: impl Into<String>) -> Self {
        Self::Success(s.into())
    }

    pub fn info(s: impl Into<String>) -> Self {
        Self::Info(s.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The line's text without any decoration.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Error(s) | Self::Success(s) | Self::Info(s) => s,
        }
    }
}
