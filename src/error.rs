use core::fmt;

/// Errors returned by the advertising rotation.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// No free advertising set is left to activate a definition on.
    ///
    /// This is non-fatal: the scheduler skips one activation and retries on
    /// the next tick.
    Exhausted,

    /// An advertising set handle outside the supported range was used.
    InvalidHandle,

    /// The controller rejected a command.
    ///
    /// Commands are not retried; the affected definition stays inactive until
    /// the rotation reaches it again.
    Rejected,

    /// Unexpectedly reached the end of a fixed-size buffer.
    ///
    /// Returned when a payload source tries to fit too much data into an
    /// advertising payload buffer.
    Eof,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::Exhausted => "no free advertising set",
            Error::InvalidHandle => "advertising set handle out of range",
            Error::Rejected => "command rejected by controller",
            Error::Eof => "end of buffer",
        })
    }
}
