use derive_more::derive::{Display, Error};
use embedded_hal::i2c::ErrorKind;

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[expect(missing_docs, reason = "The variants are self-explanatory.")]
#[derive(Debug, Display, Error)]
pub enum Error {
    #[display("{name} range is empty")]
    EmptyRange { name: &'static str },

    #[display("{name} must be longer than zero")]
    ZeroDuration { name: &'static str },

    #[display("sort size {max} exceeds buffer capacity {capacity}")]
    SortSizeExceedsCapacity { max: u32, capacity: usize },

    #[display("winner policy must be one of merge, bubble, measured")]
    UnknownWinnerPolicy,

    #[display("{name} was never locked in")]
    SelectionNotLocked { name: &'static str },

    #[display("Format error")]
    FormatError,

    // `ErrorKind` does not implement `core::error::Error`, so it is a plain field.
    #[display("Character display bus error: {kind:?}")]
    DisplayBus { kind: ErrorKind },
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::FormatError
    }
}

impl From<()> for Error {
    fn from(_: ()) -> Self {
        Self::FormatError
    }
}
