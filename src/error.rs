use std::{io, path::PathBuf};

/// everything that can go wrong while encoding or decoding a container
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// there is nothing to build a tree from
    #[error("input is empty")]
    EmptyInput,

    /// input was requested from stdin, but stdin is a terminal
    #[error("refusing to read from a terminal, pipe the input or give a path")]
    NoStdin,

    /// a file could not be opened, read or written
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// just relaying io::Error
    #[error(transparent)]
    Io(#[from] io::Error),

    /// the serialized tree in the header does not follow the bracket grammar
    #[error("malformed tree string at byte {offset}: {reason}")]
    MalformedTree { offset: usize, reason: &'static str },

    /// a textual code contains something other than 0s and 1s
    #[error("unexpected bit value {value:?} at position {position}")]
    UnexpectedBitValue { position: usize, value: char },

    /// the container is shorter than its header claims
    #[error("container truncated: needed {needed} bytes, {available} available")]
    TruncatedContainer { needed: u64, available: u64 },

    /// packed bits ran out before every symbol was decoded
    #[error("payload truncated: decoded {decoded} of {expected} symbols")]
    TruncatedPayload { decoded: u64, expected: u64 },

    /// the header asks for more output than can be allocated
    #[error("symbol count {0} is too large to decode")]
    SymbolCountTooLarge(u64),

    /// a symbol has no entry in the code table
    #[error("no code for symbol {0:#04x}")]
    MissingCode(u8),
}

impl Error {
    pub(crate) fn malformed(offset: usize, reason: &'static str) -> Self {
        Error::MalformedTree { offset, reason }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
