use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Everything that can end a packing run.
///
/// None of these are recovered from; the binary prints the `Display` form and exits.
#[derive(Debug)]
pub enum Error {
    /// Bad or missing command-line arguments
    Usage(String),
    /// The source file could not be opened or fully read
    InputRead { path: PathBuf, source: io::Error },
    /// The destination file could not be created
    OutputOpen { path: PathBuf, source: io::Error },
    /// A compression backend reported failure
    Compression(io::Error),
    /// Writing a section of the container failed; `section` names it (e.g. `IHDR`)
    Write { section: &'static str, source: io::Error },
    /// Payload can't be framed as a chunk (over 2^31 - 1 bytes, or too short for the CRC overflow)
    ChunkTooLarge { tag: [u8; 4], len: usize },
    /// The PNG stream ends inside a chunk; `available` bytes were left
    Truncated { available: usize },
}

impl Error {
    /// Short name of the error class, independent of the details.
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::Usage(_) => "usage error",
            Error::InputRead { .. } => "failed to read input file",
            Error::OutputOpen { .. } => "failed to open output file",
            Error::Compression(_) => "failed to compress image data",
            Error::Write { .. } => "failed to write output",
            Error::ChunkTooLarge { .. } => "chunk payload has invalid size",
            Error::Truncated { .. } => "PNG data ends inside a chunk",
        }
    }

    pub(crate) fn write(section: &'static str) -> impl FnOnce(io::Error) -> Error {
        move |source| Error::Write { section, source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Usage(msg) => write!(f, "{}: {}", self.as_str(), msg),
            Error::InputRead { path, source } => write!(f, "{} '{}': {}", self.as_str(), path.display(), source),
            Error::OutputOpen { path, source } => write!(f, "{} '{}': {}", self.as_str(), path.display(), source),
            Error::Compression(source) => write!(f, "{}: {}", self.as_str(), source),
            Error::Write { section, source } => write!(f, "{} ({}): {}", self.as_str(), section, source),
            Error::ChunkTooLarge { tag, len } => {
                write!(f, "{} ({}, {} bytes)", self.as_str(), String::from_utf8_lossy(tag), len)
            },
            Error::Truncated { available } => write!(f, "{} ({} bytes left)", self.as_str(), available),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::InputRead { source, .. } |
            Error::OutputOpen { source, .. } |
            Error::Write { source, .. } |
            Error::Compression(source) => Some(source),
            Error::Usage(_) | Error::ChunkTooLarge { .. } | Error::Truncated { .. } => None,
        }
    }
}
