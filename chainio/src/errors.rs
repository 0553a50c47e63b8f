// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for BlobIO operations.
pub type BlobIOResult<T = ()> = core::result::Result<T, BlobIOError>;

/// Error type for BlobIO operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobIOError {
    /// No record is stored under the requested key.
    NotFound,
    /// Key is empty or escapes the store namespace.
    InvalidKey,
    /// Underlying device error.
    Io(std::io::ErrorKind),
    Other(&'static str),
}

impl BlobIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            BlobIOError::NotFound => "Record not found",
            BlobIOError::InvalidKey => "Invalid record key",
            BlobIOError::Io(_) => "Storage I/O error",
            BlobIOError::Other(msg) => msg,
        }
    }
}

impl From<&'static str> for BlobIOError {
    #[inline]
    fn from(msg: &'static str) -> Self {
        BlobIOError::Other(msg)
    }
}

impl From<std::io::Error> for BlobIOError {
    #[cold]
    #[inline(never)]
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => BlobIOError::NotFound,
            kind => BlobIOError::Io(kind),
        }
    }
}

impl fmt::Display for BlobIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        if let BlobIOError::Io(kind) = self {
            write!(f, " ({kind})")?;
        }
        Ok(())
    }
}

impl std::error::Error for BlobIOError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let nf = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert_eq!(BlobIOError::from(nf), BlobIOError::NotFound);

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let err = BlobIOError::from(denied);
        assert_eq!(err, BlobIOError::Io(std::io::ErrorKind::PermissionDenied));
        assert!(err.to_string().starts_with("Storage I/O error"));
    }
}
