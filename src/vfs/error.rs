//! Filesystem Error Type and Wire Codes
//!
//! Failures are local and non-fatal: every entry point returns a typed
//! error rather than aborting. On the request envelope the error travels
//! as a negative integer code, distinct from the non-negative byte counts
//! returned by read/write.

use core::fmt;

/// Result type for filesystem operations
pub type FsResult<T> = Result<T, FsError>;

/// Filesystem error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// Malformed or unsupported request (bad discriminant, bad magic)
    BadRequest,
    /// No driver registered under the given filesystem descriptor
    NoDriver,
    /// A driver violated its contract for an operation it claims to support
    Fault,
    /// Valid request, but no matching node, data or path component
    NotPresent,
    /// Invalid argument (out-of-range inode, free slot, empty flags)
    InvalidArgument,
    /// Operation requires a directory
    NotADirectory,
    /// Operation requires a file with data storage
    NotAFile,
    /// Inode table is full
    NoSpace,
    /// Operation is declared but intentionally not implemented
    NotSupported,
    /// Name or path exceeds its bounded length
    NameTooLong,
}

impl FsError {
    /// Wire code written into a request envelope's result field.
    /// All codes are negative; 0 and positive values mean success.
    pub const fn code(self) -> i64 {
        match self {
            Self::BadRequest => -1,
            Self::NoDriver => -2,
            Self::Fault => -3,
            Self::NotPresent => -4,
            Self::InvalidArgument => -5,
            Self::NotADirectory => -6,
            Self::NotAFile => -7,
            Self::NoSpace => -8,
            Self::NotSupported => -9,
            Self::NameTooLong => -10,
        }
    }

    /// Map a wire code back to its error. Unknown negative codes collapse
    /// to `Fault`; non-negative codes are success values, not errors.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::BadRequest),
            -2 => Some(Self::NoDriver),
            -3 => Some(Self::Fault),
            -4 => Some(Self::NotPresent),
            -5 => Some(Self::InvalidArgument),
            -6 => Some(Self::NotADirectory),
            -7 => Some(Self::NotAFile),
            -8 => Some(Self::NoSpace),
            -9 => Some(Self::NotSupported),
            -10 => Some(Self::NameTooLong),
            c if c < 0 => Some(Self::Fault),
            _ => None,
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "Bad request"),
            Self::NoDriver => write!(f, "No such driver"),
            Self::Fault => write!(f, "Driver fault"),
            Self::NotPresent => write!(f, "Not present"),
            Self::InvalidArgument => write!(f, "Invalid argument"),
            Self::NotADirectory => write!(f, "Not a directory"),
            Self::NotAFile => write!(f, "Not a file"),
            Self::NoSpace => write!(f, "No space left in inode table"),
            Self::NotSupported => write!(f, "Not supported"),
            Self::NameTooLong => write!(f, "Name too long"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_negative_and_distinct() {
        let all = [
            FsError::BadRequest,
            FsError::NoDriver,
            FsError::Fault,
            FsError::NotPresent,
            FsError::InvalidArgument,
            FsError::NotADirectory,
            FsError::NotAFile,
            FsError::NoSpace,
            FsError::NotSupported,
            FsError::NameTooLong,
        ];
        for (i, a) in all.iter().enumerate() {
            assert!(a.code() < 0);
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }
}
