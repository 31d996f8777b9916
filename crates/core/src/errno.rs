//! Raw OS error codes as observed by racing workers.
//!
//! Outcomes are recorded as the real errno rather than a boolean so that
//! classification can tell "already exists" apart from "does not exist"
//! and from everything else.

use std::fmt;
use std::io;

/// An OS error number. `0` is success, `-1` means "not yet run".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Errno(i32);

impl Errno {
    /// The call succeeded.
    pub const SUCCESS: Errno = Errno(0);
    /// Sentinel for a result slot nobody wrote.
    pub const NOT_RUN: Errno = Errno(-1);

    /// File exists
    pub const EEXIST: Errno = Errno(libc::EEXIST);
    /// No such file or directory
    pub const ENOENT: Errno = Errno(libc::ENOENT);
    /// Input/output error
    pub const EIO: Errno = Errno(libc::EIO);
    /// Invalid argument
    pub const EINVAL: Errno = Errno(libc::EINVAL);
    /// Result out of range
    pub const ERANGE: Errno = Errno(libc::ERANGE);
    /// Resource temporarily unavailable
    pub const EAGAIN: Errno = Errno(libc::EAGAIN);
    /// Operation canceled
    pub const ECANCELED: Errno = Errno(libc::ECANCELED);
    /// Protocol error
    pub const EPROTO: Errno = Errno(libc::EPROTO);
    /// Bad address
    pub const EFAULT: Errno = Errno(libc::EFAULT);
    /// Cannot allocate memory
    pub const ENOMEM: Errno = Errno(libc::ENOMEM);

    /// Wrap a raw errno value.
    pub const fn new(raw: i32) -> Self {
        Errno(raw)
    }

    /// The raw errno value.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// True for `0`.
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Extract the errno carried by an I/O error.
    ///
    /// Errors synthesized by std (short writes, invalid data) carry no OS
    /// code and are reported as `EIO`.
    pub fn from_io(err: &io::Error) -> Self {
        err.raw_os_error().map(Errno).unwrap_or(Errno::EIO)
    }

    /// `SUCCESS` for `Ok`, the carried errno for `Err`.
    pub fn of<T>(result: &io::Result<T>) -> Self {
        match result {
            Ok(_) => Errno::SUCCESS,
            Err(e) => Errno::from_io(e),
        }
    }
}

impl From<Errno> for i32 {
    fn from(errno: Errno) -> i32 {
        errno.0
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "0 (success)"),
            -1 => write!(f, "-1 (not run)"),
            raw => write!(f, "{} ({})", raw, io::Error::from_raw_os_error(raw)),
        }
    }
}
