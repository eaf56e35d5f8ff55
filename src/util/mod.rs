use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// Logs the error held by `$result`, if any, without propagating it.
#[macro_export]
macro_rules! log_if_err {
    ($result:expr, $fmt:expr) => {{
        if let Err(ref e) = $result {
            ::log::error!(concat!($fmt, ": {}"), e);
        }
    }};
    ($result:expr, $fmt:expr, $($arg:tt)+) => {{
        if let Err(ref e) = $result {
            ::log::error!(concat!($fmt, ": {}"), $($arg)+, e);
        }
    }};
}

pub use self::unix::isatty;

pub mod unix;

/// Mysh Utility Extensions for `ExitStatus`
pub trait MyshExitStatusExt {
    /// Create an ExitStatus to indicate *successful* program execution.
    fn from_success() -> Self;

    /// Create an ExitStatus to indicate *unsuccessful* program execution.
    fn from_failure() -> Self;

    /// Create an ExitStatus from a status code
    fn from_status(code: i32) -> Self;
}

impl MyshExitStatusExt for ExitStatus {
    /// # Examples
    /// ```rust
    /// use mysh_rs::MyshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(ExitStatus::from_success().success());
    /// ```
    fn from_success() -> Self {
        ExitStatus::from_status(0)
    }

    /// # Examples
    /// ```rust
    /// use mysh_rs::MyshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(!ExitStatus::from_failure().success());
    /// ```
    fn from_failure() -> Self {
        ExitStatus::from_status(1)
    }

    /// # Examples
    /// ```rust
    /// use mysh_rs::MyshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(ExitStatus::from_status(0).success());
    /// assert_eq!(ExitStatus::from_status(3).code(), Some(3));
    /// ```
    fn from_status(code: i32) -> Self {
        ExitStatus::from_raw((code & 0xff) << 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_round_trips_code() {
        assert_eq!(ExitStatus::from_status(0).code(), Some(0));
        assert_eq!(ExitStatus::from_status(1).code(), Some(1));
        assert_eq!(ExitStatus::from_status(127).code(), Some(127));
    }
}
