use std::os::unix::io::RawFd;

use nix::unistd;

/// Returns `true` if `fd` refers to a terminal. Errors count as "not a terminal".
pub fn isatty(fd: RawFd) -> bool {
    let temp_result = unistd::isatty(fd);
    log_if_err!(temp_result, "unistd::isatty({})", fd);
    temp_result.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::os::unix::io::AsRawFd;

    #[test]
    fn test_null_device_is_not_a_tty() {
        let file = File::open("/dev/null").unwrap();
        assert!(!isatty(file.as_raw_fd()));
    }
}
