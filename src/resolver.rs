//! Maps a bare command name to an executable path.
//!
//! The search path is fixed; `$PATH` is never consulted.

use std::path::{Path, PathBuf};

use log::debug;
use nix::unistd::{self, AccessFlags};

/// Directories probed, in order, for a program named without a `/`.
pub const SEARCH_PATH: &[&str] = &["/usr/local/bin", "/usr/bin", "/bin"];

/// Resolves `name` to the program that would run for it.
///
/// Names containing a `/` are returned unchanged; whether they exist is only
/// discovered when the program is started.
///
/// # Examples
///
/// ```
/// use mysh_rs::resolver::find_program;
/// use std::path::PathBuf;
///
/// assert_eq!(find_program("./script"), Some(PathBuf::from("./script")));
/// assert_eq!(find_program("no-such-program-anywhere"), None);
/// ```
pub fn find_program<S: AsRef<str>>(name: S) -> Option<PathBuf> {
    let name = name.as_ref();
    if name.contains('/') {
        return Some(PathBuf::from(name));
    }

    find_program_in(name, SEARCH_PATH)
}

fn find_program_in<P: AsRef<Path>>(name: &str, dirs: &[P]) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let found = dirs
        .iter()
        .map(|dir| dir.as_ref().join(name))
        .find(|candidate| is_executable(candidate));
    debug!("resolved {} to {:?}", name, found);
    found
}

fn is_executable(path: &Path) -> bool {
    path.is_file() && unistd::access(path, AccessFlags::X_OK).is_ok()
}
