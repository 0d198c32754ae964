//! Remote path composition.
//!
//! rclone addresses everything as `<remote>:<container>/<path>`. These helpers
//! build that string from the resolved prefix, the optional container and a
//! caller-supplied relative path.

pub const SEPARATOR: char = '/';

/// Strip every leading separator.
pub fn strip_leading_separator(path: &str) -> &str {
    path.trim_start_matches(SEPARATOR)
}

/// Strip trailing `.` characters left behind by "current directory" paths.
pub fn strip_current_dir(path: &str) -> &str {
    path.trim_end_matches('.')
}

/// Append a separator unless one is already there.
pub fn with_trailing_separator(path: &str) -> String {
    if path.ends_with(SEPARATOR) {
        path.to_string()
    } else {
        format!("{path}{SEPARATOR}")
    }
}

/// `<prefix><container>`, the address of the container itself.
pub fn container_path(prefix: &str, container: &str) -> String {
    format!("{prefix}{container}")
}

/// Build the fully-qualified remote path for `relative_path`.
///
/// An empty `container` is omitted entirely. Directory targets always end in
/// a separator so rclone materialises a directory rather than a same-named
/// object, except for the bare remote root (`name:`), which is left alone.
///
/// Trailing `.` segments are not touched here; the transfer operations in
/// `space` run their paths through [`strip_current_dir`] before composing.
pub fn compose(prefix: &str, container: &str, relative_path: &str, is_directory: bool) -> String {
    let relative = strip_leading_separator(relative_path);

    let mut composed = String::with_capacity(prefix.len() + container.len() + relative.len() + 2);
    composed.push_str(prefix);
    if !container.is_empty() {
        composed.push_str(container);
        composed.push(SEPARATOR);
    }
    composed.push_str(relative);

    if is_directory && composed.len() > prefix.len() && !composed.ends_with(SEPARATOR) {
        composed.push(SEPARATOR);
    }
    composed
}
