//! Log file location, timestamps and ANSI stripping.
use std::path::PathBuf;

/// Directory under the cache root that holds the log files.
const LOG_DIR: &str = "icon-converter";

/// Timestamp written in the header of each run.
pub(super) const HEADER_TIME: &str = "%Y-%m-%d %H:%M:%S";
/// Timestamp prefixed to each log line.
pub(super) const LINE_TIME: &str = "%H:%M:%S";

/// Remove terminal escape sequences so the log file stays plain text.
///
/// CSI sequences (`ESC [ ... final`) are dropped through their final byte in
/// the `@`..=`~` range; any other escape drops only the byte that follows it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next_if_eq(&'[').is_some() {
            for inner in chars.by_ref() {
                if matches!(inner, '@'..='~') {
                    break;
                }
            }
        } else {
            chars.next();
        }
    }
    out
}

/// Cache root: `$XDG_CACHE_HOME`, else `~/.cache` (`%USERPROFILE%` on Windows),
/// else the working directory.
fn cache_root() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        return PathBuf::from(xdg);
    }
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_or_else(|_| PathBuf::from("."), |home| PathBuf::from(home).join(".cache"))
}

/// Return `<cache root>/icon-converter/<command>.log`, creating the directory.
///
/// Returns `None` when the directory cannot be created; logging then stays
/// console-only.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = cache_root().join(LOG_DIR);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current UTC time rendered with `pattern`.
pub(super) fn utc_now(pattern: &str) -> String {
    chrono::Utc::now().format(pattern).to_string()
}
