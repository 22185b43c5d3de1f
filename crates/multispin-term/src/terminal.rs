// SPDX-License-Identifier: MIT
//
// Terminal probes and echo suppression.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ) and isatty. These are the standard POSIX
// interfaces for terminal control; there is no safe alternative. Each
// unsafe block is minimal.
#![allow(unsafe_code)]
//
// The spinner block is drawn on stderr, so every probe here looks at fd 2,
// except echo suppression which necessarily works on stdin: while the block
// is animating, a stray Enter from the user would echo a newline into the
// middle of it and shift every row we think we own. We clear ECHO/ECHONL
// for the duration and put the original termios back afterwards. ISIG stays
// on, so Ctrl-C still reaches the interrupt hook.

// ─── Size ───────────────────────────────────────────────────────────────────

/// Width of the terminal attached to stderr, via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stderr is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn stderr_columns() -> Option<u16> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDERR_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 {
        Some(ws.ws_col)
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn stderr_columns() -> Option<u16> {
    None
}

// ─── TTY / CI ───────────────────────────────────────────────────────────────

/// Check whether stderr is connected to a terminal.
#[cfg(unix)]
#[must_use]
pub fn stderr_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDERR_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn stderr_is_tty() -> bool {
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

/// Check whether stdin is connected to a terminal.
#[cfg(unix)]
#[must_use]
pub fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn stdin_is_tty() -> bool {
    false
}

/// Whether the process looks like it runs under a CI service.
#[must_use]
pub fn is_ci() -> bool {
    ci_from_env(|key| std::env::var(key).ok())
}

/// CI detection over an injectable environment lookup.
///
/// `CI=false` is an explicit opt-out; any of the usual CI markers opts in.
pub fn ci_from_env(get: impl Fn(&str) -> Option<String>) -> bool {
    if get("CI").is_some_and(|v| v == "false") {
        return false;
    }
    ["CI", "CONTINUOUS_INTEGRATION", "BUILD_NUMBER", "RUN_ID"]
        .iter()
        .any(|key| get(key).is_some())
}

/// Animation is only worth doing on an interactive stderr outside CI.
#[must_use]
pub fn is_interactive() -> bool {
    stderr_is_tty() && !is_ci()
}

// ─── Unicode ────────────────────────────────────────────────────────────────

/// Best-effort probe for whether the terminal can draw Braille and check
/// marks. Callers may override it; the engine treats it as a plain boolean.
#[must_use]
pub fn supports_unicode() -> bool {
    unicode_from_env(|key| std::env::var(key).ok())
}

/// Unicode detection over an injectable environment lookup.
///
/// Unix terminals are assumed capable except the raw Linux console. On
/// Windows only terminals that are known to render it qualify.
pub fn unicode_from_env(get: impl Fn(&str) -> Option<String>) -> bool {
    if cfg!(windows) {
        return get("WT_SESSION").is_some()
            || get("TERMINUS_SUBLIME").is_some()
            || get("ConEmuTask").is_some_and(|v| v == "{cmd::Cmder}")
            || get("TERM_PROGRAM").is_some_and(|v| v == "vscode")
            || get("TERM").is_some_and(|v| v == "xterm-256color" || v == "alacritty");
    }
    get("TERM").is_none_or(|term| term != "linux")
}

// ─── Echo suppression ───────────────────────────────────────────────────────

/// Turns off stdin echo while alive and restores the saved termios after.
///
/// Created with [`EchoGuard::engage`]; restoring is idempotent and also
/// happens on drop.
pub struct EchoGuard {
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl EchoGuard {
    /// Disable `ECHO` and `ECHONL` on stdin.
    ///
    /// Returns `None` when stdin is not a terminal or termios refuses; the
    /// spinner block works without it, it is just less robust to typing.
    #[cfg(unix)]
    #[must_use]
    pub fn engage() -> Option<Self> {
        if !stdin_is_tty() {
            return None;
        }

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return None;
            }
            let original = termios;
            termios.c_lflag &= !(libc::ECHO | libc::ECHONL);
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const termios) != 0 {
                return None;
            }
            Some(Self {
                original: Some(original),
            })
        }
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn engage() -> Option<Self> {
        None
    }

    /// Put the original termios back. Safe to call more than once.
    #[cfg(unix)]
    pub fn restore(&mut self) {
        if let Some(original) = self.original.take() {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const original);
            }
        }
    }

    #[cfg(not(unix))]
    pub fn restore(&mut self) {}
}

impl Drop for EchoGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // ── Probes ───────────────────────────────────────────────────────

    #[test]
    fn stderr_columns_does_not_panic() {
        let _ = stderr_columns();
    }

    #[test]
    fn tty_probes_do_not_panic() {
        let _ = stderr_is_tty();
        let _ = stdin_is_tty();
        let _ = is_interactive();
    }

    // ── CI ───────────────────────────────────────────────────────────

    #[test]
    fn ci_detected_from_marker() {
        assert!(ci_from_env(env(&[("CI", "true")])));
        assert!(ci_from_env(env(&[("BUILD_NUMBER", "42")])));
    }

    #[test]
    fn ci_explicit_opt_out() {
        assert!(!ci_from_env(env(&[("CI", "false"), ("BUILD_NUMBER", "1")])));
    }

    #[test]
    fn no_ci_markers() {
        assert!(!ci_from_env(env(&[("HOME", "/root")])));
    }

    // ── Unicode ──────────────────────────────────────────────────────

    #[cfg(not(windows))]
    #[test]
    fn unicode_everywhere_but_linux_console() {
        assert!(unicode_from_env(env(&[("TERM", "xterm-256color")])));
        assert!(unicode_from_env(env(&[])));
        assert!(!unicode_from_env(env(&[("TERM", "linux")])));
    }

    // ── Echo ─────────────────────────────────────────────────────────

    #[test]
    fn echo_guard_restore_is_idempotent() {
        if let Some(mut guard) = EchoGuard::engage() {
            guard.restore();
            guard.restore();
        }
    }
}
