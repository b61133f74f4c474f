//! Kernel command line lookup.
//!
//! Last read-only fallback source. The boot loader passes `androidboot.X=V`
//! parameters on the kernel command line; init surfaces each one as the
//! property `ro.X`. This module performs the same translation on the fly so
//! those properties stay resolvable without the service.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;


/// Upper bound on how much of the command line is read.
const CMDLINE_READ_MAX: usize = 1023;

/// Boot parameters with this prefix surface as `ro.*` properties.
const BOOT_PREFIX: &str = "androidboot.";


/// Resolve `key` from the command line pseudo-file at `path`.
///
/// Tokens are split on spaces, then on the first `=`. Only tokens named
/// `androidboot.<suffix>` with a non-empty suffix participate, matched
/// against `ro.<suffix>`. First match wins. An unreadable file means the
/// source is absent, so every failure yields `None`.
pub fn find_key(path: &Path, key: &str) -> Option<String> {
    let wanted = key.strip_prefix("ro.")?;
    let cmdline = read_cmdline(path)?;

    for token in cmdline.split(' ') {
        let (name, value) = match token.split_once('=') {
            Some(pair) => pair,
            None => continue,
        };
        match name.strip_prefix(BOOT_PREFIX) {
            Some(suffix) if !suffix.is_empty() && suffix == wanted => {
                return Some(value.to_string());
            }
            _ => continue,
        }
    }
    None
}


/// Read at most [`CMDLINE_READ_MAX`] bytes, stripping one trailing newline.
fn read_cmdline(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut buf = [0u8; CMDLINE_READ_MAX];
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => return None,
        }
    }

    let mut bytes = &buf[..filled];
    // a trailing newline happens on real /proc/cmdline
    if bytes.last() == Some(&b'\n') {
        bytes = &bytes[..bytes.len() - 1];
    }
    Some(String::from_utf8_lossy(bytes).into_owned())
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_SEQ: AtomicU32 = AtomicU32::new(0);

    fn write_cmdline(content: &str) -> PathBuf {
        let seq = TEST_SEQ.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("spc{}-{}.cmdline", std::process::id(), seq));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn boot_param_is_translated() {
        let path = write_cmdline("console=ttyS0 androidboot.hardware=myboard");
        assert_eq!(find_key(&path, "ro.hardware"), Some("myboard".to_string()));
        cleanup(&path);
    }

    #[test]
    fn plain_tokens_never_match() {
        let path = write_cmdline("console=ttyS0 quiet");
        assert_eq!(find_key(&path, "ro.console"), None);
        assert_eq!(find_key(&path, "console"), None);
        cleanup(&path);
    }

    #[test]
    fn empty_suffix_is_ignored() {
        let path = write_cmdline("androidboot.=oops androidboot.mode=normal");
        assert_eq!(find_key(&path, "ro."), None);
        assert_eq!(find_key(&path, "ro.mode"), Some("normal".to_string()));
        cleanup(&path);
    }

    #[test]
    fn empty_value_is_returned() {
        let path = write_cmdline("androidboot.serialno=");
        assert_eq!(find_key(&path, "ro.serialno"), Some(String::new()));
        cleanup(&path);
    }

    #[test]
    fn trailing_newline_is_stripped() {
        let path = write_cmdline("androidboot.hardware=myboard\n");
        assert_eq!(find_key(&path, "ro.hardware"), Some("myboard".to_string()));
        cleanup(&path);
    }

    #[test]
    fn missing_file_yields_none() {
        let path = std::env::temp_dir().join("spc-does-not-exist.cmdline");
        assert_eq!(find_key(&path, "ro.hardware"), None);
    }

    #[test]
    fn read_is_bounded() {
        // match placed past the read bound is invisible
        let mut content = "x".repeat(CMDLINE_READ_MAX);
        content.push_str(" androidboot.hardware=hidden");
        let path = write_cmdline(&content);
        assert_eq!(find_key(&path, "ro.hardware"), None);
        cleanup(&path);

        // same match inside the bound is found
        let mut content = String::from("androidboot.hardware=seen ");
        content.push_str(&"x".repeat(CMDLINE_READ_MAX));
        let path = write_cmdline(&content);
        assert_eq!(find_key(&path, "ro.hardware"), Some("seen".to_string()));
        cleanup(&path);
    }

    #[test]
    fn first_match_wins() {
        let path = write_cmdline("androidboot.mode=a androidboot.mode=b");
        assert_eq!(find_key(&path, "ro.mode"), Some("a".to_string()));
        cleanup(&path);
    }
}
