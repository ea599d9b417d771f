//! Out-of-band secret loading.
//!
//! Credentials never live in the configuration file or the repository.
//! A secret is looked up in these places, first hit wins:
//!
//! 1. an already-open file descriptor named by `<PREFIX>_FD` (unix)
//! 2. a file path named by `<PREFIX>_FILE`
//! 3. a container secret mount (e.g. `/run/secrets/...`)
//! 4. the plain `<PREFIX>` environment variable, debug builds only
//!
//! Values are returned in `Zeroizing` buffers.

use std::path::Path;
#[cfg(unix)]
use std::{io::Read, os::unix::io::FromRawFd};

use zeroize::Zeroizing;

/// Where one secret may be found.
#[derive(Debug, Clone, Copy)]
pub struct SecretSource {
    pub fd_env: &'static str,
    pub file_env: &'static str,
    pub container_path: &'static str,
    pub dev_env: &'static str,
}

/// SMTP password (or app password) of the report sender account.
pub const SMTP_PASSWORD: SecretSource = SecretSource {
    fd_env: "DIAGAI_SMTP_PASSWORD_FD",
    file_env: "DIAGAI_SMTP_PASSWORD_FILE",
    container_path: "/run/secrets/diagai_smtp_password",
    dev_env: "DIAGAI_SMTP_PASSWORD",
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecretError {
    #[error("Secret not provided: set {fd_env} or {file_env} (or mount {container_path})")]
    Missing {
        fd_env: &'static str,
        file_env: &'static str,
        container_path: &'static str,
    },

    #[error("Secret source {0} is empty")]
    Empty(String),

    #[error("Failed to read secret from {source_name}: {message}")]
    Unreadable { source_name: String, message: String },
}

fn non_empty(raw: String, source_name: &str) -> Result<Zeroizing<String>, SecretError> {
    let raw = Zeroizing::new(raw);
    let secret = raw.trim_end_matches(['\n', '\r']).to_string();
    if secret.is_empty() {
        return Err(SecretError::Empty(source_name.to_string()));
    }
    Ok(Zeroizing::new(secret))
}

fn read_file(path: &Path, source_name: &str) -> Result<Zeroizing<String>, SecretError> {
    let content = std::fs::read_to_string(path).map_err(|e| SecretError::Unreadable {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;
    non_empty(content, source_name)
}

/// Resolve a secret from its configured sources.
///
/// # Errors
/// Returns `SecretError::Missing` when no source is set, or another
/// `SecretError` when the first source found is unusable.
pub fn read_secret(source: &SecretSource) -> Result<Zeroizing<String>, SecretError> {
    // 1) Already-open FD (systemd credentials, sidecars)
    #[cfg(unix)]
    if let Ok(fd_str) = std::env::var(source.fd_env) {
        let fd: i32 = fd_str.trim().parse().map_err(|_| SecretError::Unreadable {
            source_name: source.fd_env.to_string(),
            message: format!("'{}' is not a file descriptor", fd_str.trim()),
        })?;
        if fd <= 2 {
            // Refuse stdio FDs to avoid interfering with the TUI.
            return Err(SecretError::Unreadable {
                source_name: source.fd_env.to_string(),
                message: "stdio descriptors are not accepted".to_string(),
            });
        }

        // SAFETY: We take ownership of the FD for one-time secret read and close it.
        let mut file = unsafe { std::fs::File::from_raw_fd(fd) };
        let mut buf = String::new();
        file.read_to_string(&mut buf)
            .map_err(|e| SecretError::Unreadable {
                source_name: source.fd_env.to_string(),
                message: e.to_string(),
            })?;
        return non_empty(buf, source.fd_env);
    }

    // 2) Explicit file path
    if let Ok(path) = std::env::var(source.file_env) {
        return read_file(Path::new(path.trim()), source.file_env);
    }

    // 3) Container secret mount
    let mounted = Path::new(source.container_path);
    if mounted.exists() {
        return read_file(mounted, source.container_path);
    }

    // 4) Dev-only env var (refused in release builds)
    if cfg!(debug_assertions) {
        if let Ok(v) = std::env::var(source.dev_env) {
            tracing::warn!("Reading secret from {} (debug builds only)", source.dev_env);
            return non_empty(v, source.dev_env);
        }
    }

    Err(SecretError::Missing {
        fd_env: source.fd_env,
        file_env: source.file_env,
        container_path: source.container_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Each test owns its variable names so parallel tests do not collide.
    fn source(tag: &'static str) -> SecretSource {
        let leak = |s: String| -> &'static str { Box::leak(s.into_boxed_str()) };
        SecretSource {
            fd_env: leak(format!("DIAGAI_TEST_{tag}_FD")),
            file_env: leak(format!("DIAGAI_TEST_{tag}_FILE")),
            container_path: leak(format!("/nonexistent/diagai_test_{tag}")),
            dev_env: leak(format!("DIAGAI_TEST_{tag}")),
        }
    }

    #[test]
    fn test_missing_secret() {
        let err = read_secret(&source("MISSING")).expect_err("nothing configured");
        assert!(matches!(err, SecretError::Missing { .. }));
    }

    #[test]
    fn test_secret_from_file() {
        let src = source("FILE");
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "app-password-123").expect("write");
        std::env::set_var(src.file_env, file.path());

        let secret = read_secret(&src).expect("read");
        assert_eq!(secret.as_str(), "app-password-123");
    }

    #[test]
    fn test_empty_file_rejected() {
        let src = source("EMPTYFILE");
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        std::env::set_var(src.file_env, file.path());

        assert!(matches!(read_secret(&src), Err(SecretError::Empty(_))));
    }

    #[test]
    fn test_dev_env_in_debug() {
        let src = source("DEV");
        std::env::set_var(src.dev_env, "from-env\n");

        let result = read_secret(&src);
        if cfg!(debug_assertions) {
            assert_eq!(result.expect("debug build").as_str(), "from-env");
        } else {
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_file_wins_over_dev_env() {
        let src = source("FILEFIRST");
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "from-file").expect("write");
        std::env::set_var(src.file_env, file.path());
        std::env::set_var(src.dev_env, "from-env");

        assert_eq!(read_secret(&src).expect("read").as_str(), "from-file");
    }

    #[test]
    #[cfg(unix)]
    fn test_fd_wins_over_file() {
        use std::io::{Seek, SeekFrom};
        use std::os::unix::io::IntoRawFd;

        let src = source("FDFIRST");
        let mut fd_file = tempfile::tempfile().expect("tempfile");
        write!(fd_file, "from-fd").expect("write");
        fd_file.seek(SeekFrom::Start(0)).expect("rewind");
        // read_secret takes ownership and closes it.
        let fd = fd_file.into_raw_fd();
        assert!(fd > 2);

        let mut path_file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(path_file, "from-file").expect("write");
        std::env::set_var(src.fd_env, fd.to_string());
        std::env::set_var(src.file_env, path_file.path());

        assert_eq!(read_secret(&src).expect("read").as_str(), "from-fd");
    }

    #[test]
    #[cfg(unix)]
    fn test_stdio_fd_refused() {
        let src = source("FD");
        std::env::set_var(src.fd_env, "1");
        assert!(matches!(read_secret(&src), Err(SecretError::Unreadable { .. })));
    }
}
