//! File-backed credential persistence.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use cmdgate_console::{Credential, CredentialStore};
use tracing::warn;

use crate::client::{CliError, CliResult};

/// Stores the last-used credential in a single file readable only by the owner.
#[derive(Debug, Clone)]
pub(crate) struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub(crate) const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolve the store location from the flag or the platform config directory.
    pub(crate) fn resolve(explicit: Option<PathBuf>) -> CliResult<Self> {
        explicit
            .or_else(default_path)
            .map(Self::new)
            .ok_or_else(|| {
                CliError::validation(
                    "cannot locate a config directory; pass --credential-file or set CMDGATE_CREDENTIAL_FILE",
                )
            })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cmdgate").join("credential"))
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credential> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Credential::parse(&contents),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read credential file");
                None
            }
        }
    }

    fn save(&self, credential: &Credential) {
        if let Err(err) = write_private(&self.path, credential.expose()) {
            warn!(path = %self.path.display(), error = %err, "failed to persist credential");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to remove credential file");
            }
        }
    }
}

fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // The creation mode does not apply to a file that already existed.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}
