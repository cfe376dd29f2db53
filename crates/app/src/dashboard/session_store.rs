//! Persisted client session.

use std::{
    fmt,
    fs::{self, File, OpenOptions},
    io::{self, Write as _},
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::users::UserRef;

/// File holding the raw session token.
pub const TOKEN_KEY: &str = "prd_tracker_token";

/// File holding the signed-in identity as JSON.
pub const USER_KEY: &str = "prd_tracker_user";

/// Token and identity kept between operator invocations.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: UserRef,
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"**redacted**")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("failed to access session file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stored identity is unreadable")]
    Corrupt(#[source] serde_json::Error),

    #[error("session store lock poisoned")]
    Poisoned,
}

/// Durable storage for the operator's session.
pub trait SessionStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if stored state exists but cannot be read.
    fn load(&self) -> Result<Option<StoredSession>, SessionStoreError>;

    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    fn save(&self, session: &StoredSession) -> Result<(), SessionStoreError>;

    /// Remove token and identity together.
    ///
    /// # Errors
    ///
    /// Returns an error if either entry exists but cannot be removed.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// Session kept as two files under a state directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, SessionStoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SessionStoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn remove_optional(path: &Path) -> Result<(), SessionStoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SessionStoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Owner read/write only; the token is a bearer credential.
#[cfg(unix)]
const PRIVATE_MODE: u32 = 0o600;

fn write(path: PathBuf, contents: &[u8]) -> Result<(), SessionStoreError> {
    write_private(&path, contents).map_err(|source| SessionStoreError::Io { path, source })
}

fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = open_private(path)?;

    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt as _, PermissionsExt as _};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(PRIVATE_MODE)
        .open(path)?;

    // `mode` only applies on creation; tighten files left by older versions.
    file.set_permissions(fs::Permissions::from_mode(PRIVATE_MODE))?;

    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionStoreError> {
        let token = read_optional(&self.path(TOKEN_KEY))?;
        let user = read_optional(&self.path(USER_KEY))?;

        let (Some(token), Some(user)) = (token, user) else {
            return Ok(None);
        };

        let token = token.trim().to_string();

        if token.is_empty() {
            return Ok(None);
        }

        let user = serde_json::from_str(&user).map_err(SessionStoreError::Corrupt)?;

        Ok(Some(StoredSession { token, user }))
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| SessionStoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let user = serde_json::to_vec(&session.user).map_err(SessionStoreError::Corrupt)?;

        write(self.path(TOKEN_KEY), session.token.as_bytes())?;
        write(self.path(USER_KEY), &user)
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        remove_optional(&self.path(TOKEN_KEY))?;
        remove_optional(&self.path(USER_KEY))
    }
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionStoreError> {
        self.session
            .lock()
            .map(|session| session.clone())
            .map_err(|_poisoned| SessionStoreError::Poisoned)
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionStoreError> {
        let mut slot = self
            .session
            .lock()
            .map_err(|_poisoned| SessionStoreError::Poisoned)?;

        *slot = Some(session.clone());

        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let mut slot = self
            .session
            .lock()
            .map_err(|_poisoned| SessionStoreError::Poisoned)?;

        *slot = None;

        Ok(())
    }
}
