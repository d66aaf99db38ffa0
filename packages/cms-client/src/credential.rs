//! The current bearer credential.
//!
//! One token per process: written at login, cleared at logout, read by every
//! resource call and handed to the client explicitly. Optionally persisted to
//! a JSON file so a CLI session survives restarts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::CredentialError;

/// Bearer token issued by the backend at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Serialize, Deserialize)]
struct PersistedCredential {
    token: Credential,
}

/// Holder for the process-wide credential.
#[derive(Debug, Default)]
pub struct CredentialStore {
    current: RwLock<Option<Credential>>,
    file: Option<PathBuf>,
}

impl CredentialStore {
    /// In-memory store, starts empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// File-backed store. Loads the persisted token when the file exists.
    pub fn with_file(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let path = path.into();
        let current = load(&path)?;
        if current.is_some() {
            tracing::debug!(path = %path.display(), "Loaded persisted credential");
        }
        Ok(Self {
            current: RwLock::new(current),
            file: Some(path),
        })
    }

    pub fn get(&self) -> Option<Credential> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }

    /// Replace the current credential (login).
    pub fn set(&self, credential: Credential) -> Result<(), CredentialError> {
        if let Some(path) = &self.file {
            let persisted = PersistedCredential {
                token: credential.clone(),
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serde_json::to_vec_pretty(&persisted)?)?;
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(credential);
        Ok(())
    }

    /// Drop the current credential (logout).
    pub fn clear(&self) -> Result<(), CredentialError> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(path) = &self.file {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

fn load(path: &Path) -> Result<Option<Credential>, CredentialError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let persisted: PersistedCredential = serde_json::from_slice(&bytes)?;
            Ok(Some(persisted.token))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
