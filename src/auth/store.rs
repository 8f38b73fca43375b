use std::collections::HashMap;
use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// Fixed key the access credential is persisted under.
pub const CREDENTIAL_KEY: &str = "accessToken";

const SLOT_FILE_VERSION: u32 = 1;

/// Per-session key-value slot backing the credential store.
///
/// Survives a reload of the client (a fresh store over the same slot) but is
/// not meant to outlive the session it belongs to.
pub trait SessionSlot: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, AuthError>;
    fn save(&self, key: &str, value: &str) -> Result<(), AuthError>;
    fn clear(&self, key: &str) -> Result<(), AuthError>;
}

/// Configuration for file-backed session slots.
#[derive(Debug, Clone)]
pub struct SessionSlotConfig {
    pub base_dir: PathBuf,
}

impl SessionSlotConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_dir() -> PathBuf {
        default_session_dir()
    }
}

/// File-backed session slot, one TOML file per key.
///
/// # Example
/// ```no_run
/// use lumo::auth::{FileSessionSlot, SessionSlot, SessionSlotConfig};
///
/// let slot = FileSessionSlot::new(SessionSlotConfig::new("/tmp/lumo".into()));
/// slot.save("accessToken", "abc")?;
/// assert_eq!(slot.load("accessToken")?.as_deref(), Some("abc"));
/// # Ok::<(), lumo::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSessionSlot {
    base_dir: PathBuf,
}

impl FileSessionSlot {
    pub fn new(config: SessionSlotConfig) -> Self {
        Self {
            base_dir: config.base_dir,
        }
    }

    pub fn new_default() -> Self {
        Self {
            base_dir: default_session_dir(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.toml", normalize_key(key)))
    }
}

impl SessionSlot for FileSessionSlot {
    fn load(&self, key: &str) -> Result<Option<String>, AuthError> {
        let path = self.slot_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: SlotFile = toml::from_str(&raw)?;
        if file.version != SLOT_FILE_VERSION {
            return Err(AuthError::Serialization(format!(
                "unsupported session slot version {} at {}",
                file.version,
                path.display()
            )));
        }
        Ok(Some(file.value))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let file = SlotFile {
            version: SLOT_FILE_VERSION,
            key: key.to_string(),
            value: value.to_string(),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        atomic_write(&self.slot_path(key), serialized.as_bytes())
    }

    fn clear(&self, key: &str) -> Result<(), AuthError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

/// In-process session slot. Lives as long as the value itself.
#[derive(Debug, Default)]
pub struct MemorySessionSlot {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionSlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionSlot for MemorySessionSlot {
    fn load(&self, key: &str) -> Result<Option<String>, AuthError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), AuthError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SlotFile {
    version: u32,
    key: String,
    value: String,
    saved_at: DateTime<Utc>,
}

fn default_session_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".lumo").join("session"))
        .unwrap_or_else(|| PathBuf::from(".lumo").join("session"))
}

fn normalize_key(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let out: String = trimmed
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '-'
            }
        })
        .collect();
    if out.trim_matches('-').is_empty() {
        "default".to_string()
    } else {
        out
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| AuthError::Io(format!("slot path {} has no file name", path.display())))?;
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_path = path.with_file_name(format!(
        ".{}.tmp-{}-{nonce}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let write_result = (|| -> std::io::Result<()> {
        let mut temp_file = options.open(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        Ok(())
    })();

    if let Err(err) = write_result.and_then(|()| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}
