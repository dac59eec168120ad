use crate::kv::{KvError, Result};
use crc32fast::Hasher as Crc32;
use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::RwLock,
};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Flat string-keyed store with synchronous, whole-value reads and writes.
///
/// A `set` replaces the previous value completely; readers never observe a
/// half-written value.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Keys starting with `prefix`, sorted.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// In-process store, the equivalent of a tab's local storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| KvError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| KvError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| KvError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| KvError::Poisoned)?;
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

// Record header format (fixed size): [magic: 4][crc32: u32 BE][len: u32 BE]
const HEADER_SIZE: usize = 12;
const MAGIC: &[u8; 4] = b"SFKV";
const RECORD_EXT: &str = "rec";

/// Directory-backed store: one checksummed file per key.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the old record, so a crash mid-write leaves the previous
/// value in place.
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn open(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(|e| KvError::io(&base_path, e))?;
        debug!(path = %base_path.display(), "file store opened");
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn record_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self
            .base_path
            .join(format!("{}.{RECORD_EXT}", encode_key(key)?)))
    }

    fn encode_record(value: &str) -> Vec<u8> {
        let payload = value.as_bytes();
        let mut hasher = Crc32::new();
        hasher.update(payload);

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&hasher.finalize().to_be_bytes());
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    fn decode_record(key: &str, bytes: &[u8]) -> Result<String> {
        let corrupted = |reason: &str| KvError::Corrupted {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if bytes.len() < HEADER_SIZE {
            return Err(corrupted("truncated header"));
        }
        if &bytes[0..4] != MAGIC {
            return Err(corrupted("bad magic"));
        }

        let checksum = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let len = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        let payload = &bytes[HEADER_SIZE..];
        if payload.len() != len {
            return Err(corrupted("length mismatch"));
        }

        let mut hasher = Crc32::new();
        hasher.update(payload);
        if hasher.finalize() != checksum {
            return Err(corrupted("checksum mismatch"));
        }

        String::from_utf8(payload.to_vec()).map_err(|_| corrupted("payload is not UTF-8"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Self::decode_record(key, &bytes).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KvError::io(path, e)),
        }
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key)?;
        let mut tmp =
            NamedTempFile::new_in(&self.base_path).map_err(|e| KvError::io(&self.base_path, e))?;

        tmp.write_all(&Self::encode_record(value))
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| KvError::io(tmp.path(), e))?;

        tmp.persist(&path).map_err(|e| KvError::io(&path, e.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KvError::io(path, e)),
        }
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let dir = fs::read_dir(&self.base_path).map_err(|e| KvError::io(&self.base_path, e))?;

        let mut keys = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| KvError::io(&self.base_path, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let key = decode_key(stem);
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Maps a key onto a portable file stem. `:` is not allowed in file names on
/// every platform, so it is stored as `@`, which keys may not contain.
fn encode_key(key: &str) -> Result<String> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
    if !valid || key.starts_with('.') {
        return Err(KvError::InvalidKey(key.to_string()));
    }
    Ok(key.replace(':', "@"))
}

fn decode_key(stem: &str) -> String {
    stem.replace('@', ":")
}
