use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::error::{Result, SessionError};

use super::DurableStore;

/// JSON-file-backed store: one `<key>.json` per whitelisted key under the
/// data directory. Writes go through a temp file and an atomic rename so a
/// crash mid-write cannot corrupt the previous snapshot.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| SessionError::Storage(format!("cannot create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableStore for FileStore {
    fn put(&self, key: &str, value: &Value) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)
            .map_err(|e| SessionError::Storage(format!("cannot encode {key}: {e}")))?;

        let target = self.path_for(key);
        let temp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&temp, &data)
            .map_err(|e| SessionError::Storage(format!("cannot write {}: {e}", temp.display())))?;
        fs::rename(&temp, &target).map_err(|e| {
            SessionError::Storage(format!("cannot replace {}: {e}", target.display()))
        })?;

        debug!("persisted {} ({} bytes)", target.display(), data.len());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SessionError::Storage(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
        };
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::Storage(format!("corrupt snapshot {key}: {e}")))?;
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CANDIDATES_KEY, INTERVIEWS_KEY};
    use serde_json::json;

    #[test]
    fn test_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store
            .put(INTERVIEWS_KEY, &json!({"cand_1": {"status": "in_progress"}}))
            .unwrap();

        let value = store.get(INTERVIEWS_KEY).unwrap().unwrap();
        assert_eq!(value["cand_1"]["status"], "in_progress");
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.get(CANDIDATES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::new(dir.path()).unwrap();
            store.put(CANDIDATES_KEY, &json!([{"id": "c1"}])).unwrap();
        }
        let reopened = FileStore::new(dir.path()).unwrap();
        let value = reopened.get(CANDIDATES_KEY).unwrap().unwrap();
        assert_eq!(value[0]["id"], "c1");
    }

    #[test]
    fn test_corrupt_file_reports_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("interviews.json"), b"not json").unwrap();
        assert!(store.get(INTERVIEWS_KEY).is_err());
    }
}
