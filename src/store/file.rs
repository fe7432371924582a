/*!
Record storage as a directory of files, one `<key>.json` per record.

Records survive a server restart, so logged-in browsers stay logged in.
*/
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{check_key, RecordStore, StoreError};

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if necessary) the record directory at `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        log::trace!("FileStore::new( {} ) called.", dir.display());

        std::fs::create_dir_all(dir)
            .map_err(|e| StoreError::from(e).annotate(&format!(
                "Unable to create record directory {}", dir.display()
            )))?;

        Ok(Self { dir: dir.to_path_buf() })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        check_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl RecordStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::from(e).annotate(&format!(
                "Unable to read {}", path.display()
            ))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        log::trace!("FileStore::write( {:?}, [ {} bytes ] ) called.", key, value.len());

        let path = self.path_for(key)?;
        // Write beside the target and rename, so a reader never sees half
        // a record.
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        std::fs::write(&tmp, value)
            .map_err(|e| StoreError::from(e).annotate(&format!(
                "Unable to write {}", tmp.display()
            )))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| StoreError::from(e).annotate(&format!(
                "Unable to move record into place at {}", path.display()
            )))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        log::trace!("FileStore::remove( {:?} ) called.", key);

        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::from(e).annotate(&format!(
                "Unable to remove {}", path.display()
            ))),
        }
    }
}
