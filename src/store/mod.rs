/*!
Record storage.

A `RecordStore` is a flat string-keyed map of string records. The session
layer keeps exactly one record per browser session in it: the serialized
`Identity` of whoever is logged in.

Two implementations are provided:

  * `MemoryStore`, which forgets everything when the process exits
  * `FileStore`, which keeps one file per key in a directory

Keys are restricted to ASCII alphanumerics, `-`, and `_`, so that every
implementation can use them verbatim (as file names, for instance).
*/
use std::fmt::Debug;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

const MAX_KEY_LENGTH: usize = 128;

#[derive(Debug, PartialEq)]
pub struct StoreError(String);

impl StoreError {
    /// Prepend some contextual `annotation` for the error.
    pub fn annotate(self, annotation: &str) -> Self {
        let s = format!("{}: {}", annotation, &self.0);
        Self(s)
    }

    pub fn display(&self) -> &str { &self.0 }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", &self.0)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> StoreError {
        StoreError(format!("Record store I/O: {}", &e))
    }
}

impl From<String> for StoreError {
    fn from(s: String) -> StoreError { StoreError(s) }
}

pub fn check_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError("empty record key".to_owned()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(StoreError(format!(
            "record key longer than {} bytes", MAX_KEY_LENGTH
        )));
    }
    if !key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
        return Err(StoreError(format!("illegal record key {:?}", key)));
    }
    Ok(())
}

pub trait RecordStore: Debug + Send + Sync {
    /// Returns `Ok(None)` if there is no record stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any existing record.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes the record under `key`. Removing an absent record is not
    /// an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys() {
        assert!(check_key("currentUser-aB3_x").is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("../etc/passwd").is_err());
        assert!(check_key("a b").is_err());
        assert!(check_key(&"k".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }

    #[test]
    fn annotation() {
        let e = StoreError::from("disk on fire".to_owned())
            .annotate("Unable to write");
        assert_eq!(e.display(), "Unable to write: disk on fire");
    }
}
