/*!
Browser sessions and the identity logged in to each.

A `Session` owns one record in a `RecordStore`: the serialized `Identity`
of the current user, or nothing. Handlers build a `Session` from the
session id the browser presents; nothing about who is logged in lives
anywhere else.
*/
use std::sync::Arc;

use rand::{distributions::Alphanumeric, Rng};

use crate::directory::Directory;
use crate::store::{RecordStore, StoreError};
use crate::user::Identity;

/// Prefix of the record key holding a session's identity.
pub const IDENTITY_KEY: &str = "currentUser";

pub const SESSION_ID_LENGTH: usize = 32;

/// Generate a fresh random session id.
pub fn generate_id() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Whether `id` has the shape of something `generate_id()` returns.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == SESSION_ID_LENGTH
        && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    store: Arc<dyn RecordStore>,
}

impl Session {
    /// Start a brand new session with nobody logged in.
    pub fn start(store: Arc<dyn RecordStore>) -> Session {
        let id = generate_id();
        log::trace!("Session::start() -> {:?}", &id);
        Session { id, store }
    }

    /**
    Pick up the session identified by `id`, or start a new one if `id`
    is missing or isn't a well-formed session id.

    Whoever is logged in to the session (if anyone) is whatever
    `current_identity()` says afterward.
    */
    pub fn init(store: Arc<dyn RecordStore>, id: Option<&str>) -> Session {
        log::trace!("Session::init( [ store ], {:?} ) called.", &id);

        match id {
            Some(id) if is_valid_id(id) => {
                let s = Session { id: id.to_owned(), store };
                if log::log_enabled!(log::Level::Debug) {
                    match s.current_identity() {
                        Some(ident) => log::debug!(
                            "Session {:?} resumed for {:?}.", &s.id, &ident.username
                        ),
                        None => log::debug!("Session {:?} resumed; no identity.", &s.id),
                    }
                }
                s
            },
            Some(id) => {
                log::warn!("Discarding malformed session id {:?}.", id);
                Session::start(store)
            },
            None => Session::start(store),
        }
    }

    pub fn id(&self) -> &str { &self.id }

    fn record_key(&self) -> String {
        format!("{}-{}", IDENTITY_KEY, &self.id)
    }

    /**
    Check `username` and `secret` against `directory`; on a match, persist
    the account as this session's identity and return it.

    A failed match leaves the session as it was.
    */
    pub fn login(
        &self,
        directory: &Directory,
        username: &str,
        secret: &str,
    ) -> Result<Option<Identity>, StoreError> {
        log::trace!("Session::login( [ directory ], {:?}, [ secret ] ) called.", username);

        let ident = match directory.authenticate(username, secret) {
            Some(ident) => ident,
            None => {
                log::info!("Failed login attempt for {:?}.", username);
                return Ok(None);
            },
        };

        let record = ident.to_record()?;
        self.store.write(&self.record_key(), &record)
            .map_err(|e| e.annotate("Unable to persist identity"))?;

        log::info!("{:?} ({}) logged in.", &ident.username, &ident.role);
        Ok(Some(ident))
    }

    /// Forget whoever is logged in. Fine to call when nobody is.
    pub fn logout(&self) -> Result<(), StoreError> {
        log::trace!("Session::logout() called on {:?}.", &self.id);

        self.store.remove(&self.record_key())
            .map_err(|e| e.annotate("Unable to clear identity"))
    }

    /**
    Read this session's identity from the store.

    An absent record, a record that doesn't parse as a valid `Identity`,
    and a store that can't be read all come back as `None`.
    */
    pub fn current_identity(&self) -> Option<Identity> {
        let record = match self.store.read(&self.record_key()) {
            Ok(Some(record)) => record,
            Ok(None) => { return None; },
            Err(e) => {
                log::error!("Unable to read identity for session {:?}: {}", &self.id, &e);
                return None;
            },
        };

        match Identity::from_record(&record) {
            Ok(ident) => Some(ident),
            Err(e) => {
                log::warn!("Session {:?}: {}; treating as logged out.", &self.id, &e);
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::tests::ensure_logging;
    use crate::user::Role;

    fn store() -> Arc<dyn RecordStore> { Arc::new(MemoryStore::new()) }

    #[test]
    fn ids() {
        let a = generate_id();
        let b = generate_id();
        assert!(is_valid_id(&a));
        assert_ne!(a, b);
        assert!(!is_valid_id(""));
        assert!(!is_valid_id(&format!("{}-", &a[1..])));
    }

    #[test]
    fn login_and_logout() {
        ensure_logging();
        let d = Directory::demo();
        let s = Session::init(store(), None);
        assert!(s.current_identity().is_none());

        assert!(s.login(&d, "admin", "wrong").unwrap().is_none());
        assert!(s.current_identity().is_none());

        let ident = s.login(&d, "admin", "password").unwrap().unwrap();
        assert_eq!(ident.role, Role::Admin);
        assert_eq!(s.current_identity(), Some(ident));

        s.logout().unwrap();
        assert!(s.current_identity().is_none());
        s.logout().unwrap();
        assert!(s.current_identity().is_none());
    }

    #[test]
    fn failed_login_keeps_previous_identity() {
        let d = Directory::demo();
        let s = Session::init(store(), None);
        s.login(&d, "teacher1", "password").unwrap();
        assert!(s.login(&d, "admin", "nope").unwrap().is_none());
        assert_eq!(s.current_identity().unwrap().username, "teacher1");

        s.login(&d, "parent1", "password").unwrap();
        assert_eq!(s.current_identity().unwrap().role, Role::Parent);
    }

    #[test]
    fn resume_by_id() {
        let st = store();
        let d = Directory::demo();
        let first = Session::init(st.clone(), None);
        first.login(&d, "student1", "password").unwrap();

        let again = Session::init(st.clone(), Some(first.id()));
        assert_eq!(again.id(), first.id());
        assert_eq!(again.current_identity().unwrap().username, "student1");

        let other = Session::init(st.clone(), None);
        assert!(other.current_identity().is_none());

        let bogus = Session::init(st, Some("../../nope"));
        assert_ne!(bogus.id(), "../../nope");
        assert!(bogus.current_identity().is_none());
    }

    #[test]
    fn malformed_record_is_no_identity() {
        ensure_logging();
        let st = store();
        let s = Session::init(st.clone(), None);
        let key = format!("{}-{}", IDENTITY_KEY, s.id());

        st.write(&key, "{not json").unwrap();
        assert!(s.current_identity().is_none());

        st.write(&key, r#"{"id":"1","username":"admin","role":"superuser","name":"X","email":""}"#).unwrap();
        assert!(s.current_identity().is_none());

        st.write(&key, r#"{"id":"1","username":"admin","role":"admin","name":"X","email":""}"#).unwrap();
        assert_eq!(s.current_identity().unwrap().role, Role::Admin);

        s.logout().unwrap();
        assert_eq!(st.read(&key).unwrap(), None);
    }
}
