/*!
Structs to hold configuration data and global variables.
*/
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::{
    directory::{Directory, DEMO_SECRET},
    store::{FileStore, MemoryStore, RecordStore},
};

#[derive(Deserialize)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    templates: Option<String>,
    static_dir: Option<String>,
    session_dir: Option<String>,
    accounts_file: Option<String>,
    shared_secret: Option<String>,
}

#[derive(Debug)]
pub struct Cfg {
    pub addr: SocketAddr,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Where to keep session records; `None` keeps them in memory.
    pub session_dir: Option<PathBuf>,
    /// CSV account directory; `None` uses the built-in demo accounts.
    pub accounts_file: Option<PathBuf>,
    pub shared_secret: String,
}

impl std::default::Default for Cfg {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8001),
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            session_dir: None,
            accounts_file: None,
            shared_secret: DEMO_SECRET.to_owned(),
        }
    }
}

impl Cfg {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let file_contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file: {}", &e))?;
        let cf: ConfigFile = toml::from_str(&file_contents)
            .map_err(|e| format!("Unable to deserialize config file: {}", &e))?;

        let mut c = Self::default();

        if let Some(s) = cf.host {
            c.addr.set_ip(
                s.parse().map_err(|e| format!(
                    "Error parsing {:?} as IP address: {}",
                    &s, &e
                ))?
            );
        }
        if let Some(n) = cf.port {
            c.addr.set_port(n);
        }
        if let Some(s) = cf.templates {
            c.templates_dir = PathBuf::from(s);
        }
        if let Some(s) = cf.static_dir {
            c.static_dir = PathBuf::from(s);
        }
        if let Some(s) = cf.session_dir {
            c.session_dir = Some(PathBuf::from(s));
        }
        if let Some(s) = cf.accounts_file {
            c.accounts_file = Some(PathBuf::from(s));
        }
        if let Some(s) = cf.shared_secret {
            if s.is_empty() {
                return Err("shared_secret may not be empty.".to_owned());
            }
            c.shared_secret = s;
        }

        Ok(c)
    }
}

/**
This guy will haul around the global state and be passed in an
`axum::Extension` to the handlers (and middleware) who need him.

Nothing here changes after startup except the contents of `store`, which
does its own locking.
*/
#[derive(Debug)]
pub struct Glob {
    pub directory: Directory,
    pub store: Arc<dyn RecordStore>,
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
}

/// Reads the account directory and opens the session record store
/// described by `cfg`.
pub fn load_configuration(cfg: Cfg) -> Result<Glob, String> {
    log::trace!("load_configuration( {:?} ) called.", &cfg);

    let directory = match &cfg.accounts_file {
        Some(path) => {
            log::trace!("Reading accounts from {}...", path.display());
            let f = std::fs::File::open(path)
                .map_err(|e| format!(
                    "Unable to open accounts file {}: {}", path.display(), &e
                ))?;
            let d = Directory::from_csv_reader(f, cfg.shared_secret.clone())
                .map_err(|e| format!(
                    "Error reading accounts file {}: {}", path.display(), &e
                ))?;
            log::info!("Read {} accounts from {}.", d.len(), path.display());
            d
        },
        None => {
            log::info!("No accounts file configured; using demo accounts.");
            Directory::demo_with_secret(cfg.shared_secret.clone())
        },
    };

    if directory.is_empty() {
        log::warn!("Account directory is empty; nobody will be able to log in.");
    }
    if directory.uses_demo_secret() {
        log::warn!(
            "All accounts use the demo secret {:?}. Set shared_secret in the configuration file.",
            DEMO_SECRET
        );
    }

    let store: Arc<dyn RecordStore> = match &cfg.session_dir {
        Some(dir) => {
            let fs = FileStore::new(dir)
                .map_err(|e| format!("Unable to open session store: {}", &e))?;
            log::info!("Keeping sessions in {}.", dir.display());
            Arc::new(fs)
        },
        None => {
            log::info!("Keeping sessions in memory.");
            Arc::new(MemoryStore::new())
        },
    };

    let glob = Glob {
        directory,
        store,
        addr: cfg.addr,
        static_dir: cfg.static_dir,
    };

    Ok(glob)
}
