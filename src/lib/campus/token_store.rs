use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, ErrorKind},
    path::PathBuf,
};

use log::{debug, info};

use super::{error::CampusError, models::Credential};

/// Name the bearer token is stored under.
pub const TOKEN_KEY: &str = "authToken";

/// A trait, necessary for every place a bearer token can outlive the process in.
pub trait TokenStore {
    fn load(&self) -> Result<Option<Credential>, CampusError>;
    fn save(&self, credential: &Credential) -> Result<(), CampusError>;
    fn clear(&self) -> Result<(), CampusError>;
}

impl<T: TokenStore + ?Sized> TokenStore for &T {
    fn load(&self) -> Result<Option<Credential>, CampusError> {
        (**self).load()
    }

    fn save(&self, credential: &Credential) -> Result<(), CampusError> {
        (**self).save(credential)
    }

    fn clear(&self) -> Result<(), CampusError> {
        (**self).clear()
    }
}

/// Keeps the token in a small JSON object on disk: `{"authToken": "..."}`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, CampusError> {
        match File::open(&self.path) {
            Ok(file) => Ok(serde_json::from_reader(BufReader::new(file))?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Credential>, CampusError> {
        debug!("Reading token from {}", self.path.display());
        Ok(self
            .read_entries()?
            .remove(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .map(Credential::new))
    }

    fn save(&self, credential: &Credential) -> Result<(), CampusError> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_owned(), credential.as_str().to_owned());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, &entries)?;
        info!("Stored token in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), CampusError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            // An unreadable file holds no usable token either.
            Err(_) => BTreeMap::new(),
        };
        if entries.remove(TOKEN_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }
        if entries.is_empty() {
            match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        } else {
            serde_json::to_writer_pretty(File::create(&self.path)?, &entries)?;
        }
        info!("Removed token from {}", self.path.display());
        Ok(())
    }
}

/// Token store that forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<Credential>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(credential: Credential) -> Self {
        MemoryTokenStore {
            token: RefCell::new(Some(credential)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Credential>, CampusError> {
        Ok(self.token.borrow().clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), CampusError> {
        *self.token.borrow_mut() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CampusError> {
        self.token.borrow_mut().take();
        Ok(())
    }
}
