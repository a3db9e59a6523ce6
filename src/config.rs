//! Configuration (TOML)
//!
//! ```toml
//! [store]
//! backend = "lmdb"
//! path = "/var/lib/portal/roles"
//! map_size = 1073741824
//!
//! [bootstrap]
//! admin_role = "Administrador"
//! member_role = "Colaborador"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ADMIN_ROLE, DEFAULT_MAP_SIZE, DEFAULT_MEMBER_ROLE, ENV_BACKEND, ENV_STORE_PATH};
use crate::db::LmdbRoleStore;
use crate::error::{AccessError, Result};
use crate::store::{MemoryRoleStore, RoleStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Lmdb,
}

impl std::str::FromStr for Backend {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "memory" => Ok(Backend::Memory),
            "lmdb" => Ok(Backend::Lmdb),
            other => Err(AccessError::Config(format!("unknown backend '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Required for `lmdb`
    pub path: Option<PathBuf>,
    pub map_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig { backend: Backend::Memory, path: None, map_size: DEFAULT_MAP_SIZE }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    pub admin_role: String,
    pub member_role: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        BootstrapConfig {
            admin_role: DEFAULT_ADMIN_ROLE.to_string(),
            member_role: DEFAULT_MEMBER_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    pub store: StoreConfig,
    pub bootstrap: BootstrapConfig,
}

impl AccessConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AccessConfig = toml::from_str(s).map_err(|e| AccessError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Apply `PORTAL_ACCESS_BACKEND` / `PORTAL_ACCESS_STORE_PATH`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|k| std::env::var(k).ok())
    }

    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, var: F) -> Result<()> {
        if let Some(b) = var(ENV_BACKEND) {
            self.store.backend = b.parse()?;
        }
        if let Some(p) = var(ENV_STORE_PATH) {
            self.store.path = Some(PathBuf::from(p));
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.map_size == 0 {
            return Err(AccessError::Config("store.map_size must be positive".into()));
        }
        if self.store.backend == Backend::Lmdb && self.store.path.is_none() {
            return Err(AccessError::Config("store.path is required for the lmdb backend".into()));
        }
        if self.bootstrap.admin_role.trim().is_empty() || self.bootstrap.member_role.trim().is_empty() {
            return Err(AccessError::Config("bootstrap role names cannot be empty".into()));
        }
        Ok(())
    }

    /// Open the configured role store
    pub fn open_store(&self) -> Result<Box<dyn RoleStore>> {
        self.validate()?;
        match (&self.store.backend, &self.store.path) {
            (Backend::Memory, _) => Ok(Box::new(MemoryRoleStore::new())),
            (Backend::Lmdb, Some(path)) => Ok(Box::new(LmdbRoleStore::open(path, self.store.map_size)?)),
            (Backend::Lmdb, None) => Err(AccessError::Config("store.path is required for the lmdb backend".into())),
        }
    }
}
