//! LMDB-backed role store
//!
//! Layout:
//! - `roles`: id (u64 BE) → JSON role record
//! - `names`: name → id (uniqueness index, kept in sync with `roles`)
//! - `meta`:  "next_id" → last assigned id

use std::path::Path;

use byteorder::BigEndian;
use heed::types::{Bytes, Str, U64};
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use tracing::info;

use crate::constants::LMDB_MAX_DBS;
use crate::error::{AccessError, Result};
use crate::role::{self, Role, RoleId, RoleUpdate};
use crate::store::RoleStore;

type RoleDb = Database<U64<BigEndian>, Bytes>;
type IdDb = Database<Str, U64<BigEndian>>;

const NEXT_ID: &str = "next_id";

struct Dbs {
    roles: RoleDb,
    names: IdDb,
    meta: IdDb,
}

fn get_in(d: &Dbs, tx: &RoTxn, id: RoleId) -> Result<Option<Role>> {
    match d.roles.get(tx, &id.0)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
        None => Ok(None),
    }
}

fn put_in(d: &Dbs, tx: &mut RwTxn, role: &Role) -> Result<()> {
    let bytes = serde_json::to_vec(role)?;
    d.roles.put(tx, &role.id.0, &bytes)?;
    Ok(())
}

/// Persistent role store. One write transaction per mutation.
pub struct LmdbRoleStore {
    env: Env,
    dbs: Dbs,
}

impl LmdbRoleStore {
    /// Open (creating if needed) the store at `path`
    pub fn open(path: impl AsRef<Path>, map_size: usize) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        // SAFETY: LMDB requires no other process to open this path with different options concurrently.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(LMDB_MAX_DBS)
                .open(path)?
        };
        let mut tx = env.write_txn()?;
        let dbs = Dbs {
            roles: env.create_database(&mut tx, Some("roles"))?,
            names: env.create_database(&mut tx, Some("names"))?,
            meta: env.create_database(&mut tx, Some("meta"))?,
        };
        tx.commit()?;
        Ok(LmdbRoleStore { env, dbs })
    }

    fn read<T, F: FnOnce(&Dbs, &RoTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let tx = self.env.read_txn()?;
        f(&self.dbs, &tx)
    }

    fn write<T, F: FnOnce(&Dbs, &mut RwTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let mut tx = self.env.write_txn()?;
        let r = f(&self.dbs, &mut tx)?;
        tx.commit()?;
        Ok(r)
    }

    /// Drop every role and reset the id counter
    pub fn clear(&self) -> Result<()> {
        self.write(|d, tx| {
            d.roles.clear(tx)?;
            d.names.clear(tx)?;
            d.meta.clear(tx)?;
            Ok(())
        })
    }
}

impl RoleStore for LmdbRoleStore {
    fn create_role(&self, name: &str, description: &str, permissions: &[&str]) -> Result<Role> {
        let permissions = role::validate_new(name, permissions)?;
        let role = self.write(|d, tx| {
            if d.names.get(tx, name)?.is_some() {
                return Err(AccessError::DuplicateRoleName(name.to_string()));
            }
            let id = d.meta.get(tx, NEXT_ID)?.unwrap_or(0) + 1;
            d.meta.put(tx, NEXT_ID, &id)?;
            let role = Role {
                id: RoleId(id),
                name: name.to_string(),
                description: description.to_string(),
                permissions,
            };
            put_in(d, tx, &role)?;
            d.names.put(tx, name, &id)?;
            Ok(role)
        })?;
        info!(role = %role.name, id = %role.id, permissions = role.permissions.len(), "role created");
        Ok(role)
    }

    fn update_role(&self, id: RoleId, update: RoleUpdate) -> Result<Role> {
        let update = update.validate()?;
        let role = self.write(|d, tx| {
            let mut role = get_in(d, tx, id)?.ok_or(AccessError::RoleNotFound(id))?;
            update.apply(&mut role);
            put_in(d, tx, &role)?;
            Ok(role)
        })?;
        info!(role = %role.name, id = %id, "role updated");
        Ok(role)
    }

    fn delete_role(&self, id: RoleId) -> Result<()> {
        let role = self.write(|d, tx| {
            let role = get_in(d, tx, id)?.ok_or(AccessError::RoleNotFound(id))?;
            d.roles.delete(tx, &id.0)?;
            d.names.delete(tx, role.name.as_str())?;
            Ok(role)
        })?;
        info!(role = %role.name, id = %id, "role deleted");
        Ok(())
    }

    fn list_roles(&self) -> Result<Vec<Role>> {
        self.read(|d, tx| {
            let mut r = Vec::new();
            for item in d.roles.iter(tx)? {
                let (_, bytes) = item?;
                r.push(serde_json::from_slice(bytes)?);
            }
            Ok(r)
        })
    }

    fn get_role(&self, id: RoleId) -> Result<Option<Role>> {
        self.read(|d, tx| get_in(d, tx, id))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Role>> {
        self.read(|d, tx| match d.names.get(tx, name)? {
            Some(id) => get_in(d, tx, RoleId(id)),
            None => Ok(None),
        })
    }
}
