//! Persisted slashing-protection history for locally-held validator keys.
//!
//! Backed by a SQLite database (via `rusqlite`/`r2d2_sqlite`, pooled so a multi-validator client
//! can check/insert from several signer calls without serializing through one connection). Two
//! tables: one row per signed block (keyed by `(pubkey, slot)`), one row per signed attestation
//! (keyed by `(pubkey, target_epoch)`, carrying `source_epoch` for the surround check). Neither
//! table is ever pruned — a validator's entire signing history must stay available for as long
//! as it could possibly be slashed for it.

use parking_lot::Mutex;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use ssz::Encode;
use std::path::Path;
use types::{AttestationData, Epoch, Hash256, PublicKey, Slot};

#[derive(Debug)]
pub enum Error {
    Pool(r2d2::Error),
    Sql(rusqlite::Error),
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Pool(e)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Sql(e)
    }
}

/// Why a requested signature was refused. Every variant names the prior record that conflicts,
/// so a caller can log exactly what would have been slashed.
#[derive(Debug, Clone, PartialEq)]
pub enum NotSafe {
    /// A different block has already been signed for this validator at this slot.
    DoubleBlockProposal { slot: Slot },
    /// Same target epoch, different attestation data — `IndexedAttestation::is_double_vote`.
    DoubleVote { target_epoch: Epoch },
    /// The new vote's `(source, target)` interval strictly contains a previously signed vote's,
    /// or vice versa — `IndexedAttestation::is_surround_vote`.
    SurroundingVote { source_epoch: Epoch, target_epoch: Epoch },
    /// The pubkey was never registered with `register_validator`.
    UnregisteredValidator,
    Database(Error),
}

impl From<Error> for NotSafe {
    fn from(e: Error) -> Self {
        NotSafe::Database(e)
    }
}

fn pubkey_key(pubkey: &PublicKey) -> String {
    hex::encode(pubkey.as_ssz_bytes())
}

/// Guards every signature a `validator_client::signer::LocalSigner` produces.
pub struct SlashingProtection {
    pool: Mutex<Pool<SqliteConnectionManager>>,
}

impl SlashingProtection {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let manager = SqliteConnectionManager::file(path);
        Self::open_with_manager(manager)
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        Self::open_with_manager(SqliteConnectionManager::memory())
    }

    fn open_with_manager(manager: SqliteConnectionManager) -> Result<Self, Error> {
        let pool = Pool::new(manager)?;
        let conn = pool.get()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS signed_blocks (
                pubkey TEXT NOT NULL,
                slot INTEGER NOT NULL,
                signing_root BLOB NOT NULL,
                PRIMARY KEY (pubkey, slot)
            );
            CREATE TABLE IF NOT EXISTS signed_attestations (
                pubkey TEXT NOT NULL,
                source_epoch INTEGER NOT NULL,
                target_epoch INTEGER NOT NULL,
                signing_root BLOB NOT NULL,
                PRIMARY KEY (pubkey, target_epoch)
            );
            CREATE TABLE IF NOT EXISTS registered_validators (
                pubkey TEXT PRIMARY KEY
            );",
        )?;
        Ok(Self {
            pool: Mutex::new(pool),
        })
    }

    /// Must be called once per key before it can sign anything — mirrors the teacher's
    /// `auto-register` CLI flag, but as an explicit call rather than implicit first-use, so a
    /// signer can never slip a key past protection by accident.
    pub fn register_validator(&self, pubkey: &PublicKey) -> Result<(), Error> {
        let pool = self.pool.lock();
        let conn = pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO registered_validators (pubkey) VALUES (?1)",
            params![pubkey_key(pubkey)],
        )?;
        Ok(())
    }

    fn is_registered(conn: &rusqlite::Connection, key: &str) -> Result<bool, Error> {
        let exists: Option<String> = conn
            .query_row(
                "SELECT pubkey FROM registered_validators WHERE pubkey = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(exists.is_some())
    }

    /// Checks `(pubkey, slot)` against every block previously signed by this key, then records
    /// `signing_root` if (and only if) signing is safe. Re-signing the identical block at the
    /// same slot (e.g. a retry after a crash) is idempotent, not a slashing offence.
    pub fn check_and_insert_block_proposal(
        &self,
        pubkey: &PublicKey,
        slot: Slot,
        signing_root: Hash256,
    ) -> Result<(), NotSafe> {
        let key = pubkey_key(pubkey);
        let pool = self.pool.lock();
        let conn = pool.get().map_err(Error::from)?;
        if !Self::is_registered(&conn, &key).map_err(NotSafe::from)? {
            return Err(NotSafe::UnregisteredValidator);
        }

        let existing: Option<Vec<u8>> = conn
            .query_row(
                "SELECT signing_root FROM signed_blocks WHERE pubkey = ?1 AND slot = ?2",
                params![key, slot.as_u64() as i64],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::from)?;

        match existing {
            Some(bytes) if bytes == signing_root.as_bytes() => Ok(()),
            Some(_) => Err(NotSafe::DoubleBlockProposal { slot }),
            None => {
                conn.execute(
                    "INSERT INTO signed_blocks (pubkey, slot, signing_root) VALUES (?1, ?2, ?3)",
                    params![key, slot.as_u64() as i64, signing_root.as_bytes().to_vec()],
                )
                .map_err(Error::from)?;
                Ok(())
            }
        }
    }

    /// Checks a new `AttestationData` against every attestation previously signed by this key
    /// for a double vote (same target, different data) or a surround vote (one interval strictly
    /// contains the other), then records it. The surround check is the same inequality
    /// `types::IndexedAttestation::is_surround_vote` uses during block processing.
    pub fn check_and_insert_attestation(
        &self,
        pubkey: &PublicKey,
        data: &AttestationData,
    ) -> Result<(), NotSafe> {
        let key = pubkey_key(pubkey);
        let pool = self.pool.lock();
        let conn = pool.get().map_err(Error::from)?;
        if !Self::is_registered(&conn, &key).map_err(NotSafe::from)? {
            return Err(NotSafe::UnregisteredValidator);
        }

        let new_source = data.source.epoch.as_u64() as i64;
        let new_target = data.target.epoch.as_u64() as i64;

        {
            let mut stmt = conn
                .prepare(
                    "SELECT source_epoch, target_epoch, signing_root FROM signed_attestations \
                     WHERE pubkey = ?1",
                )
                .map_err(Error::from)?;
            let mut rows = stmt.query(params![key]).map_err(Error::from)?;
            while let Some(row) = rows.next().map_err(Error::from)? {
                let source: i64 = row.get(0).map_err(Error::from)?;
                let target: i64 = row.get(1).map_err(Error::from)?;
                let root: Vec<u8> = row.get(2).map_err(Error::from)?;

                if target == new_target {
                    if source == new_source && root == data_root(data).as_bytes() {
                        continue; // identical re-sign
                    }
                    return Err(NotSafe::DoubleVote {
                        target_epoch: data.target.epoch,
                    });
                }
                // new surrounds existing
                if new_source < source && target < new_target {
                    return Err(NotSafe::SurroundingVote {
                        source_epoch: data.source.epoch,
                        target_epoch: data.target.epoch,
                    });
                }
                // existing surrounds new
                if source < new_source && new_target < target {
                    return Err(NotSafe::SurroundingVote {
                        source_epoch: data.source.epoch,
                        target_epoch: data.target.epoch,
                    });
                }
            }
        }

        conn.execute(
            "INSERT INTO signed_attestations (pubkey, source_epoch, target_epoch, signing_root) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                key,
                new_source,
                new_target,
                data_root(data).as_bytes().to_vec()
            ],
        )
        .map_err(Error::from)?;
        Ok(())
    }
}

fn data_root(data: &AttestationData) -> Hash256 {
    use tree_hash::TreeHash;
    data.tree_hash_root()
}
