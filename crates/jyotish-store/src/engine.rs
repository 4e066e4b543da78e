//! StoreEngine — owns the SQLite connection and the live index
//! snapshot, implements `IRuleStore`.
//!
//! Writes go: validate → derive keys → (maybe) embed → one SQL
//! transaction → swap a fresh snapshot. Readers only ever touch
//! immutable snapshots, so in-progress writes are invisible to them.

use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use rusqlite::Connection;
use tracing::{debug, info, warn};

use jyotish_core::errors::{JyotishResult, StoreError};
use jyotish_core::rule::{Domain, Rule, RuleStatus, SymbolicKey};
use jyotish_core::traits::{IEmbeddingProvider, IRuleStore};

use crate::keys::derive_keys;
use crate::migrations;
use crate::queries::{embedding_ops, rule_crud};
use crate::snapshot::IndexSnapshot;
use crate::to_store_err;

/// The rule store. Cheap to share behind an `Arc`.
pub struct StoreEngine {
    conn: Mutex<Connection>,
    snapshot: RwLock<Arc<IndexSnapshot>>,
    embedder: Option<Arc<dyn IEmbeddingProvider>>,
    model_tag: String,
}

impl StoreEngine {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> JyotishResult<Self> {
        let conn = Connection::open(path).map_err(to_store_err)?;
        Self::initialize(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> JyotishResult<Self> {
        let conn = Connection::open_in_memory().map_err(to_store_err)?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> JyotishResult<Self> {
        migrations::run_migrations(&conn)?;
        let snapshot = Self::rebuild_snapshot(&conn, 0)?;
        info!(rules = snapshot.len(), "rule store opened");
        Ok(Self {
            conn: Mutex::new(conn),
            snapshot: RwLock::new(Arc::new(snapshot)),
            embedder: None,
            model_tag: jyotish_core::constants::EMBEDDING_MODEL_TAG.to_string(),
        })
    }

    /// Attach an embedding provider used when `insert_rule` is called
    /// without a precomputed vector.
    pub fn with_embedder(mut self, embedder: Arc<dyn IEmbeddingProvider>) -> Self {
        self.model_tag = embedder.name().to_string();
        self.embedder = Some(embedder);
        self
    }

    fn rebuild_snapshot(conn: &Connection, generation: u64) -> Result<IndexSnapshot, StoreError> {
        let mut entries = Vec::new();
        for (rule, keys) in rule_crud::load_all(conn)? {
            let vector = embedding_ops::load_embedding(conn, &rule.id)?;
            let keys = keys
                .into_iter()
                .map(|k| (k.key_type, k.key_value))
                .collect();
            entries.push((rule, keys, vector));
        }
        Ok(IndexSnapshot::build(generation, entries))
    }

    /// The current point-in-time snapshot. Holders keep reading a
    /// consistent index no matter how many writes land afterwards.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.snapshot.read().expect("snapshot lock poisoned"))
    }

    /// Validate and persist a rule, deriving its symbolic keys and
    /// accepting or computing its embedding. Idempotent per rule id;
    /// re-insertion must not lower the version.
    pub fn insert_rule(&self, rule: Rule, embedding: Option<Vec<f32>>) -> JyotishResult<()> {
        if rule.id.trim().is_empty() {
            return Err(StoreError::EmptyRuleId.into());
        }
        // Weight range is enforced by the Weight type at construction;
        // version monotonicity needs the stored row.
        let keys = derive_keys(&rule);
        debug!(rule = %rule.id, keys = keys.len(), "derived symbolic keys");

        let vector = match embedding {
            Some(v) => Some(v),
            None => self.compute_embedding(&rule),
        };

        let conn = self.conn.lock().expect("store connection poisoned");
        if let Some(stored) = rule_crud::stored_version(&conn, &rule.id)? {
            if rule.version < stored {
                return Err(StoreError::StaleVersion {
                    id: rule.id.clone(),
                    attempted: rule.version,
                    stored,
                }
                .into());
            }
        }

        conn.execute("BEGIN IMMEDIATE", []).map_err(to_store_err)?;
        let result = (|| -> Result<(), StoreError> {
            rule_crud::upsert_rule(&conn, &rule, &keys)?;
            if let Some(v) = &vector {
                embedding_ops::store_embedding(&conn, &rule.id, v, &self.model_tag)?;
            }
            Ok(())
        })();
        match result {
            Ok(()) => conn.execute("COMMIT", []).map_err(to_store_err)?,
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                return Err(e.into());
            }
        };
        drop(conn);

        self.swap_in(rule, keys, vector);
        Ok(())
    }

    fn compute_embedding(&self, rule: &Rule) -> Option<Vec<f32>> {
        let embedder = self.embedder.as_ref()?;
        match embedder.embed(&rule.embedding_text()) {
            Ok(v) => Some(v),
            Err(e) => {
                // A missing vector only removes this rule from the
                // semantic pass; symbolic retrieval still sees it.
                warn!(rule = %rule.id, error = %e, "embedding failed, storing without vector");
                None
            }
        }
    }

    fn swap_in(&self, rule: Rule, keys: Vec<SymbolicKey>, vector: Option<Vec<f32>>) {
        let key_pairs = keys.into_iter().map(|k| (k.key_type, k.key_value)).collect();
        let mut guard = self.snapshot.write().expect("snapshot lock poisoned");
        let next = guard.with_rule(rule, key_pairs, vector);
        *guard = Arc::new(next);
    }

    /// Move a rule to `deprecated`. The row stays so past citations keep
    /// resolving.
    pub fn deprecate(&self, id: &str) -> JyotishResult<()> {
        let conn = self.conn.lock().expect("store connection poisoned");
        if !rule_crud::set_status(&conn, id, RuleStatus::Deprecated)? {
            return Err(StoreError::RuleNotFound { id: id.to_string() }.into());
        }
        let rule = rule_crud::get_rule(&conn, id)?.ok_or_else(|| StoreError::RuleNotFound {
            id: id.to_string(),
        })?;
        let vector = embedding_ops::load_embedding(&conn, id)?;
        drop(conn);

        let keys = derive_keys(&rule);
        self.swap_in(rule, keys, vector);
        Ok(())
    }
}

impl IRuleStore for StoreEngine {
    fn get_rule(&self, id: &str) -> JyotishResult<Option<Arc<Rule>>> {
        Ok(self.snapshot().get(id).cloned())
    }

    fn list_by_domain(
        &self,
        domain: Domain,
        limit: usize,
        min_weight: f64,
    ) -> JyotishResult<Vec<Arc<Rule>>> {
        let conn = self.conn.lock().expect("store connection poisoned");
        let rules = rule_crud::list_by_domain(&conn, domain, limit, min_weight)?;
        Ok(rules.into_iter().map(Arc::new).collect())
    }

    fn rule_count(&self) -> JyotishResult<usize> {
        let conn = self.conn.lock().expect("store connection poisoned");
        Ok(rule_crud::count(&conn)?)
    }
}
