//! Rule row CRUD.

use std::str::FromStr;

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use jyotish_core::errors::StoreError;
use jyotish_core::rule::{ChartContext, Domain, Rule, RuleStatus, Scope, SymbolicKey, Weight};

use crate::to_store_err;

/// Upsert one rule row and replace its symbolic keys. The caller wraps
/// this in a transaction together with the embedding write.
pub fn upsert_rule(
    conn: &Connection,
    rule: &Rule,
    keys: &[SymbolicKey],
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO rules (id, domain, chart_context, scope, condition, effect, modifiers,
                            weight, source, original_text, translation, commentary, variants,
                            prerequisite, cancels, version, status, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
         ON CONFLICT (id) DO UPDATE SET
            domain = excluded.domain, chart_context = excluded.chart_context,
            scope = excluded.scope, condition = excluded.condition, effect = excluded.effect,
            modifiers = excluded.modifiers, weight = excluded.weight, source = excluded.source,
            original_text = excluded.original_text, translation = excluded.translation,
            commentary = excluded.commentary, variants = excluded.variants,
            prerequisite = excluded.prerequisite, cancels = excluded.cancels,
            version = excluded.version, status = excluded.status, updated_at = excluded.updated_at",
        params![
            rule.id,
            rule.domain.as_str(),
            rule.chart_context.as_str(),
            rule.scope.as_str(),
            rule.condition,
            rule.effect,
            serde_json::to_string(&rule.modifiers).unwrap_or_else(|_| "[]".into()),
            rule.weight.value(),
            rule.source,
            rule.original_text,
            rule.translation,
            rule.commentary,
            serde_json::to_string(&rule.applicable_variants).unwrap_or_else(|_| "[]".into()),
            rule.prerequisite,
            serde_json::to_string(&rule.cancels).unwrap_or_else(|_| "[]".into()),
            rule.version,
            rule.status.as_str(),
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(to_store_err)?;

    conn.execute("DELETE FROM symbolic_keys WHERE rule_id = ?1", params![rule.id])
        .map_err(to_store_err)?;
    for key in keys {
        conn.execute(
            "INSERT OR IGNORE INTO symbolic_keys (key_type, key_value, rule_id)
             VALUES (?1, ?2, ?3)",
            params![key_type_str(key), key.key_value, key.rule_id],
        )
        .map_err(to_store_err)?;
    }

    Ok(())
}

fn key_type_str(key: &SymbolicKey) -> String {
    // serde renders the snake_case tag with surrounding quotes; strip them.
    serde_json::to_string(&key.key_type)
        .unwrap_or_default()
        .trim_matches('"')
        .to_string()
}

/// The stored version of a rule, when present.
pub fn stored_version(conn: &Connection, id: &str) -> Result<Option<u32>, StoreError> {
    conn.query_row(
        "SELECT version FROM rules WHERE id = ?1",
        params![id],
        |row| row.get::<_, u32>(0),
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(to_store_err(other)),
    })
}

pub fn get_rule(conn: &Connection, id: &str) -> Result<Option<Rule>, StoreError> {
    conn.query_row(
        "SELECT id, domain, chart_context, scope, condition, effect, modifiers, weight,
                source, original_text, translation, commentary, variants, prerequisite,
                cancels, version, status
         FROM rules WHERE id = ?1",
        params![id],
        row_to_rule,
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(to_store_err(other)),
    })
}

/// Active rules for a domain, weight descending, id ascending.
pub fn list_by_domain(
    conn: &Connection,
    domain: Domain,
    limit: usize,
    min_weight: f64,
) -> Result<Vec<Rule>, StoreError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, domain, chart_context, scope, condition, effect, modifiers, weight,
                    source, original_text, translation, commentary, variants, prerequisite,
                    cancels, version, status
             FROM rules
             WHERE domain = ?1 AND status = 'active' AND weight >= ?2
             ORDER BY weight DESC, id ASC
             LIMIT ?3",
        )
        .map_err(to_store_err)?;

    let rows = stmt
        .query_map(params![domain.as_str(), min_weight, limit], row_to_rule)
        .map_err(to_store_err)?;

    let mut rules = Vec::new();
    for row in rows {
        rules.push(row.map_err(to_store_err)?);
    }
    Ok(rules)
}

/// Every stored rule with its symbolic keys, for snapshot rebuilds.
pub fn load_all(conn: &Connection) -> Result<Vec<(Rule, Vec<SymbolicKey>)>, StoreError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, domain, chart_context, scope, condition, effect, modifiers, weight,
                    source, original_text, translation, commentary, variants, prerequisite,
                    cancels, version, status
             FROM rules ORDER BY id ASC",
        )
        .map_err(to_store_err)?;
    let rows = stmt.query_map([], row_to_rule).map_err(to_store_err)?;

    let mut out = Vec::new();
    for row in rows {
        let rule = row.map_err(to_store_err)?;
        let keys = keys_for(conn, &rule.id)?;
        out.push((rule, keys));
    }
    Ok(out)
}

fn keys_for(conn: &Connection, rule_id: &str) -> Result<Vec<SymbolicKey>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT key_type, key_value FROM symbolic_keys WHERE rule_id = ?1")
        .map_err(to_store_err)?;
    let rows = stmt
        .query_map(params![rule_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(to_store_err)?;

    let mut keys = Vec::new();
    for row in rows {
        let (kt, kv) = row.map_err(to_store_err)?;
        let key_type = serde_json::from_str(&format!("\"{kt}\"")).map_err(|e| {
            StoreError::Sqlite {
                reason: format!("bad key_type {kt}: {e}"),
            }
        })?;
        keys.push(SymbolicKey {
            key_type,
            key_value: kv,
            rule_id: rule_id.to_string(),
        });
    }
    Ok(keys)
}

pub fn set_status(conn: &Connection, id: &str, status: RuleStatus) -> Result<bool, StoreError> {
    let changed = conn
        .execute(
            "UPDATE rules SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), Utc::now().to_rfc3339(), id],
        )
        .map_err(to_store_err)?;
    Ok(changed > 0)
}

pub fn count(conn: &Connection) -> Result<usize, StoreError> {
    conn.query_row("SELECT COUNT(*) FROM rules", [], |row| {
        row.get::<_, i64>(0).map(|n| n as usize)
    })
    .map_err(to_store_err)
}

fn row_to_rule(row: &Row<'_>) -> rusqlite::Result<Rule> {
    let bad = |field: &str, detail: String| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("{field}: {detail}").into(),
        )
    };

    let domain_s: String = row.get(1)?;
    let context_s: String = row.get(2)?;
    let scope_s: String = row.get(3)?;
    let modifiers_s: String = row.get(6)?;
    let weight_v: f64 = row.get(7)?;
    let variants_s: String = row.get(12)?;
    let cancels_s: String = row.get(14)?;
    let status_s: String = row.get(16)?;

    Ok(Rule {
        id: row.get(0)?,
        domain: Domain::from_str(&domain_s).map_err(|e| bad("domain", e))?,
        chart_context: ChartContext::from_str(&context_s).map_err(|e| bad("chart_context", e))?,
        scope: Scope::from_str(&scope_s).map_err(|e| bad("scope", e))?,
        condition: row.get(4)?,
        effect: row.get(5)?,
        modifiers: serde_json::from_str(&modifiers_s)
            .map_err(|e| bad("modifiers", e.to_string()))?,
        weight: Weight::new(weight_v).map_err(|e| bad("weight", e.to_string()))?,
        source: row.get(8)?,
        original_text: row.get(9)?,
        translation: row.get(10)?,
        commentary: row.get(11)?,
        applicable_variants: serde_json::from_str(&variants_s)
            .map_err(|e| bad("variants", e.to_string()))?,
        prerequisite: row.get(13)?,
        cancels: serde_json::from_str(&cancels_s).map_err(|e| bad("cancels", e.to_string()))?,
        version: row.get(15)?,
        status: RuleStatus::from_str(&status_s).map_err(|e| bad("status", e))?,
    })
}
