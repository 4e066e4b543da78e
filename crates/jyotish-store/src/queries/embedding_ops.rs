//! Embedding blob storage. Vectors are stored as little-endian f32
//! bytes, tagged with the producing model.

use rusqlite::{params, Connection};

use jyotish_core::errors::StoreError;

use crate::to_store_err;

pub fn store_embedding(
    conn: &Connection,
    rule_id: &str,
    vector: &[f32],
    model: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO rule_embeddings (rule_id, vector, dimensions, model)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (rule_id) DO UPDATE SET
            vector = excluded.vector, dimensions = excluded.dimensions, model = excluded.model",
        params![rule_id, f32_vec_to_bytes(vector), vector.len() as i64, model],
    )
    .map_err(to_store_err)?;
    Ok(())
}

pub fn load_embedding(conn: &Connection, rule_id: &str) -> Result<Option<Vec<f32>>, StoreError> {
    conn.query_row(
        "SELECT vector, dimensions FROM rule_embeddings WHERE rule_id = ?1",
        params![rule_id],
        |row| {
            let blob: Vec<u8> = row.get(0)?;
            let dims: i64 = row.get(1)?;
            Ok(bytes_to_f32_vec(&blob, dims as usize))
        },
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(to_store_err(other)),
    })
}

pub fn f32_vec_to_bytes(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for v in vector {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

pub fn bytes_to_f32_vec(bytes: &[u8], dims: usize) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .take(dims)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_round_trip() {
        let v = vec![0.25f32, -1.5, 3.75];
        let bytes = f32_vec_to_bytes(&v);
        assert_eq!(bytes_to_f32_vec(&bytes, 3), v);
    }
}
