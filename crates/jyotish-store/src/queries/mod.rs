//! Row-level SQL operations, kept free of engine policy.

pub mod embedding_ops;
pub mod rule_crud;
