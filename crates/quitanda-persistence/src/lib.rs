//! Quitanda persistence layer
//!
//! SeaORM entity definitions for the relational schema and shared
//! persistence result types. The schema itself is owned by
//! `quitanda-migration`.

pub mod entity;
pub mod model;

pub use model::Page;
