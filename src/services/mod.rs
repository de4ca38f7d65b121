// src/services/mod.rs

pub mod archivist; // file-only durable store (reference <-> bytes)

pub use archivist::{Archivist, Permastore};
