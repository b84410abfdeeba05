//! Storage abstractions for service layer
//!
//! Contains the file-backed map store shared by repositories that persist
//! small maps as JSON.

pub mod json_map_store;
