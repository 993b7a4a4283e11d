//! Bulk import: parse an upload, map its columns onto an entity's declared
//! fields, validate each row and insert the valid ones.

pub mod fields;
pub mod mapping;
pub mod parser;
pub mod pipeline;
