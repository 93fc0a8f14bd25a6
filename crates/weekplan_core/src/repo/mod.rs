//! Repository layer abstractions.
//!
//! # Responsibility
//! - Define the storage contract the calendar service depends on.
//! - Provide the default in-memory collection.
//!
//! # Invariants
//! - Repositories look meetings up by id, never by position.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`).

pub mod meeting_repo;
