//! Service layer for subscription bookkeeping.
//! - Separates business rules from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Runs store calls under a caller-supplied deadline/cancellation context.

pub mod errors;
pub mod context;
pub mod db;
pub mod subscription;
#[cfg(test)]
pub mod test_support;
