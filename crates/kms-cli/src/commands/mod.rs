//! CLI command implementations

pub mod caps;
pub mod commit;
