//! Domain logic for the library administration backend.
//!
//! Everything in this crate is pure: catalog enums, validation rules,
//! graph resolution for authored workflows, the role catalog, the
//! cascading picker state and the workflow builder draft reducer. I/O
//! lives in `bnadmin-db` and `bnadmin-api`.

pub mod builder_draft;
pub mod error;
pub mod graph;
pub mod pagination;
pub mod picker;
pub mod role_catalog;
pub mod types;
pub mod workflow;
