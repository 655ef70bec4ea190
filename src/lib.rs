//! # attr-state — Self-Describing Attribute Records
//!
//! Records that stay consistent across process boundaries by sending only
//! the fields that changed.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `AttributeState` is the contract between records and
//!    everything that persists, mirrors, or scripts them
//! 2. **Setters select**: mutating a field marks it dirty; `create_node`
//!    writes exactly the dirty subset unless forced
//! 3. **Positional reflection**: fields are addressed by index through a
//!    static per-type table, with name lookup layered on top
//! 4. **Typed by name on the wire**: `StateRegistry` picks the concrete type
//!    from `type_name()`, so the node tree needs no schema of its own
//!
//! ## Quick Start
//!
//! ```rust
//! use attr_state::{AttributeState, QueryList, QueryType, StateMessage, StateRegistry};
//!
//! # fn example() -> attr_state::Result<()> {
//! let mut list = QueryList::new();
//! if !list.world_query_exists("temp", QueryType::DatabaseQuery) {
//!     list.add_world_query("temp", QueryType::DatabaseQuery);
//! }
//!
//! // Control side: send what changed.
//! let json = StateMessage::take(&mut list, false)
//!     .map(|m| m.to_json())
//!     .transpose()?;
//!
//! // Compute side: rebuild by type name.
//! if let Some(json) = json {
//!     let mirror = StateMessage::from_json(&json)?.materialize(&StateRegistry::with_defaults())?;
//!     assert_eq!(mirror.type_name(), "QueryList");
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod node;
pub mod state;
pub mod query_list;
pub mod sync;

// ============================================================================
// Re-exports
// ============================================================================

pub use node::{DataNode, NodeValue};

pub use state::{
    AttributeState, FieldSpec, FieldType, Selection,
    StateConstructor, StateRegistry,
};

pub use query_list::{
    AttributeEnum, CoordinateRepresentation, QueryDescriptor, QueryList, QueryType,
};

pub use sync::{StateMessage, SyncConfig};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Field index {index} out of range (record has {count} fields)")]
    FieldIndexOutOfRange { index: usize, count: usize },

    #[error("Unknown attribute state type: {0}")]
    UnknownType(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Length mismatch in {field}: expected {expected}, got {got}")]
    LengthMismatch { field: &'static str, expected: usize, got: usize },

    #[error("Invalid {enum_name} value: {value:?}")]
    InvalidEnum { enum_name: &'static str, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
