//! # AttributeState Trait
//!
//! The contract every synchronized record type implements: dirty tracking,
//! node-tree persistence, structural comparison, and positional field
//! reflection for tools that do not know the concrete type at compile time.
//!
//! ## Implementations
//!
//! | Type | Module | Fields |
//! |------|--------|--------|
//! | `QueryList` | `query_list` | `names`, `types`, `coordRep` |

pub mod field;
pub mod selection;
pub mod registry;

use std::any::Any;
use std::fmt;

use crate::node::DataNode;
use crate::{Error, Result};

pub use field::{FieldSpec, FieldType};
pub use selection::Selection;
pub use registry::{StateConstructor, StateRegistry};

// ============================================================================
// AttributeState Trait
// ============================================================================

/// A reflective record that tracks which of its fields changed.
///
/// Setters on implementors select the field they touch. `create_node` with
/// `force_add == false` writes exactly the selected subset, so a mirror on the
/// other side of a process boundary receives only what changed.
///
/// Instances are exclusively owned and carry no internal locking.
pub trait AttributeState: fmt::Debug + Send + 'static {
    /// Stable identifier used to pick a constructor when deserializing.
    fn type_name(&self) -> &'static str;

    /// Index-to-metadata table for this type. Fixed for the type's lifetime.
    fn fields(&self) -> &'static [FieldSpec];

    fn selection(&self) -> &Selection;

    fn selection_mut(&mut self) -> &mut Selection;

    /// Copy every field from `other` if its type is compatible.
    ///
    /// Returns `false` without touching `self` on a type mismatch.
    fn copy_attributes(&mut self, other: &dyn AttributeState) -> bool;

    /// Append one child per selected field (every field if `force_add`).
    ///
    /// Returns whether anything was written.
    fn create_node(&self, node: &mut DataNode, force_add: bool) -> bool;

    /// Apply every child of `node` naming a known field through that
    /// field's setter. Fields absent from `node` keep their value and
    /// their selection state.
    fn set_from_node(&mut self, node: &DataNode);

    /// Compare one field against the same field of `other`.
    ///
    /// A type mismatch compares unequal.
    fn fields_equal(&self, index: usize, other: &dyn AttributeState) -> Result<bool>;

    fn clone_state(&self) -> Box<dyn AttributeState>;

    fn as_any(&self) -> &dyn Any;

    // ------------------------------------------------------------------
    // Provided
    // ------------------------------------------------------------------

    fn field_count(&self) -> usize {
        self.fields().len()
    }

    fn select_all(&mut self) {
        self.selection_mut().select_all();
    }

    fn select(&mut self, index: usize) -> Result<()> {
        self.selection_mut().select(index)
    }

    /// Clear every dirty bit, marking a synchronization point.
    fn unselect_all(&mut self) {
        self.selection_mut().clear();
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selection().is_selected(index)
    }

    fn selected_fields(&self) -> Vec<usize> {
        self.selection().iter().collect()
    }

    fn field_name(&self, index: usize) -> Result<&'static str> {
        field_spec(self.fields(), index).map(|f| f.name)
    }

    fn field_type(&self, index: usize) -> Result<FieldType> {
        field_spec(self.fields(), index).map(|f| f.ty)
    }

    fn field_type_name(&self, index: usize) -> Result<&'static str> {
        self.field_type(index).map(FieldType::type_name)
    }

    /// Name-based lookup on top of the positional table.
    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name == name)
    }

    /// Serialize into a fresh node named after the type.
    fn to_node(&self, force_add: bool) -> Option<DataNode> {
        let mut node = DataNode::new(self.type_name());
        self.create_node(&mut node, force_add).then_some(node)
    }

    /// A fresh copy of `self` when `type_name` names this type.
    fn create_compatible(&self, type_name: &str) -> Option<Box<dyn AttributeState>> {
        (type_name == self.type_name()).then(|| self.clone_state())
    }
}

fn field_spec(fields: &'static [FieldSpec], index: usize) -> Result<&'static FieldSpec> {
    fields.get(index).ok_or(Error::FieldIndexOutOfRange {
        index,
        count: fields.len(),
    })
}

impl Clone for Box<dyn AttributeState> {
    fn clone(&self) -> Self {
        self.clone_state()
    }
}
