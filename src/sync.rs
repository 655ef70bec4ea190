//! State messages — the node tree of one record, tagged with its type name.
//!
//! Each side of a process boundary owns its own record instance. Changes
//! travel as messages; nothing is shared.
//!
//! ```text
//! control side: setters → StateMessage::take() → to_json() ──┐
//!                                                            │ transport
//! compute side: from_json() → apply() / materialize() ◀──────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::node::DataNode;
use crate::state::{AttributeState, StateRegistry};
use crate::{Error, Result};

/// How records are captured and encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncConfig {
    /// Send every field, not just the selected ones.
    pub force_add: bool,
    /// Indent JSON output.
    pub pretty: bool,
}

/// One record's fields in node-tree form, typed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMessage {
    pub type_name: String,
    pub node: DataNode,
}

impl StateMessage {
    /// Capture the selected fields of `state` (all fields if `force_add`).
    ///
    /// `None` when there is nothing to send.
    pub fn capture(state: &dyn AttributeState, force_add: bool) -> Option<Self> {
        let node = state.to_node(force_add)?;
        Some(Self {
            type_name: state.type_name().to_owned(),
            node,
        })
    }

    /// Capture, then clear the selection so the next capture only carries
    /// later changes.
    pub fn take(state: &mut dyn AttributeState, force_add: bool) -> Option<Self> {
        let message = Self::capture(state, force_add);
        state.unselect_all();
        message
    }

    pub fn capture_with(state: &dyn AttributeState, config: &SyncConfig) -> Option<Self> {
        Self::capture(state, config.force_add)
    }

    /// Apply to an existing mirror of the same type.
    pub fn apply(&self, state: &mut dyn AttributeState) -> Result<()> {
        if state.type_name() != self.type_name {
            return Err(Error::TypeMismatch {
                expected: state.type_name().to_owned(),
                got: self.type_name.clone(),
            });
        }
        tracing::debug!(
            type_name = %self.type_name,
            fields = self.node.len(),
            "applying state message"
        );
        state.set_from_node(&self.node);
        Ok(())
    }

    /// Build a fresh record of the named type and apply this message to it.
    pub fn materialize(&self, registry: &StateRegistry) -> Result<Box<dyn AttributeState>> {
        let mut state = registry.create(&self.type_name)?;
        self.apply(state.as_mut())?;
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_with(&self, config: &SyncConfig) -> Result<String> {
        if config.pretty {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            self.to_json()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
