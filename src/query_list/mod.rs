//! # QueryList
//!
//! The list of queries a compute process supports. Each entry is a
//! [`QueryDescriptor`] `(name, kind, coordinate space)`. Descriptors are
//! stored as one sequence of structs and only projected to the parallel
//! `names` / `types` / `coordRep` columns at the reflection and persistence
//! boundary, so the three columns can never drift apart in length.
//!
//! The list is append-only: there is no removal and no in-place edit.

pub mod kinds;

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{DataNode, NodeValue};
use crate::state::{AttributeState, FieldSpec, FieldType, Selection, StateRegistry};
use crate::{Error, Result};

pub use kinds::{AttributeEnum, CoordinateRepresentation, QueryType};

const ID_NAMES: usize = 0;
const ID_TYPES: usize = 1;
const ID_COORD_REP: usize = 2;

static FIELDS: [FieldSpec; 3] = [
    FieldSpec::new("names", FieldType::StringVector),
    FieldSpec::new("types", FieldType::EnumVector),
    FieldSpec::new("coordRep", FieldType::EnumVector),
];

/// One registered query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub name: String,
    pub query_type: QueryType,
    pub coord_rep: CoordinateRepresentation,
}

impl QueryDescriptor {
    pub fn new(name: impl Into<String>, query_type: QueryType, coord_rep: CoordinateRepresentation) -> Self {
        Self {
            name: name.into(),
            query_type,
            coord_rep,
        }
    }

    pub fn matches(&self, name: &str, query_type: QueryType, coord_rep: CoordinateRepresentation) -> bool {
        self.name == name && self.query_type == query_type && self.coord_rep == coord_rep
    }
}

// ============================================================================
// QueryList
// ============================================================================

/// Attribute record listing the supported queries.
#[derive(Debug, Clone)]
pub struct QueryList {
    queries: Vec<QueryDescriptor>,
    selection: Selection,
}

impl QueryList {
    pub const TYPE_NAME: &'static str = "QueryList";

    /// Empty list with every field selected.
    pub fn new() -> Self {
        Self {
            queries: Vec::new(),
            selection: Selection::all(FIELDS.len()),
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_names(&mut self) {
        self.select_field(ID_NAMES);
    }

    pub fn select_types(&mut self) {
        self.select_field(ID_TYPES);
    }

    pub fn select_coord_rep(&mut self) {
        self.select_field(ID_COORD_REP);
    }

    fn select_field(&mut self, index: usize) {
        self.selection.set(index);
    }

    fn select_columns(&mut self) {
        self.select_names();
        self.select_types();
        self.select_coord_rep();
    }

    // ------------------------------------------------------------------
    // Getters (column projections)
    // ------------------------------------------------------------------

    pub fn names(&self) -> Vec<&str> {
        self.queries.iter().map(|q| q.name.as_str()).collect()
    }

    pub fn types(&self) -> Vec<QueryType> {
        self.queries.iter().map(|q| q.query_type).collect()
    }

    pub fn coord_rep(&self) -> Vec<CoordinateRepresentation> {
        self.queries.iter().map(|q| q.coord_rep).collect()
    }

    pub fn descriptors(&self) -> &[QueryDescriptor] {
        &self.queries
    }

    pub fn get(&self, index: usize) -> Option<&QueryDescriptor> {
        self.queries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryDescriptor> {
        self.queries.iter()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Replace every descriptor from three parallel columns.
    pub fn set_queries(
        &mut self,
        names: Vec<String>,
        types: Vec<QueryType>,
        coord_rep: Vec<CoordinateRepresentation>,
    ) -> Result<()> {
        let expected = names.len();
        check_len("types", expected, types.len())?;
        check_len("coordRep", expected, coord_rep.len())?;
        self.queries = names
            .into_iter()
            .zip(types)
            .zip(coord_rep)
            .map(|((name, query_type), coord_rep)| QueryDescriptor { name, query_type, coord_rep })
            .collect();
        self.select_columns();
        Ok(())
    }

    /// Replace the `names` column. The length must match the current count.
    pub fn set_names(&mut self, names: Vec<String>) -> Result<()> {
        check_len("names", self.queries.len(), names.len())?;
        for (q, name) in self.queries.iter_mut().zip(names) {
            q.name = name;
        }
        self.select_names();
        Ok(())
    }

    /// Replace the `types` column. The length must match the current count.
    pub fn set_types(&mut self, types: Vec<QueryType>) -> Result<()> {
        check_len("types", self.queries.len(), types.len())?;
        for (q, t) in self.queries.iter_mut().zip(types) {
            q.query_type = t;
        }
        self.select_types();
        Ok(())
    }

    /// Replace the `coordRep` column. The length must match the current count.
    pub fn set_coord_rep(&mut self, coord_rep: Vec<CoordinateRepresentation>) -> Result<()> {
        check_len("coordRep", self.queries.len(), coord_rep.len())?;
        for (q, rep) in self.queries.iter_mut().zip(coord_rep) {
            q.coord_rep = rep;
        }
        self.select_coord_rep();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Append a descriptor. Does not check for duplicates; callers guard
    /// with [`query_exists`](Self::query_exists) first.
    pub fn add_query(
        &mut self,
        name: impl Into<String>,
        query_type: QueryType,
        coord_rep: CoordinateRepresentation,
    ) {
        self.queries.push(QueryDescriptor::new(name, query_type, coord_rep));
        self.select_columns();
    }

    /// [`add_query`](Self::add_query) in world space.
    pub fn add_world_query(&mut self, name: impl Into<String>, query_type: QueryType) {
        self.add_query(name, query_type, CoordinateRepresentation::WorldSpace);
    }

    pub fn query_exists(&self, name: &str, query_type: QueryType, coord_rep: CoordinateRepresentation) -> bool {
        self.queries.iter().any(|q| q.matches(name, query_type, coord_rep))
    }

    /// [`query_exists`](Self::query_exists) in world space.
    pub fn world_query_exists(&self, name: &str, query_type: QueryType) -> bool {
        self.query_exists(name, query_type, CoordinateRepresentation::WorldSpace)
    }

    // ------------------------------------------------------------------
    // Persistence helpers
    // ------------------------------------------------------------------

    fn field_value(&self, index: usize) -> NodeValue {
        match index {
            ID_NAMES => NodeValue::StringList(self.queries.iter().map(|q| q.name.clone()).collect()),
            ID_TYPES => enum_column(self.queries.iter().map(|q| q.query_type)),
            _ => enum_column(self.queries.iter().map(|q| q.coord_rep)),
        }
    }
}

impl Default for QueryList {
    fn default() -> Self {
        Self::new()
    }
}

/// Field data only; selection state does not take part.
impl PartialEq for QueryList {
    fn eq(&self, other: &Self) -> bool {
        self.queries == other.queries
    }
}

impl Eq for QueryList {}

impl<'a> IntoIterator for &'a QueryList {
    type Item = &'a QueryDescriptor;
    type IntoIter = std::slice::Iter<'a, QueryDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.queries.iter()
    }
}

fn check_len(field: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(Error::LengthMismatch { field, expected, got })
    }
}

fn enum_column<E: AttributeEnum>(values: impl Iterator<Item = E>) -> NodeValue {
    NodeValue::StringList(values.map(|e| e.as_str().to_owned()).collect())
}

/// Decode an enum column from names (canonical) or ordinals.
///
/// One bad element rejects the whole column.
fn decode_enum_column<E: AttributeEnum>(field: &str, value: &NodeValue) -> Option<Vec<E>> {
    let decoded = match value {
        NodeValue::StringList(items) => items.iter().map(|s| s.parse::<E>()).collect::<Result<Vec<E>>>(),
        NodeValue::IntList(items) => items
            .iter()
            .map(|&i| {
                E::from_ordinal(i).ok_or_else(|| Error::InvalidEnum {
                    enum_name: E::ENUM_NAME,
                    value: i.to_string(),
                })
            })
            .collect(),
        other => Err(Error::TypeMismatch {
            expected: "stringVector".into(),
            got: other.type_name().into(),
        }),
    };
    match decoded {
        Ok(values) => Some(values),
        Err(err) => {
            tracing::warn!(field, error = %err, "rejecting query list column");
            None
        }
    }
}

fn decode_names(value: &NodeValue) -> Option<Vec<String>> {
    match value.as_string_list() {
        Some(names) => Some(names.to_vec()),
        None => {
            tracing::warn!(
                field = "names",
                got = value.type_name(),
                "rejecting query list column: expected stringVector"
            );
            None
        }
    }
}

// ============================================================================
// Registration
// ============================================================================

fn new_query_list() -> Box<dyn AttributeState> {
    Box::new(QueryList::new())
}

impl StateRegistry {
    /// Registry preloaded with the record types this crate ships.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(QueryList::TYPE_NAME, new_query_list);
        registry
    }
}

// ============================================================================
// AttributeState
// ============================================================================

impl AttributeState for QueryList {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn fields(&self) -> &'static [FieldSpec] {
        &FIELDS
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    fn copy_attributes(&mut self, other: &dyn AttributeState) -> bool {
        match other.as_any().downcast_ref::<QueryList>() {
            Some(other) => {
                self.queries = other.queries.clone();
                self.select_all();
                true
            }
            None => false,
        }
    }

    fn create_node(&self, node: &mut DataNode, force_add: bool) -> bool {
        let mut added = false;
        for (index, spec) in FIELDS.iter().enumerate() {
            if force_add || self.selection.is_selected(index) {
                node.add_value(spec.name, self.field_value(index));
                added = true;
            }
        }
        tracing::debug!(
            type_name = Self::TYPE_NAME,
            force_add,
            queries = self.queries.len(),
            added,
            "created node"
        );
        added
    }

    fn set_from_node(&mut self, node: &DataNode) {
        let names = node.child_value("names").and_then(decode_names);
        let types = node
            .child_value("types")
            .and_then(|v| decode_enum_column::<QueryType>("types", v));
        let coord_rep = node
            .child_value("coordRep")
            .and_then(|v| decode_enum_column::<CoordinateRepresentation>("coordRep", v));

        match (names, types, coord_rep) {
            // A full set of columns replaces the list wholesale.
            (Some(n), Some(t), Some(c)) if n.len() == t.len() && n.len() == c.len() => {
                tracing::debug!(queries = n.len(), "replacing query list from node");
                if let Err(err) = self.set_queries(n, t, c) {
                    tracing::warn!(error = %err, "rejecting query list node");
                }
            }
            // Otherwise each column applies on its own if it fits the current count.
            (names, types, coord_rep) => {
                if let Some(Err(err)) = names.map(|n| self.set_names(n)) {
                    tracing::warn!(error = %err, "dropping column");
                }
                if let Some(Err(err)) = types.map(|t| self.set_types(t)) {
                    tracing::warn!(error = %err, "dropping column");
                }
                if let Some(Err(err)) = coord_rep.map(|c| self.set_coord_rep(c)) {
                    tracing::warn!(error = %err, "dropping column");
                }
            }
        }
    }

    fn fields_equal(&self, index: usize, other: &dyn AttributeState) -> Result<bool> {
        if index >= FIELDS.len() {
            return Err(Error::FieldIndexOutOfRange { index, count: FIELDS.len() });
        }
        let Some(other) = other.as_any().downcast_ref::<QueryList>() else {
            return Ok(false);
        };
        let equal = match index {
            ID_NAMES => self.names() == other.names(),
            ID_TYPES => self.types() == other.types(),
            _ => self.coord_rep() == other.coord_rep(),
        };
        Ok(equal)
    }

    fn clone_state(&self) -> Box<dyn AttributeState> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for QueryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, spec) in FIELDS.iter().enumerate() {
            let value = self.field_value(index);
            match &value {
                // Enum columns print bare, names print quoted.
                NodeValue::StringList(items) if index != ID_NAMES => {
                    writeln!(f, "{} = ({})", spec.name, items.join(", "))?
                }
                _ => writeln!(f, "{} = {}", spec.name, value)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use super::kinds::CoordinateRepresentation::*;
    use super::kinds::QueryType::*;

    #[test]
    fn test_scenario_columns() {
        let mut list = QueryList::new();
        list.add_world_query("temp", DatabaseQuery);
        list.add_query("pick", PointQuery, ScreenSpace);

        assert_eq!(list.names(), vec!["temp", "pick"]);
        assert_eq!(list.types(), vec![DatabaseQuery, PointQuery]);
        assert_eq!(list.coord_rep(), vec![WorldSpace, ScreenSpace]);
    }

    #[test]
    fn test_query_exists() {
        let mut list = QueryList::new();
        list.add_world_query("a", PointQuery);

        assert!(list.query_exists("a", PointQuery, WorldSpace));
        assert!(list.world_query_exists("a", PointQuery));
        assert!(!list.query_exists("a", LineQuery, WorldSpace));
        assert!(!list.query_exists("a", PointQuery, ScreenSpace));
        assert!(!list.query_exists("b", PointQuery, WorldSpace));
    }

    #[test]
    fn test_add_query_selects_columns() {
        let mut list = QueryList::new();
        list.unselect_all();
        list.add_world_query("a", PointQuery);
        assert_eq!(list.selected_fields(), vec![ID_NAMES, ID_TYPES, ID_COORD_REP]);
    }

    #[test]
    fn test_column_setter_length_checked() {
        let mut list = QueryList::new();
        list.add_world_query("a", PointQuery);
        list.unselect_all();

        let err = list.set_names(vec!["x".into(), "y".into()]).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { field: "names", expected: 1, got: 2 }));
        assert!(!list.is_selected(ID_NAMES));
        assert_eq!(list.names(), vec!["a"]);

        list.set_types(vec![LineQuery]).unwrap();
        assert_eq!(list.types(), vec![LineQuery]);
        assert_eq!(list.selected_fields(), vec![ID_TYPES]);
    }

    #[test]
    fn test_set_queries_rejects_ragged_columns() {
        let mut list = QueryList::new();
        let err = list
            .set_queries(vec!["a".into()], vec![PointQuery, LineQuery], vec![WorldSpace])
            .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { field: "types", .. }));
        assert!(list.is_empty());
    }

    #[test]
    fn test_equality_ignores_selection() {
        let mut a = QueryList::new();
        a.add_world_query("a", PointQuery);
        let mut b = a.clone();
        b.unselect_all();
        assert_eq!(a, b);

        b.add_world_query("b", LineQuery);
        assert_ne!(a, b);
    }

    #[test]
    fn test_copy_attributes_selects_all() {
        let mut src = QueryList::new();
        src.add_query("pick", PointQuery, ScreenSpace);
        let mut dst = QueryList::new();
        dst.unselect_all();

        assert!(dst.copy_attributes(&src));
        assert_eq!(dst, src);
        assert_eq!(dst.selection().count(), 3);
    }

    #[test]
    fn test_fields_equal() {
        let mut a = QueryList::new();
        a.add_world_query("a", PointQuery);
        let mut b = QueryList::new();
        b.add_query("a", PointQuery, ScreenSpace);

        assert!(a.fields_equal(ID_NAMES, &b).unwrap());
        assert!(a.fields_equal(ID_TYPES, &b).unwrap());
        assert!(!a.fields_equal(ID_COORD_REP, &b).unwrap());
        assert!(matches!(
            a.fields_equal(3, &b),
            Err(Error::FieldIndexOutOfRange { index: 3, count: 3 })
        ));
    }

    #[test]
    fn test_reflection_table() {
        let list = QueryList::new();
        assert_eq!(list.field_count(), 3);
        assert_eq!(list.field_name(0).unwrap(), "names");
        assert_eq!(list.field_name(2).unwrap(), "coordRep");
        assert_eq!(list.field_type(0).unwrap(), FieldType::StringVector);
        assert_eq!(list.field_type_name(1).unwrap(), "enumVector");
        assert_eq!(list.field_index("types"), Some(1));
        assert_eq!(list.field_index("bogus"), None);
        assert!(list.field_name(3).is_err());
    }

    #[test]
    fn test_create_node_writes_selected_only() {
        let mut list = QueryList::new();
        list.add_world_query("a", PointQuery);
        list.unselect_all();
        list.set_types(vec![LineQuery]).unwrap();

        let mut node = DataNode::new("QueryList");
        assert!(list.create_node(&mut node, false));
        assert_eq!(node.len(), 1);
        assert_eq!(
            node.child_value("types"),
            Some(&NodeValue::StringList(vec!["LineQuery".into()]))
        );
    }

    #[test]
    fn test_create_node_nothing_selected() {
        let mut list = QueryList::new();
        list.unselect_all();
        let mut node = DataNode::new("QueryList");
        assert!(!list.create_node(&mut node, false));
        assert!(node.is_empty());

        assert!(list.create_node(&mut node, true));
        assert_eq!(node.len(), 3);
    }

    #[test]
    fn test_set_from_node_accepts_ordinals() {
        let mut node = DataNode::new("QueryList");
        node.add_value("names", vec!["a", "b"]);
        node.add_value("types", vec![1i64, 2]);
        node.add_value("coordRep", vec![0i64, 1]);

        let mut list = QueryList::new();
        list.set_from_node(&node);
        assert_eq!(list.types(), vec![PointQuery, LineQuery]);
        assert_eq!(list.coord_rep(), vec![WorldSpace, ScreenSpace]);
    }

    #[test]
    fn test_set_from_node_rejects_unknown_enum_column() {
        let mut list = QueryList::new();
        list.add_world_query("a", PointQuery);
        list.unselect_all();

        let mut node = DataNode::new("QueryList");
        node.add_value("names", vec!["renamed"]);
        node.add_value("types", vec!["bogus"]);

        list.set_from_node(&node);
        assert_eq!(list.names(), vec!["renamed"]);
        assert_eq!(list.types(), vec![PointQuery]);
        assert_eq!(list.selected_fields(), vec![ID_NAMES]);
    }

    #[test]
    fn test_set_from_node_keeps_lengths_consistent() {
        let mut list = QueryList::new();
        list.add_world_query("a", PointQuery);

        // Ragged full set: only the column matching the current count applies.
        let mut node = DataNode::new("QueryList");
        node.add_value("names", vec!["x", "y"]);
        node.add_value("types", vec!["LineQuery"]);
        node.add_value("coordRep", vec!["WorldSpace", "ScreenSpace", "WorldSpace"]);
        list.set_from_node(&node);

        assert_eq!(list.len(), 1);
        assert_eq!(list.names(), vec!["a"]);
        assert_eq!(list.types(), vec![LineQuery]);
        assert_eq!(list.coord_rep(), vec![WorldSpace]);
    }

    #[test]
    fn test_set_from_node_ignores_unknown_children() {
        let mut list = QueryList::new();
        list.unselect_all();
        let mut node = DataNode::new("QueryList");
        node.add_value("colorTables", vec!["hot"]);
        list.set_from_node(&node);
        assert!(list.is_empty());
        assert!(!list.selection().any());
    }

    #[test]
    fn test_defaults_include_query_list() {
        let registry = StateRegistry::with_defaults();
        assert!(registry.contains("QueryList"));
        let state = registry.create("QueryList").unwrap();
        assert_eq!(state.type_name(), "QueryList");
        assert_eq!(state.field_count(), 3);
    }

    #[test]
    fn test_registry_clones_share_table() {
        let registry = StateRegistry::new();
        let other = registry.clone();
        other.register(QueryList::TYPE_NAME, new_query_list);
        assert_eq!(registry.type_names(), vec!["QueryList".to_string()]);
    }

    #[test]
    fn test_display() {
        let mut list = QueryList::new();
        list.add_world_query("temp", DatabaseQuery);
        list.add_query("pick", PointQuery, ScreenSpace);
        assert_eq!(
            list.to_string(),
            "names = (\"temp\", \"pick\")\n\
             types = (DatabaseQuery, PointQuery)\n\
             coordRep = (WorldSpace, ScreenSpace)\n"
        );
    }
}
