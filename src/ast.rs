//! Pre-resolved operation input consumed by the executor.
//!
//! Parsing, fragment flattening and `@skip`/`@include` evaluation happen
//! upstream; the executor only ever sees plain field selections whose
//! arguments are already substituted and coerced.

use std::fmt;

use arcstr::ArcStr;
use indexmap::IndexMap;

use crate::value::Value;

/// Kind of an operation, selecting the root object it runs against.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperationType {
    /// `query { ... }`
    Query,
    /// `mutation { ... }`
    Mutation,
    /// `subscription { ... }`, resolved as a single event.
    Subscription,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        })
    }
}

/// A single field selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    /// Name of the field on the parent type.
    pub name: ArcStr,
    /// Response key, if different from [`Selection::name`].
    pub alias: Option<ArcStr>,
    /// Arguments, in document order. Absent keys were not provided.
    pub arguments: IndexMap<ArcStr, Value>,
    /// Nested selections, `None` for leaf fields.
    pub selection_set: Option<Vec<Selection>>,
}

impl Selection {
    /// Starts a selection of the field `name`.
    pub fn field(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: IndexMap::new(),
            selection_set: None,
        }
    }

    /// Sets the response key.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<ArcStr>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Adds an argument, replacing a previous one with the same name.
    #[must_use]
    pub fn argument(mut self, name: impl Into<ArcStr>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Sets the nested selection set.
    #[must_use]
    pub fn select(mut self, selection_set: impl IntoIterator<Item = Selection>) -> Self {
        self.selection_set = Some(selection_set.into_iter().collect());
        self
    }

    /// The key this field's value is stored under in the response.
    pub fn response_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Shortcut for a list of leaf field selections, e.g. `leaves(["id", "title"])`.
pub fn leaves<I, N>(names: I) -> Vec<Selection>
where
    I: IntoIterator<Item = N>,
    N: Into<ArcStr>,
{
    names.into_iter().map(Selection::field).collect()
}
