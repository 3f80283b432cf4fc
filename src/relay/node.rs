//! Globally unique object identification
//!
//! A [`GlobalId`] tags an object's local id with its type name so that
//! `Query.node(id:)` can find the loader of any [`Node`] type from the id
//! alone.

use std::{fmt, str::FromStr};

use arcstr::ArcStr;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use derive_more::with_trait::{Display, Error};
use fnv::FnvHashMap;
use indexmap::IndexMap;

use crate::{
    executor::{ErrorKind, ExecutionResult, FieldError, FieldResult},
    schema::{
        meta::{Field, InterfaceMeta, TypeId},
        model::{SchemaError, SchemaType},
    },
    types::base::{FromInputValue, GraphQLObject},
    value::Value,
};

/// Error decoding a [`GlobalId`].
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum GlobalIdError {
    /// The id is not URL-safe base64.
    #[display("Malformed global id: {_0}")]
    Encoding(base64::DecodeError),

    /// The decoded id has no `:` between type name and local id.
    #[display("Global id has no type separator")]
    MissingSeparator,

    /// The type name part is empty or not UTF-8.
    #[display("Global id has an invalid type name")]
    InvalidTypeName,
}

/// An opaque, globally unique object id.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GlobalId {
    /// Name of the object type owning the id.
    pub type_name: ArcStr,
    /// Id of the object among the objects of its type.
    pub local_id: Vec<u8>,
}

impl GlobalId {
    /// Tags a local id with its type name.
    pub fn new(type_name: impl Into<ArcStr>, local_id: impl Into<Vec<u8>>) -> Self {
        Self {
            type_name: type_name.into(),
            local_id: local_id.into(),
        }
    }

    /// Encodes as URL-safe, unpadded base64 of `type_name ':' local_id`.
    pub fn encode(&self) -> String {
        let mut raw = Vec::with_capacity(self.type_name.len() + 1 + self.local_id.len());
        raw.extend_from_slice(self.type_name.as_bytes());
        raw.push(b':');
        raw.extend_from_slice(&self.local_id);
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Decodes an id produced by [`GlobalId::encode`].
    ///
    /// The type name ends at the first `:`; the local id may contain more.
    pub fn decode(id: &str) -> Result<Self, GlobalIdError> {
        let raw = URL_SAFE_NO_PAD
            .decode(id)
            .map_err(GlobalIdError::Encoding)?;
        let sep = raw
            .iter()
            .position(|b| *b == b':')
            .ok_or(GlobalIdError::MissingSeparator)?;
        let type_name = std::str::from_utf8(&raw[..sep])
            .ok()
            .filter(|name| !name.is_empty())
            .ok_or(GlobalIdError::InvalidTypeName)?;

        Ok(Self {
            type_name: type_name.into(),
            local_id: raw[sep + 1..].to_vec(),
        })
    }

    /// The local id as text, if it is UTF-8.
    pub fn local_id_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.local_id).ok()
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for GlobalId {
    type Err = GlobalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl FromInputValue for GlobalId {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        let id = String::from_input_value(v)?;
        Self::decode(&id).map_err(|e| FieldError::of_kind(ErrorKind::Argument, e))
    }
}

/// An object type implementing the `Node` interface.
#[async_trait]
pub trait Node<C: Sync>: GraphQLObject<C> {
    /// Name of the object type, embedded in its global ids.
    const TYPE_NAME: &'static str;

    /// The object's id among the objects of its type.
    async fn id(&self, context: &C) -> FieldResult<Vec<u8>>;

    /// The object's global id.
    async fn global_id(&self, context: &C) -> FieldResult<GlobalId> {
        Ok(GlobalId::new(Self::TYPE_NAME, self.id(context).await?))
    }
}

/// Resolves the `id: ID!` field of a [`Node`].
pub async fn resolve_node_id<C, N>(node: &N, context: &C) -> ExecutionResult
where
    C: Sync,
    N: Node<C>,
{
    Ok(Value::String(node.global_id(context).await?.encode()))
}

/// A boxed object returned by a [`NodeLoader`].
pub type NodeObject<C> = Box<dyn GraphQLObject<C>>;

/// Batched fetching of the objects of one [`Node`] type.
#[async_trait]
pub trait NodeLoader<C>: Send + Sync {
    /// Loads the objects with the given local ids.
    ///
    /// The result is positional: one entry per id, `None` for ids matching
    /// no object.
    async fn load(&self, ids: &[Vec<u8>], context: &C) -> FieldResult<Vec<Option<NodeObject<C>>>>;
}

/// Loaders of every [`Node`] type, keyed by type name.
pub struct NodeLoaders<C> {
    loaders: FnvHashMap<ArcStr, Box<dyn NodeLoader<C>>>,
}

impl<C> Default for NodeLoaders<C> {
    fn default() -> Self {
        Self {
            loaders: FnvHashMap::default(),
        }
    }
}

impl<C> fmt::Debug for NodeLoaders<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.loaders.keys()).finish()
    }
}

impl<C: Sync> NodeLoaders<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the loader of the `type_name` objects.
    #[must_use]
    pub fn with_loader(
        mut self,
        type_name: impl Into<ArcStr>,
        loader: impl NodeLoader<C> + 'static,
    ) -> Self {
        self.loaders.insert(type_name.into(), Box::new(loader));
        self
    }

    /// Fetches the object behind a global id.
    ///
    /// An id matching no object gives `Ok(None)`.
    ///
    /// # Errors
    ///
    /// If the id is malformed, its type has no loader, or the loader fails.
    pub async fn fetch(&self, id: &str, context: &C) -> FieldResult<Option<NodeObject<C>>> {
        let id = GlobalId::decode(id).map_err(|e| FieldError::of_kind(ErrorKind::Lookup, e))?;
        let loader = self.loader(&id.type_name)?;
        let loaded = loader.load(std::slice::from_ref(&id.local_id), context).await?;
        Ok(loaded.into_iter().next().flatten())
    }

    /// Fetches several objects, calling each loader once.
    ///
    /// The result has one entry per id, in order.
    ///
    /// # Errors
    ///
    /// If any id is malformed, has no loader, or its loader fails.
    pub async fn fetch_many(
        &self,
        ids: &[&str],
        context: &C,
    ) -> FieldResult<Vec<Option<NodeObject<C>>>> {
        let mut batches = IndexMap::<ArcStr, (Vec<usize>, Vec<Vec<u8>>)>::new();
        for (pos, id) in ids.iter().enumerate() {
            let id = GlobalId::decode(id).map_err(|e| FieldError::of_kind(ErrorKind::Lookup, e))?;
            let (positions, local_ids) = batches.entry(id.type_name).or_default();
            positions.push(pos);
            local_ids.push(id.local_id);
        }

        let mut results = Vec::with_capacity(ids.len());
        results.resize_with(ids.len(), || None);
        for (type_name, (positions, local_ids)) in batches {
            let loader = self.loader(&type_name)?;
            tracing::trace!(%type_name, count = local_ids.len(), "loading nodes");
            let loaded = loader.load(&local_ids, context).await?;
            for (pos, object) in positions.into_iter().zip(loaded) {
                results[pos] = object;
            }
        }
        Ok(results)
    }

    fn loader(&self, type_name: &str) -> FieldResult<&dyn NodeLoader<C>> {
        self.loaders
            .get(type_name)
            .map(AsRef::as_ref)
            .ok_or_else(|| {
                FieldError::of_kind(
                    ErrorKind::Lookup,
                    format!("No node type \"{type_name}\" is registered"),
                )
            })
    }
}

impl SchemaType {
    /// Registers `interface Node { id: ID! }`.
    ///
    /// # Errors
    ///
    /// If a type named `Node` already exists, or `ID` is not registered.
    pub fn add_node_interface(&mut self) -> Result<TypeId, SchemaError> {
        let id = self.lookup_type("ID")?;
        let id = self.non_null(id)?;
        let node = self.add_type(
            InterfaceMeta::new("Node")
                .description("An object with a globally unique id."),
        )?;
        self.add_fields(node, [Field::new("id", id)])?;
        Ok(node)
    }
}
