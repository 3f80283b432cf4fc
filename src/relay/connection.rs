//! Cursor-based pagination over ordered lists
//!
//! Connection arguments are applied in a fixed order: `after`, then
//! `before`, then `first`, then `last`. Page flags are computed against the
//! whole list, not just the `after`/`before` window.

use std::fmt;

use arcstr::ArcStr;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use derive_more::with_trait::{Display, Error};
use futures::future::{self, BoxFuture, FutureExt as _};

use crate::{
    executor::{ErrorKind, ExecutionResult, Executor, FieldError, FieldResult},
    schema::{
        meta::{Argument, Field, ObjectMeta, TypeId},
        model::{SchemaError, SchemaType},
    },
    types::base::{Arguments, GraphQLObject},
    value::Value,
};

const OFFSET_PREFIX: &str = "arrayconnection:";

/// Error raised for connection arguments that don't fit the list.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum PaginationError {
    /// The cursor is not URL-safe base64.
    #[display("Invalid cursor \"{_0}\"")]
    InvalidCursor(#[error(not(source))] String),

    /// No item of the list has this cursor.
    #[display("Cursor \"{_0}\" does not match any item")]
    UnknownCursor(#[error(not(source))] String),

    /// `first` or `last` is negative.
    #[display("Argument \"{argument}\" must not be negative, got {value}")]
    NegativeSize {
        /// Either `"first"` or `"last"`.
        argument: &'static str,
        /// The rejected size.
        value: i32,
    },
}

impl PaginationError {
    /// Reports this error as a field error of the connection field.
    pub fn into_field_error(self) -> FieldError {
        FieldError::of_kind(ErrorKind::Pagination, self)
    }
}

/// Opaque position of an item in a connection.
///
/// Clients see cursors as URL-safe, unpadded base64 strings; their content
/// is up to the connection's owner.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Cursor(Vec<u8>);

impl Cursor {
    /// Wraps raw cursor bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Cursor of the item at `offset` of a list.
    pub fn from_offset(offset: usize) -> Self {
        Self(format!("{OFFSET_PREFIX}{offset}").into_bytes())
    }

    /// The offset of a cursor made by [`Cursor::from_offset`].
    pub fn offset(&self) -> Option<usize> {
        std::str::from_utf8(&self.0)
            .ok()?
            .strip_prefix(OFFSET_PREFIX)?
            .parse()
            .ok()
    }

    /// The raw cursor bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The token handed out to clients.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0)
    }

    /// Parses a token made by [`Cursor::encode`].
    pub fn decode(token: &str) -> Result<Self, PaginationError> {
        URL_SAFE_NO_PAD
            .decode(token)
            .map(Self)
            .map_err(|_| PaginationError::InvalidCursor(token.into()))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<&Cursor> for Value {
    fn from(cursor: &Cursor) -> Self {
        Self::String(cursor.encode())
    }
}

/// The `first`, `after`, `last` and `before` arguments of a connection field.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnectionArguments {
    /// Maximum number of items from the start of the window.
    pub first: Option<i32>,
    /// Only items after this cursor.
    pub after: Option<Cursor>,
    /// Maximum number of items from the end of the window.
    pub last: Option<i32>,
    /// Only items before this cursor.
    pub before: Option<Cursor>,
}

impl ConnectionArguments {
    /// Reads the connection arguments of a field.
    ///
    /// # Errors
    ///
    /// If an argument has the wrong type or a cursor is not a valid token.
    pub fn from_arguments(args: &Arguments<'_>) -> FieldResult<Self> {
        let cursor = |name| -> FieldResult<Option<Cursor>> {
            args.get::<String>(name)?
                .map(|token| Cursor::decode(&token).map_err(PaginationError::into_field_error))
                .transpose()
        };

        Ok(Self {
            first: args.get("first")?,
            after: cursor("after")?,
            last: args.get("last")?,
            before: cursor("before")?,
        })
    }
}

/// Pagination state of a [`Connection`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PageInfo {
    /// Items exist after the returned page.
    pub has_next_page: bool,
    /// Items exist before the returned page.
    pub has_previous_page: bool,
    /// Cursor of the first returned item.
    pub start_cursor: Option<Cursor>,
    /// Cursor of the last returned item.
    pub end_cursor: Option<Cursor>,
}

impl<C: Send + Sync> GraphQLObject<C> for PageInfo {
    fn type_name(&self) -> &str {
        "PageInfo"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        let res = match field_name {
            "hasNextPage" => Ok(Value::from(self.has_next_page)),
            "hasPreviousPage" => Ok(Value::from(self.has_previous_page)),
            "startCursor" => Ok(Value::from(self.start_cursor.as_ref())),
            "endCursor" => Ok(Value::from(self.end_cursor.as_ref())),
            _ => Err(FieldError::field_not_found("PageInfo", field_name)),
        };
        future::ready(res).boxed()
    }
}

/// An item of a [`Connection`] along with its cursor.
#[derive(Clone, Debug)]
pub struct Edge<N> {
    type_name: ArcStr,
    /// The item.
    pub node: N,
    /// Position of the item.
    pub cursor: Cursor,
}

impl<C, N> GraphQLObject<C> for Edge<N>
where
    C: Send + Sync,
    N: GraphQLObject<C>,
{
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        match field_name {
            "node" => executor.resolve_object(&self.node),
            "cursor" => future::ready(Ok(Value::from(&self.cursor))).boxed(),
            _ => future::ready(Err(FieldError::field_not_found(&self.type_name, field_name)))
                .boxed(),
        }
    }
}

/// One page of a list, as a `<Node>Connection` object.
#[derive(Clone, Debug)]
pub struct Connection<N> {
    type_name: ArcStr,
    /// The items of the page.
    pub edges: Vec<Edge<N>>,
    /// Where the page sits in the list.
    pub page_info: PageInfo,
}

impl<N> Connection<N> {
    /// Slices the page selected by `args` out of `items`.
    ///
    /// `node_type` names the item type, giving the `<Node>Connection` and
    /// `<Node>Edge` type names; `cursor_of` computes the cursor of an item
    /// from its position and value.
    ///
    /// # Errors
    ///
    /// If a cursor matches no item, or `first`/`last` is negative.
    pub fn paginate<I, F>(
        node_type: &str,
        items: I,
        cursor_of: F,
        args: &ConnectionArguments,
    ) -> Result<Self, PaginationError>
    where
        I: IntoIterator<Item = N>,
        F: Fn(usize, &N) -> Cursor,
    {
        let items = items.into_iter().collect::<Vec<_>>();
        let cursors = items
            .iter()
            .enumerate()
            .map(|(idx, item)| cursor_of(idx, item))
            .collect::<Vec<_>>();
        let total = cursors.len();
        let (start, end) = page_bounds(&cursors, args)?;

        let edge_type = ArcStr::from(format!("{node_type}Edge"));
        let edges = items
            .into_iter()
            .zip(cursors)
            .skip(start)
            .take(end - start)
            .map(|(node, cursor)| Edge {
                type_name: edge_type.clone(),
                node,
                cursor,
            })
            .collect::<Vec<_>>();

        let page_info = PageInfo {
            has_next_page: end < total,
            has_previous_page: start > 0,
            start_cursor: edges.first().map(|e| e.cursor.clone()),
            end_cursor: edges.last().map(|e| e.cursor.clone()),
        };

        Ok(Self {
            type_name: format!("{node_type}Connection").into(),
            edges,
            page_info,
        })
    }

    /// Same as [`Connection::paginate`], with positional cursors made by
    /// [`Cursor::from_offset`].
    ///
    /// # Errors
    ///
    /// If a cursor matches no item, or `first`/`last` is negative.
    pub fn paginate_by_offset<I>(
        node_type: &str,
        items: I,
        args: &ConnectionArguments,
    ) -> Result<Self, PaginationError>
    where
        I: IntoIterator<Item = N>,
    {
        Self::paginate(node_type, items, |idx, _| Cursor::from_offset(idx), args)
    }

    /// The items of the page.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.edges.iter().map(|e| &e.node)
    }
}

impl<C, N> GraphQLObject<C> for Connection<N>
where
    C: Send + Sync,
    N: GraphQLObject<C>,
{
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        match field_name {
            "edges" => executor.resolve_list(&self.edges),
            "pageInfo" => executor.resolve_object(&self.page_info),
            _ => future::ready(Err(FieldError::field_not_found(&self.type_name, field_name)))
                .boxed(),
        }
    }
}

/// Half-open `[start, end)` range of the page within `cursors`.
fn page_bounds(
    cursors: &[Cursor],
    args: &ConnectionArguments,
) -> Result<(usize, usize), PaginationError> {
    let position = |cursor: &Cursor| {
        cursors
            .iter()
            .position(|c| c == cursor)
            .ok_or_else(|| PaginationError::UnknownCursor(cursor.encode()))
    };
    let size = |argument, value: i32| {
        usize::try_from(value).map_err(|_| PaginationError::NegativeSize { argument, value })
    };

    let mut start = 0;
    let mut end = cursors.len();
    if let Some(after) = &args.after {
        start = position(after)? + 1;
    }
    if let Some(before) = &args.before {
        end = end.min(position(before)?);
    }
    end = end.max(start);

    if let Some(first) = args.first {
        end = end.min(start + size("first", first)?);
    }
    if let Some(last) = args.last {
        start = start.max(end.saturating_sub(size("last", last)?));
    }
    Ok((start, end))
}

impl SchemaType {
    /// Registers the `<Node>Connection` and `<Node>Edge` types of a node
    /// type, along with `PageInfo` if not registered yet.
    ///
    /// Returns the connection type.
    ///
    /// # Errors
    ///
    /// If `node` is not an object, interface or union, or the connection
    /// types already exist.
    pub fn add_connection_types(&mut self, node: TypeId) -> Result<TypeId, SchemaError> {
        let meta = self.meta(node).ok_or(SchemaError::UnknownHandle(node))?;
        if !meta.is_composite() {
            return Err(SchemaError::InvalidTarget {
                name: self.display_type(node),
                member: "a connection",
            });
        }
        let node_name = self.display_type(node);
        let edge_name = format!("{node_name}Edge");
        let connection_name = format!("{node_name}Connection");
        for name in [&edge_name, &connection_name] {
            if self.type_by_name(name).is_some() {
                tracing::warn!(%name, "rejected duplicate connection type");
                return Err(SchemaError::DuplicateType(name.as_str().into()));
            }
        }

        let page_info = match self.type_by_name("PageInfo") {
            Some(id) => id,
            None => self.add_page_info()?,
        };
        let page_info = self.non_null(page_info)?;
        let string = self.lookup_type("String")?;
        let cursor = self.non_null(string)?;

        let edge = self.add_type(
            ObjectMeta::new(edge_name)
                .description(format!("An edge in a {node_name} connection.")),
        )?;
        self.add_fields(
            edge,
            [
                Field::new("node", node).description("The item at the end of the edge."),
                Field::new("cursor", cursor).description("A cursor for use in pagination."),
            ],
        )?;

        let edges = self.list_of(edge)?;
        let connection = self.add_type(
            ObjectMeta::new(connection_name)
                .description(format!("A page of {node_name} items.")),
        )?;
        self.add_fields(
            connection,
            [
                Field::new("edges", edges).description("A list of edges."),
                Field::new("pageInfo", page_info)
                    .description("Information to aid in pagination."),
            ],
        )?;
        Ok(connection)
    }

    /// The `first`, `after`, `last` and `before` arguments of a connection
    /// field.
    ///
    /// # Errors
    ///
    /// If `Int` or `String` is not registered.
    pub fn connection_arguments(&self) -> Result<Vec<Argument>, SchemaError> {
        let int = self.lookup_type("Int")?;
        let string = self.lookup_type("String")?;
        Ok(vec![
            Argument::new("first", int).description("Returns the first n items."),
            Argument::new("after", string)
                .description("Returns the items after this cursor."),
            Argument::new("last", int).description("Returns the last n items."),
            Argument::new("before", string)
                .description("Returns the items before this cursor."),
        ])
    }

    fn add_page_info(&mut self) -> Result<TypeId, SchemaError> {
        let boolean = self.lookup_type("Boolean")?;
        let boolean = self.non_null(boolean)?;
        let string = self.lookup_type("String")?;

        let page_info = self.add_type(
            ObjectMeta::new("PageInfo")
                .description("Information about pagination in a connection."),
        )?;
        self.add_fields(
            page_info,
            [
                Field::new("hasNextPage", boolean),
                Field::new("hasPreviousPage", boolean),
                Field::new("startCursor", string),
                Field::new("endCursor", string),
            ],
        )?;
        Ok(page_info)
    }
}
