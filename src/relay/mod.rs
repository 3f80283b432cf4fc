//! Object identification and cursor pagination, following the Relay
//! server conventions.

pub mod connection;
pub mod node;

pub use self::{
    connection::{Connection, ConnectionArguments, Cursor, Edge, PageInfo, PaginationError},
    node::{
        GlobalId, GlobalIdError, Node, NodeLoader, NodeLoaders, NodeObject, resolve_node_id,
    },
};
