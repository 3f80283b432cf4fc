#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

#[doc(inline)]
pub use futures::future::BoxFuture;

#[macro_use]
mod value;
mod ast;
pub mod executor;
pub mod integrations;
pub mod relay;
mod schema;
mod types;

#[cfg(all(test, not(feature = "expose-test-schema")))]
mod tests;
#[cfg(feature = "expose-test-schema")]
pub mod tests;


pub use crate::{
    ast::{OperationType, Selection, leaves},
    executor::{
        ErrorKind, ExecutionError, ExecutionResult, Executor, FieldError, FieldResult,
        GraphQLError, PathSegment, RootNode,
    },
    relay::{
        Connection, ConnectionArguments, Cursor, Edge, GlobalId, GlobalIdError, Node, NodeLoader,
        NodeLoaders, PageInfo, PaginationError,
    },
    schema::{
        meta,
        model::{SchemaError, SchemaType},
        schema::{
            DirectiveObject, EnumValueObject, FieldObject, InputValueObject, SchemaObject,
            TypeObject,
        },
    },
    types::{
        base::{Arguments, FromInputValue, GraphQLObject, ResolverFn, Resolvers},
        nullable::Nullable,
    },
    value::{Object, Value},
};

/// Executes a pre-resolved operation against a [`RootNode`].
///
/// Shortcut for [`RootNode::execute`].
pub async fn execute<C>(
    root_node: &RootNode<C>,
    operation: OperationType,
    selection_set: &[Selection],
    context: &C,
) -> Result<(Value, Vec<ExecutionError>), GraphQLError>
where
    C: Send + Sync,
{
    root_node.execute(operation, selection_set, context).await
}
