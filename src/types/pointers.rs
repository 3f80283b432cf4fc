use std::sync::Arc;

use futures::future::BoxFuture;

use crate::{
    executor::{ExecutionResult, Executor},
    types::base::{Arguments, GraphQLObject},
};

impl<C, T> GraphQLObject<C> for Box<T>
where
    T: GraphQLObject<C> + ?Sized,
{
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        (**self).resolve_field(field_name, args, executor)
    }
}

impl<C, T> GraphQLObject<C> for Arc<T>
where
    T: GraphQLObject<C> + ?Sized,
{
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        (**self).resolve_field(field_name, args, executor)
    }
}

impl<C, T> GraphQLObject<C> for &T
where
    T: GraphQLObject<C> + ?Sized,
{
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        (**self).resolve_field(field_name, args, executor)
    }
}
