use std::sync::{Arc, LazyLock};

use futures::future::{self, BoxFuture, FutureExt as _};
use pretty_assertions::assert_eq;

use crate::{
    ast::{OperationType, Selection},
    executor::{ErrorKind, ExecutionError, ExecutionResult, Executor, FieldResult, RootNode},
    graphql_value,
    schema::{
        meta::{Argument, Field, ObjectMeta},
        model::SchemaType,
    },
    types::{
        base::{Arguments, GraphQLObject, Resolvers},
        nullable::Nullable,
    },
    value::Value,
};

struct TestType;

fn pic_caption(args: &Arguments<'_>) -> FieldResult<Value> {
    Ok(match args.get_nullable::<i32>("size")? {
        Nullable::Some(size) => format!("Pic of size: {size}").into(),
        Nullable::ExplicitNull => "Pic of unknown size".into(),
        Nullable::ImplicitNull => Value::null(),
    })
}

fn echo_value(args: &Arguments<'_>) -> FieldResult<Value> {
    Ok(match args.get_nullable::<String>("value")? {
        Nullable::Some(s) => s.into(),
        Nullable::ExplicitNull => "explicit null".into(),
        Nullable::ImplicitNull => "absent".into(),
    })
}

fn sum_values(args: &Arguments<'_>) -> FieldResult<Value> {
    Ok(args.require::<Vec<i32>>("values")?.iter().sum::<i32>().into())
}

fn pic<'a>(
    _: &'a TestType,
    args: &'a Arguments<'a>,
    _: &'a Executor<'a, ()>,
) -> BoxFuture<'a, ExecutionResult> {
    future::ready(pic_caption(args)).boxed()
}

fn echo<'a>(
    _: &'a TestType,
    args: &'a Arguments<'a>,
    _: &'a Executor<'a, ()>,
) -> BoxFuture<'a, ExecutionResult> {
    future::ready(echo_value(args)).boxed()
}

fn sum<'a>(
    _: &'a TestType,
    args: &'a Arguments<'a>,
    _: &'a Executor<'a, ()>,
) -> BoxFuture<'a, ExecutionResult> {
    future::ready(sum_values(args)).boxed()
}

static TEST_TYPE: LazyLock<Resolvers<TestType, ()>> = LazyLock::new(|| {
    Resolvers::new()
        .field("pic", pic)
        .field("echo", echo)
        .field("sum", sum)
});

impl GraphQLObject<()> for TestType {
    fn type_name(&self) -> &str {
        "TestType"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        TEST_TYPE.resolve(self, field_name, args, executor)
    }
}

fn root() -> RootNode<()> {
    let mut schema = SchemaType::new();
    let string = schema.lookup_type("String").unwrap();
    let int = schema.lookup_type("Int").unwrap();
    let int_nn = schema.non_null(int).unwrap();
    let ints = schema.list_of(int_nn).unwrap();
    let ints = schema.non_null(ints).unwrap();

    let test_type = schema.add_type(ObjectMeta::new("TestType")).unwrap();
    schema
        .add_fields(
            test_type,
            [
                Field::new("pic", string).argument(Argument::new("size", int).default_value(50)),
                Field::new("echo", string).argument(Argument::new("value", string)),
                Field::new("sum", int).argument(Argument::new("values", ints)),
            ],
        )
        .unwrap();
    schema.add_query_type(test_type).unwrap();
    RootNode::new(Arc::new(schema), TestType)
}

async fn run(doc: &[Selection]) -> (Value, Vec<ExecutionError>) {
    root()
        .execute(OperationType::Query, doc, &())
        .await
        .unwrap()
}

#[tokio::test]
async fn default_fills_absent_argument() {
    let doc = [
        Selection::field("pic").alias("absent"),
        Selection::field("pic").alias("given").argument("size", 10),
        Selection::field("pic")
            .alias("explicitNull")
            .argument("size", Value::null()),
    ];

    assert_eq!(
        run(&doc).await,
        (
            graphql_value!({
                "absent": "Pic of size: 50",
                "given": "Pic of size: 10",
                "explicitNull": "Pic of unknown size",
            }),
            vec![],
        ),
    );
}

#[tokio::test]
async fn explicit_null_differs_from_absent() {
    let doc = [
        Selection::field("echo").alias("absent"),
        Selection::field("echo")
            .alias("null")
            .argument("value", Value::null()),
        Selection::field("echo").alias("given").argument("value", "hi"),
    ];

    assert_eq!(
        run(&doc).await,
        (
            graphql_value!({
                "absent": "absent",
                "null": "explicit null",
                "given": "hi",
            }),
            vec![],
        ),
    );
}

#[tokio::test]
async fn list_argument_accepts_single_item() {
    let doc = [
        Selection::field("sum")
            .alias("many")
            .argument("values", graphql_value!([1, 2, 3])),
        Selection::field("sum").alias("one").argument("values", 4),
    ];

    assert_eq!(
        run(&doc).await,
        (graphql_value!({"many": 6, "one": 4}), vec![]),
    );
}

#[tokio::test]
async fn invalid_arguments_null_the_field() {
    let doc = [
        Selection::field("pic").argument("size", "big"),
        Selection::field("sum"),
    ];

    let (data, errors) = run(&doc).await;

    assert_eq!(data, graphql_value!({"pic": null, "sum": null}));
    assert_eq!(
        errors
            .iter()
            .map(|e| (e.path()[0].to_string(), e.error().kind(), e.error().message()))
            .collect::<Vec<_>>(),
        [
            (
                "pic".to_owned(),
                ErrorKind::Argument,
                "Invalid value for argument \"size\": Expected `Int`, found: \"big\"",
            ),
            (
                "sum".to_owned(),
                ErrorKind::Argument,
                "Missing required argument \"values\"",
            ),
        ],
    );
}
