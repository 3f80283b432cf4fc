mod field_execution {
    use std::sync::{Arc, LazyLock};

    use futures::future::{self, BoxFuture, FutureExt as _};
    use pretty_assertions::assert_eq;

    use crate::{
        ast::{OperationType, Selection, leaves},
        executor::{
            ErrorKind, ExecutionError, ExecutionResult, Executor, FieldError, PathSegment,
            RootNode,
        },
        graphql_value,
        schema::{
            meta::{Field, ObjectMeta},
            model::SchemaType,
        },
        types::base::{Arguments, GraphQLObject, Resolvers},
        value::Value,
    };

    struct DataType;

    #[derive(Clone, Copy)]
    struct DeepDataType;

    fn ready<'a>(value: impl Into<Value>) -> BoxFuture<'a, ExecutionResult> {
        future::ready(Ok(value.into())).boxed()
    }

    fn fail<'a>(message: &str) -> BoxFuture<'a, ExecutionResult> {
        future::ready(Err(FieldError::from(message))).boxed()
    }

    fn a<'a>(
        _: &'a DataType,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        ready("Apple")
    }

    fn failing<'a>(
        _: &'a DataType,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        fail("Failing")
    }

    fn non_null_failing<'a>(
        _: &'a DataType,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        fail("Non-null failing")
    }

    fn non_null_null<'a>(
        _: &'a DataType,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        ready(Value::null())
    }

    fn deep<'a>(
        _: &'a DataType,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        executor.resolve_object(&DeepDataType)
    }

    async fn resolve_items(executor: &Executor<'_, ()>) -> ExecutionResult {
        let items = [Some(DeepDataType), None, Some(DeepDataType)];
        executor.resolve_optional_list(&items).await
    }

    fn items<'a>(
        _: &'a DataType,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        resolve_items(executor).boxed()
    }

    fn pair<'a>(
        _: &'a DataType,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        static PAIR: [DeepDataType; 2] = [DeepDataType, DeepDataType];
        executor.resolve_list(&PAIR)
    }

    fn nums<'a>(
        _: &'a DataType,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        ready(graphql_value!([1, null]))
    }

    fn matrix<'a>(
        _: &'a DataType,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        ready(graphql_value!([[1], [2, null], null]))
    }

    static DATA: LazyLock<Resolvers<DataType, ()>> = LazyLock::new(|| {
        Resolvers::new()
            .field("a", a)
            .field("failing", failing)
            .field("nonNullFailing", non_null_failing)
            .field("nonNullNull", non_null_null)
            .field("deep", deep)
            .field("nonNullDeep", deep)
            .field("items", items)
            .field("nullableItems", items)
            .field("pair", pair)
            .field("nums", nums)
            .field("requiredNums", nums)
            .field("nullableNums", nums)
            .field("matrix", matrix)
    });

    impl GraphQLObject<()> for DataType {
        fn type_name(&self) -> &str {
            "Data"
        }

        fn resolve_field<'a>(
            &'a self,
            field_name: &'a str,
            args: &'a Arguments<'a>,
            executor: &'a Executor<'a, ()>,
        ) -> BoxFuture<'a, ExecutionResult> {
            DATA.resolve(self, field_name, args, executor)
        }
    }

    impl GraphQLObject<()> for DeepDataType {
        fn type_name(&self) -> &str {
            "Deep"
        }

        fn resolve_field<'a>(
            &'a self,
            field_name: &'a str,
            _: &'a Arguments<'a>,
            executor: &'a Executor<'a, ()>,
        ) -> BoxFuture<'a, ExecutionResult> {
            match field_name {
                "label" => ready("Already Been Done"),
                "failing" => fail("Deep failing"),
                "nonNull" | "deep" => executor.resolve_object(self),
                _ => future::ready(Err(FieldError::field_not_found("Deep", field_name))).boxed(),
            }
        }
    }

    /// ```graphql
    /// type Deep { label: String failing: String! nonNull: Deep! deep: Deep }
    /// type Data {
    ///   a: String! failing: String nonNullFailing: String! nonNullNull: String!
    ///   deep: Deep nonNullDeep: Deep!
    ///   items: [Deep!] nullableItems: [Deep] pair: [Deep!]!
    ///   nums: [Int!] requiredNums: [Int!]! nullableNums: [Int] matrix: [[Int!]]
    /// }
    /// ```
    fn schema() -> SchemaType {
        let mut schema = SchemaType::new();
        let string = schema.lookup_type("String").unwrap();
        let string_nn = schema.non_null(string).unwrap();

        let deep = schema.add_type(ObjectMeta::new("Deep")).unwrap();
        let deep_nn = schema.non_null(deep).unwrap();
        schema
            .add_fields(
                deep,
                [
                    Field::new("label", string),
                    Field::new("failing", string_nn),
                    Field::new("nonNull", deep_nn),
                    Field::new("deep", deep),
                ],
            )
            .unwrap();
        let deep_nn_list = schema.list_of(deep_nn).unwrap();
        let deep_list = schema.list_of(deep).unwrap();
        let pair = schema.non_null(deep_nn_list).unwrap();

        let int = schema.lookup_type("Int").unwrap();
        let int_nn = schema.non_null(int).unwrap();
        let nums = schema.list_of(int_nn).unwrap();
        let required_nums = schema.non_null(nums).unwrap();
        let nullable_nums = schema.list_of(int).unwrap();
        let matrix = schema.list_of(nums).unwrap();

        let data = schema.add_type(ObjectMeta::new("Data")).unwrap();
        schema
            .add_fields(
                data,
                [
                    Field::new("a", string_nn),
                    Field::new("failing", string),
                    Field::new("nonNullFailing", string_nn),
                    Field::new("nonNullNull", string_nn),
                    Field::new("deep", deep),
                    Field::new("nonNullDeep", deep_nn),
                    Field::new("items", deep_nn_list),
                    Field::new("nullableItems", deep_list),
                    Field::new("pair", pair),
                    Field::new("nums", nums),
                    Field::new("requiredNums", required_nums),
                    Field::new("nullableNums", nullable_nums),
                    Field::new("matrix", matrix),
                ],
            )
            .unwrap();
        schema.add_query_type(data).unwrap();
        schema
    }

    async fn run(doc: &[Selection]) -> (Value, Vec<ExecutionError>) {
        RootNode::new(Arc::new(schema()), DataType)
            .execute(OperationType::Query, doc, &())
            .await
            .unwrap()
    }

    fn path<const N: usize>(segments: [PathSegment; N]) -> Vec<PathSegment> {
        segments.to_vec()
    }

    #[tokio::test]
    async fn test_aliases_and_typename() {
        let doc = [
            Selection::field("a").alias("apple"),
            Selection::field("a"),
            Selection::field("deep").select(leaves(["__typename", "label"])),
        ];

        assert_eq!(
            run(&doc).await,
            (
                graphql_value!({
                    "apple": "Apple",
                    "a": "Apple",
                    "deep": {"__typename": "Deep", "label": "Already Been Done"},
                }),
                vec![],
            ),
        );
    }

    #[tokio::test]
    async fn test_nullable_field_error() {
        let (data, errors) = run(&leaves(["a", "failing"])).await;

        assert_eq!(data, graphql_value!({"a": "Apple", "failing": null}));
        assert_eq!(
            errors,
            [ExecutionError::new(
                [PathSegment::from("failing")],
                FieldError::from("Failing"),
            )],
        );
        assert_eq!(errors[0].error().kind(), ErrorKind::Application);
    }

    #[tokio::test]
    async fn test_non_null_error_nulls_parent() {
        let doc = [Selection::field("deep").select(leaves(["label", "failing"]))];

        let (data, errors) = run(&doc).await;

        assert_eq!(data, graphql_value!({"deep": null}));
        assert_eq!(
            errors,
            [ExecutionError::new(
                path(["deep".into(), "failing".into()]),
                FieldError::from("Deep failing"),
            )],
        );
    }

    #[tokio::test]
    async fn test_non_null_propagation_stops_at_nullable_ancestor() {
        let doc = [
            Selection::field("a"),
            Selection::field("deep").select([
                Selection::field("label"),
                Selection::field("nonNull").select([
                    Selection::field("nonNull").select(leaves(["label", "failing"])),
                ]),
            ]),
        ];

        let (data, errors) = run(&doc).await;

        assert_eq!(data, graphql_value!({"a": "Apple", "deep": null}));
        // Only the failing field is reported, not every nulled ancestor.
        assert_eq!(
            errors,
            [ExecutionError::new(
                path([
                    "deep".into(),
                    "nonNull".into(),
                    "nonNull".into(),
                    "failing".into(),
                ]),
                FieldError::from("Deep failing"),
            )],
        );
    }

    #[tokio::test]
    async fn test_nullable_ancestor_inside_non_null_chain() {
        let doc = [Selection::field("nonNullDeep").select([Selection::field("nonNull")
            .select([Selection::field("deep").select(leaves(["failing"]))])])];

        let (data, errors) = run(&doc).await;

        assert_eq!(
            data,
            graphql_value!({"nonNullDeep": {"nonNull": {"deep": null}}}),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].path(),
            path([
                "nonNullDeep".into(),
                "nonNull".into(),
                "deep".into(),
                "failing".into(),
            ]),
        );
    }

    #[tokio::test]
    async fn test_non_null_root_field_nulls_data() {
        let (data, errors) = run(&leaves(["a", "nonNullFailing"])).await;

        assert_eq!(data, Value::Null);
        assert_eq!(
            errors,
            [ExecutionError::new(
                [PathSegment::from("nonNullFailing")],
                FieldError::from("Non-null failing"),
            )],
        );
    }

    #[tokio::test]
    async fn test_non_null_field_resolving_null() {
        let doc = [Selection::field("nonNullNull")];

        let (data, errors) = run(&doc).await;

        assert_eq!(data, Value::Null);
        assert_eq!(
            errors,
            [ExecutionError::new(
                [PathSegment::from("nonNullNull")],
                FieldError::of_kind(
                    ErrorKind::NonNull,
                    "Cannot return null for non-nullable field Data.nonNullNull",
                ),
            )],
        );
    }

    #[tokio::test]
    async fn test_sibling_errors_are_all_recorded() {
        let doc = [
            Selection::field("failing"),
            Selection::field("deep").select(leaves(["failing"])),
            Selection::field("nonNullDeep").select(leaves(["label"])),
        ];

        let (data, errors) = run(&doc).await;

        assert_eq!(
            data,
            graphql_value!({
                "failing": null,
                "deep": null,
                "nonNullDeep": {"label": "Already Been Done"},
            }),
        );
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.path() == [PathSegment::from("failing")]));
        assert!(
            errors
                .iter()
                .any(|e| e.path() == path(["deep".into(), "failing".into()]))
        );
    }

    #[tokio::test]
    async fn test_unknown_field() {
        let (data, errors) = run(&leaves(["a", "unknown"])).await;

        assert_eq!(data, graphql_value!({"a": "Apple", "unknown": null}));
        assert_eq!(
            errors,
            [ExecutionError::new(
                [PathSegment::from("unknown")],
                FieldError::of_kind(
                    ErrorKind::Lookup,
                    "Unknown field \"unknown\" on type \"Data\"",
                ),
            )],
        );
    }

    #[tokio::test]
    async fn test_object_field_without_selection_set() {
        let (data, errors) = run(&leaves(["deep"])).await;

        assert_eq!(data, graphql_value!({"deep": null}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error().kind(), ErrorKind::Lookup);
        assert_eq!(
            errors[0].error().message(),
            "Type \"Deep\" requires a selection set",
        );
    }

    #[tokio::test]
    async fn test_null_item_in_non_null_list() {
        let doc = [Selection::field("items").select(leaves(["label"]))];

        let (data, errors) = run(&doc).await;

        assert_eq!(data, graphql_value!({"items": null}));
        assert_eq!(
            errors,
            [ExecutionError::new(
                [PathSegment::from("items"), PathSegment::Index(1)],
                FieldError::of_kind(
                    ErrorKind::NonNull,
                    "Cannot return null for non-nullable list item",
                ),
            )],
        );
    }

    #[tokio::test]
    async fn test_null_item_in_nullable_list() {
        let doc = [Selection::field("nullableItems").select(leaves(["label"]))];

        assert_eq!(
            run(&doc).await,
            (
                graphql_value!({
                    "nullableItems": [
                        {"label": "Already Been Done"},
                        null,
                        {"label": "Already Been Done"},
                    ],
                }),
                vec![],
            ),
        );
    }

    #[tokio::test]
    async fn test_failing_items_null_non_null_list_once_per_item() {
        let doc = [
            Selection::field("a"),
            Selection::field("pair").select(leaves(["failing"])),
        ];

        let (data, errors) = run(&doc).await;

        // `pair` is `[Deep!]!`, so its failure reaches the root.
        assert_eq!(data, Value::Null);
        let mut paths = errors.iter().map(|e| e.path().to_vec()).collect::<Vec<_>>();
        paths.sort_by_key(|p| p[1].to_string());
        assert_eq!(
            paths,
            [
                path(["pair".into(), PathSegment::Index(0), "failing".into()]),
                path(["pair".into(), PathSegment::Index(1), "failing".into()]),
            ],
        );
    }

    #[tokio::test]
    async fn test_null_scalar_in_non_null_list() {
        let (data, errors) = run(&leaves(["a", "nums"])).await;

        assert_eq!(data, graphql_value!({"a": "Apple", "nums": null}));
        assert_eq!(
            errors,
            [ExecutionError::new(
                [PathSegment::from("nums"), PathSegment::Index(1)],
                FieldError::of_kind(
                    ErrorKind::NonNull,
                    "Cannot return null for non-nullable list item",
                ),
            )],
        );
    }

    #[tokio::test]
    async fn test_null_scalar_in_required_list_nulls_parent() {
        let (data, errors) = run(&leaves(["a", "requiredNums"])).await;

        assert_eq!(data, Value::Null);
        assert_eq!(
            errors,
            [ExecutionError::new(
                [PathSegment::from("requiredNums"), PathSegment::Index(1)],
                FieldError::of_kind(
                    ErrorKind::NonNull,
                    "Cannot return null for non-nullable list item",
                ),
            )],
        );
    }

    #[tokio::test]
    async fn test_null_scalar_in_nullable_list() {
        assert_eq!(
            run(&leaves(["nullableNums"])).await,
            (graphql_value!({"nullableNums": [1, null]}), vec![]),
        );
    }

    #[tokio::test]
    async fn test_null_scalar_in_nested_list() {
        let (data, errors) = run(&leaves(["matrix"])).await;

        // Only the inner list is nulled, its position being nullable.
        assert_eq!(data, graphql_value!({"matrix": [[1], null, null]}));
        assert_eq!(
            errors,
            [ExecutionError::new(
                path(["matrix".into(), PathSegment::Index(1), PathSegment::Index(1)]),
                FieldError::of_kind(
                    ErrorKind::NonNull,
                    "Cannot return null for non-nullable list item",
                ),
            )],
        );
    }
}

mod concurrency {
    use std::{
        sync::{Arc, LazyLock},
        time::Duration,
    };

    use futures::future::{BoxFuture, FutureExt as _};
    use pretty_assertions::assert_eq;
    use tokio::time::{Instant, sleep};

    use crate::{
        ast::{OperationType, Selection, leaves},
        executor::{ExecutionResult, Executor, RootNode},
        graphql_value,
        schema::{
            meta::{Field, ObjectMeta},
            model::SchemaType,
        },
        types::base::{Arguments, GraphQLObject, Resolvers},
        value::Value,
    };

    struct Timer;

    struct Step {
        label: &'static str,
        delay_ms: u64,
    }

    static STEPS: [Step; 3] = [
        Step {
            label: "first",
            delay_ms: 30,
        },
        Step {
            label: "second",
            delay_ms: 20,
        },
        Step {
            label: "third",
            delay_ms: 10,
        },
    ];

    async fn delayed(label: &'static str, delay_ms: u64) -> ExecutionResult {
        sleep(Duration::from_millis(delay_ms)).await;
        Ok(Value::from(label))
    }

    fn slow<'a>(
        _: &'a Timer,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        delayed("slow", 100).boxed()
    }

    fn slow_too<'a>(
        _: &'a Timer,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        delayed("slow too", 100).boxed()
    }

    fn fast<'a>(
        _: &'a Timer,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        delayed("fast", 0).boxed()
    }

    fn steps<'a>(
        _: &'a Timer,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        executor.resolve_list(&STEPS)
    }

    static TIMER: LazyLock<Resolvers<Timer, ()>> = LazyLock::new(|| {
        Resolvers::new()
            .field("slow", slow)
            .field("slowToo", slow_too)
            .field("fast", fast)
            .field("steps", steps)
    });

    impl GraphQLObject<()> for Timer {
        fn type_name(&self) -> &str {
            "Timer"
        }

        fn resolve_field<'a>(
            &'a self,
            field_name: &'a str,
            args: &'a Arguments<'a>,
            executor: &'a Executor<'a, ()>,
        ) -> BoxFuture<'a, ExecutionResult> {
            TIMER.resolve(self, field_name, args, executor)
        }
    }

    impl GraphQLObject<()> for Step {
        fn type_name(&self) -> &str {
            "Step"
        }

        fn resolve_field<'a>(
            &'a self,
            _: &'a str,
            _: &'a Arguments<'a>,
            _: &'a Executor<'a, ()>,
        ) -> BoxFuture<'a, ExecutionResult> {
            delayed(self.label, self.delay_ms).boxed()
        }
    }

    fn root() -> RootNode<()> {
        let mut schema = SchemaType::new();
        let string = schema.lookup_type("String").unwrap();
        let step = schema.add_type(ObjectMeta::new("Step")).unwrap();
        schema.add_fields(step, [Field::new("label", string)]).unwrap();
        let steps = schema.list_of(step).unwrap();
        let timer = schema.add_type(ObjectMeta::new("Timer")).unwrap();
        schema
            .add_fields(
                timer,
                [
                    Field::new("slow", string),
                    Field::new("slowToo", string),
                    Field::new("fast", string),
                    Field::new("steps", steps),
                ],
            )
            .unwrap();
        schema.add_query_type(timer).unwrap();
        RootNode::new(Arc::new(schema), Timer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fields_keep_selection_order() {
        let (data, errors) = root()
            .execute(OperationType::Query, &leaves(["slow", "fast"]), &())
            .await
            .unwrap();

        assert_eq!(errors, vec![]);
        assert_eq!(data, graphql_value!({"slow": "slow", "fast": "fast"}));
        assert_eq!(
            data.as_object_value().unwrap().keys().collect::<Vec<_>>(),
            ["slow", "fast"],
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sibling_fields_resolve_concurrently() {
        let started = Instant::now();

        let (data, _) = root()
            .execute(OperationType::Query, &leaves(["slow", "slowToo"]), &())
            .await
            .unwrap();

        assert_eq!(data, graphql_value!({"slow": "slow", "slowToo": "slow too"}));
        assert!(started.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_items_keep_order() {
        let started = Instant::now();

        let (data, _) = root()
            .execute(
                OperationType::Query,
                &[Selection::field("steps").select(leaves(["label"]))],
                &(),
            )
            .await
            .unwrap();

        assert_eq!(
            data,
            graphql_value!({
                "steps": [{"label": "first"}, {"label": "second"}, {"label": "third"}],
            }),
        );
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
