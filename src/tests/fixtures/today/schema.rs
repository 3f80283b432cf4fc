//! Registry and root objects of the planner schema

use std::sync::{Arc, LazyLock};

use futures::future::{BoxFuture, FutureExt as _};

use crate::{
    executor::{ErrorKind, ExecutionResult, Executor, FieldError, RootNode},
    relay::{Connection, ConnectionArguments, Cursor, GlobalId, Node as _, PaginationError},
    schema::{
        meta::{
            Argument, EnumMeta, EnumValue, Field, InputObjectMeta, ObjectMeta, ScalarMeta,
            UnionMeta,
        },
        model::{SchemaError, SchemaType},
    },
    tests::fixtures::today::model::{Appointment, Database, Folder, Stored, Task},
    types::{
        base::{Arguments, FromInputValue, GraphQLObject, Resolvers},
        nullable::Nullable,
    },
    value::Value,
};

/// Builds the planner schema.
///
/// ```graphql
/// interface Node { id: ID! }
/// scalar DateTime
/// enum TaskState { New Started Complete Unassigned @deprecated }
/// type Task implements Node { id: ID! title: String state: TaskState! isComplete: Boolean! }
/// type Appointment implements Node { id: ID! when: DateTime subject: String isNow: Boolean! }
/// type Folder implements Node { id: ID! name: String unreadCount: Int! }
/// union UnionType = Appointment | Task | Folder
///
/// type Query {
///   node(id: ID!): Node
///   appointments(first: Int, after: String, last: Int, before: String): AppointmentConnection!
///   tasks(first: Int, after: String, last: Int, before: String): TaskConnection!
///   unreadCounts(first: Int, after: String, last: Int, before: String): FolderConnection!
///   appointmentsById(ids: [ID!]!): [Appointment]!
///   tasksById(ids: [ID!]!): [Task]!
///   unreadCountsById(ids: [ID!]!): [Folder]!
/// }
///
/// input CompleteTaskInput { id: ID! isComplete: Boolean = true clientMutationId: String }
/// type CompleteTaskPayload { task: Task clientMutationId: String }
/// type Mutation { completeTask(input: CompleteTaskInput!): CompleteTaskPayload! }
/// type Subscription { nextAppointmentChange: Appointment }
/// ```
///
/// # Errors
///
/// Never, unless the built-in types are missing from [`SchemaType::new`].
pub fn schema() -> Result<SchemaType, SchemaError> {
    let mut schema = SchemaType::new();

    let id = schema.lookup_type("ID")?;
    let id = schema.non_null(id)?;
    let ids = schema.list_of(id)?;
    let ids = schema.non_null(ids)?;
    let string = schema.lookup_type("String")?;
    let boolean = schema.lookup_type("Boolean")?;
    let boolean_nn = schema.non_null(boolean)?;
    let int = schema.lookup_type("Int")?;
    let int_nn = schema.non_null(int)?;

    let node = schema.add_node_interface()?;
    let date_time = schema.add_type(
        ScalarMeta::new("DateTime")
            .description("A date and time, or a relative day like `tomorrow`.")
            .specified_by_url("https://datatracker.ietf.org/doc/html/rfc3339"),
    )?;

    let task_state = schema.add_type(EnumMeta::new("TaskState"))?;
    schema.add_enum_values(
        task_state,
        [
            EnumValue::new("New"),
            EnumValue::new("Started"),
            EnumValue::new("Complete"),
            EnumValue::new("Unassigned")
                .deprecated(Some("Every task has an owner since the last migration.")),
        ],
    )?;
    let task_state = schema.non_null(task_state)?;

    let task = schema.add_type(ObjectMeta::new("Task"))?;
    schema.add_fields(
        task,
        [
            Field::new("id", id),
            Field::new("title", string),
            Field::new("state", task_state),
            Field::new("isComplete", boolean_nn),
        ],
    )?;
    let appointment = schema.add_type(ObjectMeta::new("Appointment"))?;
    schema.add_fields(
        appointment,
        [
            Field::new("id", id),
            Field::new("when", date_time),
            Field::new("subject", string),
            Field::new("isNow", boolean_nn),
        ],
    )?;
    let folder = schema.add_type(ObjectMeta::new("Folder"))?;
    schema.add_fields(
        folder,
        [
            Field::new("id", id),
            Field::new("name", string),
            Field::new("unreadCount", int_nn),
        ],
    )?;
    for object in [task, appointment, folder] {
        schema.add_interfaces(object, &[node])?;
    }

    let union = schema.add_type(UnionMeta::new("UnionType"))?;
    schema.add_possible_types(union, &[appointment, task, folder])?;

    let appointments = schema.add_connection_types(appointment)?;
    let appointments = schema.non_null(appointments)?;
    let tasks = schema.add_connection_types(task)?;
    let tasks = schema.non_null(tasks)?;
    let folders = schema.add_connection_types(folder)?;
    let folders = schema.non_null(folders)?;
    let page = schema.connection_arguments()?;

    let appointment_list = schema.list_of(appointment)?;
    let appointment_list = schema.non_null(appointment_list)?;
    let task_list = schema.list_of(task)?;
    let task_list = schema.non_null(task_list)?;
    let folder_list = schema.list_of(folder)?;
    let folder_list = schema.non_null(folder_list)?;

    let query = schema.add_type(ObjectMeta::new("Query"))?;
    schema.add_fields(
        query,
        [
            Field::new("node", node)
                .description("Fetches an object given its global id.")
                .argument(Argument::new("id", id)),
            Field::new("appointments", appointments).arguments(page.clone()),
            Field::new("tasks", tasks).arguments(page.clone()),
            Field::new("unreadCounts", folders).arguments(page),
            Field::new("appointmentsById", appointment_list).argument(Argument::new("ids", ids)),
            Field::new("tasksById", task_list).argument(Argument::new("ids", ids)),
            Field::new("unreadCountsById", folder_list).argument(Argument::new("ids", ids)),
        ],
    )?;
    schema.add_query_type(query)?;

    let input = schema.add_type(InputObjectMeta::new("CompleteTaskInput"))?;
    schema.add_input_values(
        input,
        [
            Argument::new("id", id),
            Argument::new("isComplete", boolean).default_value(true),
            Argument::new("clientMutationId", string),
        ],
    )?;
    let input = schema.non_null(input)?;
    let payload = schema.add_type(ObjectMeta::new("CompleteTaskPayload"))?;
    schema.add_fields(
        payload,
        [
            Field::new("task", task),
            Field::new("clientMutationId", string),
        ],
    )?;
    let payload = schema.non_null(payload)?;

    let mutation = schema.add_type(ObjectMeta::new("Mutation"))?;
    schema.add_fields(
        mutation,
        [Field::new("completeTask", payload).argument(Argument::new("input", input))],
    )?;
    schema.add_mutation_type(mutation)?;

    let subscription = schema.add_type(ObjectMeta::new("Subscription"))?;
    schema.add_fields(
        subscription,
        [Field::new("nextAppointmentChange", appointment)],
    )?;
    schema.add_subscription_type(subscription)?;

    Ok(schema)
}

/// Serves the planner [`schema`] with all three root objects.
///
/// # Errors
///
/// If the schema fails to build.
pub fn root_node() -> Result<RootNode<Database>, SchemaError> {
    Ok(RootNode::new(Arc::new(schema()?), Query)
        .with_mutation(Mutation)
        .with_subscription(Subscription))
}

async fn resolve_connection<T: Stored>(
    args: &Arguments<'_>,
    executor: &Executor<'_, Database>,
) -> ExecutionResult {
    let page = ConnectionArguments::from_arguments(args)?;
    let items = T::all(executor.context());
    let connection = Connection::paginate(
        T::TYPE_NAME,
        items.iter().cloned(),
        |_, item| Cursor::new(item.local_id()),
        &page,
    )
    .map_err(PaginationError::into_field_error)?;
    executor.resolve_object(&connection).await
}

async fn resolve_by_id<T: Stored>(
    args: &Arguments<'_>,
    executor: &Executor<'_, Database>,
) -> ExecutionResult {
    let ids = args.require::<Vec<String>>("ids")?;
    let ids = ids.iter().map(String::as_str).collect::<Vec<_>>();
    let db = executor.context();
    let nodes = db
        .nodes()
        .fetch_many(&ids, db)
        .await?
        .into_iter()
        .map(|node| node.filter(|n| n.type_name() == T::TYPE_NAME))
        .collect::<Vec<_>>();
    executor.resolve_optional_list(&nodes).await
}

async fn resolve_node(args: &Arguments<'_>, executor: &Executor<'_, Database>) -> ExecutionResult {
    let id = args.require::<String>("id")?;
    let db = executor.context();
    let node = db.nodes().fetch(&id, db).await?;
    executor.resolve_optional(node.as_deref()).await
}

/// The `Query` root.
#[derive(Clone, Copy, Debug)]
pub struct Query;

fn query_node<'a>(
    _: &'a Query,
    args: &'a Arguments<'a>,
    executor: &'a Executor<'a, Database>,
) -> BoxFuture<'a, ExecutionResult> {
    resolve_node(args, executor).boxed()
}

fn query_connection<'a, T: Stored>(
    _: &'a Query,
    args: &'a Arguments<'a>,
    executor: &'a Executor<'a, Database>,
) -> BoxFuture<'a, ExecutionResult> {
    resolve_connection::<T>(args, executor).boxed()
}

fn query_by_id<'a, T: Stored>(
    _: &'a Query,
    args: &'a Arguments<'a>,
    executor: &'a Executor<'a, Database>,
) -> BoxFuture<'a, ExecutionResult> {
    resolve_by_id::<T>(args, executor).boxed()
}

static QUERY: LazyLock<Resolvers<Query, Database>> = LazyLock::new(|| {
    Resolvers::new()
        .field("node", query_node)
        .field("appointments", query_connection::<Appointment>)
        .field("tasks", query_connection::<Task>)
        .field("unreadCounts", query_connection::<Folder>)
        .field("appointmentsById", query_by_id::<Appointment>)
        .field("tasksById", query_by_id::<Task>)
        .field("unreadCountsById", query_by_id::<Folder>)
});

impl GraphQLObject<Database> for Query {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, Database>,
    ) -> BoxFuture<'a, ExecutionResult> {
        QUERY.resolve(self, field_name, args, executor)
    }
}

/// Input of `Mutation.completeTask`.
#[derive(Clone, Debug, PartialEq)]
pub struct CompleteTaskInput {
    /// Global id of the task.
    pub id: GlobalId,
    /// New completion state, `true` unless given.
    pub is_complete: bool,
    /// Echoed back in the payload.
    pub client_mutation_id: Option<String>,
}

impl FromInputValue for CompleteTaskInput {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        let obj = v.as_object_value().ok_or_else(|| {
            FieldError::of_kind(
                ErrorKind::Argument,
                format!("Expected `CompleteTaskInput`, found: {v}"),
            )
        })?;
        let id = obj.get_field_value("id").ok_or_else(|| {
            FieldError::of_kind(ErrorKind::Argument, "Missing field \"id\" of type \"ID!\"")
        })?;

        Ok(Self {
            id: GlobalId::from_input_value(id)?,
            is_complete: Nullable::from_input_field(obj, "isComplete")?.unwrap_or(true),
            client_mutation_id: Nullable::from_input_field(obj, "clientMutationId")?.some(),
        })
    }
}

/// Result of `Mutation.completeTask`.
#[derive(Clone, Debug)]
pub struct CompleteTaskPayload {
    task: Option<Arc<Task>>,
    client_mutation_id: Option<String>,
}

fn payload_task<'a>(
    payload: &'a CompleteTaskPayload,
    _: &'a Arguments<'a>,
    executor: &'a Executor<'a, Database>,
) -> BoxFuture<'a, ExecutionResult> {
    executor.resolve_optional(payload.task.as_ref())
}

fn payload_client_mutation_id<'a>(
    payload: &'a CompleteTaskPayload,
    _: &'a Arguments<'a>,
    _: &'a Executor<'a, Database>,
) -> BoxFuture<'a, ExecutionResult> {
    futures::future::ready(Ok(Value::from(payload.client_mutation_id.as_ref()))).boxed()
}

static PAYLOAD: LazyLock<Resolvers<CompleteTaskPayload, Database>> = LazyLock::new(|| {
    Resolvers::new()
        .field("task", payload_task)
        .field("clientMutationId", payload_client_mutation_id)
});

impl GraphQLObject<Database> for CompleteTaskPayload {
    fn type_name(&self) -> &str {
        "CompleteTaskPayload"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, Database>,
    ) -> BoxFuture<'a, ExecutionResult> {
        PAYLOAD.resolve(self, field_name, args, executor)
    }
}

/// The `Mutation` root.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

async fn complete_task(args: &Arguments<'_>, executor: &Executor<'_, Database>) -> ExecutionResult {
    let input = args.require::<CompleteTaskInput>("input")?;
    let db = executor.context();
    let task = (input.id.type_name.as_str() == Task::TYPE_NAME)
        .then(|| db.find::<Task>(&input.id.local_id))
        .flatten()
        .cloned();
    if let Some(task) = &task {
        task.set_complete(input.is_complete);
    }

    let payload = CompleteTaskPayload {
        task,
        client_mutation_id: input.client_mutation_id,
    };
    executor.resolve_object(&payload).await
}

fn mutation_complete_task<'a>(
    _: &'a Mutation,
    args: &'a Arguments<'a>,
    executor: &'a Executor<'a, Database>,
) -> BoxFuture<'a, ExecutionResult> {
    complete_task(args, executor).boxed()
}

static MUTATION: LazyLock<Resolvers<Mutation, Database>> =
    LazyLock::new(|| Resolvers::new().field("completeTask", mutation_complete_task));

impl GraphQLObject<Database> for Mutation {
    fn type_name(&self) -> &str {
        "Mutation"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, Database>,
    ) -> BoxFuture<'a, ExecutionResult> {
        MUTATION.resolve(self, field_name, args, executor)
    }
}

/// The `Subscription` root, producing a single event per execution.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

fn next_appointment_change<'a>(
    _: &'a Subscription,
    _: &'a Arguments<'a>,
    executor: &'a Executor<'a, Database>,
) -> BoxFuture<'a, ExecutionResult> {
    executor.resolve_optional(executor.context().appointments().first())
}

static SUBSCRIPTION: LazyLock<Resolvers<Subscription, Database>> = LazyLock::new(|| {
    Resolvers::new().field("nextAppointmentChange", next_appointment_change)
});

impl GraphQLObject<Database> for Subscription {
    fn type_name(&self) -> &str {
        "Subscription"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, Database>,
    ) -> BoxFuture<'a, ExecutionResult> {
        SUBSCRIPTION.resolve(self, field_name, args, executor)
    }
}
