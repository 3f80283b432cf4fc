//! Resolve the operation's selection set against a root object

use std::{
    fmt::{self, Display},
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

use arcstr::ArcStr;
use derive_more::with_trait::{Display as DeriveDisplay, Error};
use futures::{
    FutureExt as _,
    future::{self, BoxFuture},
    stream::{FuturesOrdered, StreamExt as _},
};
use tracing::Instrument as _;

use crate::{
    ast::{OperationType, Selection},
    schema::{
        meta::{Field, MetaType, TypeId},
        model::SchemaType,
        schema::{SchemaObject, TypeObject},
    },
    types::base::{Arguments, GraphQLObject},
    value::{Object, Value},
};

/// Category of a [`FieldError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// A field, type or node could not be found.
    Lookup,
    /// An argument is missing or has the wrong shape.
    Argument,
    /// Raised by application code inside a resolver.
    Application,
    /// A non-null field resolved to `null` without an error of its own.
    NonNull,
    /// Invalid connection arguments, e.g. an unknown cursor.
    Pagination,
    /// Introspection was requested while disabled.
    Introspection,
}

/// Error type for errors that occur during field resolution
///
/// Field errors are represented by a human-readable error message and an
/// optional `Value` structure containing additional information.
///
/// They can be converted to from any type that implements `std::fmt::Display`,
/// which makes error chaining with the `?` operator a breeze:
///
/// ```rust
/// # use juniper_service::FieldError;
/// fn get_string(data: Vec<u8>) -> Result<String, FieldError> {
///     let s = String::from_utf8(data)?;
///     Ok(s)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    kind: ErrorKind,
    extensions: Value,
}

impl<T: Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            kind: ErrorKind::Application,
            extensions: Value::null(),
        }
    }
}

impl FieldError {
    /// Construct a new [`FieldError`] with additional data.
    ///
    /// You can use the [`graphql_value!`] macro for construction:
    /// ```rust
    /// use juniper_service::{graphql_value, FieldError};
    ///
    /// # let _: FieldError =
    /// FieldError::new(
    ///     "Could not open connection to the database",
    ///     graphql_value!({"internal_error": "Connection refused"}),
    /// );
    /// ```
    ///
    /// The `extensions` parameter will be added to the `"extensions"` field of
    /// the `"errors"` object in response:
    /// ```json
    /// {
    ///   "errors": [
    ///     "message": "Could not open connection to the database",
    ///     "path": ["tasks"],
    ///     "extensions": {
    ///       "internal_error": "Connection refused"
    ///     }
    ///   ]
    /// }
    /// ```
    ///
    /// If the argument is [`Value::Null`], then no extra data will be included.
    ///
    /// [`graphql_value!`]: macro@crate::graphql_value
    #[must_use]
    pub fn new(e: impl Display, extensions: Value) -> Self {
        Self {
            message: e.to_string(),
            kind: ErrorKind::Application,
            extensions,
        }
    }

    /// Construct an error of the given [`ErrorKind`] without extensions.
    #[must_use]
    pub fn of_kind(kind: ErrorKind, e: impl Display) -> Self {
        Self {
            message: e.to_string(),
            kind,
            extensions: Value::null(),
        }
    }

    /// Error returned when a type has no resolver for a field.
    #[must_use]
    pub fn field_not_found(type_name: &str, field_name: &str) -> Self {
        Self::of_kind(
            ErrorKind::Lookup,
            format!("Unknown field \"{field_name}\" on type \"{type_name}\""),
        )
    }

    /// Returns `"message"` field of this [`FieldError`].
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the category of this [`FieldError`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns `"extensions"` field of this [`FieldError`].
    ///
    /// If there is no `"extensions"`, then [`Value::Null`] will be returned.
    #[must_use]
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

/// The result of resolving the value of a field of type `T`
pub type FieldResult<T> = Result<T, FieldError>;

/// The result of resolving an unspecified field
pub type ExecutionResult = Result<Value, FieldError>;

/// One step of a response path.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PathSegment {
    /// Response key of a field.
    Field(ArcStr),
    /// Position inside a list.
    Index(usize),
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Field(name.into())
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        Self::Index(idx)
    }
}

/// Error type for errors that occur during query execution
///
/// All execution errors contain the path in the response where the error
/// occurred, in addition to a field error.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionError {
    path: Vec<PathSegment>,
    error: FieldError,
}

impl ExecutionError {
    /// Construct a new execution error occuring at the given path.
    pub fn new(path: impl IntoIterator<Item = PathSegment>, error: FieldError) -> Self {
        Self {
            path: path.into_iter().collect(),
            error,
        }
    }

    /// Construct a new execution error occuring at the root of the response.
    pub fn at_origin(error: FieldError) -> Self {
        Self {
            path: Vec::new(),
            error,
        }
    }

    /// The error message
    pub fn error(&self) -> &FieldError {
        &self.error
    }

    /// The path in the result set where the error occurred
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }
}

/// An error that prevented query execution
#[derive(Clone, Debug, DeriveDisplay, Eq, Error, PartialEq)]
pub enum GraphQLError {
    /// The schema or the root node has no root object for this operation.
    #[display("Schema is not configured for {_0} operations")]
    NotConfigured(#[error(not(source))] OperationType),
}

enum FieldPath<'a> {
    Root,
    Field(&'a str, &'a FieldPath<'a>),
    Index(usize, &'a FieldPath<'a>),
}

impl FieldPath<'_> {
    fn construct_path(&self, acc: &mut Vec<PathSegment>) {
        match self {
            Self::Root => {}
            Self::Field(name, parent) => {
                parent.construct_path(acc);
                acc.push(PathSegment::Field((*name).into()));
            }
            Self::Index(idx, parent) => {
                parent.construct_path(acc);
                acc.push(PathSegment::Index(*idx));
            }
        }
    }
}

/// Query execution engine
///
/// The executor helps drive the query execution in a schema. It keeps track
/// of the current field stack, context, and errors.
///
/// Resolvers receive the executor of the field they resolve: its selection
/// set is the field's sub-selection and its current type is the field's
/// declared type.
pub struct Executor<'a, C> {
    schema: &'a SchemaType,
    context: &'a C,
    current_selection_set: Option<&'a [Selection]>,
    current_type: Option<TypeId>,
    field_path: FieldPath<'a>,
    errors: &'a RwLock<Vec<ExecutionError>>,
    introspection_disabled: bool,
    null_propagated: AtomicBool,
}

impl<'a, C> Executor<'a, C>
where
    C: Send + Sync,
{
    /// Access the current context
    ///
    /// You usually provide the context when calling the top-level `execute`
    /// function, or using the context factory.
    pub fn context(&self) -> &'a C {
        self.context
    }

    /// The currently executing schema
    pub fn schema(&self) -> &'a SchemaType {
        self.schema
    }

    /// The declared type of the field being resolved.
    pub fn current_type(&self) -> Option<TypeId> {
        self.current_type
    }

    /// The sub-selection of the field being resolved.
    pub fn current_selection_set(&self) -> Option<&'a [Selection]> {
        self.current_selection_set
    }

    /// Path of the field being resolved.
    pub fn path(&self) -> Vec<PathSegment> {
        let mut path = Vec::new();
        self.field_path.construct_path(&mut path);
        path
    }

    /// Add an error to the execution engine at the current executor location
    pub fn push_error(&self, error: FieldError) {
        let path = self.path();
        tracing::debug!(
            path = %DisplayPath(&path),
            kind = ?error.kind(),
            message = error.message(),
            "field error"
        );
        self.errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ExecutionError { path, error });
    }

    /// Resolves the current selection set against an object.
    ///
    /// Yields [`Value::Null`] when a non-null field of the object failed; the
    /// causing error is already recorded at that point.
    pub fn resolve_object<'s, T>(&'s self, value: &'s T) -> BoxFuture<'s, ExecutionResult>
    where
        T: GraphQLObject<C> + ?Sized,
    {
        async move {
            let Some(selection_set) = self.current_selection_set else {
                return Err(FieldError::of_kind(
                    ErrorKind::Lookup,
                    format!("Type \"{}\" requires a selection set", value.type_name()),
                ));
            };
            match self.resolve_fields(value, selection_set).await {
                Some(v) => Ok(v),
                None => {
                    self.null_propagated.store(true, Ordering::Relaxed);
                    Ok(Value::null())
                }
            }
        }
        .boxed()
    }

    /// Resolves an optional object, `None` becoming `null`.
    pub fn resolve_optional<'s, T>(&'s self, value: Option<&'s T>) -> BoxFuture<'s, ExecutionResult>
    where
        T: GraphQLObject<C> + ?Sized,
    {
        match value {
            Some(v) => self.resolve_object(v),
            None => future::ready(Ok(Value::null())).boxed(),
        }
    }

    /// Resolves every item of a list concurrently, keeping their order.
    ///
    /// If the current type declares non-null items, one `null` item makes the
    /// whole list `null`.
    pub fn resolve_list<'s, T>(&'s self, items: &'s [T]) -> BoxFuture<'s, ExecutionResult>
    where
        T: GraphQLObject<C>,
    {
        self.resolve_items(items.iter().map(Some).collect())
    }

    /// Same as [`Executor::resolve_list`], `None` items becoming `null`.
    pub fn resolve_optional_list<'s, T>(
        &'s self,
        items: &'s [Option<T>],
    ) -> BoxFuture<'s, ExecutionResult>
    where
        T: GraphQLObject<C>,
    {
        self.resolve_items(items.iter().map(Option::as_ref).collect())
    }

    fn resolve_items<'s, T>(&'s self, items: Vec<Option<&'s T>>) -> BoxFuture<'s, ExecutionResult>
    where
        T: GraphQLObject<C>,
    {
        async move {
            let item_type = self
                .current_type
                .map(|ty| self.schema.nullable(ty))
                .and_then(|ty| match self.schema.meta(ty) {
                    Some(MetaType::List(list)) => Some(list.of_type),
                    _ => None,
                });
            let is_non_null = item_type.is_some_and(|ty| self.schema.is_non_null(ty));

            let mut futs = items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| self.resolve_item(idx, item, item_type, is_non_null))
                .collect::<FuturesOrdered<_>>();

            let mut values = Vec::with_capacity(futs.len());
            let mut nulled = false;
            while let Some(value) = futs.next().await {
                nulled |= is_non_null && value.is_null();
                values.push(value);
            }
            if nulled {
                self.null_propagated.store(true, Ordering::Relaxed);
                return Ok(Value::null());
            }
            Ok(Value::list(values))
        }
        .boxed()
    }

    async fn resolve_item<T>(
        &self,
        idx: usize,
        item: Option<&T>,
        item_type: Option<TypeId>,
        is_non_null: bool,
    ) -> Value
    where
        T: GraphQLObject<C>,
    {
        let sub_exec = self.index_sub_executor(idx, item_type);
        let res = match item {
            Some(item) => sub_exec.resolve_object(item).await,
            None => Ok(Value::null()),
        };
        match res {
            Ok(Value::Null) if is_non_null && !sub_exec.null_propagated.load(Ordering::Relaxed) => {
                sub_exec.push_error(FieldError::of_kind(
                    ErrorKind::NonNull,
                    "Cannot return null for non-nullable list item",
                ));
                Value::null()
            }
            Ok(v) => v,
            Err(e) => {
                sub_exec.push_error(e);
                Value::null()
            }
        }
    }

    // Yields `None` when a non-null field failed, nulling this object.
    async fn resolve_fields<T>(&self, instance: &T, selection_set: &[Selection]) -> Option<Value>
    where
        T: GraphQLObject<C> + ?Sized,
    {
        let type_name = instance.type_name();
        let Some(meta_type) = self
            .schema
            .concrete_type_by_name(type_name)
            .filter(|meta| matches!(meta, MetaType::Object(_)))
        else {
            self.push_error(FieldError::of_kind(
                ErrorKind::Lookup,
                format!("Object type \"{type_name}\" is not registered in the schema"),
            ));
            return None;
        };

        let mut object = Object::with_capacity(selection_set.len());
        let mut async_values = FuturesOrdered::<BoxFuture<'_, Option<Value>>>::new();

        for selection in selection_set {
            let fut = match selection.name.as_str() {
                "__typename" => future::ready(Some(Value::from(type_name))).boxed(),
                "__schema" | "__type" => self.resolve_meta_field(selection).boxed(),
                name => match meta_type.field_by_name(name) {
                    Some(meta_field) => self
                        .resolve_field(instance, type_name, meta_field, selection)
                        .boxed(),
                    None => {
                        self.field_sub_executor(selection, None)
                            .push_error(FieldError::field_not_found(type_name, name));
                        future::ready(Some(Value::null())).boxed()
                    }
                },
            };
            async_values.push_back(fut);
        }

        // Siblings are drained even once this object is nulled, so their
        // errors are still recorded.
        let mut nulled = false;
        for selection in selection_set {
            match async_values.next().await {
                Some(Some(value)) => {
                    object.add_field(selection.response_name(), value);
                }
                Some(None) => nulled = true,
                None => break,
            }
        }
        (!nulled).then_some(Value::Object(object))
    }

    async fn resolve_field<T>(
        &self,
        instance: &T,
        type_name: &str,
        meta_field: &Field,
        selection: &Selection,
    ) -> Option<Value>
    where
        T: GraphQLObject<C> + ?Sized,
    {
        let sub_exec = self.field_sub_executor(selection, Some(meta_field.field_type));
        let args = Arguments::new(&selection.arguments, &meta_field.arguments);

        tracing::trace!(
            object = type_name,
            field = selection.name.as_str(),
            "resolving field"
        );
        let res = instance
            .resolve_field(&selection.name, &args, &sub_exec)
            .await;

        let is_non_null = self.schema.is_non_null(meta_field.field_type);
        sub_exec.complete(res, is_non_null, || {
            format!("{type_name}.{}", selection.name)
        })
    }

    async fn resolve_meta_field(&self, selection: &Selection) -> Option<Value> {
        let (type_name, is_non_null) = match selection.name.as_str() {
            "__schema" => ("__Schema", true),
            _ => ("__Type", false),
        };
        let sub_exec = self.field_sub_executor(selection, self.schema.type_by_name(type_name));

        let res = if self.introspection_disabled {
            Err(FieldError::of_kind(
                ErrorKind::Introspection,
                "GraphQL introspection is not allowed, \
                 but the operation contained `__schema` or `__type`",
            ))
        } else if sub_exec.current_type.is_none() {
            Err(FieldError::of_kind(
                ErrorKind::Introspection,
                format!("Introspection type \"{type_name}\" is not registered"),
            ))
        } else if is_non_null {
            sub_exec.resolve_object(&SchemaObject).await
        } else {
            match selection
                .arguments
                .get("name")
                .and_then(Value::as_string_value)
            {
                Some(name) => match self.schema.type_by_name(name) {
                    Some(id) => sub_exec.resolve_object(&TypeObject(id)).await,
                    None => Ok(Value::null()),
                },
                None => Err(FieldError::of_kind(
                    ErrorKind::Argument,
                    "Missing required argument \"name\" of type \"String!\"",
                )),
            }
        };

        sub_exec.complete(res, is_non_null, || selection.name.to_string())
    }

    // Turns the result of a field resolver into the field's response value,
    // or `None` if it has to null the enclosing object.
    fn complete(
        &self,
        res: ExecutionResult,
        is_non_null: bool,
        field: impl FnOnce() -> String,
    ) -> Option<Value> {
        match res {
            Ok(Value::Null) if is_non_null => {
                if !self.null_propagated.load(Ordering::Relaxed) {
                    self.push_error(FieldError::of_kind(
                        ErrorKind::NonNull,
                        format!("Cannot return null for non-nullable field {}", field()),
                    ));
                }
                None
            }
            Ok(Value::List(mut items)) => match self.current_type {
                Some(ty) if !self.complete_list(ty, &mut items) => {
                    (!is_non_null).then(Value::null)
                }
                _ => Some(Value::List(items)),
            },
            Ok(v) => Some(v),
            Err(e) => {
                self.push_error(e);
                (!is_non_null).then(Value::null)
            }
        }
    }

    // Checks the items of a list value against the item type of `list_type`,
    // nulling nested lists in nullable positions. Returns `false` when a
    // `null` reached a non-null position and the list itself has to be nulled.
    fn complete_list(&self, list_type: TypeId, items: &mut [Value]) -> bool {
        let Some(MetaType::List(list)) = self.schema.meta(self.schema.nullable(list_type)) else {
            return true;
        };
        let item_type = list.of_type;
        let is_non_null = self.schema.is_non_null(item_type);

        for (idx, item) in items.iter_mut().enumerate() {
            let sub_exec = self.index_sub_executor(idx, Some(item_type));
            let valid = match item {
                Value::Null if is_non_null => {
                    sub_exec.push_error(FieldError::of_kind(
                        ErrorKind::NonNull,
                        "Cannot return null for non-nullable list item",
                    ));
                    false
                }
                Value::List(inner) => sub_exec.complete_list(item_type, inner),
                _ => true,
            };
            if !valid {
                if is_non_null {
                    return false;
                }
                *item = Value::null();
            }
        }
        true
    }

    fn field_sub_executor<'s>(
        &'s self,
        selection: &'s Selection,
        field_type: Option<TypeId>,
    ) -> Executor<'s, C> {
        Executor {
            schema: self.schema,
            context: self.context,
            current_selection_set: selection.selection_set.as_deref(),
            current_type: field_type,
            field_path: FieldPath::Field(selection.response_name(), &self.field_path),
            errors: self.errors,
            introspection_disabled: self.introspection_disabled,
            null_propagated: AtomicBool::new(false),
        }
    }

    fn index_sub_executor(&self, idx: usize, item_type: Option<TypeId>) -> Executor<'_, C> {
        Executor {
            schema: self.schema,
            context: self.context,
            current_selection_set: self.current_selection_set,
            current_type: item_type,
            field_path: FieldPath::Index(idx, &self.field_path),
            errors: self.errors,
            introspection_disabled: self.introspection_disabled,
            null_propagated: AtomicBool::new(false),
        }
    }
}

struct DisplayPath<'a>(&'a [PathSegment]);

impl Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Root query node of a schema
///
/// This brings the schema registry together with the objects serving the
/// root operation types. Construct it once and share it between requests.
pub struct RootNode<C> {
    schema: Arc<SchemaType>,
    query: Box<dyn GraphQLObject<C>>,
    mutation: Option<Box<dyn GraphQLObject<C>>>,
    subscription: Option<Box<dyn GraphQLObject<C>>>,
    introspection_disabled: bool,
}

impl<C> RootNode<C>
where
    C: Send + Sync,
{
    /// Constructs a new [`RootNode`] serving `query` operations only.
    pub fn new(schema: Arc<SchemaType>, query: impl GraphQLObject<C> + 'static) -> Self {
        Self {
            schema,
            query: Box::new(query),
            mutation: None,
            subscription: None,
            introspection_disabled: false,
        }
    }

    /// Serves `mutation` operations with the given root object.
    #[must_use]
    pub fn with_mutation(mut self, mutation: impl GraphQLObject<C> + 'static) -> Self {
        self.mutation = Some(Box::new(mutation));
        self
    }

    /// Serves `subscription` operations with the given root object.
    ///
    /// Each execution produces a single event.
    #[must_use]
    pub fn with_subscription(mut self, subscription: impl GraphQLObject<C> + 'static) -> Self {
        self.subscription = Some(Box::new(subscription));
        self
    }

    /// Disables introspection for this [`RootNode`], making it to return a [`FieldError`] whenever
    /// its `__schema` or `__type` field is resolved.
    ///
    /// By default, all introspection queries are allowed.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use juniper_service::{GraphQLObject, RootNode, SchemaType};
    /// fn build<Q>(schema: Arc<SchemaType>, query: Q) -> RootNode<()>
    /// where
    ///     Q: GraphQLObject<()> + 'static,
    /// {
    ///     RootNode::new(schema, query).disable_introspection()
    /// }
    /// ```
    #[must_use]
    pub fn disable_introspection(mut self) -> Self {
        self.introspection_disabled = true;
        self
    }

    /// Enables introspection for this [`RootNode`], if it was previously [disabled][1].
    ///
    /// By default, all introspection queries are allowed.
    ///
    /// [1]: RootNode::disable_introspection
    #[must_use]
    pub fn enable_introspection(mut self) -> Self {
        self.introspection_disabled = false;
        self
    }

    /// Returns `true` if introspection queries are rejected.
    pub fn is_introspection_disabled(&self) -> bool {
        self.introspection_disabled
    }

    /// The schema served by this [`RootNode`].
    pub fn schema(&self) -> &Arc<SchemaType> {
        &self.schema
    }

    /// Executes a selection set against the root object of `operation`.
    ///
    /// Field errors don't fail the execution: they are returned alongside the
    /// (possibly partially `null`) response value.
    pub async fn execute(
        &self,
        operation: OperationType,
        selection_set: &[Selection],
        context: &C,
    ) -> Result<(Value, Vec<ExecutionError>), GraphQLError> {
        let root = match operation {
            OperationType::Query => Some(&self.query),
            OperationType::Mutation => self.mutation.as_ref(),
            OperationType::Subscription => self.subscription.as_ref(),
        };
        let (Some(root), Some(root_type)) = (root, self.schema.root_type(operation)) else {
            return Err(GraphQLError::NotConfigured(operation));
        };

        let errors = RwLock::new(Vec::new());
        let value = {
            let executor = Executor {
                schema: &self.schema,
                context,
                current_selection_set: Some(selection_set),
                current_type: Some(root_type),
                field_path: FieldPath::Root,
                errors: &errors,
                introspection_disabled: self.introspection_disabled,
                null_propagated: AtomicBool::new(false),
            };
            let span = tracing::info_span!("execute", %operation, root = root.type_name());
            match executor.resolve_object(root.as_ref()).instrument(span).await {
                Ok(v) => v,
                Err(e) => {
                    executor.push_error(e);
                    Value::null()
                }
            }
        };

        let errors = errors.into_inner().unwrap_or_else(PoisonError::into_inner);
        Ok((value, errors))
    }
}
