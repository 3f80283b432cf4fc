use std::fmt;

use arcstr::ArcStr;
use fnv::FnvHashMap;
use futures::future::{self, BoxFuture, FutureExt as _};
use indexmap::IndexMap;

use crate::{
    executor::{ErrorKind, ExecutionResult, Executor, FieldError, FieldResult},
    schema::meta::Argument,
    types::nullable::Nullable,
    value::Value,
};

/**
Primary trait used to expose Rust values as GraphQL objects

Every value the executor descends into implements this trait: application
objects, connections and edges, and the introspection objects alike. The
trait is object-safe, so heterogeneous results (like the members of an
interface) can be resolved as `dyn GraphQLObject<C>`.

`type_name` names the concrete object type in the schema. The executor uses
it to find the field definitions (and so the nullability) of each selected
field, and to answer `__typename`.

## Example

Most implementations delegate to a [`Resolvers`] table built once per type:

```rust
use std::sync::LazyLock;

use juniper_service::{
    Arguments, BoxFuture, ExecutionResult, Executor, GraphQLObject, Resolvers, Value,
};

struct Task {
    title: String,
}

fn title<'a>(
    task: &'a Task,
    _: &'a Arguments<'a>,
    _: &'a Executor<'a, ()>,
) -> BoxFuture<'a, ExecutionResult> {
    Box::pin(async move { Ok(Value::from(&task.title)) })
}

static RESOLVERS: LazyLock<Resolvers<Task, ()>> =
    LazyLock::new(|| Resolvers::new().field("title", title));

impl GraphQLObject<()> for Task {
    fn type_name(&self) -> &str {
        "Task"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, ()>,
    ) -> BoxFuture<'a, ExecutionResult> {
        RESOLVERS.resolve(self, field_name, args, executor)
    }
}
```
*/
pub trait GraphQLObject<C>: Send + Sync {
    /// Name of the concrete object type of this value.
    fn type_name(&self) -> &str;

    /// Resolves a single field of this object.
    ///
    /// The `executor` is the field's own sub-executor: its selection set is
    /// the field's sub-selection, which object-typed fields pass on through
    /// [`Executor::resolve_object`] and friends.
    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult>;
}

/// Signature shared by every field resolver.
pub type ResolverFn<T, C> = for<'a> fn(
    &'a T,
    &'a Arguments<'a>,
    &'a Executor<'a, C>,
) -> BoxFuture<'a, ExecutionResult>;

/// Field name to resolver table of an object type.
///
/// Built once per type and reused by every request.
pub struct Resolvers<T, C> {
    fields: FnvHashMap<&'static str, ResolverFn<T, C>>,
}

impl<T, C> Default for Resolvers<T, C> {
    fn default() -> Self {
        Self {
            fields: FnvHashMap::default(),
        }
    }
}

impl<T, C> fmt::Debug for Resolvers<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.fields.keys()).finish()
    }
}

impl<T, C> Resolvers<T, C> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the resolver of the field `name`, replacing any previous one.
    #[must_use]
    pub fn field(mut self, name: &'static str, resolver: ResolverFn<T, C>) -> Self {
        self.fields.insert(name, resolver);
        self
    }

    /// Returns `true` if the table has a resolver for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Dispatches to the resolver of `field_name`.
    ///
    /// Fields missing from the table resolve to a field-not-found error.
    pub fn resolve<'a>(
        &self,
        object: &'a T,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult>
    where
        T: GraphQLObject<C>,
    {
        match self.fields.get(field_name) {
            Some(resolver) => resolver(object, args, executor),
            None => {
                future::ready(Err(FieldError::field_not_found(object.type_name(), field_name)))
                    .boxed()
            }
        }
    }
}

/// Parsing of arguments and input object fields into Rust values.
pub trait FromInputValue: Sized {
    /// Performs the conversion.
    fn from_input_value(v: &Value) -> Result<Self, FieldError>;
}

fn invalid_input(expected: &str, found: &Value) -> FieldError {
    FieldError::of_kind(
        ErrorKind::Argument,
        format!("Expected `{expected}`, found: {found}"),
    )
}

impl FromInputValue for bool {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        v.as_boolean_value()
            .ok_or_else(|| invalid_input("Boolean", v))
    }
}

impl FromInputValue for i32 {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        v.as_int_value().ok_or_else(|| invalid_input("Int", v))
    }
}

impl FromInputValue for f64 {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        v.as_float_value().ok_or_else(|| invalid_input("Float", v))
    }
}

impl FromInputValue for String {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        v.as_string_value()
            .map(Into::into)
            .ok_or_else(|| invalid_input("String", v))
    }
}

impl FromInputValue for ArcStr {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        v.as_string_value()
            .map(Into::into)
            .ok_or_else(|| invalid_input("String", v))
    }
}

impl FromInputValue for Value {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        Ok(v.clone())
    }
}

impl<T: FromInputValue> FromInputValue for Option<T> {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        match v {
            Value::Null => Ok(None),
            v => T::from_input_value(v).map(Some),
        }
    }
}

impl<T: FromInputValue> FromInputValue for Vec<T> {
    fn from_input_value(v: &Value) -> Result<Self, FieldError> {
        match v {
            Value::List(items) => items.iter().map(T::from_input_value).collect(),
            // Input coercion accepts a single item where a list is expected.
            Value::Null => Err(invalid_input("List", v)),
            other => Ok(vec![T::from_input_value(other)?]),
        }
    }
}

/// Field argument container
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments<'a> {
    args: IndexMap<&'a str, Value>,
}

impl<'a> Arguments<'a> {
    /// Collects the provided arguments of a field, filling in the declared
    /// default of every absent argument.
    ///
    /// An explicit `null` is kept as provided.
    pub fn new(provided: &'a IndexMap<ArcStr, Value>, meta_args: &'a [Argument]) -> Self {
        let mut args = provided
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect::<IndexMap<_, _>>();

        for arg in meta_args {
            if let Some(default_value) = &arg.default_value {
                args.entry(arg.name.as_str())
                    .or_insert_with(|| default_value.clone());
            }
        }

        Self { args }
    }

    /// Returns `true` if the argument was provided, even as `null`, or has a
    /// default value.
    pub fn contains(&self, key: &str) -> bool {
        self.args.contains_key(key)
    }

    /// Raw value of an argument.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    /// Gets and converts an argument into the desired type.
    ///
    /// Absent and `null` arguments both give `Ok(None)`; use
    /// [`Arguments::get_nullable`] to tell them apart.
    ///
    /// # Errors
    ///
    /// If the argument is present but cannot be converted into `T`.
    pub fn get<T: FromInputValue>(&self, key: &str) -> FieldResult<Option<T>> {
        match self.args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => T::from_input_value(v)
                .map(Some)
                .map_err(|e| invalid_argument(key, &e)),
        }
    }

    /// Gets and converts an argument that must be present.
    ///
    /// # Errors
    ///
    /// If the argument is absent, `null`, or cannot be converted into `T`.
    pub fn require<T: FromInputValue>(&self, key: &str) -> FieldResult<T> {
        self.get(key)?.ok_or_else(|| {
            FieldError::of_kind(
                ErrorKind::Argument,
                format!("Missing required argument \"{key}\""),
            )
        })
    }

    /// Gets an argument while distinguishing an absent argument from an
    /// explicit `null`.
    ///
    /// # Errors
    ///
    /// If the argument is present but cannot be converted into `T`.
    pub fn get_nullable<T: FromInputValue>(&self, key: &str) -> FieldResult<Nullable<T>> {
        match self.args.get(key) {
            None => Ok(Nullable::ImplicitNull),
            Some(Value::Null) => Ok(Nullable::ExplicitNull),
            Some(v) => T::from_input_value(v)
                .map(Nullable::Some)
                .map_err(|e| invalid_argument(key, &e)),
        }
    }
}

fn invalid_argument(key: &str, e: &FieldError) -> FieldError {
    FieldError::of_kind(
        ErrorKind::Argument,
        format!("Invalid value for argument \"{key}\": {}", e.message()),
    )
}
