//! Introspection objects: `__Schema`, `__Type`, `__Field`, `__InputValue`,
//! `__EnumValue` and `__Directive`.
//!
//! They borrow straight from the executing [`SchemaType`], so they are built
//! on the fly by each resolver and never stored.

use futures::future::{self, BoxFuture, FutureExt as _};

use crate::{
    executor::{ExecutionResult, Executor, FieldError},
    schema::{
        meta::{Argument, DirectiveType, EnumValue, Field, TypeId},
        model::SchemaType,
    },
    types::base::{Arguments, GraphQLObject},
    value::Value,
};

fn ready<'a>(value: impl Into<Value>) -> BoxFuture<'a, ExecutionResult> {
    future::ready(Ok(value.into())).boxed()
}

fn not_found<'a>(type_name: &str, field_name: &str) -> BoxFuture<'a, ExecutionResult> {
    future::ready(Err(FieldError::field_not_found(type_name, field_name))).boxed()
}

fn include_deprecated(args: &Arguments<'_>) -> Result<bool, FieldError> {
    Ok(args.get::<bool>("includeDeprecated")?.unwrap_or(false))
}

fn type_objects(ids: &[TypeId]) -> Vec<TypeObject> {
    ids.iter().copied().map(TypeObject).collect()
}

fn input_values(args: &[Argument]) -> Vec<InputValueObject<'_>> {
    args.iter()
        .filter(|a| !a.is_builtin())
        .map(InputValueObject)
        .collect()
}

/// The `__Schema` object.
#[derive(Clone, Copy, Debug)]
pub struct SchemaObject;

impl<C: Send + Sync> GraphQLObject<C> for SchemaObject {
    fn type_name(&self) -> &str {
        "__Schema"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        let schema: &'a SchemaType = executor.schema();
        match field_name {
            "description" => ready(Value::null()),
            "types" => async move {
                let types = type_objects(schema.types());
                executor.resolve_list(&types).await
            }
            .boxed(),
            "queryType" => async move {
                let query = schema.query_type().map(TypeObject);
                executor.resolve_optional(query.as_ref()).await
            }
            .boxed(),
            "mutationType" => async move {
                let mutation = schema.mutation_type().map(TypeObject);
                executor.resolve_optional(mutation.as_ref()).await
            }
            .boxed(),
            "subscriptionType" => async move {
                let subscription = schema.subscription_type().map(TypeObject);
                executor.resolve_optional(subscription.as_ref()).await
            }
            .boxed(),
            "directives" => async move {
                let directives = schema
                    .directives()
                    .iter()
                    .map(DirectiveObject)
                    .collect::<Vec<_>>();
                executor.resolve_list(&directives).await
            }
            .boxed(),
            _ => not_found("__Schema", field_name),
        }
    }
}

/// The `__Type` object, describing any named or wrapper type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TypeObject(pub TypeId);

impl<C: Send + Sync> GraphQLObject<C> for TypeObject {
    fn type_name(&self) -> &str {
        "__Type"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        args: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        let schema: &'a SchemaType = executor.schema();
        let id = self.0;
        match field_name {
            "kind" => ready(
                schema
                    .kind(id)
                    .map(|kind| Value::enum_value(kind.as_str())),
            ),
            "name" => ready(schema.name(id)),
            "description" => ready(schema.description(id)),
            "specifiedByURL" => ready(schema.meta(id).and_then(|m| m.specified_by_url())),
            "fields" => async move {
                match schema.fields(id, include_deprecated(args)?) {
                    Some(fields) => {
                        let fields = fields.into_iter().map(FieldObject).collect::<Vec<_>>();
                        executor.resolve_list(&fields).await
                    }
                    None => Ok(Value::null()),
                }
            }
            .boxed(),
            "interfaces" => async move {
                match schema.interfaces(id) {
                    Some(ids) => executor.resolve_list(&type_objects(ids)).await,
                    None => Ok(Value::null()),
                }
            }
            .boxed(),
            "possibleTypes" => async move {
                match schema.possible_types(id) {
                    Some(ids) => executor.resolve_list(&type_objects(ids)).await,
                    None => Ok(Value::null()),
                }
            }
            .boxed(),
            "enumValues" => async move {
                match schema.enum_values(id, include_deprecated(args)?) {
                    Some(values) => {
                        let values = values
                            .into_iter()
                            .map(EnumValueObject)
                            .collect::<Vec<_>>();
                        executor.resolve_list(&values).await
                    }
                    None => Ok(Value::null()),
                }
            }
            .boxed(),
            "inputFields" => async move {
                match schema.input_fields(id) {
                    Some(fields) => executor.resolve_list(&input_values(fields)).await,
                    None => Ok(Value::null()),
                }
            }
            .boxed(),
            "ofType" => async move {
                let of_type = schema.of_type(id).map(TypeObject);
                executor.resolve_optional(of_type.as_ref()).await
            }
            .boxed(),
            _ => not_found("__Type", field_name),
        }
    }
}

/// The `__Field` object.
#[derive(Clone, Copy, Debug)]
pub struct FieldObject<'s>(pub &'s Field);

impl<C: Send + Sync> GraphQLObject<C> for FieldObject<'_> {
    fn type_name(&self) -> &str {
        "__Field"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        let field = self.0;
        match field_name {
            "name" => ready(&field.name),
            "description" => ready(field.description.as_ref()),
            "args" => async move { executor.resolve_list(&input_values(&field.arguments)).await }
                .boxed(),
            "type" => async move { executor.resolve_object(&TypeObject(field.field_type)).await }
                .boxed(),
            "isDeprecated" => ready(field.deprecation_status.is_deprecated()),
            "deprecationReason" => ready(field.deprecation_status.reason()),
            _ => not_found("__Field", field_name),
        }
    }
}

/// The `__InputValue` object, describing arguments and input object fields.
#[derive(Clone, Copy, Debug)]
pub struct InputValueObject<'s>(pub &'s Argument);

impl<C: Send + Sync> GraphQLObject<C> for InputValueObject<'_> {
    fn type_name(&self) -> &str {
        "__InputValue"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        let arg = self.0;
        match field_name {
            "name" => ready(&arg.name),
            "description" => ready(arg.description.as_ref()),
            "type" => async move { executor.resolve_object(&TypeObject(arg.arg_type)).await }
                .boxed(),
            "defaultValue" => ready(arg.default_value_literal()),
            _ => not_found("__InputValue", field_name),
        }
    }
}

/// The `__EnumValue` object.
#[derive(Clone, Copy, Debug)]
pub struct EnumValueObject<'s>(pub &'s EnumValue);

impl<C: Send + Sync> GraphQLObject<C> for EnumValueObject<'_> {
    fn type_name(&self) -> &str {
        "__EnumValue"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _: &'a Arguments<'a>,
        _: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        let value = self.0;
        match field_name {
            "name" => ready(&value.name),
            "description" => ready(value.description.as_ref()),
            "isDeprecated" => ready(value.deprecation_status.is_deprecated()),
            "deprecationReason" => ready(value.deprecation_status.reason()),
            _ => not_found("__EnumValue", field_name),
        }
    }
}

/// The `__Directive` object.
#[derive(Clone, Copy, Debug)]
pub struct DirectiveObject<'s>(pub &'s DirectiveType);

impl<C: Send + Sync> GraphQLObject<C> for DirectiveObject<'_> {
    fn type_name(&self) -> &str {
        "__Directive"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _: &'a Arguments<'a>,
        executor: &'a Executor<'a, C>,
    ) -> BoxFuture<'a, ExecutionResult> {
        let directive = self.0;
        match field_name {
            "name" => ready(&directive.name),
            "description" => ready(directive.description.as_ref()),
            "locations" => ready(Value::list(
                directive
                    .locations
                    .iter()
                    .map(|l| Value::enum_value(l.as_str()))
                    .collect(),
            )),
            "args" => async move {
                executor
                    .resolve_list(&input_values(&directive.arguments))
                    .await
            }
            .boxed(),
            "isRepeatable" => ready(directive.is_repeatable),
            _ => not_found("__Directive", field_name),
        }
    }
}
