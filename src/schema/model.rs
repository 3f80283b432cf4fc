use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use fnv::FnvHashMap;

use crate::{
    ast::OperationType,
    schema::meta::{
        Argument, DirectiveLocation, DirectiveType, EnumMeta, EnumValue, Field, InputObjectMeta,
        InterfaceMeta, ListMeta, MetaType, NonNullMeta, ObjectMeta, ScalarMeta, TypeId, TypeKind,
        UnionMeta, WrapperKind,
    },
    value::Value,
};

/// Error raised while building a [`SchemaType`].
///
/// These are configuration errors: they surface when the schema is assembled
/// at startup and never during request handling.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum SchemaError {
    /// A type with the same name is already registered.
    #[display("Type \"{_0}\" is already registered")]
    DuplicateType(#[error(not(source))] ArcStr),

    /// No type with this name is registered.
    #[display("Unknown type \"{_0}\"")]
    UnknownType(#[error(not(source))] ArcStr),

    /// The handle was not issued by this registry.
    #[display("Unknown type handle {_0}")]
    UnknownHandle(#[error(not(source))] TypeId),

    /// Only named types can be registered with [`SchemaType::add_type`].
    #[display("Wrapper types cannot be registered by name")]
    UnnamedType,

    /// The root type for this operation was already set.
    #[display("The {_0} root type is already set")]
    RootTypeAlreadySet(#[error(not(source))] OperationType),

    /// Root operation types must be objects.
    #[display("Type {_0} is not an object and cannot be a root type")]
    NotAnObject(#[error(not(source))] String),

    /// A non-null wrapper was requested around a non-null type.
    #[display("Cannot wrap non-null type {_0} in another non-null")]
    NestedNonNull(#[error(not(source))] String),

    /// The handle's variant cannot carry the given member.
    #[display("Type {name} cannot have {member}")]
    InvalidTarget {
        /// Rendered type the member was added to.
        name: String,
        /// What was being added, e.g. `"fields"`.
        member: &'static str,
    },
}

/// Metadata for a schema
///
/// An arena owning every named and wrapper type of a schema. All other
/// components, including the types themselves, refer to entries through
/// [`TypeId`] handles.
///
/// The registry is assembled through `&mut self` builder methods, then shared
/// read-only (typically as an `Arc<SchemaType>`) by every request.
#[derive(Clone, Debug)]
pub struct SchemaType {
    types: Vec<MetaType>,
    names: FnvHashMap<ArcStr, TypeId>,
    named_types: Vec<TypeId>,
    non_null_wrappers: FnvHashMap<TypeId, TypeId>,
    list_wrappers: FnvHashMap<TypeId, TypeId>,
    query_type: Option<TypeId>,
    mutation_type: Option<TypeId>,
    subscription_type: Option<TypeId>,
    directives: Vec<DirectiveType>,
}

static_assertions::assert_impl_all!(SchemaType: Send, Sync);

impl Default for SchemaType {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaType {
    /// Creates a registry containing the specified scalars, the introspection
    /// types and the `@skip`, `@include`, `@deprecated` and `@specifiedBy`
    /// directives.
    pub fn new() -> Self {
        let mut schema = Self::empty();
        schema.register_builtins();
        schema
    }

    /// Creates a registry without any pre-registered type or directive.
    pub fn empty() -> Self {
        Self {
            types: Vec::new(),
            names: FnvHashMap::default(),
            named_types: Vec::new(),
            non_null_wrappers: FnvHashMap::default(),
            list_wrappers: FnvHashMap::default(),
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            directives: Vec::new(),
        }
    }

    // REGISTRATION

    /// Registers a new named type.
    ///
    /// Fails if the name is already taken, leaving the registry untouched.
    pub fn add_type(&mut self, meta: impl Into<MetaType>) -> Result<TypeId, SchemaError> {
        let meta = meta.into();
        let name = meta.name().cloned().ok_or(SchemaError::UnnamedType)?;
        if self.names.contains_key(&name) {
            tracing::warn!(%name, "rejected duplicate type registration");
            return Err(SchemaError::DuplicateType(name));
        }
        Ok(self.insert_named(name, meta))
    }

    /// Returns the memoized `kind` wrapper around `of_type`, creating it on
    /// first request.
    ///
    /// Repeated calls with the same arguments return the same handle.
    pub fn wrap_type(&mut self, kind: WrapperKind, of_type: TypeId) -> Result<TypeId, SchemaError> {
        let inner = self.get(of_type)?;
        if kind == WrapperKind::NonNull && inner.type_kind() == TypeKind::NonNull {
            return Err(SchemaError::NestedNonNull(self.display_type(of_type)));
        }
        Ok(self.wrap_unchecked(kind, of_type))
    }

    /// Shortcut for `wrap_type(WrapperKind::List, of_type)`.
    pub fn list_of(&mut self, of_type: TypeId) -> Result<TypeId, SchemaError> {
        self.wrap_type(WrapperKind::List, of_type)
    }

    /// Shortcut for `wrap_type(WrapperKind::NonNull, of_type)`.
    pub fn non_null(&mut self, of_type: TypeId) -> Result<TypeId, SchemaError> {
        self.wrap_type(WrapperKind::NonNull, of_type)
    }

    /// Sets the root type of `query` operations. Can only be done once.
    pub fn add_query_type(&mut self, query: TypeId) -> Result<(), SchemaError> {
        self.set_root(OperationType::Query, query)
    }

    /// Sets the root type of `mutation` operations. Can only be done once.
    pub fn add_mutation_type(&mut self, mutation: TypeId) -> Result<(), SchemaError> {
        self.set_root(OperationType::Mutation, mutation)
    }

    /// Sets the root type of `subscription` operations. Can only be done once.
    pub fn add_subscription_type(&mut self, subscription: TypeId) -> Result<(), SchemaError> {
        self.set_root(OperationType::Subscription, subscription)
    }

    /// Appends a directive. Names are not checked for uniqueness.
    pub fn add_directive(&mut self, directive: DirectiveType) {
        self.directives.push(directive);
    }

    /// Appends fields to an object or interface type.
    pub fn add_fields(
        &mut self,
        target: TypeId,
        new_fields: impl IntoIterator<Item = Field>,
    ) -> Result<(), SchemaError> {
        let new_fields = new_fields.into_iter().collect::<Vec<_>>();
        for field in &new_fields {
            self.get(field.field_type)?;
            self.check_arguments(&field.arguments)?;
        }
        match self.get_mut(target)? {
            MetaType::Object(ObjectMeta { fields, .. })
            | MetaType::Interface(InterfaceMeta { fields, .. }) => {
                fields.extend(new_fields);
                Ok(())
            }
            _ => Err(self.invalid_target(target, "fields")),
        }
    }

    /// Declares that `object` implements each of `interfaces`, and records
    /// `object` as a possible type of each of them.
    pub fn add_interfaces(
        &mut self,
        object: TypeId,
        interfaces: &[TypeId],
    ) -> Result<(), SchemaError> {
        if self.get(object)?.type_kind() != TypeKind::Object {
            return Err(self.invalid_target(object, "interfaces"));
        }
        for &iface in interfaces {
            if self.get(iface)?.type_kind() != TypeKind::Interface {
                return Err(self.invalid_target(iface, "possible types"));
            }
        }
        for &iface in interfaces {
            if let MetaType::Object(meta) = &mut self.types[object.index()] {
                if !meta.interfaces.contains(&iface) {
                    meta.interfaces.push(iface);
                }
            }
            if let MetaType::Interface(meta) = &mut self.types[iface.index()] {
                if !meta.possible_types.contains(&object) {
                    meta.possible_types.push(object);
                }
            }
        }
        Ok(())
    }

    /// Adds object types to a union (or, without declaring the implementation
    /// on the object side, to an interface).
    pub fn add_possible_types(
        &mut self,
        target: TypeId,
        objects: &[TypeId],
    ) -> Result<(), SchemaError> {
        for &object in objects {
            if self.get(object)?.type_kind() != TypeKind::Object {
                return Err(self.invalid_target(object, "a place among possible types"));
            }
        }
        match self.get_mut(target)? {
            MetaType::Union(UnionMeta { possible_types, .. })
            | MetaType::Interface(InterfaceMeta { possible_types, .. }) => {
                for &object in objects {
                    if !possible_types.contains(&object) {
                        possible_types.push(object);
                    }
                }
                Ok(())
            }
            _ => Err(self.invalid_target(target, "possible types")),
        }
    }

    /// Appends values to an enum type.
    pub fn add_enum_values(
        &mut self,
        target: TypeId,
        new_values: impl IntoIterator<Item = EnumValue>,
    ) -> Result<(), SchemaError> {
        match self.get_mut(target)? {
            MetaType::Enum(EnumMeta { values, .. }) => {
                values.extend(new_values);
                Ok(())
            }
            _ => Err(self.invalid_target(target, "enum values")),
        }
    }

    /// Appends fields to an input object type.
    pub fn add_input_values(
        &mut self,
        target: TypeId,
        new_fields: impl IntoIterator<Item = Argument>,
    ) -> Result<(), SchemaError> {
        let new_fields = new_fields.into_iter().collect::<Vec<_>>();
        self.check_arguments(&new_fields)?;
        match self.get_mut(target)? {
            MetaType::InputObject(InputObjectMeta { input_fields, .. }) => {
                input_fields.extend(new_fields);
                Ok(())
            }
            _ => Err(self.invalid_target(target, "input fields")),
        }
    }

    // LOOKUP

    /// Returns the metadata behind a handle, if this registry issued it.
    pub fn meta(&self, id: TypeId) -> Option<&MetaType> {
        self.types.get(id.index())
    }

    /// Returns the type registered under `name`.
    pub fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    /// Returns the type registered under `name`, or a lookup error.
    pub fn lookup_type(&self, name: &str) -> Result<TypeId, SchemaError> {
        self.type_by_name(name)
            .ok_or_else(|| SchemaError::UnknownType(name.into()))
    }

    /// Metadata of the type registered under `name`.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.meta(self.type_by_name(name)?)
    }

    /// All named types, in registration order.
    pub fn types(&self) -> &[TypeId] {
        &self.named_types
    }

    /// All directives, in registration order.
    pub fn directives(&self) -> &[DirectiveType] {
        &self.directives
    }

    /// Looks up a directive by name.
    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// Root type of `query` operations.
    pub fn query_type(&self) -> Option<TypeId> {
        self.query_type
    }

    /// Root type of `mutation` operations.
    pub fn mutation_type(&self) -> Option<TypeId> {
        self.mutation_type
    }

    /// Root type of `subscription` operations.
    pub fn subscription_type(&self) -> Option<TypeId> {
        self.subscription_type
    }

    /// Root type for the given operation kind.
    pub fn root_type(&self, operation: OperationType) -> Option<TypeId> {
        match operation {
            OperationType::Query => self.query_type,
            OperationType::Mutation => self.mutation_type,
            OperationType::Subscription => self.subscription_type,
        }
    }

    /// Looks up a field of an object or interface type.
    pub fn field_by_name(&self, owner: TypeId, name: &str) -> Option<&Field> {
        self.meta(owner)?.field_by_name(name)
    }

    /// Name of the named type at the core of `id`, e.g. `Task` for `[Task!]`.
    pub fn type_name(&self, id: TypeId) -> Option<&ArcStr> {
        self.name(self.innermost(id))
    }

    /// Returns `true` if the handle is a non-null wrapper.
    pub fn is_non_null(&self, id: TypeId) -> bool {
        matches!(self.meta(id), Some(MetaType::NonNull(_)))
    }

    /// Strips a non-null wrapper, if any.
    pub fn nullable(&self, id: TypeId) -> TypeId {
        match self.meta(id) {
            Some(MetaType::NonNull(NonNullMeta { of_type })) => *of_type,
            _ => id,
        }
    }

    /// Strips every wrapper, down to the named type.
    pub fn innermost(&self, mut id: TypeId) -> TypeId {
        while let Some(of_type) = self.meta(id).and_then(MetaType::of_type) {
            id = of_type;
        }
        id
    }

    /// Renders a type reference in SDL syntax, e.g. `[Task!]!`.
    pub fn display_type(&self, id: TypeId) -> String {
        match self.meta(id) {
            Some(MetaType::List(ListMeta { of_type })) => {
                format!("[{}]", self.display_type(*of_type))
            }
            Some(MetaType::NonNull(NonNullMeta { of_type })) => {
                format!("{}!", self.display_type(*of_type))
            }
            Some(meta) => meta.name().map(ToString::to_string).unwrap_or_default(),
            None => id.to_string(),
        }
    }

    // INTROSPECTION CONTRACT
    //
    // Every accessor answers for every variant; combinations that don't
    // apply yield `None`.

    /// `__Type.kind`
    pub fn kind(&self, id: TypeId) -> Option<TypeKind> {
        self.meta(id).map(MetaType::type_kind)
    }

    /// `__Type.name`
    pub fn name(&self, id: TypeId) -> Option<&ArcStr> {
        self.meta(id)?.name()
    }

    /// `__Type.description`
    pub fn description(&self, id: TypeId) -> Option<&ArcStr> {
        self.meta(id)?.description()
    }

    /// `__Type.fields(includeDeprecated:)`
    pub fn fields(&self, id: TypeId, include_deprecated: bool) -> Option<Vec<&Field>> {
        let fields = self.meta(id)?.fields()?;
        Some(
            fields
                .iter()
                .filter(|f| !f.is_builtin())
                .filter(|f| include_deprecated || !f.deprecation_status.is_deprecated())
                .collect(),
        )
    }

    /// `__Type.interfaces`
    pub fn interfaces(&self, id: TypeId) -> Option<&[TypeId]> {
        match self.meta(id)? {
            MetaType::Object(ObjectMeta { interfaces, .. }) => Some(interfaces),
            _ => None,
        }
    }

    /// `__Type.possibleTypes`
    pub fn possible_types(&self, id: TypeId) -> Option<&[TypeId]> {
        match self.meta(id)? {
            MetaType::Interface(InterfaceMeta { possible_types, .. })
            | MetaType::Union(UnionMeta { possible_types, .. }) => Some(possible_types),
            _ => None,
        }
    }

    /// `__Type.enumValues(includeDeprecated:)`
    pub fn enum_values(&self, id: TypeId, include_deprecated: bool) -> Option<Vec<&EnumValue>> {
        match self.meta(id)? {
            MetaType::Enum(EnumMeta { values, .. }) => Some(
                values
                    .iter()
                    .filter(|v| include_deprecated || !v.deprecation_status.is_deprecated())
                    .collect(),
            ),
            _ => None,
        }
    }

    /// `__Type.inputFields`
    pub fn input_fields(&self, id: TypeId) -> Option<&[Argument]> {
        match self.meta(id)? {
            MetaType::InputObject(InputObjectMeta { input_fields, .. }) => Some(input_fields),
            _ => None,
        }
    }

    /// `__Type.ofType`
    pub fn of_type(&self, id: TypeId) -> Option<TypeId> {
        self.meta(id)?.of_type()
    }

    /// Returns `true` if `object` is among the possible types of
    /// `abstract_type`, or is that very type.
    pub fn is_possible_type(&self, abstract_type: TypeId, object: TypeId) -> bool {
        abstract_type == object
            || self
                .possible_types(abstract_type)
                .is_some_and(|types| types.contains(&object))
    }

    // INTERNALS

    fn get(&self, id: TypeId) -> Result<&MetaType, SchemaError> {
        self.meta(id).ok_or(SchemaError::UnknownHandle(id))
    }

    fn get_mut(&mut self, id: TypeId) -> Result<&mut MetaType, SchemaError> {
        self.types
            .get_mut(id.index())
            .ok_or(SchemaError::UnknownHandle(id))
    }

    fn check_arguments(&self, arguments: &[Argument]) -> Result<(), SchemaError> {
        for arg in arguments {
            self.get(arg.arg_type)?;
        }
        Ok(())
    }

    fn invalid_target(&self, id: TypeId, member: &'static str) -> SchemaError {
        SchemaError::InvalidTarget {
            name: self.display_type(id),
            member,
        }
    }

    fn next_id(&self) -> TypeId {
        TypeId(u32::try_from(self.types.len()).unwrap_or(u32::MAX))
    }

    fn insert_named(&mut self, name: ArcStr, meta: MetaType) -> TypeId {
        let id = self.next_id();
        self.types.push(meta);
        self.names.insert(name, id);
        self.named_types.push(id);
        id
    }

    fn wrap_unchecked(&mut self, kind: WrapperKind, of_type: TypeId) -> TypeId {
        let wrappers = match kind {
            WrapperKind::List => &self.list_wrappers,
            WrapperKind::NonNull => &self.non_null_wrappers,
        };
        if let Some(&id) = wrappers.get(&of_type) {
            return id;
        }
        let id = self.next_id();
        self.types.push(match kind {
            WrapperKind::List => MetaType::List(ListMeta { of_type }),
            WrapperKind::NonNull => MetaType::NonNull(NonNullMeta { of_type }),
        });
        match kind {
            WrapperKind::List => self.list_wrappers.insert(of_type, id),
            WrapperKind::NonNull => self.non_null_wrappers.insert(of_type, id),
        };
        id
    }

    fn set_root(&mut self, operation: OperationType, id: TypeId) -> Result<(), SchemaError> {
        if self.get(id)?.type_kind() != TypeKind::Object {
            return Err(SchemaError::NotAnObject(self.display_type(id)));
        }
        let slot = match operation {
            OperationType::Query => &mut self.query_type,
            OperationType::Mutation => &mut self.mutation_type,
            OperationType::Subscription => &mut self.subscription_type,
        };
        if slot.is_some() {
            tracing::warn!(%operation, "root type set twice");
            return Err(SchemaError::RootTypeAlreadySet(operation));
        }
        *slot = Some(id);
        Ok(())
    }

    fn builtin(&mut self, meta: impl Into<MetaType>) -> TypeId {
        let meta = meta.into();
        let name = meta.name().cloned().unwrap_or_default();
        self.insert_named(name, meta)
    }

    fn set_builtin_fields(&mut self, id: TypeId, new_fields: Vec<Field>) {
        if let MetaType::Object(ObjectMeta { fields, .. }) = &mut self.types[id.index()] {
            *fields = new_fields;
        }
    }

    fn register_builtins(&mut self) {
        use WrapperKind::{List, NonNull};

        let boolean = self.builtin(
            ScalarMeta::new("Boolean")
                .description("The `Boolean` scalar type represents `true` or `false`."),
        );
        let string = self.builtin(ScalarMeta::new("String").description(
            "The `String` scalar type represents textual data, represented as UTF-8 character sequences.",
        ));
        self.builtin(ScalarMeta::new("Int").description(
            "The `Int` scalar type represents non-fractional signed whole numeric values.",
        ));
        self.builtin(ScalarMeta::new("Float").description(
            "The `Float` scalar type represents signed double-precision fractional values.",
        ));
        self.builtin(ScalarMeta::new("ID").description(
            "The `ID` scalar type represents a unique identifier, often used to refetch an object.",
        ));

        let schema = self.builtin(ObjectMeta::new("__Schema"));
        let ty = self.builtin(ObjectMeta::new("__Type"));
        let field = self.builtin(ObjectMeta::new("__Field"));
        let input_value = self.builtin(ObjectMeta::new("__InputValue"));
        let enum_value = self.builtin(ObjectMeta::new("__EnumValue"));
        let directive = self.builtin(ObjectMeta::new("__Directive"));
        let type_kind = self.builtin(EnumMeta::new("__TypeKind"));
        let directive_location = self.builtin(EnumMeta::new("__DirectiveLocation"));

        if let MetaType::Enum(meta) = &mut self.types[type_kind.index()] {
            meta.values = TypeKind::ALL.iter().map(|k| EnumValue::new(k.as_str())).collect();
        }
        if let MetaType::Enum(meta) = &mut self.types[directive_location.index()] {
            meta.values = DirectiveLocation::ALL
                .iter()
                .map(|l| EnumValue::new(l.as_str()))
                .collect();
        }

        let boolean_nn = self.wrap_unchecked(NonNull, boolean);
        let string_nn = self.wrap_unchecked(NonNull, string);
        let ty_nn = self.wrap_unchecked(NonNull, ty);
        let ty_list = self.wrap_unchecked(List, ty_nn);
        let ty_list_nn = self.wrap_unchecked(NonNull, ty_list);
        let field_list = {
            let nn = self.wrap_unchecked(NonNull, field);
            self.wrap_unchecked(List, nn)
        };
        let input_value_list = {
            let nn = self.wrap_unchecked(NonNull, input_value);
            self.wrap_unchecked(List, nn)
        };
        let input_value_list_nn = self.wrap_unchecked(NonNull, input_value_list);
        let enum_value_list = {
            let nn = self.wrap_unchecked(NonNull, enum_value);
            self.wrap_unchecked(List, nn)
        };
        let directive_list_nn = {
            let nn = self.wrap_unchecked(NonNull, directive);
            let list = self.wrap_unchecked(List, nn);
            self.wrap_unchecked(NonNull, list)
        };
        let type_kind_nn = self.wrap_unchecked(NonNull, type_kind);
        let location_list_nn = {
            let nn = self.wrap_unchecked(NonNull, directive_location);
            let list = self.wrap_unchecked(List, nn);
            self.wrap_unchecked(NonNull, list)
        };
        let include_deprecated =
            || Argument::new("includeDeprecated", boolean).default_value(false);

        self.set_builtin_fields(
            schema,
            vec![
                Field::new("description", string),
                Field::new("types", ty_list_nn),
                Field::new("queryType", ty_nn),
                Field::new("mutationType", ty),
                Field::new("subscriptionType", ty),
                Field::new("directives", directive_list_nn),
            ],
        );
        self.set_builtin_fields(
            ty,
            vec![
                Field::new("kind", type_kind_nn),
                Field::new("name", string),
                Field::new("description", string),
                Field::new("specifiedByURL", string),
                Field::new("fields", field_list).argument(include_deprecated()),
                Field::new("interfaces", ty_list),
                Field::new("possibleTypes", ty_list),
                Field::new("enumValues", enum_value_list).argument(include_deprecated()),
                Field::new("inputFields", input_value_list),
                Field::new("ofType", ty),
            ],
        );
        self.set_builtin_fields(
            field,
            vec![
                Field::new("name", string_nn),
                Field::new("description", string),
                Field::new("args", input_value_list_nn),
                Field::new("type", ty_nn),
                Field::new("isDeprecated", boolean_nn),
                Field::new("deprecationReason", string),
            ],
        );
        self.set_builtin_fields(
            input_value,
            vec![
                Field::new("name", string_nn),
                Field::new("description", string),
                Field::new("type", ty_nn),
                Field::new("defaultValue", string),
            ],
        );
        self.set_builtin_fields(
            enum_value,
            vec![
                Field::new("name", string_nn),
                Field::new("description", string),
                Field::new("isDeprecated", boolean_nn),
                Field::new("deprecationReason", string),
            ],
        );
        self.set_builtin_fields(
            directive,
            vec![
                Field::new("name", string_nn),
                Field::new("description", string),
                Field::new("locations", location_list_nn),
                Field::new("args", input_value_list_nn),
                Field::new("isRepeatable", boolean_nn),
            ],
        );

        let if_arg = || Argument::new("if", boolean_nn);
        let executable = [
            DirectiveLocation::Field,
            DirectiveLocation::FragmentSpread,
            DirectiveLocation::InlineFragment,
        ];
        self.add_directive(
            DirectiveType::new(
                "skip",
                &executable,
                vec![if_arg().description("Skipped when true.")],
            )
            .description(
                "Directs the executor to skip this field or fragment when the `if` argument is true.",
            ),
        );
        self.add_directive(
            DirectiveType::new(
                "include",
                &executable,
                vec![if_arg().description("Included when true.")],
            )
            .description(
                "Directs the executor to include this field or fragment only when the `if` argument is true.",
            ),
        );
        self.add_directive(
            DirectiveType::new(
                "deprecated",
                &[
                    DirectiveLocation::FieldDefinition,
                    DirectiveLocation::ArgumentDefinition,
                    DirectiveLocation::InputFieldDefinition,
                    DirectiveLocation::EnumValue,
                ],
                vec![
                    Argument::new("reason", string)
                        .default_value(Value::from("No longer supported")),
                ],
            )
            .description("Marks an element of a GraphQL schema as no longer supported."),
        );
        self.add_directive(
            DirectiveType::new(
                "specifiedBy",
                &[DirectiveLocation::Scalar],
                vec![Argument::new("url", string_nn)],
            )
            .description("Exposes a URL that specifies the behavior of this scalar."),
        );
    }
}
