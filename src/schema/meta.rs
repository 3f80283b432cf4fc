//! Types used to describe a `GraphQL` schema

use std::fmt::{self, Write as _};

use arcstr::ArcStr;

use crate::value::Value;

/// Stable handle of a type inside a [`SchemaType`] registry.
///
/// Handles are only meaningful for the registry that issued them; every
/// reference between types (field types, interfaces, possible types, wrapped
/// types) is a handle, never an owning pointer.
///
/// [`SchemaType`]: crate::SchemaType
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// GraphQL type kind
///
/// The GraphQL specification defines a number of type kinds - the meta type
/// of a type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TypeKind {
    /// ## Scalar types
    ///
    /// Scalar types appear as the leaf nodes of GraphQL queries. Strings,
    /// numbers, and booleans are the built in types.
    Scalar,

    /// ## Object types
    ///
    /// The most common type. Objects have fields and can implement
    /// interfaces.
    Object,

    /// ## Interface types
    ///
    /// Interface types are used to represent overlapping fields between
    /// multiple types, and can be queried for their concrete type.
    Interface,

    /// ## Union types
    ///
    /// Unions are similar to interfaces but can not contain any fields on
    /// their own.
    Union,

    /// ## Enum types
    ///
    /// Like scalars, enum types appear as the leaf nodes of GraphQL queries.
    Enum,

    /// ## Input objects
    ///
    /// Represents complex values provided in queries _into_ the system.
    InputObject,

    /// ## List types
    ///
    /// Represent lists of other types.
    List,

    /// ## Non-null types
    ///
    /// In GraphQL, nullable types are the default. By putting a `!` after a
    /// type, it becomes non-nullable.
    NonNull,
}

impl TypeKind {
    /// Name of this kind as a `__TypeKind` enum value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::InputObject => "INPUT_OBJECT",
            Self::List => "LIST",
            Self::NonNull => "NON_NULL",
        }
    }

    /// All kinds, in the order `__TypeKind` declares them.
    pub const ALL: [Self; 8] = [
        Self::Scalar,
        Self::Object,
        Self::Interface,
        Self::Union,
        Self::Enum,
        Self::InputObject,
        Self::List,
        Self::NonNull,
    ];
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifier kinds accepted by [`SchemaType::wrap_type`].
///
/// [`SchemaType::wrap_type`]: crate::SchemaType::wrap_type
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WrapperKind {
    /// `[T]`
    List,
    /// `T!`
    NonNull,
}

impl From<WrapperKind> for TypeKind {
    fn from(kind: WrapperKind) -> Self {
        match kind {
            WrapperKind::List => Self::List,
            WrapperKind::NonNull => Self::NonNull,
        }
    }
}

/// Whether an item is deprecated, with context.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum DeprecationStatus {
    /// The field/variant is not deprecated.
    #[default]
    Current,
    /// The field/variant is deprecated, with an optional reason
    Deprecated(Option<ArcStr>),
}

impl DeprecationStatus {
    /// If this deprecation status indicates the item is deprecated.
    pub fn is_deprecated(&self) -> bool {
        match self {
            Self::Current => false,
            Self::Deprecated(_) => true,
        }
    }

    /// An optional reason for the deprecation, or none if `Current`.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Current => None,
            Self::Deprecated(rsn) => rsn.as_deref(),
        }
    }
}

/// Scalar type metadata
#[derive(Clone, Debug)]
pub struct ScalarMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub specified_by_url: Option<ArcStr>,
}

/// List type metadata
#[derive(Clone, Debug)]
pub struct ListMeta {
    #[doc(hidden)]
    pub of_type: TypeId,
}

/// Non-null type metadata
#[derive(Clone, Debug)]
pub struct NonNullMeta {
    #[doc(hidden)]
    pub of_type: TypeId,
}

/// Object type metadata
#[derive(Clone, Debug)]
pub struct ObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Vec<Field>,
    #[doc(hidden)]
    pub interfaces: Vec<TypeId>,
}

/// Enum type metadata
#[derive(Clone, Debug)]
pub struct EnumMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub values: Vec<EnumValue>,
}

/// Interface type metadata
#[derive(Clone, Debug)]
pub struct InterfaceMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Vec<Field>,
    #[doc(hidden)]
    pub possible_types: Vec<TypeId>,
}

/// Union type metadata
#[derive(Clone, Debug)]
pub struct UnionMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub possible_types: Vec<TypeId>,
}

/// Input object metadata
#[derive(Clone, Debug)]
pub struct InputObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub input_fields: Vec<Argument>,
}

/// Generic type metadata
#[derive(Clone, Debug)]
pub enum MetaType {
    #[doc(hidden)]
    Scalar(ScalarMeta),
    #[doc(hidden)]
    List(ListMeta),
    #[doc(hidden)]
    NonNull(NonNullMeta),
    #[doc(hidden)]
    Object(ObjectMeta),
    #[doc(hidden)]
    Enum(EnumMeta),
    #[doc(hidden)]
    Interface(InterfaceMeta),
    #[doc(hidden)]
    Union(UnionMeta),
    #[doc(hidden)]
    InputObject(InputObjectMeta),
}

/// Metadata for a field
#[derive(Clone, Debug)]
pub struct Field {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub field_type: TypeId,
    #[doc(hidden)]
    pub deprecation_status: DeprecationStatus,
}

impl Field {
    /// Constructs a field of the given type, with no arguments.
    pub fn new(name: impl Into<ArcStr>, field_type: TypeId) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            field_type,
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Set the description of the field
    ///
    /// This overwrites the description if any was previously set.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an argument to the field
    ///
    /// Arguments are unordered and can't contain duplicates by name.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Appends several arguments at once.
    #[must_use]
    pub fn arguments(mut self, arguments: impl IntoIterator<Item = Argument>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    /// Marks the field as deprecated.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<&str>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason.map(ArcStr::from));
        self
    }

    /// Returns true if the type is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        // "used exclusively by GraphQL’s introspection system"
        self.name.starts_with("__")
    }

    /// Looks up a declared argument by name.
    pub fn argument_by_name(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

/// Metadata for an argument to a field, or a field of an input object
#[derive(Clone, Debug)]
pub struct Argument {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arg_type: TypeId,
    #[doc(hidden)]
    pub default_value: Option<Value>,
}

impl Argument {
    /// Constructs an argument of the given type.
    pub fn new(name: impl Into<ArcStr>, arg_type: TypeId) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_type,
            default_value: None,
        }
    }

    /// Sets the description of the argument.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the value used when the argument isn't provided.
    #[must_use]
    pub fn default_value(mut self, val: impl Into<Value>) -> Self {
        self.default_value = Some(val.into());
        self
    }

    /// Returns true if the type is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        // "used exclusively by GraphQL’s introspection system"
        self.name.starts_with("__")
    }

    /// The default value in GraphQL literal syntax, as `__InputValue.defaultValue`
    /// reports it.
    pub fn default_value_literal(&self) -> Option<String> {
        self.default_value.as_ref().map(|v| {
            let mut out = String::new();
            write_literal(&mut out, v);
            out
        })
    }
}

fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::Object(obj) => {
            out.push('{');
            for (idx, (key, val)) in obj.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                write_literal(out, val);
            }
            out.push('}');
        }
        Value::List(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_literal(out, item);
            }
            out.push(']');
        }
        scalar => {
            // `fmt::Write` for `String` never fails.
            let _ = write!(out, "{scalar}");
        }
    }
}

/// Metadata for a single value in an enum
#[derive(Clone, Debug)]
pub struct EnumValue {
    /// The name of the enum value
    ///
    /// This is the string literal representation of the enum in responses.
    pub name: ArcStr,
    /// The optional description of the enum value.
    ///
    /// Note: this is not the description of the enum itself; it's the
    /// description of this enum _value_.
    pub description: Option<ArcStr>,
    /// Whether the field is deprecated or not, with an optional reason.
    pub deprecation_status: DeprecationStatus,
}

impl EnumValue {
    /// Constructs a new [`EnumValue`] with the provided `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Sets the description of this [`EnumValue`].
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks this [`EnumValue`] as deprecated.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<&str>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason.map(ArcStr::from));
        self
    }
}

/// Places a directive may be applied at.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    /// Name of this location as a `__DirectiveLocation` enum value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Mutation => "MUTATION",
            Self::Subscription => "SUBSCRIPTION",
            Self::Field => "FIELD",
            Self::FragmentDefinition => "FRAGMENT_DEFINITION",
            Self::FragmentSpread => "FRAGMENT_SPREAD",
            Self::InlineFragment => "INLINE_FRAGMENT",
            Self::VariableDefinition => "VARIABLE_DEFINITION",
            Self::Schema => "SCHEMA",
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::FieldDefinition => "FIELD_DEFINITION",
            Self::ArgumentDefinition => "ARGUMENT_DEFINITION",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::EnumValue => "ENUM_VALUE",
            Self::InputObject => "INPUT_OBJECT",
            Self::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }

    /// All locations, in the order `__DirectiveLocation` declares them.
    pub const ALL: [Self; 19] = [
        Self::Query,
        Self::Mutation,
        Self::Subscription,
        Self::Field,
        Self::FragmentDefinition,
        Self::FragmentSpread,
        Self::InlineFragment,
        Self::VariableDefinition,
        Self::Schema,
        Self::Scalar,
        Self::Object,
        Self::FieldDefinition,
        Self::ArgumentDefinition,
        Self::Interface,
        Self::Union,
        Self::Enum,
        Self::EnumValue,
        Self::InputObject,
        Self::InputFieldDefinition,
    ];
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for a directive
#[derive(Clone, Debug)]
pub struct DirectiveType {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub locations: Vec<DirectiveLocation>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub is_repeatable: bool,
}

impl DirectiveType {
    /// Constructs a non-repeatable directive.
    pub fn new(
        name: impl Into<ArcStr>,
        locations: &[DirectiveLocation],
        arguments: Vec<Argument>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            locations: locations.to_vec(),
            arguments,
            is_repeatable: false,
        }
    }

    /// Sets the description of the directive.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Allows the directive to appear more than once at a location.
    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.is_repeatable = true;
        self
    }
}

macro_rules! named_meta_ctor {
    ($meta:ident) => {
        impl $meta {
            #[doc = concat!("Constructs an empty [`", stringify!($meta), "`] named `name`.")]
            pub fn new(name: impl Into<ArcStr>) -> Self {
                Self {
                    name: name.into(),
                    ..Self::empty()
                }
            }

            /// Set the description for the given type
            ///
            /// If a description was provided prior to calling this method, it
            /// will be overwritten.
            #[must_use]
            pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
                self.description = Some(description.into());
                self
            }

            /// Wraps this type into a generic [`MetaType`].
            pub fn into_meta(self) -> MetaType {
                MetaType::from(self)
            }
        }
    };
}

impl ScalarMeta {
    fn empty() -> Self {
        Self {
            name: ArcStr::new(),
            description: None,
            specified_by_url: None,
        }
    }

    /// Sets the [specification URL][0] for this scalar type.
    ///
    /// [0]: https://spec.graphql.org/October2021#sec--specifiedBy
    #[must_use]
    pub fn specified_by_url(mut self, url: impl Into<ArcStr>) -> Self {
        self.specified_by_url = Some(url.into());
        self
    }
}

impl ObjectMeta {
    fn empty() -> Self {
        Self {
            name: ArcStr::new(),
            description: None,
            fields: Vec::new(),
            interfaces: Vec::new(),
        }
    }
}

impl InterfaceMeta {
    fn empty() -> Self {
        Self {
            name: ArcStr::new(),
            description: None,
            fields: Vec::new(),
            possible_types: Vec::new(),
        }
    }
}

impl UnionMeta {
    fn empty() -> Self {
        Self {
            name: ArcStr::new(),
            description: None,
            possible_types: Vec::new(),
        }
    }
}

impl EnumMeta {
    fn empty() -> Self {
        Self {
            name: ArcStr::new(),
            description: None,
            values: Vec::new(),
        }
    }
}

impl InputObjectMeta {
    fn empty() -> Self {
        Self {
            name: ArcStr::new(),
            description: None,
            input_fields: Vec::new(),
        }
    }
}

named_meta_ctor!(ScalarMeta);
named_meta_ctor!(ObjectMeta);
named_meta_ctor!(InterfaceMeta);
named_meta_ctor!(UnionMeta);
named_meta_ctor!(EnumMeta);
named_meta_ctor!(InputObjectMeta);

impl From<ScalarMeta> for MetaType {
    fn from(meta: ScalarMeta) -> Self {
        Self::Scalar(meta)
    }
}

impl From<ObjectMeta> for MetaType {
    fn from(meta: ObjectMeta) -> Self {
        Self::Object(meta)
    }
}

impl From<InterfaceMeta> for MetaType {
    fn from(meta: InterfaceMeta) -> Self {
        Self::Interface(meta)
    }
}

impl From<UnionMeta> for MetaType {
    fn from(meta: UnionMeta) -> Self {
        Self::Union(meta)
    }
}

impl From<EnumMeta> for MetaType {
    fn from(meta: EnumMeta) -> Self {
        Self::Enum(meta)
    }
}

impl From<InputObjectMeta> for MetaType {
    fn from(meta: InputObjectMeta) -> Self {
        Self::InputObject(meta)
    }
}

impl MetaType {
    /// Access the name of the type, if applicable
    ///
    /// Lists and non-null wrappers don't have names.
    pub fn name(&self) -> Option<&ArcStr> {
        match self {
            Self::Scalar(ScalarMeta { name, .. })
            | Self::Object(ObjectMeta { name, .. })
            | Self::Enum(EnumMeta { name, .. })
            | Self::Interface(InterfaceMeta { name, .. })
            | Self::Union(UnionMeta { name, .. })
            | Self::InputObject(InputObjectMeta { name, .. }) => Some(name),
            Self::List(_) | Self::NonNull(_) => None,
        }
    }

    /// Access the description of the type, if applicable
    ///
    /// Lists and non-null wrappers don't have descriptions.
    pub fn description(&self) -> Option<&ArcStr> {
        match self {
            Self::Scalar(ScalarMeta { description, .. })
            | Self::Object(ObjectMeta { description, .. })
            | Self::Enum(EnumMeta { description, .. })
            | Self::Interface(InterfaceMeta { description, .. })
            | Self::Union(UnionMeta { description, .. })
            | Self::InputObject(InputObjectMeta { description, .. }) => description.as_ref(),
            Self::List(_) | Self::NonNull(_) => None,
        }
    }

    /// Accesses the [specification URL][0], if applicable.
    ///
    /// Only custom GraphQL scalars can have a [specification URL][0].
    ///
    /// [0]: https://spec.graphql.org/October2021#sec--specifiedBy
    pub fn specified_by_url(&self) -> Option<&ArcStr> {
        match self {
            Self::Scalar(ScalarMeta {
                specified_by_url, ..
            }) => specified_by_url.as_ref(),
            _ => None,
        }
    }

    /// Construct a `TypeKind` for a given type
    pub fn type_kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::List(_) => TypeKind::List,
            Self::NonNull(_) => TypeKind::NonNull,
            Self::Object(_) => TypeKind::Object,
            Self::Enum(_) => TypeKind::Enum,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Fields of an object or interface, in declaration order.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Self::Object(ObjectMeta { fields, .. })
            | Self::Interface(InterfaceMeta { fields, .. }) => Some(fields),
            _ => None,
        }
    }

    /// Access a field's meta data given its name
    ///
    /// Only objects and interfaces have fields. This method always returns `None` for other types.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Access an input field's meta data given its name
    ///
    /// Only input objects have input fields. This method always returns `None` for other types.
    pub fn input_field_by_name(&self, name: &str) -> Option<&Argument> {
        match self {
            Self::InputObject(InputObjectMeta { input_fields, .. }) => {
                input_fields.iter().find(|f| f.name == name)
            }
            _ => None,
        }
    }

    /// The wrapped type of a list or non-null modifier.
    pub fn of_type(&self) -> Option<TypeId> {
        match self {
            Self::List(ListMeta { of_type }) | Self::NonNull(NonNullMeta { of_type }) => {
                Some(*of_type)
            }
            _ => None,
        }
    }

    /// Returns true if the type is a composite type
    ///
    /// Objects, interfaces, and unions are composite.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    /// Returns true if the type can occur in leaf positions in queries
    ///
    /// Only enums and scalars are leaf types.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Enum(_) | Self::Scalar(_))
    }

    /// Returns true if the type is abstract
    ///
    /// Only interfaces and unions are abstract types.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// Returns true if the type can be used in input positions, e.g. arguments or variables
    ///
    /// Only scalars, enums, and input objects are input types.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_))
    }

    /// Returns true if the type is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        self.name().is_some_and(|name| {
            // "used exclusively by GraphQL’s introspection system"
            name.starts_with("__")
                // https://spec.graphql.org/October2021#sec-Scalars
                || matches!(name.as_str(), "Boolean" | "String" | "Int" | "Float" | "ID")
        })
    }
}
