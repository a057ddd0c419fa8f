//! Semantic facts supplied by the host: expression types and constant values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ast::ExprId;

/// Resolved type of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    /// Predeclared type such as `string`, `int` or `untyped string`.
    Basic { name: String },
    /// Declared type. `package` is `None` for universe-scope types like `error`.
    Named {
        #[serde(default)]
        package: Option<String>,
        name: String,
    },
    Pointer { elem: Box<Type> },
    /// Anything the checker never inspects (slices, maps, funcs, ...).
    Other { repr: String },
}

impl Type {
    pub fn basic(name: impl Into<String>) -> Self {
        Type::Basic { name: name.into() }
    }

    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Type::Named {
            package: Some(package.into()),
            name: name.into(),
        }
    }

    pub fn pointer_to(elem: Type) -> Self {
        Type::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn string() -> Self {
        Type::basic("string")
    }

    /// Whether this is the predeclared string type (typed or untyped).
    ///
    /// Named types with a string underlying type do not qualify.
    pub fn is_string(&self) -> bool {
        matches!(self, Type::Basic { name } if name == "string" || name == "untyped string")
    }

    /// For `*T` where `T` is a named type, returns `(package, name)` of `T`.
    pub fn pointee_named(&self) -> Option<(Option<&str>, &str)> {
        let Type::Pointer { elem } = self else {
            return None;
        };
        match elem.as_ref() {
            Type::Named { package, name } => Some((package.as_deref(), name.as_str())),
            _ => None,
        }
    }
}

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ConstValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Type of an expression plus its constant value, if statically known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAndValue {
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConstValue>,
}

impl TypeAndValue {
    pub fn of(ty: Type) -> Self {
        Self { ty, value: None }
    }

    pub fn constant(ty: Type, value: ConstValue) -> Self {
        Self {
            ty,
            value: Some(value),
        }
    }
}

/// Lookup of semantic facts by expression.
///
/// This is the whole contract the checker needs from a type checker. Missing
/// entries mean "unknown" and make the checker skip, never fail.
pub trait TypeFacts {
    fn type_and_value(&self, id: ExprId) -> Option<&TypeAndValue>;

    fn type_of(&self, id: ExprId) -> Option<&Type> {
        self.type_and_value(id).map(|tv| &tv.ty)
    }
}

/// Fact table recorded by a frontend, keyed by expression id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypesInfo {
    pub types: HashMap<ExprId, TypeAndValue>,
}

impl TypesInfo {
    pub fn insert(&mut self, id: ExprId, tv: TypeAndValue) {
        self.types.insert(id, tv);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeFacts for TypesInfo {
    fn type_and_value(&self, id: ExprId) -> Option<&TypeAndValue> {
        self.types.get(&id)
    }
}

impl<T: TypeFacts + ?Sized> TypeFacts for &T {
    fn type_and_value(&self, id: ExprId) -> Option<&TypeAndValue> {
        (**self).type_and_value(id)
    }
}
