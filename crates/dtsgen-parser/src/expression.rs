//! Structural expression trees produced by the parser.
//!
//! One constructor per shape; consumers match exhaustively. Serialization
//! uses a `type` tag so the JSON output reads like
//! `{"type": "union", "members": [...]}`.

use dtsgen_common::TypeIdentity;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expression {
    /// A named declaration, optionally applied to one generic argument.
    Reference {
        identity: TypeIdentity,
        #[serde(skip_serializing_if = "Option::is_none")]
        argument: Option<Box<Expression>>,
    },
    Literal {
        value: LiteralValue,
    },
    Primitive {
        kind: PrimitiveKind,
    },
    Array {
        element: Box<Expression>,
    },
    Object(ObjectExpression),
    Wrapped {
        kind: WrapperKind,
        inner: Box<Expression>,
    },
    Union {
        members: Vec<Expression>,
    },
    Intersection {
        members: Vec<Expression>,
    },
    /// The declaration's own type parameter.
    Generic,
    Unknown,
}

impl Expression {
    pub fn reference(identity: TypeIdentity) -> Self {
        Expression::Reference {
            identity,
            argument: None,
        }
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        Expression::Primitive { kind }
    }

    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        Expression::Literal {
            value: value.into(),
        }
    }

    pub fn array(element: Expression) -> Self {
        Expression::Array {
            element: Box::new(element),
        }
    }

    pub fn promise(inner: Expression) -> Self {
        Expression::Wrapped {
            kind: WrapperKind::Promise,
            inner: Box::new(inner),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Expression::Unknown)
    }

    pub fn as_object(&self) -> Option<&ObjectExpression> {
        match self {
            Expression::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Every declaration this tree points at, in first-seen order.
    pub fn references(&self) -> Vec<&TypeIdentity> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'e>(&'e self, out: &mut Vec<&'e TypeIdentity>) {
        match self {
            Expression::Reference { identity, argument } => {
                if !out.contains(&identity) {
                    out.push(identity);
                }
                if let Some(argument) = argument {
                    argument.collect_references(out);
                }
            }
            Expression::Array { element: inner } | Expression::Wrapped { inner, .. } => {
                inner.collect_references(out);
            }
            Expression::Object(object) => {
                for property in object.properties.values() {
                    property.value.collect_references(out);
                }
                if let Some(dynamic) = &object.dynamic {
                    dynamic.collect_references(out);
                }
            }
            Expression::Union { members } | Expression::Intersection { members } => {
                for member in members {
                    member.collect_references(out);
                }
            }
            Expression::Literal { .. }
            | Expression::Primitive { .. }
            | Expression::Generic
            | Expression::Unknown => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    #[serde(rename = "Date")]
    Date,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "null")]
    Null,
    #[serde(rename = "undefined")]
    Undefined,
    #[serde(rename = "any")]
    Any,
}

impl PrimitiveKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "Date" => PrimitiveKind::Date,
            "string" => PrimitiveKind::String,
            "number" => PrimitiveKind::Number,
            "boolean" => PrimitiveKind::Boolean,
            "null" => PrimitiveKind::Null,
            "undefined" => PrimitiveKind::Undefined,
            "any" => PrimitiveKind::Any,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Date => "Date",
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Undefined => "undefined",
            PrimitiveKind::Any => "any",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WrapperKind {
    Promise,
}

/// An object shape. Properties keep source order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ObjectExpression {
    pub properties: IndexMap<String, Property>,
    /// Value type of an index signature (`[key: string]: V`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<Box<Expression>>,
}

impl ObjectExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a property; an overwrite keeps the first position.
    pub fn insert(&mut self, name: impl Into<String>, value: Expression, optional: bool) {
        self.properties
            .insert(name.into(), Property { value, optional });
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn mark_all_optional(&mut self) {
        for property in self.properties.values_mut() {
            property.optional = true;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Property {
    pub value: Expression,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

// =============================================================================
// Display: TypeScript-like rendering
// =============================================================================

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Reference { identity, argument } => {
                write!(f, "{}", identity.name())?;
                if let Some(argument) = argument {
                    write!(f, "<{argument}>")?;
                }
                Ok(())
            }
            Expression::Literal { value } => write!(f, "{value}"),
            Expression::Primitive { kind } => f.write_str(kind.as_str()),
            Expression::Array { element } => match **element {
                Expression::Union { .. } | Expression::Intersection { .. } => {
                    write!(f, "({element})[]")
                }
                _ => write!(f, "{element}[]"),
            },
            Expression::Object(object) => write!(f, "{object}"),
            Expression::Wrapped { kind, inner } => match kind {
                WrapperKind::Promise => write!(f, "Promise<{inner}>"),
            },
            Expression::Union { members } => write_joined(f, members, " | "),
            Expression::Intersection { members } => write_joined(f, members, " & "),
            Expression::Generic => f.write_str("<generic>"),
            Expression::Unknown => f.write_str("unknown"),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    members: &[Expression],
    separator: &str,
) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{member}")?;
    }
    Ok(())
}

impl fmt::Display for ObjectExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.properties.is_empty() && self.dynamic.is_none() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (name, property) in &self.properties {
            let mark = if property.optional { "?" } else { "" };
            write!(f, "{name}{mark}: {}; ", property.value)?;
        }
        if let Some(dynamic) = &self.dynamic {
            write!(f, "[key: string]: {dynamic}; ")?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(value) => write!(f, "{value:?}"),
            LiteralValue::Number(value) => write!(f, "{value}"),
            LiteralValue::Bool(value) => write!(f, "{value}"),
        }
    }
}
