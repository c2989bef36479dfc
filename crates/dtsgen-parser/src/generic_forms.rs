//! Built-in generic forms understood when a `Name<Arg>` does not resolve to a
//! declaration in scope.
//!
//! The set is a registry rather than a closed match so callers consuming a
//! different corpus can add forms. The standard registry holds exactly
//! `Partial`, `Record` and `Promise`.

use crate::expression::Expression;
use crate::parser::ExpressionParser;
use dtsgen_common::Result;
use rustc_hash::FxHashMap;
use std::sync::LazyLock;

/// Expansion of one built-in generic, given its raw argument texts.
pub trait GenericForm: Send + Sync {
    fn expand(&self, parser: &ExpressionParser<'_>, arguments: &[&str]) -> Result<Expression>;
}

#[derive(Default)]
pub struct GenericForms {
    forms: FxHashMap<String, Box<dyn GenericForm>>,
}

static STANDARD: LazyLock<GenericForms> = LazyLock::new(GenericForms::standard);

impl GenericForms {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `Partial`, `Record` and `Promise`.
    pub fn standard() -> Self {
        let mut forms = Self::new();
        forms.register("Partial", PartialForm);
        forms.register("Record", RecordForm);
        forms.register("Promise", PromiseForm);
        forms
    }

    /// Shared instance of [`GenericForms::standard`].
    pub fn shared() -> &'static GenericForms {
        &STANDARD
    }

    /// Add or replace the form handling `name`.
    pub fn register(&mut self, name: impl Into<String>, form: impl GenericForm + 'static) {
        self.forms.insert(name.into(), Box::new(form));
    }

    pub fn get(&self, name: &str) -> Option<&dyn GenericForm> {
        self.forms.get(name).map(|form| &**form)
    }
}

/// `Partial<{ ... }>`: the object with every property optional.
pub struct PartialForm;

impl GenericForm for PartialForm {
    fn expand(&self, parser: &ExpressionParser<'_>, arguments: &[&str]) -> Result<Expression> {
        let [argument] = arguments else {
            return Ok(Expression::Unknown);
        };
        match parser.parse_fragment(argument)? {
            Expression::Object(mut object) => {
                object.mark_all_optional();
                Ok(Expression::Object(object))
            }
            // a named type would need its declaration resolved first
            _ => Ok(Expression::Unknown),
        }
    }
}

/// `Record<K, V>`: an object with no named properties and dynamic values `V`.
pub struct RecordForm;

impl GenericForm for RecordForm {
    fn expand(&self, parser: &ExpressionParser<'_>, arguments: &[&str]) -> Result<Expression> {
        let [_, value] = arguments else {
            return Ok(Expression::Unknown);
        };
        let mut object = crate::expression::ObjectExpression::new();
        object.dynamic = Some(Box::new(parser.parse_fragment(value)?));
        Ok(Expression::Object(object))
    }
}

/// `Promise<T>`: a wrapped value.
pub struct PromiseForm;

impl GenericForm for PromiseForm {
    fn expand(&self, parser: &ExpressionParser<'_>, arguments: &[&str]) -> Result<Expression> {
        let [inner] = arguments else {
            return Ok(Expression::Unknown);
        };
        Ok(Expression::promise(parser.parse_fragment(inner)?))
    }
}
