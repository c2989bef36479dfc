//! Type expression parser for the dtsgen declaration extractor.
//!
//! Turns the body of a type declaration into a structural [`Expression`]:
//! - [`pair`]: balanced quote/bracket spans treated as single tokens
//! - [`split`]: top-level tokenization with `|` / `&` detection
//! - [`ExpressionParser`]: classification and recursion into nested bodies
//! - [`GenericForms`]: built-in generics (`Partial`, `Record`, `Promise`)

pub mod cursor;
pub use cursor::Cursor;

pub mod pair;
pub use pair::pair;

pub mod split;
pub use split::{Delimiter, Split, split};

pub mod expression;
pub use expression::{
    Expression, LiteralValue, ObjectExpression, PrimitiveKind, Property, WrapperKind,
};

pub mod generic_forms;
pub use generic_forms::{GenericForm, GenericForms};

pub mod parser;
pub use parser::{EmptyScope, ExpressionParser, NameScope, Parsed};
