//! Centralized limits and thresholds.
//!
//! Parsing recurses once per nested construct, so the call stack is the only
//! scaling limit on deeply nested declarations. These constants bound that
//! recursion and the size of text quoted back in error messages.

/// Maximum nesting depth of a single type expression.
///
/// Each group, object body, generic argument or union member adds a level.
/// Past this depth the parser fails with `NestingTooDeep` instead of
/// overflowing the stack.
///
/// # TypeScript example
///
/// ```typescript
/// type Deep = { a: { b: { c: ((((((string)))))) /* ... 256 levels ... */ } } };
/// ```
pub const MAX_EXPRESSION_DEPTH: u32 = 256;

/// Maximum number of characters of offending source quoted in an error.
pub const MAX_ERROR_EXCERPT: usize = 80;
