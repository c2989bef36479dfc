//! Tests for expression parsing and classification.

use super::*;
use crate::expression::WrapperKind;
use crate::generic_forms::GenericForm;
use dtsgen_common::ErrorKind;
use rustc_hash::FxHashMap;
use std::path::Path;
use std::rc::Rc;

/// Scope resolving a fixed set of names declared in `/decl/types.d.ts`.
struct FixedScope {
    names: FxHashMap<&'static str, TypeIdentity>,
}

impl FixedScope {
    fn new(names: &[&'static str]) -> Self {
        let file: Rc<Path> = Rc::from(Path::new("/decl/types.d.ts"));
        let names = names
            .iter()
            .map(|name| (*name, TypeIdentity::new(file.clone(), *name, false)))
            .collect();
        Self { names }
    }

    fn identity(&self, name: &str) -> TypeIdentity {
        self.names[name].clone()
    }
}

impl NameScope for FixedScope {
    fn resolve(&self, name: &str) -> Result<Option<TypeIdentity>> {
        Ok(self.names.get(name).cloned())
    }
}

fn parse(text: &str) -> Result<Expression> {
    ExpressionParser::new(&EmptyScope).parse_fragment(text)
}

fn string() -> Expression {
    Expression::primitive(PrimitiveKind::String)
}

fn number() -> Expression {
    Expression::primitive(PrimitiveKind::Number)
}

#[test]
fn primitives() {
    assert_eq!(parse("string").unwrap(), string());
    assert_eq!(parse("Date;").unwrap(), Expression::primitive(PrimitiveKind::Date));
    assert_eq!(parse("any").unwrap(), Expression::primitive(PrimitiveKind::Any));
    assert_eq!(
        parse("undefined").unwrap(),
        Expression::primitive(PrimitiveKind::Undefined)
    );
}

#[test]
fn array_suffix() {
    assert_eq!(parse("string[]").unwrap(), Expression::array(string()));
    assert_eq!(
        parse("number[][]").unwrap(),
        Expression::array(Expression::array(number()))
    );
}

#[test]
fn grouped_union_array() {
    assert_eq!(
        parse("(string | number)[]").unwrap(),
        Expression::array(Expression::Union {
            members: vec![string(), number()]
        })
    );
}

#[test]
fn string_literals_are_unescaped() {
    assert_eq!(parse("'abc'").unwrap(), Expression::literal("abc"));
    assert_eq!(parse(r#""a\"b""#).unwrap(), Expression::literal("a\"b"));
}

#[test]
fn boolean_and_numeric_literals() {
    assert_eq!(parse("true").unwrap(), Expression::literal(true));
    assert_eq!(parse("42").unwrap(), Expression::literal(42.0));
    assert_eq!(
        parse("-1 | 0").unwrap(),
        Expression::Union {
            members: vec![Expression::literal(-1.0), Expression::literal(0.0)]
        }
    );
}

#[test]
fn union_of_literals() {
    let parsed = parse("'a' | 'b' | null").unwrap();
    assert_eq!(
        parsed,
        Expression::Union {
            members: vec![
                Expression::literal("a"),
                Expression::literal("b"),
                Expression::primitive(PrimitiveKind::Null),
            ]
        }
    );
}

#[test]
fn mixed_delimiters_fail() {
    let err = parse("A | B & C").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousDelimiterMix);
}

#[test]
fn object_with_optional_property() {
    let parsed = parse("{ a: string; b?: number }").unwrap();
    let object = parsed.as_object().unwrap();

    let names: Vec<_> = object.properties.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(object.get("a").unwrap().value, string());
    assert!(!object.get("a").unwrap().optional);
    assert_eq!(object.get("b").unwrap().value, number());
    assert!(object.get("b").unwrap().optional);
    assert!(object.dynamic.is_none());
}

#[test]
fn nested_objects_and_index_signatures() {
    let parsed = parse("{ inner: { x: 'y' }; [key: string]: number; }").unwrap();
    let object = parsed.as_object().unwrap();

    let inner = object.get("inner").unwrap().value.as_object().unwrap();
    assert_eq!(inner.get("x").unwrap().value, Expression::literal("y"));
    assert_eq!(object.dynamic.as_deref(), Some(&number()));
}

#[test]
fn methods_keep_only_their_return_type() {
    let parsed = parse("{ get(id: string, opts?: { a: number }): Promise<string>; size(): number; }")
        .unwrap();
    let object = parsed.as_object().unwrap();

    assert_eq!(
        object.get("get").unwrap().value,
        Expression::promise(string())
    );
    assert_eq!(object.get("size").unwrap().value, number());
}

#[test]
fn readonly_modifier_and_quoted_keys() {
    let parsed = parse("{ readonly id: number; 'content-type'?: string; readonly: boolean }").unwrap();
    let object = parsed.as_object().unwrap();

    assert_eq!(object.get("id").unwrap().value, number());
    assert!(object.get("content-type").unwrap().optional);
    assert_eq!(
        object.get("readonly").unwrap().value,
        Expression::primitive(PrimitiveKind::Boolean)
    );
}

#[test]
fn malformed_property_fails() {
    let err = parse("{ a string }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedProperty);

    let err = parse("{ (x: number): void }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedProperty);
}

#[test]
fn later_duplicate_property_wins_in_place() {
    let parsed = parse("{ a: string; b: number; a: boolean }").unwrap();
    let object = parsed.as_object().unwrap();

    let names: Vec<_> = object.properties.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(
        object.get("a").unwrap().value,
        Expression::primitive(PrimitiveKind::Boolean)
    );
}

#[test]
fn partial_marks_every_property_optional() {
    let parsed = parse("Partial<{ a: string; b: number }>").unwrap();
    let object = parsed.as_object().unwrap();

    assert!(object.properties.values().all(|p| p.optional));
    assert_eq!(object.get("a").unwrap().value, string());
}

#[test]
fn partial_of_a_name_is_unknown() {
    assert_eq!(parse("Partial<Options>").unwrap(), Expression::Unknown);
}

#[test]
fn record_yields_dynamic_object() {
    let parsed = parse("Record<string, number[]>").unwrap();
    let object = parsed.as_object().unwrap();

    assert!(object.properties.is_empty());
    assert_eq!(object.dynamic.as_deref(), Some(&Expression::array(number())));
}

#[test]
fn promise_wraps_its_argument() {
    assert_eq!(
        parse("Promise<void | string>").unwrap(),
        Expression::Wrapped {
            kind: WrapperKind::Promise,
            inner: Box::new(Expression::Union {
                members: vec![Expression::Unknown, string()]
            }),
        }
    );
}

#[test]
fn references_resolve_through_scope() {
    let scope = FixedScope::new(&["Video", "Page"]);
    let parser = ExpressionParser::new(&scope);

    assert_eq!(
        parser.parse_fragment("Video[]").unwrap(),
        Expression::array(Expression::reference(scope.identity("Video")))
    );
    assert_eq!(
        parser.parse_fragment("Page<Video>").unwrap(),
        Expression::Reference {
            identity: scope.identity("Page"),
            argument: Some(Box::new(Expression::reference(scope.identity("Video")))),
        }
    );
}

#[test]
fn references_with_several_arguments_keep_unknown_argument() {
    let scope = FixedScope::new(&["Page"]);
    let parser = ExpressionParser::new(&scope);

    assert_eq!(
        parser.parse_fragment("Page<A, B>").unwrap(),
        Expression::Reference {
            identity: scope.identity("Page"),
            argument: Some(Box::new(Expression::Unknown)),
        }
    );
}

#[test]
fn scope_wins_over_builtin_forms() {
    let scope = FixedScope::new(&["Promise"]);
    let parser = ExpressionParser::new(&scope);

    let parsed = parser.parse_fragment("Promise<string>").unwrap();
    assert!(matches!(parsed, Expression::Reference { .. }));
}

#[test]
fn generic_placeholder() {
    let parser = ExpressionParser::new(&EmptyScope).with_generic(Some("T"));

    let object = parser.parse_fragment("{ items: T[] }").unwrap();
    assert_eq!(
        object.as_object().unwrap().get("items").unwrap().value,
        Expression::array(Expression::Generic)
    );
    assert_eq!(object.to_string(), "{ items: <generic>[]; }");
    assert_eq!(parse("T").unwrap(), Expression::Unknown);
}

#[test]
fn unsupported_shapes_are_unknown() {
    assert_eq!(parse("[string, number]").unwrap(), Expression::Unknown);
    assert_eq!(parse("keyof Foo").unwrap(), Expression::Unknown);
    assert_eq!(parse("(a: string) => void").unwrap(), Expression::Unknown);
    assert_eq!(parse("Unresolved").unwrap(), Expression::Unknown);
    assert_eq!(parse("Foo['bar']").unwrap(), Expression::Unknown);
}

#[test]
fn consumed_counts_stop_after_terminator() {
    let parser = ExpressionParser::new(&EmptyScope);
    let parsed = parser.parse("{ a: string; };\ntype Next = number;").unwrap();

    assert_eq!(parsed.consumed, "{ a: string; };".len());
}

#[test]
fn custom_forms_extend_the_registry() {
    struct ArrayForm;
    impl GenericForm for ArrayForm {
        fn expand(&self, parser: &ExpressionParser<'_>, arguments: &[&str]) -> Result<Expression> {
            match arguments {
                [element] => Ok(Expression::array(parser.parse_fragment(element)?)),
                _ => Ok(Expression::Unknown),
            }
        }
    }

    let mut forms = GenericForms::standard();
    forms.register("Array", ArrayForm);
    let parser = ExpressionParser::new(&EmptyScope).with_forms(&forms);

    assert_eq!(parser.parse_fragment("Array<string>").unwrap(), Expression::array(string()));
    assert_eq!(parse("Array<string>").unwrap(), Expression::Unknown);
}

#[test]
fn deep_nesting_is_bounded() {
    let depth = 2000;
    let text = format!("{}string{}", "(".repeat(depth), ")".repeat(depth));
    let err = parse(&text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
}

#[test]
fn serializes_with_type_tags() {
    let parsed = parse("{ a?: 'x' | number[] }").unwrap();
    let json = serde_json::to_value(&parsed).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "type": "object",
            "properties": {
                "a": {
                    "value": {
                        "type": "union",
                        "members": [
                            { "type": "literal", "value": "x" },
                            { "type": "array", "element": { "type": "primitive", "kind": "number" } }
                        ]
                    },
                    "optional": true
                }
            }
        })
    );
}

#[test]
fn display_renders_typescript_like_text() {
    let parsed = parse("{ a?: 'x' | number[]; b: Promise<string> }").unwrap();
    assert_eq!(
        parsed.to_string(),
        "{ a?: \"x\" | number[]; b: Promise<string>; }"
    );
}
