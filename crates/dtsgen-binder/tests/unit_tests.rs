//! Import/export scanning of declaration units.


use dtsgen_common::ErrorKind;
use dtsgen_common::diagnostics::diagnostic_codes;
use dtsgen_parser::Expression;
use fixture::Fixture;

#[test]
fn direct_exports_and_locals() {
    let fixture = Fixture::new(&[(
        "a.d.ts",
        "type Hidden = string;\nexport type Shown = Hidden;\nexport declare interface Api {\n    shown: Shown;\n}\nexport declare enum Mode {\n    A = 0,\n    B = 1\n}\n",
    )]);
    let store = fixture.store();
    let unit = store.get(fixture.path("a.d.ts")).unwrap();

    let exports = unit.exports(&store).unwrap();
    let names: Vec<_> = exports.names.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Shown", "Api", "Mode"]);
    assert!(exports.default.is_none());

    let hidden = unit.declaration("Hidden", &store).unwrap().unwrap();
    assert!(!hidden.is_exported());
    assert_eq!(
        unit.export("Hidden", &store).unwrap_err().kind(),
        ErrorKind::UnresolvedImport
    );
    assert_eq!(unit.declarations(&store).unwrap().len(), 4);
}

#[test]
fn wildcard_reexport_merges_target_exports() {
    let fixture = Fixture::new(&[
        ("x.d.ts", "export type X1 = string;\nexport type X2 = number;\n"),
        ("index.d.ts", "export type Own = boolean;\nexport * from './x.js';\n"),
    ]);
    let store = fixture.store();
    let index = store.get(fixture.path("index.d.ts")).unwrap();

    let exports = index.exports(&store).unwrap();
    assert_eq!(exports.len(), 3);
    assert_eq!(
        exports.get("X1"),
        Some(&fixture.identity("x.d.ts", "X1", false))
    );
    assert_eq!(
        exports.get("Own"),
        Some(&fixture.identity("index.d.ts", "Own", false))
    );
}

#[test]
fn named_reexport_with_alias() {
    let fixture = Fixture::new(&[
        ("x.d.ts", "export type Original = string;\n"),
        ("index.d.ts", "export { Original as Renamed } from './x.js';\n"),
    ]);
    let store = fixture.store();
    let index = store.get(fixture.path("index.d.ts")).unwrap();

    let original = fixture.identity("x.d.ts", "Original", false);
    assert_eq!(index.export("Renamed", &store).unwrap(), original);
    assert_eq!(index.export("Original", &store).unwrap(), original);
    assert_eq!(index.aliases().get("Renamed"), Some(&original));
}

#[test]
fn import_aliases_and_default_imports() {
    let fixture = Fixture::new(&[
        (
            "player.d.ts",
            "export default class Player<T> extends EventEmitter {\n    play(): void;\n}\nexport type State = 'playing' | 'paused';\n",
        ),
        (
            "index.d.ts",
            "import Player from './player.js';\nimport { type State as PlayerState } from './player.js';\nexport type Status = {\n    player: Player;\n    state: PlayerState;\n};\n",
        ),
    ]);
    let store = fixture.store();
    let index = store.get(fixture.path("index.d.ts")).unwrap();

    let player = fixture.identity("player.d.ts", "Player", true);
    let state = fixture.identity("player.d.ts", "State", false);

    let imports = index.imports(&store).unwrap();
    assert_eq!(imports.get("Player"), Some(&player));
    assert_eq!(imports.get("PlayerState"), Some(&state));

    let status = store.resolve(fixture.path("index.d.ts"), "Status").unwrap();
    let object = status.expression.as_object().unwrap();
    assert_eq!(object.get("player").unwrap().value, Expression::reference(player));
    assert_eq!(object.get("state").unwrap().value, Expression::reference(state));
}

#[test]
fn default_export_statement_promotes_local() {
    let fixture = Fixture::new(&[
        ("config.d.ts", "interface Config {\n    port: number;\n}\nexport default Config;\n"),
        ("index.d.ts", "import Settings from './config.js';\nexport type Wrapped = Settings[];\n"),
    ]);
    let store = fixture.store();

    let config = store.get(fixture.path("config.d.ts")).unwrap();
    let identity = config.export("default", &store).unwrap();
    assert_eq!(identity, fixture.identity("config.d.ts", "Config", false));

    let wrapped = store.resolve(fixture.path("index.d.ts"), "Wrapped").unwrap();
    assert_eq!(
        wrapped.expression,
        Expression::array(Expression::reference(identity))
    );
}

#[test]
fn default_export_of_unknown_name_is_malformed() {
    let fixture = Fixture::new(&[("a.d.ts", "export default Missing;\n")]);
    let store = fixture.store();
    let unit = store.get(fixture.path("a.d.ts")).unwrap();

    let err = unit.exports(&store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeclaration);
}

#[test]
fn default_export_of_exported_name_is_malformed() {
    let fixture = Fixture::new(&[("a.d.ts", "export type A = string;\nexport default A;\n")]);
    let store = fixture.store();
    let unit = store.get(fixture.path("a.d.ts")).unwrap();

    let err = unit.exports(&store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeclaration);
}

#[test]
fn local_export_lists() {
    let fixture = Fixture::new(&[(
        "a.d.ts",
        "type A = string;\ntype B = number;\nexport { A, B as Count };\nexport {};\n",
    )]);
    let store = fixture.store();
    let unit = store.get(fixture.path("a.d.ts")).unwrap();

    assert_eq!(
        unit.export("A", &store).unwrap(),
        fixture.identity("a.d.ts", "A", false)
    );
    assert_eq!(
        unit.export("Count", &store).unwrap(),
        fixture.identity("a.d.ts", "B", false)
    );
}

#[test]
fn alias_to_unexported_identity_fails() {
    let fixture = Fixture::new(&[
        ("x.d.ts", "export type X = string;\n"),
        (
            "a.d.ts",
            "import { X as Local } from './x.js';\nexport type A = Local;\n",
        ),
        ("b.d.ts", "import { Local } from './a.js';\nexport type B = Local;\n"),
    ]);
    let store = fixture.store();
    let a = store.get(fixture.path("a.d.ts")).unwrap();
    a.imports(&store).unwrap();

    let err = a.export("Local", &store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedAlias);
}

#[test]
fn skipped_constructs_are_recorded() {
    let fixture = Fixture::new(&[
        ("x.d.ts", "export type X = string;\n"),
        (
            "a.d.ts",
            "import { EventEmitter } from 'events';\nimport * as x from './x.js';\nimport './side.js';\nexport * as api from './x.js';\nexport { Thing } from 'library';\nexport declare function start(): void;\nexport type A = string;\n",
        ),
    ]);
    let store = fixture.store();
    let unit = store.get(fixture.path("a.d.ts")).unwrap();

    unit.imports(&store).unwrap();
    unit.exports(&store).unwrap();

    let codes: Vec<u32> = unit.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![
            diagnostic_codes::SKIPPING_LIBRARY_IMPORT,
            diagnostic_codes::SKIPPING_NAMESPACE_IMPORT,
            diagnostic_codes::SKIPPING_SIDE_EFFECT_IMPORT,
            diagnostic_codes::SKIPPING_WILDCARD_RENAME,
            diagnostic_codes::SKIPPING_LIBRARY_REEXPORT,
            diagnostic_codes::SKIPPING_VALUE_DECLARATION,
        ]
    );
    assert_eq!(
        unit.diagnostics()[0].message_text,
        "Skipping library import: events"
    );
    assert_eq!(unit.exports(&store).unwrap().len(), 1);
    // skipped targets are never loaded
    assert_eq!(store.len(), 1);
}

#[test]
fn unrecognized_statement_is_malformed() {
    let fixture = Fixture::new(&[("a.d.ts", "export type A = string;\nnamespace Foo {}\n")]);
    let store = fixture.store();
    let unit = store.get(fixture.path("a.d.ts")).unwrap();

    let err = unit.exports(&store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeclaration);
}

#[test]
fn missing_named_import_is_unresolved() {
    let fixture = Fixture::new(&[
        ("x.d.ts", "export type X = string;\n"),
        ("a.d.ts", "import { Y } from './x.js';\nexport type A = Y;\n"),
    ]);
    let store = fixture.store();
    let unit = store.get(fixture.path("a.d.ts")).unwrap();

    let err = unit.imports(&store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedImport);
}

#[test]
fn mutual_imports_resolve() {
    let fixture = Fixture::new(&[
        ("a.d.ts", "import { B } from './b.js';\nexport type A = {\n    b: B;\n};\n"),
        ("b.d.ts", "import { A } from './a.js';\nexport type B = {\n    a?: A;\n};\n"),
    ]);
    let store = fixture.store();

    let a = store.resolve(fixture.path("a.d.ts"), "A").unwrap();
    let b = store.resolve(fixture.path("b.d.ts"), "B").unwrap();

    assert_eq!(
        a.expression.references(),
        vec![&fixture.identity("b.d.ts", "B", false)]
    );
    assert_eq!(
        b.expression.references(),
        vec![&fixture.identity("a.d.ts", "A", false)]
    );
}

#[test]
fn mutual_wildcard_reexports_terminate() {
    let fixture = Fixture::new(&[
        ("a.d.ts", "export type A = string;\nexport * from './b.js';\n"),
        ("b.d.ts", "export * from './a.js';\nexport type B = number;\n"),
    ]);
    let store = fixture.store();
    let a = store.get(fixture.path("a.d.ts")).unwrap();

    let exports = a.exports(&store).unwrap();
    assert!(exports.get("A").is_some());
    assert!(exports.get("B").is_some());
}

fn mutual_wildcard_fixture() -> Fixture {
    Fixture::new(&[
        ("a.d.ts", "export * from './b.js';\nexport type A = string;\n"),
        ("b.d.ts", "export * from './a.js';\nexport type B = number;\n"),
    ])
}

#[test]
fn mutual_wildcard_tables_are_complete_in_either_load_order() {
    let fixture = mutual_wildcard_fixture();
    let a_id = fixture.identity("a.d.ts", "A", false);
    let b_id = fixture.identity("b.d.ts", "B", false);

    let a_first = fixture.store();
    let a = a_first.get(fixture.path("a.d.ts")).unwrap();
    let b = a_first.get(fixture.path("b.d.ts")).unwrap();
    let a_table = a.exports(&a_first).unwrap().clone();
    let b_table = b.exports(&a_first).unwrap().clone();
    assert_eq!(b.export("A", &a_first).unwrap(), a_id);

    let b_first = fixture.store();
    let b2 = b_first.get(fixture.path("b.d.ts")).unwrap();
    let a2 = b_first.get(fixture.path("a.d.ts")).unwrap();
    assert_eq!(b2.export("A", &b_first).unwrap(), a_id);
    assert_eq!(a2.export("B", &b_first).unwrap(), b_id);

    for table in [
        &a_table,
        &b_table,
        a2.exports(&b_first).unwrap(),
        b2.exports(&b_first).unwrap(),
    ] {
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some(&a_id));
        assert_eq!(table.get("B"), Some(&b_id));
    }
    assert_eq!(&a_table, a2.exports(&b_first).unwrap());
    assert_eq!(&b_table, b2.exports(&b_first).unwrap());
}

#[test]
fn wildcard_chain_through_a_cycle_is_complete() {
    let fixture = Fixture::new(&[
        ("a.d.ts", "export * from './b.js';\nexport type A = string;\n"),
        ("b.d.ts", "export * from './c.js';\nexport type B = number;\n"),
        ("c.d.ts", "export * from './a.js';\nexport type C = boolean;\n"),
    ]);
    let store = fixture.store();
    store.get(fixture.path("a.d.ts")).unwrap().exports(&store).unwrap();

    for file in ["a.d.ts", "b.d.ts", "c.d.ts"] {
        let unit = store.get(fixture.path(file)).unwrap();
        let mut names: Vec<_> = unit
            .exports(&store)
            .unwrap()
            .names
            .keys()
            .cloned()
            .collect();
        names.sort();
        assert_eq!(names, vec!["A", "B", "C"], "{file}");
    }
}

#[test]
fn naming_cycle_is_unresolved() {
    let fixture = Fixture::new(&[
        ("a.d.ts", "export { B } from './b.js';\nexport type A = string;\n"),
        ("b.d.ts", "export { A } from './a.js';\nexport type B = number;\n"),
    ]);
    let store = fixture.store();
    let a = store.get(fixture.path("a.d.ts")).unwrap();

    let err = a.exports(&store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedImport);

    // deterministic on retry
    let err = a.exports(&store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedImport);
}

#[test]
fn failed_scan_does_not_repeat_diagnostics() {
    let fixture = Fixture::new(&[(
        "a.d.ts",
        "export declare function start(): void;\nexport type A = string;\nnamespace Broken {}\n",
    )]);
    let store = fixture.store();
    let unit = store.get(fixture.path("a.d.ts")).unwrap();

    assert!(unit.exports(&store).is_err());
    assert!(unit.exports(&store).is_err());
    let codes: Vec<u32> = unit.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![diagnostic_codes::SKIPPING_VALUE_DECLARATION]);
    assert_eq!(
        unit.declarations(&store).unwrap_err().kind(),
        ErrorKind::MalformedDeclaration
    );
}

#[test]
fn later_declarations_overwrite_earlier_ones() {
    let fixture = Fixture::new(&[
        ("x.d.ts", "export type Value = string;\n"),
        (
            "a.d.ts",
            "export * from './x.js';\nexport type Value = number;\n",
        ),
    ]);
    let store = fixture.store();
    let unit = store.get(fixture.path("a.d.ts")).unwrap();

    assert_eq!(
        unit.export("Value", &store).unwrap(),
        fixture.identity("a.d.ts", "Value", false)
    );
    let resolved = store.resolve(fixture.path("a.d.ts"), "Value").unwrap();
    assert_eq!(resolved.expression.to_string(), "number");
}
