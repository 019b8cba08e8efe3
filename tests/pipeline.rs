use pretty_assertions::assert_eq;
use sqli::prelude::*;
use std::collections::HashMap;

const SCHEMA: &str = r#"
[[tables]]
name = "Order"

[[tables.columns]]
name = "id"
type = "integer"
primitive = true

[[tables.columns]]
name = "status"
type = "enum"

[[tables.columns]]
name = "total"
type = "decimal"

[[tables.columns]]
name = "placed"
type = "timestamp"

[[tables]]
name = "Customer"

[[tables.columns]]
name = "name"
type = "text"

[[tables.columns]]
name = "age"
type = "integer"
"#;

fn compile_json(json: &str, dialect: Dialect) -> SqliResult<CompiledCondition> {
    let schema = Schema::from_toml(SCHEMA)?;
    let aliases = HashMap::from([("c".to_string(), "Customer".to_string())]);
    let ctx = FilterContext::new(&schema, "Order", &aliases);
    let mut blocks: Vec<BuildingBlock> = serde_json::from_str(json)?;
    ConditionCompiler::new(ctx).with_dialect(dialect).compile(&mut blocks)
}

#[test]
fn test_json_tree_end_to_end() {
    let json = r#"[
        {"key": "id", "predicate": "EQ", "value": 0},
        {"conjunction": "AND", "key": "status", "predicate": "IN", "value": [{"enum": "OPEN"}, {"enum": "HELD"}]},
        {"conjunction": "AND", "predicate": "SUB", "sub_list": [
            {"key": "c.age", "predicate": "GTE", "value": 21},
            {"conjunction": "OR", "key": "c.name", "predicate": "EQ", "value": "Ann"},
            {"conjunction": "OR", "predicate": "SUB", "sub_list": [
                {"key": "total", "predicate": "GT", "value": null}
            ]}
        ]},
        {"conjunction": "AND", "key": "placed", "predicate": "LT", "value": "2024-06-01"},
        {"conjunction": "OR", "key": "c.id > ? AND c.id < ?", "predicate": "X", "value": [10, 20]}
    ]"#;

    let compiled = compile_json(json, Dialect::Question).unwrap();
    assert_eq!(
        compiled.sql,
        "status IN ( 'OPEN', 'HELD' ) AND ( c.age >= ? OR c.name = ? ) AND placed < ? OR c.id > ? AND c.id < ?"
    );
    assert_eq!(compiled.params.len(), 5);
    assert_eq!(compiled.params[0], Value::Int(21));
    assert_eq!(compiled.params[1], Value::from("Ann"));
    assert!(matches!(compiled.params[2], Value::Date(_)));
    assert_eq!(&compiled.params[3..], &[Value::Int(10), Value::Int(20)]);
}

#[test]
fn test_json_tree_postgres() {
    let json = r#"[
        {"key": "total", "predicate": "GT", "value": 9.5},
        {"conjunction": "AND", "key": "c.name", "predicate": "NOT_IN", "value": ["x;y", "", "O'Hara"]},
        {"conjunction": "AND", "key": "c.name", "predicate": "NE", "value": "O'Hara"}
    ]"#;

    let compiled = compile_json(json, Dialect::Postgres).unwrap();
    assert_eq!(
        compiled.sql,
        "total > $1 AND c.name NOT IN ( 'x y', 'O''Hara' ) AND c.name <> $2"
    );
    assert_eq!(compiled.params, vec![Value::Float(9.5), Value::from("O'Hara")]);
}

#[test]
fn test_enum_names_from_json_are_defused() {
    let json = r#"[
        {"key": "status", "predicate": "IN", "value": [{"enum": "A"}, {"enum": "x'); drop table t;--"}]}
    ]"#;
    let compiled = compile_json(json, Dialect::Question).unwrap();
    assert_eq!(compiled.sql, "status IN ( 'A', 'x'')    table t --' )");
    assert!(!compiled.sql.contains("drop") && !compiled.sql.contains(';'));
}

#[test]
fn test_everything_pruned_yields_empty_fragment() {
    let json = r#"[
        {"key": "id", "predicate": "EQ", "value": 0},
        {"conjunction": "AND", "predicate": "SUB", "sub_list": [
            {"key": "total", "predicate": "EQ"}
        ]}
    ]"#;
    let compiled = compile_json(json, Dialect::Question).unwrap();
    assert!(compiled.is_empty());
    assert!(compiled.params.is_empty());
}

#[test]
fn test_schema_error_aborts_compilation() {
    let json = r#"[
        {"key": "total", "predicate": "GT", "value": 1},
        {"conjunction": "AND", "key": "c.email", "predicate": "EQ", "value": "a@b.c"}
    ]"#;
    let err = compile_json(json, Dialect::Question).unwrap_err();
    assert_eq!(err.to_string(), "Property of Customer not exists: email");
    assert!(err.is_construction_error());
}

#[test]
fn test_compiled_condition_serializes() {
    let json = r#"[{"key": "status", "predicate": "EQ", "value": {"enum": "OPEN"}}]"#;
    let compiled = compile_json(json, Dialect::Question).unwrap();
    let out = serde_json::to_value(&compiled).unwrap();
    assert_eq!(
        out,
        serde_json::json!({"sql": "status = ?", "params": ["OPEN"], "placeholders": 1})
    );
}
