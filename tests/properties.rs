use proptest::prelude::*;
use sqli::prelude::*;
use std::collections::HashMap;

fn schema() -> Schema {
    Schema {
        tables: vec![
            TableDef::new("Item")
                .primitive("a", FieldType::Integer)
                .column("b", FieldType::Integer)
                .column("c", FieldType::Text)
                .column("d", FieldType::Timestamp),
        ],
    }
}

fn arb_conjunction() -> impl Strategy<Value = Conjunction> {
    prop_oneof![
        Just(Conjunction::None),
        Just(Conjunction::And),
        Just(Conjunction::Or),
    ]
}

fn arb_field() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("a"), Just("b"), Just("c"), Just("d")]
}

fn arb_comparison() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        Just(Predicate::Eq),
        Just(Predicate::Ne),
        Just(Predicate::Gt),
        Just(Predicate::Gte),
        Just(Predicate::Lt),
        Just(Predicate::Lte),
    ]
}

// Literal text never contains '?' so placeholder counting stays exact.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z;' ]{0,5}(drop)?[a-z;']{0,3}"
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (-2i64..3).prop_map(Value::Int),
        arb_text().prop_map(Value::String),
        arb_text().prop_map(Value::enumeration),
    ]
}

fn arb_membership() -> impl Strategy<Value = Predicate> {
    prop_oneof![Just(Predicate::In), Just(Predicate::NotIn)]
}

// One literal kind per list, as the emitter requires.
fn arb_list() -> impl Strategy<Value = Vec<Value>> {
    prop_oneof![
        prop::collection::vec(arb_text().prop_map(Value::String), 1..4),
        prop::collection::vec(arb_text().prop_map(Value::enumeration), 1..4),
        prop::collection::vec(
            prop_oneof![
                Just(Value::Null),
                (-2i64..3).prop_map(Value::Int),
                (-2.0f64..2.0).prop_map(Value::Float),
            ],
            1..4
        ),
    ]
}

fn arb_leaf() -> impl Strategy<Value = BuildingBlock> {
    prop_oneof![
        (arb_field(), arb_comparison(), arb_scalar())
            .prop_map(|(f, p, v)| BuildingBlock::path(KeyPath::field(f), p, v)),
        (arb_field(), arb_membership(), arb_list())
            .prop_map(|(f, p, items)| BuildingBlock::path(KeyPath::field(f), p, Value::Array(items))),
        arb_field().prop_map(|f| BuildingBlock::path(KeyPath::field(f), Predicate::IsNull, Value::Null)),
        (0usize..3).prop_map(|n| {
            let fragment = vec!["b = ?"; n.max(1)].join(" AND ");
            let fragment = if n == 0 { "b > 0".to_string() } else { fragment };
            let values = (0..n as i64).map(Value::Int).collect();
            BuildingBlock::raw(&fragment, Value::Array(values))
        }),
    ]
}

fn arb_block() -> impl Strategy<Value = BuildingBlock> {
    let leaf = (arb_leaf(), arb_conjunction()).prop_map(|(b, c)| b.with_conjunction(c));
    leaf.prop_recursive(4, 32, 4, |inner| {
        (prop::collection::vec(inner, 0..4), arb_conjunction())
            .prop_map(|(children, c)| BuildingBlock::sub(children).with_conjunction(c))
    })
}

fn arb_tree() -> impl Strategy<Value = Vec<BuildingBlock>> {
    prop::collection::vec(arb_block(), 0..5)
}

fn compile(mut blocks: Vec<BuildingBlock>, dialect: Dialect) -> CompiledCondition {
    let schema = schema();
    let aliases = HashMap::new();
    let ctx = FilterContext::new(&schema, "Item", &aliases);
    ConditionCompiler::new(ctx)
        .with_dialect(dialect)
        .compile(&mut blocks)
        .expect("generated trees only reference declared fields")
}

proptest! {
    #[test]
    fn placeholders_match_bindings(tree in arb_tree()) {
        let compiled = compile(tree, Dialect::Question);
        prop_assert_eq!(compiled.sql.matches('?').count(), compiled.params.len());
        prop_assert_eq!(compiled.placeholders, compiled.params.len());
    }

    #[test]
    fn postgres_placeholders_are_sequential(tree in arb_tree()) {
        let compiled = compile(tree, Dialect::Postgres);
        let numbers: Vec<usize> = compiled
            .sql
            .split_whitespace()
            .filter_map(|t| t.strip_prefix('$'))
            .map(|n| n.parse().expect("numbered placeholder"))
            .collect();
        let expected: Vec<usize> = (1..=compiled.params.len()).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn no_group_or_fragment_starts_with_conjunction(tree in arb_tree()) {
        let sql = compile(tree, Dialect::Question).sql;
        prop_assert!(!sql.starts_with("AND ") && !sql.starts_with("OR "), "{}", sql);
        prop_assert!(!sql.contains("( AND ") && !sql.contains("( OR "), "{}", sql);
        prop_assert!(!sql.contains("(  )"), "{}", sql);
    }

    #[test]
    fn inline_literals_are_defused(tree in arb_tree()) {
        let sql = compile(tree, Dialect::Question).sql;
        prop_assert!(!sql.contains("drop"), "{}", sql);
        prop_assert!(!sql.contains(';'), "{}", sql);
        // quotes inside literals are doubled, so they always pair up
        prop_assert_eq!(sql.matches('\'').count() % 2, 0, "{}", sql);
    }

    #[test]
    fn filtering_is_idempotent(tree in arb_tree()) {
        let schema = schema();
        let aliases = HashMap::new();
        let ctx = FilterContext::new(&schema, "Item", &aliases);

        let mut once = tree;
        filter_blocks(&mut once, &ctx).unwrap();
        let mut twice = once.clone();
        filter_blocks(&mut twice, &ctx).unwrap();
        prop_assert_eq!(once, twice);
    }
}
