use querysmith::{Bindings, Statement, Value};

#[test]
fn named_placeholders_in_select() {
    let q = Statement::parse(r#"SELECT * FROM mytable WHERE name=:name AND age=:age AND status="A""#)
        .unwrap();
    assert_eq!(
        q.bind(vec![("name", Value::from("Name to put")), ("age", Value::from(12))]),
        r#"SELECT * FROM mytable WHERE name="Name to put" AND age=12 AND status="A""#
    );
}

#[test]
fn named_placeholders_in_update() {
    let q = Statement::parse(r#"UPDATE `test` SET description="abc", type_id=:type_id WHERE xyz=:xyz"#)
        .unwrap();
    assert_eq!(
        q.bind(vec![("type_id", Value::from("type")), ("xyz", Value::from(12))]),
        r#"UPDATE `test` SET description="abc", type_id="type" WHERE xyz=12"#
    );
}

#[test]
fn named_placeholders_in_delete() {
    let q = Statement::parse("DELETE FROM `test` WHERE (id >:id) AND (`status` =:status)").unwrap();
    assert_eq!(
        q.bind(vec![("id", Value::from(12)), ("status", Value::from("status_given"))]),
        r#"DELETE FROM `test` WHERE (id >12) AND (`status` ="status_given")"#
    );
}

#[test]
fn named_keys_may_carry_the_colon() {
    let q = Statement::parse("SELECT * FROM t WHERE a = :a AND b = :b").unwrap();
    assert_eq!(
        q.bind([(":a", 1), ("b", 2)]),
        "SELECT * FROM t WHERE a = 1 AND b = 2"
    );
}

#[test]
fn unknown_names_and_literals_stay() {
    let q = Statement::parse("SELECT * FROM t WHERE a = :a AND b = ':a' AND c = :missing").unwrap();
    assert_eq!(
        q.bind([("a", "x")]),
        r#"SELECT * FROM t WHERE a = "x" AND b = ':a' AND c = :missing"#
    );
}

#[test]
fn positional_placeholders_fill_in_order() {
    let q = Statement::parse("SELECT * FROM mytable WHERE name=? AND id = ?").unwrap();
    assert_eq!(
        q.bind(Bindings::positional(["aaaa", "bbbb", "cccc"])),
        r#"SELECT * FROM mytable WHERE name="aaaa" AND id = "bbbb""#
    );
    assert_eq!(
        q.bind(vec![Value::from("aaaa")]),
        r#"SELECT * FROM mytable WHERE name="aaaa" AND id = ?"#
    );
}

#[test]
fn bind_does_not_modify_the_statement() {
    let q = Statement::parse("SELECT * FROM t WHERE a = ?").unwrap();
    let bound = q.bind(vec![Value::Null]);
    assert_eq!(bound, "SELECT * FROM t WHERE a = NULL");
    assert_eq!(q.to_string(), "SELECT * FROM t WHERE a = ?");
}

#[test]
fn string_values_are_escaped() {
    let q = Statement::parse("SELECT * FROM t WHERE a = :a").unwrap();
    assert_eq!(
        q.bind([("a", "it\"s \\ here")]),
        r#"SELECT * FROM t WHERE a = "it\"s \\ here""#
    );
}

#[test]
fn json_bindings() {
    let q = Statement::parse("SELECT * FROM t WHERE a = :a AND b = :b").unwrap();
    let bindings = Bindings::from_json(serde_json::json!({ "a": 1, "b": null })).unwrap();
    assert_eq!(q.bind(bindings), "SELECT * FROM t WHERE a = 1 AND b = NULL");

    let q = Statement::parse("SELECT * FROM t WHERE a = ? AND b = ?").unwrap();
    let bindings = Bindings::from_json(serde_json::json!(["x", true])).unwrap();
    assert_eq!(q.bind(bindings), r#"SELECT * FROM t WHERE a = "x" AND b = TRUE"#);

    assert!(Bindings::from_json(serde_json::json!("scalar")).is_err());
    assert!(Bindings::from_json(serde_json::json!({ "a": [1, 2] })).is_err());
}
