use querysmith::CombinationMode::{Append, Prepend, Replace};
use querysmith::{JoinKind, Params, Statement, Value};

const UPDATE: &str = "UPDATE `test` SET description='abc', type_id=10";

fn parse(sql: &str) -> Statement {
    Statement::parse(sql).unwrap()
}

// ==================== UPDATE ====================

#[test]
fn update_add_set_pair() {
    let mut q = parse(UPDATE);
    q.set(("abc", 12)).unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE `test` SET description='abc', type_id=10, `abc` = 12"
    );
}

#[test]
fn update_add_set_expression() {
    let mut q = parse(UPDATE);
    q.set("abc=12").unwrap();
    assert_eq!(q.to_string(), "UPDATE `test` SET description='abc', type_id=10, `abc`=12");
}

#[test]
fn update_add_set_list() {
    let mut q = parse("UPDATE `test` SET description='abc', type_id=10 WHERE xyz=10");
    q.set(vec![("abc", Value::from(12)), ("def", Value::from("a"))]).unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE `test` SET description='abc', type_id=10, `abc` = 12, `def` = \"a\" WHERE xyz=10"
    );
}

#[test]
fn update_replace_set() {
    let mut q = parse("UPDATE `test` SET description='abc', type_id=10 WHERE xyz=10");
    q.set_with("abc=12", Replace).unwrap();
    assert_eq!(q.to_string(), "UPDATE `test` SET `abc`=12 WHERE xyz=10");
}

#[test]
fn update_table() {
    let mut q = parse(UPDATE);
    q.table("abc").unwrap();
    assert_eq!(q.to_string(), "UPDATE `abc` SET description='abc', type_id=10");

    let mut q = parse(UPDATE);
    q.table_with("abc", Append).unwrap();
    assert_eq!(q.to_string(), "UPDATE `test` , `abc` SET description='abc', type_id=10");
}

#[test]
fn update_joins() {
    let mut q = parse(UPDATE);
    q.inner_join("abc", None).unwrap();
    assert_eq!(q.to_string(), "UPDATE `test` INNER JOIN `abc` SET description='abc', type_id=10");

    let mut q = parse(UPDATE);
    q.inner_join("abc", Some("test.id = abc.idTest")).unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE `test` INNER JOIN `abc` ON `test`.`id` = `abc`.`idTest` SET description='abc', type_id=10"
    );

    let mut q = parse("UPDATE `test` SET description='abc', type_id=10 WHERE xy > 10");
    q.left_join("abc", Some("test.id = abc.idTest")).unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE `test` LEFT JOIN `abc` ON `test`.`id` = `abc`.`idTest` SET description='abc', type_id=10 WHERE xy > 10"
    );

    let mut q = parse("UPDATE `test` SET description='abc', type_id=10 WHERE xy > 10");
    q.right_join("abc", Some("test.id = abc.idTest")).unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE `test` RIGHT JOIN `abc` ON `test`.`id` = `abc`.`idTest` SET description='abc', type_id=10 WHERE xy > 10"
    );
}

#[test]
fn update_join_onto_existing_chain() {
    let sql = "UPDATE `test` LEFT JOIN x ON test.x_id = x.id SET description='abc', type_id=10";

    let mut q = parse(sql);
    q.left_join("abc", Some("test.id = abc.idTest")).unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE (`test` LEFT JOIN x ON test.x_id = x.id) LEFT JOIN `abc` ON `test`.`id` = `abc`.`idTest` SET description='abc', type_id=10"
    );

    let mut q = parse(sql);
    q.join_with(JoinKind::Left, "abc", Some("test.id = abc.idTest"), Prepend)
        .unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE `abc` LEFT JOIN (`test` LEFT JOIN x ON test.x_id = x.id) ON `test`.`id` = `abc`.`idTest` SET description='abc', type_id=10"
    );
}

#[test]
fn update_where() {
    let mut q = parse(UPDATE);
    q.where_("status = 1").unwrap();
    assert_eq!(q.to_string(), format!("{UPDATE} WHERE `status` = 1"));

    let mut q = parse("UPDATE `test` SET description='abc', type_id=10 WHERE id > 10");
    q.where_(vec![("status", Value::from(1)), ("xyz", Value::from("abc"))])
        .unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE `test` SET description='abc', type_id=10 WHERE (id > 10) AND (`status` = 1 AND `xyz` = \"abc\")"
    );

    let mut q = parse(UPDATE);
    q.where_bind("status", 1).unwrap();
    assert_eq!(q.to_string(), format!("{UPDATE} WHERE `status` = 1"));
}

#[test]
fn update_where_modes() {
    let sql = "UPDATE `test` SET description='abc', type_id=10 WHERE id > 10";

    let mut q = parse(sql);
    q.where_with("status = 1", Params::None, Prepend).unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE `test` SET description='abc', type_id=10 WHERE (`status` = 1) AND (id > 10)"
    );

    let mut q = parse(sql);
    q.where_with("status = 1", Params::None, Replace).unwrap();
    q.where_("xyz = 1").unwrap();
    assert_eq!(
        q.to_string(),
        "UPDATE `test` SET description='abc', type_id=10 WHERE (`status` = 1) AND (`xyz` = 1)"
    );
}

#[test]
fn update_limit_and_order() {
    let mut q = parse(UPDATE);
    q.limit(10).unwrap();
    assert_eq!(q.to_string(), format!("{UPDATE} LIMIT 10"));

    let mut q = parse(UPDATE);
    q.order_by("id").unwrap().limit(1).unwrap();
    assert_eq!(q.to_string(), format!("{UPDATE} ORDER BY `id` LIMIT 1"));
}

#[test]
fn update_rejects_select_only_operations() {
    let mut q = parse(UPDATE);
    assert!(q.column("a").unwrap_err().is_unsupported());
    assert!(q.from("a").unwrap_err().is_unsupported());
    assert!(q.page(1, 10).unwrap_err().is_unsupported());
    assert!(q.on_duplicate_key_update("a").unwrap_err().is_unsupported());
}

// ==================== DELETE ====================

#[test]
fn delete_columns() {
    let mut q = parse("DELETE FROM `test`");
    q.column("test.*").unwrap();
    assert_eq!(q.to_string(), "DELETE `test`.* FROM `test`");

    let mut q = parse("DELETE `test`.* FROM `test`");
    q.column_with("test112.*", Replace).unwrap();
    assert_eq!(q.to_string(), "DELETE `test112`.* FROM `test`");
}

#[test]
fn delete_tables() {
    let mut q = parse("DELETE FROM `test`");
    q.from("abc").unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `abc`");

    let mut q = parse("DELETE FROM `test`");
    q.from_with("abc", Append).unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `test` , `abc`");
}

#[test]
fn delete_joins() {
    let mut q = parse("DELETE FROM `test`");
    q.inner_join("abc", None).unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `test` INNER JOIN `abc`");

    let mut q = parse("DELETE FROM `test`");
    q.inner_join("abc", Some("test.id = abc.idTest")).unwrap();
    assert_eq!(
        q.to_string(),
        "DELETE FROM `test` INNER JOIN `abc` ON `test`.`id` = `abc`.`idTest`"
    );

    let mut q = parse("DELETE FROM `test`");
    q.left_join("abc", Some("test.id = abc.idTest")).unwrap();
    assert_eq!(
        q.to_string(),
        "DELETE FROM `test` LEFT JOIN `abc` ON `test`.`id` = `abc`.`idTest`"
    );
}

#[test]
fn delete_join_onto_existing_chain() {
    let sql = "DELETE FROM `test` LEFT JOIN x ON test.x_id = x.id";

    let mut q = parse(sql);
    q.left_join("abc", Some("test.id = abc.idTest")).unwrap();
    assert_eq!(
        q.to_string(),
        "DELETE FROM (`test` LEFT JOIN x ON test.x_id = x.id) LEFT JOIN `abc` ON `test`.`id` = `abc`.`idTest`"
    );

    let mut q = parse(sql);
    q.join_with(JoinKind::Left, "abc", Some("test.id = abc.idTest"), Prepend)
        .unwrap();
    assert_eq!(
        q.to_string(),
        "DELETE FROM `abc` LEFT JOIN (`test` LEFT JOIN x ON test.x_id = x.id) ON `test`.`id` = `abc`.`idTest`"
    );
}

#[test]
fn delete_where() {
    let mut q = parse("DELETE FROM `test`");
    q.where_("status = 1").unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `test` WHERE `status` = 1");

    let mut q = parse("DELETE FROM `test` WHERE id > 10");
    q.where_("status = 1").unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `test` WHERE (id > 10) AND (`status` = 1)");

    let mut q = parse("DELETE FROM `test` WHERE id > 10");
    q.where_with("status = 1", Params::None, Prepend).unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `test` WHERE (`status` = 1) AND (id > 10)");

    let mut q = parse("DELETE FROM `test` WHERE id > 10");
    q.where_with("status = 1", Params::None, Replace).unwrap();
    q.where_("xyz = 1").unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `test` WHERE (`status` = 1) AND (`xyz` = 1)");

    let mut q = parse("DELETE FROM `test`");
    q.where_bind("status", 1).unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `test` WHERE `status` = 1");
}

#[test]
fn delete_limit() {
    let mut q = parse("DELETE FROM `test`");
    q.limit(10).unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `test` LIMIT 10");
}

#[test]
fn delete_rejects_other_operations() {
    let mut q = parse("DELETE FROM `test`");
    assert!(q.set(("a", 1)).unwrap_err().is_unsupported());
    assert!(q.group_by("a").unwrap_err().is_unsupported());
    assert!(q.having("a > 1").unwrap_err().is_unsupported());
    assert!(q.table("a").unwrap_err().is_unsupported());
}

// ==================== TRUNCATE ====================

#[test]
fn truncate_renders_and_rejects_mutation() {
    let mut q = parse("truncate `dates`;");
    assert_eq!(q.to_string(), "TRUNCATE TABLE `dates`");
    let err = q.table("aaa").unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(q.to_string(), "TRUNCATE TABLE `dates`");
}
