//! Basic usage example for querysmith
//!
//! Run with: cargo run --example basic -p querysmith

use querysmith::{Bindings, CombinationMode, Direction, NamedQueries, QueryError, Statement, Value};

fn main() -> Result<(), QueryError> {
    // Parse a hand-written statement
    let mut stmt = Statement::parse("SELECT id, title FROM posts WHERE published = 1")?;
    println!("kind:    {:?}", stmt.kind());
    println!("columns: {:?}", stmt.columns()?);

    // Narrow it down
    stmt.column("author_id")?
        .left_join("authors", Some("posts.author_id = authors.id"))?
        .where_bind("authors.name LIKE ?%", "Ann")?
        .order_by_dir("created_at", Direction::Descending)?
        .page(2, 20)?;
    println!("select:  {stmt}");

    // Swap the filter entirely
    stmt.where_with("id", vec![1, 2, 3], CombinationMode::Replace)?;
    println!("replace: {stmt}");

    // Insert with typed rows and an upsert tail
    let mut insert = Statement::parse("INSERT INTO tags (name, weight) VALUES ('rust', 10)")?;
    insert
        .values(vec![Value::from("sql"), Value::from(3)])?
        .on_duplicate_key_update(["weight"])?;
    println!("insert:  {insert}");

    // Placeholders are substituted at render time only
    let update = Statement::parse("UPDATE posts SET title = :title WHERE id = :id")?;
    println!(
        "bind:    {}",
        update.bind(Bindings::named([("title", Value::from("Hello")), ("id", Value::from(7))]))
    );

    // Nested selects
    let outer = Statement::parse("SELECT * FROM posts WHERE author_id IN (SELECT id FROM authors)")?;
    println!("sub #1:  {}", outer.subquery(1)?);

    // Named queries resolve through an application-supplied function
    NamedQueries::configure(|name| format!("SELECT * FROM {name}"));
    println!("named:   {}", Statement::named("drafts")?);
    NamedQueries::reset();

    Ok(())
}
