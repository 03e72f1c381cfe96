//! Working with the ordered ConnectionString store.
//!
//! Run with: cargo run --example store

use serde_constring::{connection_string, ConnectionOptions, ConnectionString, KeyFormat};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Keys are title-cased on the way in and on lookup
    let mut cs = ConnectionString::parse("provider=SQLOLEDB;user id=sa;provider=ignored")?;
    println!("Parsed: {}", cs);
    println!("User Id: {:?}", cs.get("USER ID"));

    cs.insert("Password", "a;b")?;
    cs.update([("timeout", "30"), ("user id", "admin")])?;
    println!("Updated: {}\n", cs);

    // Rename keys for a different driver
    cs.translate([("User Id", "uid"), ("Password", "pwd")], false)?;
    println!("Translated: {}\n", cs);

    // Upper-case keys, no priority keys
    let options = ConnectionOptions::new()
        .with_key_format(KeyFormat::Upper)
        .without_priority_keys();
    let upper = ConnectionString::parse_with_options("Provider=a;provider=b", options)?;
    println!("Upper: {}", upper);

    let built = connection_string! {
        "Server" => "db1",
        "Database" => "orders",
    }?;
    println!("Built: {}", built);

    Ok(())
}
