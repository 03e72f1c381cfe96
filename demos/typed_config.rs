//! Mapping connection strings onto typed structs through serde.
//!
//! Run with: cargo run --example typed_config

use serde::{Deserialize, Serialize};
use serde_constring::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
enum Encrypt {
    Mandatory,
    Optional,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
struct SqlServer {
    server: String,
    database: String,
    #[serde(rename = "User Id")]
    user_id: String,
    password: Option<String>,
    encrypt: Encrypt,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = SqlServer {
        server: "tcp:db1,1433".to_string(),
        database: "orders".to_string(),
        user_id: "app".to_string(),
        password: Some("s3cr;t".to_string()),
        encrypt: Encrypt::Mandatory,
    };

    let text = to_string(&config)?;
    println!("Connection string:\n{}\n", text);

    let back: SqlServer = from_str(&text)?;
    assert_eq!(config, back);
    println!("✓ Round-trip successful");

    // Missing optional parameters deserialize as None
    let minimal: SqlServer =
        from_str("Server=localhost;Database=dev;User Id=sa;Encrypt=Optional")?;
    println!("\nMinimal: {:?}", minimal);

    Ok(())
}
