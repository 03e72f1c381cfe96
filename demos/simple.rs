//! Basic connection string serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde_constring::{decode, encode};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let text = "Provider=SQLOLEDB; Data Source = db1 ;Password='p;ss \"word\"'";

    // Decode into ordered pairs
    let pairs = decode(text)?;
    for (key, value) in &pairs {
        println!("{:>12} -> {}", key, value);
    }

    // Encode back into canonical form
    let canonical = encode(pairs.iter().map(|(k, v)| (k, v)))?;
    println!("\nCanonical:\n{}\n", canonical);

    assert_eq!(decode(&canonical)?, pairs);
    println!("✓ Round-trip successful");

    Ok(())
}
