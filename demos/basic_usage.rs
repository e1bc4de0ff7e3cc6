//! Basic usage example for the HOCON parser
//!
//! This example parses a configuration with nested objects, substitutions
//! and an in-memory include, then reads it back through typed getters,
//! native values and serde.

use hocon_parser::{ConfigFactory, HoconError, MapIncludeHandler, NativeValue};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ServerConfig {
    name: String,
    port: u16,
    debug: bool,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    host: String,
    port: u16,
    username: String,
    pool_size: u32,
}

#[derive(Debug, Deserialize)]
struct AppConfig {
    server: ServerConfig,
    database: DatabaseConfig,
}

fn main() -> Result<(), HoconError> {
    let text = r#"
        server {
            name = "my-app"
            port = 8080
            debug = off
        }

        database {
            host = localhost
            port = 5432
            username = admin
            include "pool"
        }

        connection_string = ${database.username}"@"${database.host}":"${database.port}
    "#;

    let handler = MapIncludeHandler::new().with_document("pool", "pool_size = 16\nport = 1");
    let config = ConfigFactory::parse_with(text, Some(&handler), true)?;

    println!("Server port: {:?}", config.get_int("server.port")?);
    println!("Connection: {:?}", config.get_string("connection_string")?);
    println!("Pool size (from include): {:?}", config.get_int("database.pool_size")?);

    if let Some(NativeValue::Map(server)) = config.get("server") {
        for (key, value) in &server {
            println!("server.{} = {}", key, value);
        }
    }

    let app: AppConfig = config.deserialize()?;
    println!("Parsed configuration:");
    println!("Server: {} on port {} (debug: {})", app.server.name, app.server.port, app.server.debug);
    println!(
        "Database: {}@{}:{} with {} connections",
        app.database.username, app.database.host, app.database.port, app.database.pool_size
    );

    println!("As JSON: {:#}", NativeValue::Map(config.to_dict()));
    Ok(())
}
