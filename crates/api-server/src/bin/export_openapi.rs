//! OpenAPI Schema Export Binary
//!
//! Prints the OpenAPI specification as JSON to stdout.
//!
//! Usage:
//!   cargo run -p api-server --bin export-openapi > openapi.json

use api_server::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let openapi_json = ApiDoc::openapi().to_pretty_json()?;
    println!("{}", openapi_json);
    Ok(())
}
