//! # restype CLI
//!
//! Command-line front end over a JSON catalog of resource types and fixture
//! entities.
//!
//! ## Commands
//!
//! - `inspect` - List types with their exposure and property capabilities
//! - `resolve` - Turn a write request into a property value map
//! - `docs` - Print the OpenAPI document of the catalog
//!

pub mod catalog;
pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use restype_docs::DocsConfig;
use std::path::PathBuf;

pub use catalog::{Catalog, CatalogEntity, PropertyKind, PropertySpec, TypeSpec};
pub use commands::WriteRequest;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resource type catalog tools
#[derive(Parser, Debug)]
#[command(name = "restype")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List types with exposure and property capability flags
    Inspect {
        /// Catalog file
        #[arg(long, env = "RESTYPE_CATALOG")]
        catalog: PathBuf,
    },

    /// Resolve a write request into property values
    Resolve {
        /// Catalog file
        #[arg(long, env = "RESTYPE_CATALOG")]
        catalog: PathBuf,

        /// Type of the resource being written
        #[arg(long = "type", value_name = "NAME")]
        type_name: String,

        /// Request file with `attributes` and `relationships` sections
        #[arg(long)]
        request: PathBuf,
    },

    /// Print the OpenAPI document of the catalog
    Docs {
        /// Catalog file
        #[arg(long, env = "RESTYPE_CATALOG")]
        catalog: PathBuf,

        /// Default page size of list routes
        #[arg(long, env = "RESTYPE_PAGE_SIZE")]
        page_size: Option<u32>,

        /// Version written to the document's `info` section
        #[arg(long, env = "RESTYPE_API_VERSION")]
        api_version: Option<String>,
    },
}

/// Parse the process arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Run the selected command and return what should go to stdout
pub fn execute(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Inspect { catalog } => commands::inspect(&Catalog::load(catalog)?),
        Command::Resolve {
            catalog,
            type_name,
            request,
        } => {
            let catalog = Catalog::load(catalog)?;
            let request = commands::load_request(request)?;
            let values = commands::resolve(&catalog, type_name, &request)?;
            Ok(serde_json::to_string_pretty(&values)?)
        }
        Command::Docs {
            catalog,
            page_size,
            api_version,
        } => {
            let catalog = Catalog::load(catalog)?;
            let document = commands::docs(&catalog, docs_config(*page_size, api_version.as_deref()))?;
            Ok(serde_json::to_string_pretty(&document)?)
        }
    }
}

fn docs_config(page_size: Option<u32>, api_version: Option<&str>) -> DocsConfig {
    let mut config = DocsConfig::default();
    if let Some(size) = page_size {
        config = config.with_default_page_size(size);
    }
    if let Some(version) = api_version {
        config = config.with_api_version(version);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "restype", "resolve", "--catalog", "c.json", "--type", "Book", "--request", "r.json",
        ])
        .unwrap();
        match cli.command {
            Command::Resolve { type_name, .. } => assert_eq!(type_name, "Book"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_docs_options_override_defaults() {
        let cli = Cli::try_parse_from([
            "restype", "docs", "--catalog", "c.json", "--page-size", "50", "--api-version", "3.1",
        ])
        .unwrap();
        let Command::Docs {
            page_size,
            api_version,
            ..
        } = cli.command
        else {
            panic!("expected the docs command");
        };

        let config = docs_config(page_size, api_version.as_deref());
        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.api_version, "3.1");

        let defaults = docs_config(None, None);
        assert_eq!(defaults.default_page_size, 20);
        assert_eq!(defaults.api_version, "2.0");
    }

    #[test]
    fn test_parse_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["restype", "docs", "--catalog", "c.json", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
