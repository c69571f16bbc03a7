//! Command-line and environment configuration

use crate::converter::DecodeOptions;
use crate::parquet::RowGroupPolicy;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default upload ceiling: 1 GiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

#[derive(Debug, Parser)]
#[command(name = "tabconvert")]
#[command(about = "Convert tabular files between CSV, JSON, Excel and Parquet")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "TABCONVERT_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP conversion service
    Serve(ServerConfig),
    /// Convert a local file through the same converters
    Convert(ConvertArgs),
    /// Print every supported "<source>-to-<target>" identifier
    Formats,
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "TABCONVERT_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Largest accepted request body in bytes
    #[arg(long, env = "TABCONVERT_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    #[command(flatten)]
    pub decode: DecodeArgs,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            decode: DecodeArgs::default(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Input file; its extension selects the source format
    pub input: PathBuf,

    /// Target format (csv, json, excel, parquet)
    #[arg(short, long)]
    pub to: String,

    /// Output path; defaults to the input name with the target extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub decode: DecodeArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct DecodeArgs {
    /// Parquet row groups to read
    #[arg(long, env = "TABCONVERT_PARQUET_ROW_GROUPS", value_enum, default_value_t = RowGroupPolicy::All)]
    pub parquet_row_groups: RowGroupPolicy,
}

impl DecodeArgs {
    pub fn options(&self) -> DecodeOptions {
        DecodeOptions {
            parquet_row_groups: self.parquet_row_groups,
        }
    }
}
