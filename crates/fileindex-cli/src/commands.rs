use clap::{Args, Parser, Subcommand};
use fileindex_core::AppConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fileindex")]
#[command(about = "Index files by content hash and browse the index", long_about = None)]
pub struct Cli {
    /// Configuration file to use instead of ./Config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Walk a directory tree and append file metadata as JSON lines
    Scan(ScanArgs),
    /// Load a JSON-lines file into the SQLite index
    Load(LoadArgs),
    /// Serve the JSON API and browsing pages
    Service(ServiceArgs),
    /// Print configuration values
    PrintConfig,
    /// Print the program version
    Version,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Label stored with every record
    #[arg(long)]
    pub volume_name: Option<String>,
    /// Directory to walk
    #[arg(long)]
    pub root_path: Option<String>,
    /// JSON-lines output file, appended to
    #[arg(long)]
    pub output_file_name: Option<String>,
    /// Glob of paths to skip; may be repeated
    #[arg(long = "ignore")]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    #[arg(long)]
    pub json_file_name: Option<String>,
    #[arg(long)]
    pub sqlite_file_name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ServiceArgs {
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub sqlite_file_name: Option<String>,
}

impl ScanArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        override_with(&mut config.volume_name, &self.volume_name);
        override_with(&mut config.root_path, &self.root_path);
        if let Some(output) = &self.output_file_name {
            config.output_file_name = output.clone();
        }
        if !self.ignore_patterns.is_empty() {
            config.ignore_patterns = self.ignore_patterns.clone();
        }
    }
}

impl LoadArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(json) = &self.json_file_name {
            config.json_file_name = json.clone();
        }
        if let Some(sqlite) = &self.sqlite_file_name {
            config.sqlite_file_name = sqlite.clone();
        }
    }
}

impl ServiceArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(sqlite) = &self.sqlite_file_name {
            config.sqlite_file_name = sqlite.clone();
        }
    }
}

fn override_with(target: &mut Option<String>, flag: &Option<String>) {
    if flag.is_some() {
        target.clone_from(flag);
    }
}
