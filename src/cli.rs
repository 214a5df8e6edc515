use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "stock-upload",
    version,
    about = "Converts legacy stock extracts into warehouse stock upload files",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an upload file from a stock extract
    Convert(ConvertArgs),
    /// List the configured profiles
    Profiles(ProfilesArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Profile to convert with, e.g. high_bay
    #[arg(long, short)]
    pub profile: String,

    /// Legacy stock extract
    #[arg(long, value_name = "CSV")]
    pub source: PathBuf,

    /// Legacy blocking list
    #[arg(long, value_name = "CSV")]
    pub blocks: PathBuf,

    /// Pieces per HU per material
    #[arg(long, value_name = "CSV")]
    pub qty_per_hu: PathBuf,

    /// Directory the upload file is written to
    #[arg(long, value_name = "DIR", default_value = "upload_files")]
    pub out_dir: PathBuf,

    /// Settings json, defaults to ~/.stock_upload/settings.json
    #[arg(long, value_name = "JSON")]
    pub settings: Option<PathBuf>,

    /// Override the serial rows generated per stock line
    #[arg(long, value_name = "N", conflicts_with = "no_serial_limit")]
    pub serial_limit: Option<usize>,

    /// Generate a serial row for every piece
    #[arg(long)]
    pub no_serial_limit: bool,

    /// Also write the run summary as json
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Log skipped lines and reference details
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct ProfilesArgs {
    /// Settings json, defaults to ~/.stock_upload/settings.json
    #[arg(long, value_name = "JSON")]
    pub settings: Option<PathBuf>,
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Convert(args) => args.verbose,
            Command::Profiles(_) => false,
        }
    }
}
