use anyhow::Result;
use clap::Parser;
use cli::{Command, RootArgs};

mod cli;
mod logging;
mod run;
mod upload;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    logging::init(args.command.verbose());
    match &args.command {
        Command::Convert(convert_args) => {
            let summary = run::convert(convert_args)?;
            println!(
                "A new file was successfully written: {} Number of rows: {}",
                summary.output.display(),
                summary.report.rows.total()
            );
        }
        Command::Profiles(profiles_args) => run::list_profiles(profiles_args)?,
    }
    Ok(())
}
