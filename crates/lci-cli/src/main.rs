//! lci-bridge: Brightway and SimaPro inventory conversion.

use clap::Parser;
use lci_cli::cli::{Cli, Command};
use lci_cli::commands::{load_tables, run_to_brightway, run_to_simapro};
use lci_cli::logging::init_logging;
use lci_cli::summary::{print_export_summary, print_import_summary, reference_tables_table};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    if let Err(error) = run(&cli.command) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run(command: &Command) -> anyhow::Result<()> {
    let tables = load_tables()?;
    match command {
        Command::ToSimapro(args) => print_export_summary(&run_to_simapro(args, &tables)?),
        Command::ToBrightway(args) => print_import_summary(&run_to_brightway(args, &tables)?),
        Command::Tables => println!("{}", reference_tables_table(&tables)),
    }
    Ok(())
}
