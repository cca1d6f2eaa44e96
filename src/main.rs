//! docshift - DocBook converter driver with runtime-loadable plugins.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use docshift::plugin::load_converter;
use docshift::{Error, Result};

#[derive(Parser)]
#[command(name = "docshift")]
#[command(version, about = "DocBook converter driver with runtime-loadable plugins", long_about = None)]
#[command(after_help = "EXAMPLES:
    docshift plugins/ docshift::markdown input.xml output.md
    docshift target/release/libdocshift.so docshift::ascii input.xml output.txt")]
struct Cli {
    /// Plugin shared library, or a directory of plugin libraries
    #[arg(value_name = "PLUGIN_PATH")]
    plugin_path: PathBuf,

    /// Qualified converter name, e.g. docshift::markdown
    #[arg(value_name = "CONVERTER")]
    converter: String,

    /// Input DocBook XML file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Path where the converted output will be written
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            let code = if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                0
            } else {
                // Invalid arguments: distinct from every load/convert failure.
                Error::InvalidArguments(e.to_string()).exit_code()
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.plugin_path.exists() {
        return Err(Error::PluginPathMissing(cli.plugin_path.clone()));
    }
    if !cli.input.is_file() {
        return Err(Error::InputMissing(cli.input.clone()));
    }

    let output_dir = match cli.output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(output_dir).map_err(Error::OutputDir)?;

    // The library stays loaded for exactly as long as `loaded` is alive; it
    // is released on every path out of this function.
    let loaded = load_converter(&cli.plugin_path, &cli.converter)?;

    if !cli.quiet {
        println!("Loaded converter: {}", loaded.name());
        println!(
            "Converting: {} -> {}",
            cli.input.display(),
            cli.output.display()
        );
    }

    let start = Instant::now();
    match panic::catch_unwind(AssertUnwindSafe(|| loaded.convert(&cli.input, &cli.output))) {
        Ok(result) => result?,
        Err(_) => {
            return Err(Error::Unexpected(format!(
                "converter {} panicked during conversion",
                loaded.name()
            )));
        }
    }

    if !cli.quiet {
        println!(
            "Conversion complete in {} ms.",
            start.elapsed().as_millis()
        );
    }

    Ok(())
}
