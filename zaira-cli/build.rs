use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the formats registered by zaira-babel's FormatRegistry::with_defaults
// Build scripts can't depend on the crate being built, so this list is kept by hand
const AVAILABLE_FORMATS: &[&str] = &["markdown", "storage"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let format_arg = |name: &'static str| {
        Arg::new(name)
            .long(name)
            .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
            .value_hint(ValueHint::Other)
    };

    let mut cmd = Command::new("zaira")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert wiki pages between markdown and the storage format")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a zaira.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats")
                .arg(input_arg())
                .arg(format_arg("from").help("Source format"))
                .arg(format_arg("to").help("Target format").required(true))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("images")
                .about("List local images referenced by a markdown page")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("page")
                .about("Summarize a markdown page")
                .arg(input_arg()),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "zaira", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "zaira", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "zaira", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
