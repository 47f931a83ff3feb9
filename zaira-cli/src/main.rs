// Command-line interface for zaira
//
// This binary converts local wiki pages between markdown and the wiki's storage format, and
// reports what a sync layer needs to know about a page before pushing it.
//
// The conversions themselves live in the zaira-babel crate. This crate only reads files, applies
// configuration and prints results. Talking to the wiki (fetching, publishing, uploading
// attachments) is out of scope here.
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension, while
// being overwrittable by an explicit --from flag.
// Usage:
//  zaira <input> --to <format> [--from <format>] [--output <file>]          - Convert between formats (default)
//  zaira convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  zaira images <input>                                                     - List local images to upload
//  zaira page <input>                                                       - Summarize a local page
//  zaira --list-formats                                                     - List available formats
//
// Extra Parameters:
//
// Conversion settings can be overridden per run using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and applies the value over the loaded configuration.
// Example:
//  zaira page.md --to storage --extra-local-images false
//  zaira page.xml --to markdown --extra-image-dir assets

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use zaira_babel::page::title_from_file_stem;
use zaira_babel::{extract_local_images, ConvertOptions, FormatRegistry, PageDocument};
use zaira_config::{Loader, LogLevel, ZairaConfig, LOCAL_CONFIG_FILE};

const SUBCOMMANDS: &[&str] = &["convert", "images", "page", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            // A following arg that is not a flag is this key's value
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("zaira")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert wiki pages between markdown and the storage format")
        .long_about(
            "zaira is a command-line tool for working with local copies of wiki pages.\n\n\
            Commands:\n  \
            - convert: Transform between markdown and the storage format (default)\n  \
            - images:  List local images a page references\n  \
            - page:    Summarize a page's front matter and body\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override conversion settings.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            zaira page.md --to storage                    # Markdown to storage (stdout)\n  \
            zaira page.xml --to markdown -o page.md       # Storage to a markdown file\n  \
            zaira page.md --to storage --extra-local-images false\n  \
            zaira images page.md                          # Attachments to upload",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .value_name("PATH")
                .help("Path to a zaira.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (repeat for more detail)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Disable logging")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between markdown and the storage format.\n\n\
                    Supported formats:\n  \
                    - markdown: Page markdown (.md, .markdown)\n  \
                    - storage:  Wiki storage format fragment (.xml, .storage)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    zaira convert page.md --to storage             # Markdown to storage\n  \
                    zaira convert body.xml --to markdown -o p.md   # Storage to markdown file\n  \
                    zaira page.md --to storage                     # 'convert' is optional",
                )
                .arg(input_arg())
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .long_help(
                            "Target format to convert to.\n\n\
                            Available formats: markdown, storage\n\
                            Use the format name, not the file extension.",
                        )
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("images")
                .about("List local images referenced by a markdown page")
                .long_about(
                    "Prints one line per local image reference, as 'alt<TAB>path'.\n\n\
                    These are the files that must be uploaded as attachments before the\n\
                    page is published. Remote images (absolute URLs) are not listed.",
                )
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("page")
                .about("Summarize a markdown page")
                .long_about(
                    "Prints the page title, the linked page id from the front matter,\n\
                    the body hash and the number of local images.",
                )
                .arg(input_arg()),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A first argument that is neither a flag nor a subcommand is the input file
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    init_logging(log_level(&config, &matches));
    for key in extra_params.keys() {
        log::warn!("ignoring unknown parameter --extra-{key}");
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let to = sub_matches.get_one::<String>("to").expect("to is required");

            // Auto-detect --from if not provided
            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => {
                    let registry = FormatRegistry::default();
                    match registry.detect_format_from_filename(input) {
                        Some(detected) => detected,
                        None => {
                            eprintln!("Error: Could not detect format from filename '{input}'");
                            eprintln!("Please specify --from explicitly");
                            std::process::exit(1);
                        }
                    }
                }
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &config);
        }
        Some(("images", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            handle_images_command(input);
        }
        Some(("page", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            handle_page_command(input);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    config: &ZairaConfig,
) {
    let registry = FormatRegistry::default();

    // Validate formats exist
    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_input(input);
    let source = if from == "markdown" && config.convert.strip_front_matter {
        PageDocument::parse(&source).body
    } else {
        source
    };

    let options = ConvertOptions::from(&config.convert);
    log::debug!("converting '{input}' from {from} to {to} with {options:?}");

    let doc = registry.parse(&source, from, &options).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let mut text = registry.serialize(&doc, to, &options).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    if !text.ends_with('\n') {
        text.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{text}"),
    }
}

/// Handle the images command
fn handle_images_command(input: &str) {
    let page = PageDocument::parse(&read_input(input));
    for image in extract_local_images(&page.body) {
        println!("{}\t{}", image.alt, image.path);
    }
}

/// Handle the page command
fn handle_page_command(input: &str) {
    let page = PageDocument::parse(&read_input(input));
    let title = page.title().unwrap_or_else(|| {
        let stem = Path::new(input)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        title_from_file_stem(&stem)
    });

    println!("title: {title}");
    println!("page id: {}", page.page_id().as_deref().unwrap_or("-"));
    let labels = page.labels();
    if !labels.is_empty() {
        println!("labels: {}", labels.join(", "));
    }
    println!("body hash: {}", page.body_hash());
    println!("local images: {}", extract_local_images(&page.body).len());
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        let Ok(format) = registry.get(&format_name) else {
            continue;
        };
        println!(
            "  {:<10} {} (.{})",
            format_name,
            format.description(),
            format.file_extensions().join(", .")
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> ZairaConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut ZairaConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["local-images", "convert-local-images"]) {
        config.convert.convert_local_images = parse_bool_arg("local-images", &raw);
    }
    if let Some(dir) = take_override(extra_params, &["image-dir"]) {
        config.convert.image_dir = dir;
    }
    if let Some(raw) = take_override(extra_params, &["front-matter", "strip-front-matter"]) {
        config.convert.strip_front_matter = parse_bool_arg("front-matter", &raw);
    }
}

fn log_level(config: &ZairaConfig, matches: &ArgMatches) -> LogLevel {
    if matches.get_flag("quiet") {
        return LogLevel::Off;
    }
    config.log.level.raised(matches.get_count("verbose"))
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::Off,
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

fn init_logging(level: LogLevel) {
    // Only fails when a logger is already installed
    let _ = TermLogger::init(
        level_filter(level),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
