//! tc-core: check, inspect and print text-to-speech pipeline configs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tc_config::{load_unvalidated, ConfigError, LoadOptions, SchemaName};
use tc_core::exit_codes::ExitCode;
use tc_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use tc_core::output::{
    check_response, render_check_human, render_check_summary, render_describe_human,
    OutputFormat, RESPONSE_VERSION,
};
use tc_schema::{instantiate, overrides_from_pairs, to_json_string};

#[derive(Parser)]
#[command(name = "tc-core")]
#[command(about = "Validate text-to-speech pipeline configs against their schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a config file and overrides onto schema defaults, then validate
    Check(CheckArgs),

    /// Print the default config of a schema as JSON
    Defaults(SchemaArgs),

    /// List the fields of a schema with their constraints
    Describe(SchemaArgs),

    /// List the built-in schemas
    Schemas,

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Schema to use
    #[arg(long, short = 's', default_value_t = SchemaName::TacotronGst)]
    schema: SchemaName,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    schema: SchemaArgs,

    /// Config file (default: TTS_CONFIG, TTS_CONFIG_DIR, then XDG config dir)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override a field, e.g. --set audio.sample_rate=22050 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet || cli.global.verbose > 0 {
        Some(LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet))
    } else {
        None
    };
    let cli_format = matches!(cli.global.format, OutputFormat::Json).then_some(LogFormat::Jsonl);
    init_logging(&LogConfig::from_env(cli_level, cli_format));

    let exit_code = match &cli.command {
        Commands::Check(args) => run_check(&cli.global, args),
        Commands::Defaults(args) => run_defaults(args),
        Commands::Describe(args) => run_describe(&cli.global, args),
        Commands::Schemas => run_schemas(&cli.global),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> ExitCode {
    let run_id = generate_run_id();
    let _span = tracing::info_span!("check", run_id = %run_id, schema = %args.schema.schema).entered();

    let mut options = LoadOptions::new(args.schema.schema);
    if let Some(path) = &args.config {
        options = options.with_config_path(path);
    }
    if !args.set.is_empty() {
        match overrides_from_pairs(&args.set) {
            Ok(layer) => options = options.with_override(layer),
            Err(e) => {
                eprintln!("tc-core check: {}", e);
                return ExitCode::ArgsError;
            }
        }
    }

    let loaded = match load_unvalidated(&options) {
        Ok(loaded) => loaded,
        Err(e) => return output_config_error(global, &e),
    };

    let response = check_response(&run_id, &loaded);
    let violation_count = response["violation_count"].as_u64().unwrap_or(0);
    if violation_count > 0 {
        tracing::warn!(violations = violation_count, "config has violations");
    }

    match global.format {
        OutputFormat::Json => println!("{:#}", response),
        OutputFormat::Summary => println!("{}", render_check_summary(&response)),
        OutputFormat::Human => print!("{}", render_check_human(&response)),
    }

    if violation_count == 0 {
        ExitCode::Clean
    } else {
        ExitCode::Violations
    }
}

fn run_defaults(args: &SchemaArgs) -> ExitCode {
    let instance = instantiate(&args.schema.schema());
    match to_json_string(&instance) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::Clean
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize defaults");
            ExitCode::InternalError
        }
    }
}

fn run_describe(global: &GlobalOpts, args: &SchemaArgs) -> ExitCode {
    let description = args.schema.schema().describe();
    match global.format {
        OutputFormat::Json => println!("{:#}", description),
        OutputFormat::Summary => {
            let count = description["fields"].as_array().map_or(0, Vec::len);
            println!("{}: {} field(s)", args.schema, count);
        }
        OutputFormat::Human => print!("{}", render_describe_human(&description)),
    }
    ExitCode::Clean
}

fn run_schemas(global: &GlobalOpts) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let schemas: Vec<_> = SchemaName::ALL
                .iter()
                .map(|name| {
                    let schema = name.schema();
                    json!({
                        "name": name.as_str(),
                        "record": schema.name(),
                        "extends": schema.base_name(),
                        "fields": schema.len(),
                        "description": name.description(),
                    })
                })
                .collect();
            println!("{:#}", json!({ "schemas": schemas }));
        }
        _ => {
            for name in SchemaName::ALL {
                println!("{:<14} {}", name.as_str(), name.description());
            }
        }
    }
    ExitCode::Clean
}

fn output_config_error(global: &GlobalOpts, error: &ConfigError) -> ExitCode {
    let exit_code = ExitCode::from(error);
    match global.format {
        OutputFormat::Json => {
            let payload = json!({
                "response_version": RESPONSE_VERSION,
                "status": "error",
                "error": {
                    "code": error.code(),
                    "category": error.category(),
                    "exit_code": exit_code.code_name(),
                    "message": error.to_string(),
                    "remediation": error.remediation(),
                },
            });
            eprintln!("{:#}", payload);
        }
        _ => {
            eprintln!("tc-core: {}", error);
            eprintln!("  hint: {}", error.remediation());
        }
    }
    exit_code
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let version_info = json!({
                "response_version": RESPONSE_VERSION,
                "tc_core_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            println!("{:#}", version_info);
        }
        _ => {
            println!("tc-core {}", env!("CARGO_PKG_VERSION"));
            println!("response version: {}", RESPONSE_VERSION);
        }
    }
}
