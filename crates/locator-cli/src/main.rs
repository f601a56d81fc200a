use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use locator_cli::commands::{build, init, transform, uri};
use locator_cli::config::Config;
use locator_cli::{Editor, Mode, CONFIG_FILE};
use locator_core::logging::config::LoggingConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "locator")]
#[command(about = "Annotates JSX, Vue and Angular markup with source locations", long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate one file and print the result
    Transform {
        file: String,
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: String,
        /// JSX attribute mode, overrides the config
        #[arg(long, value_enum)]
        mode: Option<Mode>,
        /// Build environment, overrides NODE_ENV
        #[arg(long)]
        env: Option<String>,
        /// Rewrite the file in place
        #[arg(short, long)]
        write: bool,
    },
    /// Annotate a source tree into an output directory
    Build {
        src: String,
        #[arg(short, long)]
        out_dir: Option<String>,
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: String,
        #[arg(long, value_enum)]
        mode: Option<Mode>,
        #[arg(long)]
        env: Option<String>,
    },
    /// Write a default configuration file
    Init {
        #[arg(default_value = CONFIG_FILE)]
        path: String,
    },
    /// Print the editor URI for an encoded file:line:column value
    Uri {
        location: String,
        #[arg(short, long, value_enum, default_value = "vscode")]
        editor: Editor,
    },
}

fn init_logging(cli: &Cli, config_path: Option<&str>) -> Result<()> {
    let section = config_path
        .and_then(|path| Config::load_or_default(path).ok())
        .map(|config| config.logging)
        .unwrap_or_default();

    if cli.log_level.is_some() || cli.verbose || section.level.is_none() {
        return locator_core::init_from_args(
            cli.log_level.clone(),
            cli.log_file.clone().or(section.file.map(PathBuf::from)),
            cli.verbose,
        );
    }

    let config = LoggingConfig::default()
        .with_level(section.level)
        .with_file(cli.log_file.clone().or(section.file.map(PathBuf::from)))
        .with_format(section.format);
    locator_core::init(config)
}

fn main() {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Commands::Transform { config, .. } | Commands::Build { config, .. } => {
            Some(config.as_str())
        }
        _ => None,
    };
    if let Err(e) = init_logging(&cli, config_path) {
        eprintln!("{} {:#}", "Failed to initialize logging:".yellow(), e);
    }

    let result = match &cli.command {
        Commands::Transform {
            file,
            config,
            mode,
            env,
            write,
        } => transform::execute_transform(
            file,
            config,
            mode.map(Into::into),
            env.as_deref(),
            *write,
        ),
        Commands::Build {
            src,
            out_dir,
            config,
            mode,
            env,
        } => build::execute_build(
            src,
            out_dir.as_deref(),
            config,
            mode.map(Into::into),
            env.as_deref(),
        )
        .map(|_| ()),
        Commands::Init { path } => init::execute_init(path),
        Commands::Uri { location, editor } => uri::execute_uri(location, (*editor).into()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
