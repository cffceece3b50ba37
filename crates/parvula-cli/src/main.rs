mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{parse_pair, EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_STORE_ERROR};
use parvula_core::{ComponentResolver, ResolverConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

const DEFAULT_CONFIG: &str = "parvula.toml";

#[derive(Debug, Parser)]
#[command(
    name = "parvula",
    version,
    about = "Resolve Parvula front-end components to asset URIs"
)]
struct Cli {
    /// Path to a TOML config file (defaults to ./parvula.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing the component base path.
    #[arg(long, global = true)]
    root_dir: Option<PathBuf>,

    /// Component base path, used both on disk and in URIs.
    #[arg(long, global = true)]
    base_path: Option<String>,

    /// Relative-to-root prefix placed in front of local URIs.
    #[arg(long, global = true)]
    root_prefix: Option<String>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve packages from the local component directory.
    Resolve {
        /// Packages as NAME or NAME=PATH (explicit asset path).
        #[arg(required = true)]
        packages: Vec<String>,
        /// Register a CDN url before resolving (repeatable).
        #[arg(long = "cdn", value_name = "NAME=URL", value_parser = parse_pair)]
        cdn: Vec<(String, String)>,
    },
    /// Resolve packages through the CDN registry.
    Cdn {
        /// Package names.
        #[arg(required = true)]
        packages: Vec<String>,
        /// Register a CDN url before resolving (repeatable).
        #[arg(long = "register", value_name = "NAME=URL", value_parser = parse_pair)]
        register: Vec<(String, String)>,
    },
    /// Check whether a package directory exists.
    Exists {
        /// Package name.
        package: String,
    },
    /// Install a file as a new local package.
    Install {
        /// Package name.
        package: String,
        /// File to copy into the package directory.
        file: PathBuf,
    },
    /// List installed packages.
    List,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("PARVULA_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let result = run(&cli);

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("config error:") {
                EXIT_CONFIG_ERROR
            } else if msg.starts_with("store error:") {
                EXIT_STORE_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<u8, String> {
    let json = cli.json;
    match &cli.command {
        Commands::Resolve { packages, cdn } => {
            commands::resolve::run(&build_resolver(cli)?, packages, cdn, json)
        }
        Commands::Cdn { packages, register } => {
            commands::cdn::run(&build_resolver(cli)?, packages, register, json)
        }
        Commands::Exists { package } => commands::exists::run(&build_resolver(cli)?, package, json),
        Commands::Install { package, file } => {
            commands::install::run(&build_resolver(cli)?, package, file, json)
        }
        Commands::List => commands::list::run(&build_resolver(cli)?, json),
        Commands::Completions { shell } => commands::completions::run::<Cli>(*shell),
    }
}

fn build_resolver(cli: &Cli) -> Result<ComponentResolver, String> {
    let mut config = match &cli.config {
        Some(path) => ResolverConfig::load(path).map_err(|e| e.to_string())?,
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            debug!("using {DEFAULT_CONFIG} from the working directory");
            ResolverConfig::load(Path::new(DEFAULT_CONFIG)).map_err(|e| e.to_string())?
        }
        None => ResolverConfig::default(),
    };

    if let Some(root_dir) = &cli.root_dir {
        config.root_dir.clone_from(root_dir);
    }
    if let Some(base_path) = &cli.base_path {
        config.base_path.clone_from(base_path);
    }
    if let Some(root_prefix) = &cli.root_prefix {
        config.root_prefix.clone_from(root_prefix);
    }

    ComponentResolver::new(config).map_err(|e| e.to_string())
}
