use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use woql_query::WoqlConfig;
use woql_query::cli::{self, CheckOptions, CliError, PathOptions, PathOutput};

#[derive(ClapParser)]
#[command(name = "woql")]
#[command(about = "woql - Build and inspect WOQL queries and path patterns")]
#[command(version)]
struct Cli {
    /// JSON configuration with vocabulary entries
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a path pattern
    Path {
        /// The path pattern, e.g. "<parent,(child|sibling)*"
        pattern: String,

        /// Print the token stream only
        #[arg(short, long)]
        tokens: bool,

        /// Subject of a full Path query
        #[arg(short, long)]
        subject: Option<String>,

        /// Object of a full Path query
        #[arg(short, long)]
        object: Option<String>,

        /// Variable receiving the traversed edges
        #[arg(long)]
        path: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Inspect a serialized query (reads from stdin if not provided)
    Check {
        /// Query AST as JSON
        #[arg(short, long)]
        input: Option<String>,
    },

    /// List builder operations
    Ops,

    /// Show the parameters of one operation
    Op {
        /// Method name or type (use 'woql ops' to list operations)
        name: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("WOQL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = load_config(cli.config).and_then(|config| match cli.command {
        Commands::Path {
            pattern,
            tokens,
            subject,
            object,
            path,
            pretty,
        } => run_path(
            PathOptions {
                pattern,
                tokens,
                subject,
                object,
                path_variable: path,
                config,
            },
            pretty,
        ),
        Commands::Check { input } => run_check(input),
        Commands::Ops => {
            print!("{}", cli::get_operations_overview());
            Ok(())
        }
        Commands::Op { name } => cli::describe_operation(&name).map(|text| print!("{}", text)),
    });

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<WoqlConfig, CliError> {
    match path {
        Some(path) => Ok(WoqlConfig::load(path)?),
        None => Ok(WoqlConfig::default()),
    }
}

fn run_path(options: PathOptions, pretty: bool) -> Result<(), CliError> {
    let output = cli::execute_path(&options)?;
    if let PathOutput::Tokens(tokens) = &output {
        println!("{}", tokens.join(" "));
        return Ok(());
    }
    let json = if pretty {
        serde_json::to_string_pretty(&output.to_json())
    } else {
        serde_json::to_string(&output.to_json())
    }?;
    println!("{}", json);
    Ok(())
}

fn run_check(input: Option<String>) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let result = cli::execute_check(&CheckOptions { input })?;
    match &result.root {
        Some(root) => println!("root: {}", root),
        None => println!("root: (empty)"),
    }
    println!("contains update: {}", result.contains_update);
    if !result.updates.is_empty() {
        println!("updates: {}", result.updates.join(", "));
    }
    Ok(())
}
