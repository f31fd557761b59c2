use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use scrt::backend::Registry;
use scrt::cli::commands;
use scrt::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = Registry::default();

    let result = match cli.command {
        Commands::Init { overwrite } => commands::init::execute(&cli, &registry, overwrite),
        Commands::Set {
            ref key,
            ref value,
            overwrite,
        } => commands::set::execute(&cli, &registry, key, value.as_deref(), overwrite),
        Commands::Get { ref key } => commands::get::execute(&cli, &registry, key),
        Commands::List => commands::list::execute(&cli, &registry),
        Commands::Unset { ref key } => commands::unset::execute(&cli, &registry, key),
        Commands::Export {
            format,
            ref output,
        } => commands::export::execute(&cli, &registry, format, output.as_deref()),
        Commands::Storage => commands::storage::execute(&registry),
        Commands::Completions { shell } => commands::completions::execute(shell),
        Commands::Version => commands::version::execute(),
    };

    if let Err(e) = result {
        scrt::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "warn,scrt=info",
        _ => "warn,scrt=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
