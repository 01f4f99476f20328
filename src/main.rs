use annotest::engine::{RunOptions, run_tests};
use annotest::report::ConsoleReporter;
use annotest::suite::SuiteRegistry;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use colored::control::set_override as set_color_override;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Runs the annotated test methods of a suite")]
struct Cli {
    // SUITE: fully-qualified suite name, e.g. annotest::sample::BeautifulSuite
    #[arg(value_name = "SUITE")]
    suite: Option<String>,

    // Run methods in name order instead of declaration order
    #[arg(long = "sort-methods", help = "Run test methods sorted by name")]
    sort_methods: bool,

    // Print registered suites and exit
    #[arg(long = "list", help = "List registered suites and exit")]
    list: bool,

    #[arg(long = "no-color", help = "Disable coloured output")]
    no_color: bool,

    #[arg(short = 'v', long = "verbose", help = "Log progress to stderr")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "annotest=info".to_string())
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "annotest=warn".to_string())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Target panics are caught and reported as verdicts; keep the default
    // hook from writing over the report.
    std::panic::set_hook(Box::new(|info| debug!("panic: {info}")));

    if cli.no_color {
        set_color_override(false);
    }

    let registry = SuiteRegistry::builtin();
    if cli.list {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let suite = match cli.suite.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            eprintln!("{}", "Please specify test suite name".yellow());
            eprintln!("No arguments provided. Running default suite...");
            annotest::DEFAULT_SUITE.to_string()
        }
    };

    let options = RunOptions {
        sort_methods: cli.sort_methods,
        ..RunOptions::default()
    };
    let mut reporter = ConsoleReporter::stdout();
    if let Err(e) = run_tests(&registry, &suite, &options, &mut reporter) {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }

    Ok(())
}
