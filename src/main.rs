use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use microscheme::{Config, config::DEFAULT_MAX_DEPTH, interpret_with, parse, tokenise};

#[derive(Parser, Debug)]
#[command(version, about = "Evaluate a microscheme expression", long_about = None)]
struct Args {
    /// The program text to evaluate.
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// Maximum evaluation depth before giving up with a stack exhausted error.
    #[arg(long = "max-depth", value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print the token sequence before evaluating.
    #[arg(long = "tokens")]
    tokens: bool,

    /// Print the parsed expression before evaluating.
    #[arg(long = "tree")]
    tree: bool,

    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "microscheme=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(source) = args.source else {
        bail!("Program text required as an argument.");
    };

    if args.tokens {
        let tokens = tokenise(&source);
        println!(
            "{}",
            tokens
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        );
    }

    if args.tree
        && let Ok(expression) = parse(&tokenise(&source))
    {
        println!("{expression}");
    }

    let config = Config::default().with_max_depth(args.max_depth);
    let result = interpret_with(&source, &config)?;

    println!("{result}");

    Ok(())
}
