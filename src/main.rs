use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use env_logger::Env;

use unique_ipv4_counter::{count_file, Lenient, LinePolicy, Strict, Summary};

/// Count distinct IPv4 addresses in a file with one dotted-quad address per line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// What to do with lines that are not valid IPv4 addresses
    #[arg(long, value_enum, default_value_t = CliPolicy::Strict)]
    policy: CliPolicy,

    /// Print the run summary as JSON
    #[cfg(feature = "with_serde")]
    #[arg(long)]
    json: bool,
}

/// Invalid line policy options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliPolicy {
    /// Abort on the first invalid line
    Strict,
    /// Warn about invalid lines and skip them
    Lenient,
}

impl From<CliPolicy> for LinePolicy {
    fn from(policy: CliPolicy) -> Self {
        match policy {
            CliPolicy::Strict => Strict.into(),
            CliPolicy::Lenient => Lenient.into(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::init_from_env(Env::default().default_filter_or("warn"));

    let summary = match count_file(&args.path, args.policy.into()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match render(&args, &summary) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: cannot render summary: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "with_serde")]
fn render(args: &Args, summary: &Summary) -> Result<String, serde_json::Error> {
    if args.json {
        serde_json::to_string(summary)
    } else {
        Ok(summary.to_string())
    }
}

#[cfg(not(feature = "with_serde"))]
fn render(_args: &Args, summary: &Summary) -> Result<String, std::convert::Infallible> {
    Ok(summary.to_string())
}
