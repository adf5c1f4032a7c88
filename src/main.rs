//! iotest - run a command against stdin/stdout fixture files
//!
//! Each `<name>-input.txt` in the tests folder is piped to the command and
//! its stdout is compared with `<name>-output.txt`.

use clap::Parser;
use iotest::cli::{self, EXIT_ERROR};
use iotest::commands::RunArgs;
use iotest::common::logging;

#[derive(Parser)]
#[command(name = "iotest", about = "Run stdin and stdout tests")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.run.verbose);

    match cli::dispatch(cli.run).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(EXIT_ERROR);
        }
    }
}
