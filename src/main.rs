//! `stageshell` binary entry point.

use std::process::ExitCode;

use stageshell::cli::{self, driver::EXIT_USAGE, Cli};
use stageshell::ui::output;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    cli::init_logging(cli.debug);

    let code = match cli::run(cli) {
        Ok(code) => code,
        Err(err) => {
            output::error(format!("{:#}", err));
            EXIT_USAGE
        }
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
