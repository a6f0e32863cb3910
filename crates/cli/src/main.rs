use std::process::ExitCode;

fn main() -> ExitCode {
    autobiz_cli::run()
}
