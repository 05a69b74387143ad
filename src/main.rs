use std::process::ExitCode;

fn main() -> ExitCode {
    rollmill::cli::run()
}
