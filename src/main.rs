use std::process::ExitCode;

fn main() -> ExitCode {
    match speechocean_seed::cli::run_seed(std::env::args().skip(1)) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("speechocean-seed: {err}");
            ExitCode::FAILURE
        }
    }
}
