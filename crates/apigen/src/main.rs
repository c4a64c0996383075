//! `apigen` binary entry point.

fn main() {
    let code = apigen_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}
