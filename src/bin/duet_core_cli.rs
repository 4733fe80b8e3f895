use duet_core::cli::run_cli;

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}
