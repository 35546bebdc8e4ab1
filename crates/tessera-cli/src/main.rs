//! `tessera` binary entrypoint.

fn main() {
    std::process::exit(tessera_cli::run());
}
