//! Quasar CLI - standalone binary.
//!
//! A thin wrapper around [`quasar_cli::run_cli`]; all command logic lives
//! in the library crate for testability.
//!
//! # Exit Codes
//!
//! - `0` - success
//! - `1` - compilation error (diagnostics printed to stderr)
//! - `2` - runtime error while executing a compiled program with `run`

fn main() {
    std::process::exit(quasar_cli::run_cli());
}
