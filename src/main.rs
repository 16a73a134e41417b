//! pslaunch binary
//!
//! Minimal entrypoint. All logic is in the library; main.rs only invokes
//! cli::run() and maps its result to the process exit status.

fn main() {
    if let Err(code) = pslaunch::cli::run() {
        std::process::exit(code.as_i32());
    }
}
