//! `json-patch`: apply a JSON Patch (RFC 6902) to a document.
//!
//! Usage:
//!   json-patch '<patch-array-json>'
//!
//! The document is read from stdin. The patch operations are the first argument.
//! Set `RUST_LOG=patchable=debug` to trace each applied operation on stderr.

use std::io::{self, Read, Write};

use patchable::json_cli::apply_json_patch;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let patch = match std::env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("First argument must be a JSON patch array.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match apply_json_patch(buf.trim(), &patch) {
        Ok(result) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{result}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
