//! `json-patch` — apply a JSON Patch (RFC 6902) to a document.
//!
//! Usage:
//!   json-patch '<patch-array-json>' [--atomic]
//!
//! The document is read from stdin and the patched document is written to
//! stdout. Failed operations are listed on stderr and the exit code is 1.

use std::io::{self, Read, Write};

use rfc6902::cli::{apply_patch_str, init_logging};
use rfc6902::ApplyOptions;

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let Some(patch) = args.get(1) else {
        eprintln!("First argument must be a JSON patch array.");
        std::process::exit(1);
    };
    let options = ApplyOptions {
        atomic: args.iter().skip(2).any(|arg| arg == "--atomic"),
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match apply_patch_str(buf.trim(), patch, &options) {
        Ok(outcome) => {
            if let Err(e) = writeln!(io::stdout(), "{}", outcome.document) {
                eprintln!("{e}");
                std::process::exit(1);
            }
            if !outcome.failures.is_empty() {
                for failure in &outcome.failures {
                    eprintln!("{failure}");
                }
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
