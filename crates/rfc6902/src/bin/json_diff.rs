//! `json-diff` — print the JSON Patch (RFC 6902) between two documents.
//!
//! Usage:
//!   json-diff <input-file> <output-file> [--tests]
//!
//! With `--tests` the patch is preceded by `test` operations guarding
//! against concurrent modification of the input.

use std::fs;
use std::io::{self, Write};

use rfc6902::cli::{diff_str, init_logging};

fn read(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("{path}: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let (Some(input), Some(output)) = (args.get(1), args.get(2)) else {
        eprintln!("Usage: json-diff <input-file> <output-file> [--tests]");
        std::process::exit(1);
    };
    let guarded = args.iter().skip(3).any(|arg| arg == "--tests");

    match diff_str(&read(input), &read(output), guarded) {
        Ok(patch) => {
            if let Err(e) = writeln!(io::stdout(), "{patch}") {
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
