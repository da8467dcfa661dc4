use std::env::consts;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;

/// Based is a small, dynamically-typed, expression-oriented scripting
/// language interpreted straight from source.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run; starts the interactive REPL when omitted.
    script: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    match args.script {
        Some(path) => {
            let source = fs::read_to_string(&path).unwrap_or_else(|err| {
                eprintln!("failed to read {}: {}", path.display(), err);
                process::exit(1);
            });
            if !basedlang::repl::run(&source, &mut io::stdout().lock()) {
                process::exit(1);
            }
        }
        None => {
            println!(
                "Based v{} on {} {}",
                env!("CARGO_PKG_VERSION"),
                consts::OS,
                consts::ARCH
            );
            println!("Type away!");
            basedlang::repl::start(io::stdin().lock(), &mut io::stdout().lock());
        }
    }
}
