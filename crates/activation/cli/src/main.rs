//! `activation` binary

use colored::Colorize;

fn main() {
    if let Err(err) = activation_cli::run() {
        eprintln!("{} {}", "✗".red(), err);
        std::process::exit(1);
    }
}
