use clap::Parser;
use fmf_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    match commands::run(args) {
        Ok(true) => process::exit(0),
        // Problems were found and already reported by the command
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
