//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::process;

use log::{error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use huffpack::tools::cli::hufopts_init;
use huffpack::tools::file_io::run;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let options = hufopts_init();

    // Log to stderr so that -c output on stdout stays clean.
    if let Err(e) = TermLogger::init(
        options.verbose.level_filter(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not start the logger: {}", e);
    }
    options.report();

    //----- Figure out what we need to do and go do it
    if let Err(e) = run(&options) {
        error!("{}", e);
        process::exit(1);
    }
    info!("Done.");
}
