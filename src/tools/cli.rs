use std::path::{Path, PathBuf};
use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{info, LevelFilter};

/// Suffix appended to compressed files.
pub const SUFFIX: &str = "hpk";
/// Suffix used when a decompressed file has no `.hpk` to strip.
const OUT_SUFFIX: &str = "out";

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn from_level(v: u8) -> Self {
        match v {
            0 => Verbosity::Quiet,
            1 => Verbosity::Errors,
            2 => Verbosity::Warnings,
            3 => Verbosity::Info,
            4 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Errors => LevelFilter::Error,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Where the result goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    File(PathBuf),
    Stdout,
    /// Test mode writes nothing.
    Discard,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::File(path) => write!(f, "{}", path.display()),
            Output::Stdout => write!(f, "stdout"),
            Output::Discard => write!(f, "nowhere"),
        }
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Huffman compression of single files",
    long_about = "
    Compresses a file with a Huffman code built from its own byte frequencies. The code tree
    is stored in front of the packed data, so every compressed file is self-contained.

    If invoked without a mode flag, huffpack compresses FILE into FILE.hpk."
)]
pub struct Args {
    /// File to process
    #[clap()]
    filename: PathBuf,

    /// Compress the input file (the default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Decompress the input file
    #[clap(short = 'd', long = "decompress", conflicts_with = "compress")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test", conflicts_with_all = &["compress", "decompress"])]
    test: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Write output to this file instead of the derived name
    #[clap(short = 'o', long = "output", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Keep input file
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Sets verbosity. 0 is silent, 5 is chatty
    #[clap(short = 'v', long = "verbosity", default_value_t = 3)]
    v: u8,
}

/// Every user settable option that controls program behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HufOpts {
    /// Input file
    pub file: PathBuf,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HufOpts {
    /// Put command line information from CLAP into our internal structure.
    pub fn from_args(args: Args) -> Self {
        let op_mode = if args.test {
            Mode::Test
        } else if args.decompress {
            Mode::Unzip
        } else {
            Mode::Zip
        };

        let output = match (op_mode, args.stdout, args.output) {
            (Mode::Test, _, _) => Output::Discard,
            (_, true, _) => Output::Stdout,
            (_, false, Some(path)) => Output::File(path),
            (mode, false, None) => Output::File(default_output(&args.filename, mode)),
        };

        Self {
            file: args.filename,
            op_mode,
            output,
            force_overwrite: args.force,
            // Nothing replaces the input when the result goes to stdout or nowhere.
            keep_input_files: args.keep || args.stdout || args.test,
            verbose: Verbosity::from_level(args.v),
        }
    }

    /// Report the settings to the user (at info level).
    pub fn report(&self) {
        info!("---- huffpack Initialization Start ----");
        info!("Verbosity set to {}", log::max_level());
        info!("Operational mode set to {}", self.op_mode);
        info!("Getting input from the file {}", self.file.display());
        info!("Sending output to {}", self.output);
        if self.force_overwrite {
            info!("Forcing file overwriting")
        };
        if self.keep_input_files {
            info!("Keeping input files")
        };
        info!("---- huffpack Initialization End ----");
    }
}

/// Compressed files get `.hpk` appended. Decompressed files lose it, or gain `.out` when
/// there is nothing to strip.
pub fn default_output(input: &Path, mode: Mode) -> PathBuf {
    match mode {
        Mode::Zip => append_extension(input, SUFFIX),
        Mode::Unzip | Mode::Test => {
            if input.extension().map_or(false, |ext| ext == SUFFIX) {
                input.with_extension("")
            } else {
                append_extension(input, OUT_SUFFIX)
            }
        }
    }
}

fn append_extension(input: &Path, ext: &str) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Parse the process arguments into options.
pub fn hufopts_init() -> HufOpts {
    HufOpts::from_args(Args::parse())
}
