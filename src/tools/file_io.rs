//! Whole-file front end for the codec: read the input file, run one codec call, put the
//! result where the options say.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::info;

use crate::compression::compress::compress;
use crate::compression::decompress::decompress;
use crate::error::Result;

use super::cli::{HufOpts, Mode, Output};

/// Carry out whatever the options ask for.
pub fn run(opts: &HufOpts) -> Result<()> {
    match opts.op_mode {
        Mode::Zip => compress_file(opts),
        Mode::Unzip => decompress_file(opts),
        Mode::Test => test_file(opts),
    }
}

/// Compress the input file defined in opts <HufOpts>.
pub fn compress_file(opts: &HufOpts) -> Result<()> {
    let data = fs::read(&opts.file)?;
    let output = compress(&data)?;
    write_output(opts, &output)?;
    finish(opts)
}

/// Decompress the input file defined in opts <HufOpts>.
pub fn decompress_file(opts: &HufOpts) -> Result<()> {
    let data = fs::read(&opts.file)?;
    let output = decompress(&data)?;
    write_output(opts, &output)?;
    finish(opts)
}

/// Decompress in memory and report whether the file is sound. Writes nothing.
pub fn test_file(opts: &HufOpts) -> Result<()> {
    let data = fs::read(&opts.file)?;
    // A failure is reported once, by the caller.
    let output = decompress(&data)?;
    info!(
        "{}: ok ({} bytes decompress to {} bytes)",
        opts.file.display(),
        data.len(),
        output.len()
    );
    Ok(())
}

fn write_output(opts: &HufOpts, output: &[u8]) -> Result<()> {
    match &opts.output {
        Output::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(output)?;
            handle.flush()?;
        }
        Output::File(path) => {
            write_file(path, output, opts.force_overwrite)?;
            info!("Wrote {} bytes to {}", output.len(), path.display());
        }
        Output::Discard => {}
    }
    Ok(())
}

/// Write `output` to `path`. Without `force` an existing file is left alone and the call fails.
fn write_file(path: &Path, output: &[u8], force: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut f = options.open(path).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "output file {} already exists, use -f to overwrite it",
                path.display()
            ),
        ),
        _ => e,
    })?;
    f.write_all(output)?;
    f.flush()
}

/// Remove the input once its replacement is safely written.
fn finish(opts: &HufOpts) -> Result<()> {
    if !opts.keep_input_files {
        fs::remove_file(&opts.file)?;
        info!("Removed {}", opts.file.display());
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::HuffError;
    use crate::tools::cli::{default_output, Verbosity};
    use std::path::PathBuf;

    /// Fresh scratch directory per test.
    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("huffpack-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn opts(file: &Path, op_mode: Mode, keep: bool, force: bool) -> HufOpts {
        HufOpts {
            file: file.to_path_buf(),
            op_mode,
            output: match op_mode {
                Mode::Test => Output::Discard,
                _ => Output::File(default_output(file, op_mode)),
            },
            force_overwrite: force,
            keep_input_files: keep,
            verbose: Verbosity::Quiet,
        }
    }

    #[test]
    fn file_round_trip_test() {
        let dir = scratch("round-trip");
        let original = b"so much depends upon a red wheel barrow glazed with rain water".repeat(20);
        let plain = dir.join("poem.txt");
        fs::write(&plain, &original).unwrap();

        run(&opts(&plain, Mode::Zip, false, false)).unwrap();
        let packed = dir.join("poem.txt.hpk");
        assert!(packed.exists());
        assert!(!plain.exists());

        run(&opts(&packed, Mode::Test, true, false)).unwrap();
        assert!(!plain.exists());

        run(&opts(&packed, Mode::Unzip, true, false)).unwrap();
        assert!(packed.exists());
        assert_eq!(fs::read(&plain).unwrap(), original);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn refuses_overwrite_test() {
        let dir = scratch("overwrite");
        let plain = dir.join("data.bin");
        fs::write(&plain, b"abracadabra").unwrap();
        let packed = dir.join("data.bin.hpk");
        fs::write(&packed, b"keep me").unwrap();

        match run(&opts(&plain, Mode::Zip, false, false)) {
            Err(HuffError::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::AlreadyExists);
                assert!(e.to_string().contains("-f"));
            }
            other => panic!("expected an overwrite refusal, got {:?}", other),
        }
        assert_eq!(fs::read(&packed).unwrap(), b"keep me");
        assert!(plain.exists());

        run(&opts(&plain, Mode::Zip, true, true)).unwrap();
        assert_eq!(
            decompress(&fs::read(&packed).unwrap()).unwrap(),
            b"abracadabra"
        );
        assert!(plain.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn corrupt_file_test() {
        let dir = scratch("corrupt");
        let bad = dir.join("bad.hpk");
        fs::write(&bad, b"HPK\x01C\x00\x02\x01").unwrap();

        assert!(matches!(
            run(&opts(&bad, Mode::Test, true, false)),
            Err(HuffError::CorruptStream(_))
        ));
        assert!(matches!(
            run(&opts(&bad, Mode::Unzip, false, false)),
            Err(HuffError::CorruptStream(_))
        ));
        // Nothing written, input untouched.
        assert!(!dir.join("bad").exists());
        assert!(bad.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_file_test() {
        let dir = scratch("empty");
        let empty = dir.join("empty.txt");
        fs::write(&empty, b"").unwrap();
        assert!(matches!(
            run(&opts(&empty, Mode::Zip, false, false)),
            Err(HuffError::EmptyInput)
        ));
        assert!(empty.exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
