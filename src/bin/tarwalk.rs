use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};

use tarwalk::{ExtractOptions, Operation, Request, TarError};

/// List or extract the regular files of a ustar archive
#[derive(Debug, Parser)]
#[clap(name = "tarwalk", version)]
#[clap(group(ArgGroup::new("operation").required(true).args(["list", "extract"])))]
struct App {
    /// List the entries of the archive
    #[clap(short = 't', long)]
    list: bool,
    /// Extract the entries of the archive
    #[clap(short = 'x', long)]
    extract: bool,
    /// The archive to read
    #[clap(short = 'f', long = "file")]
    archive: PathBuf,
    /// Print the names of extracted entries
    #[clap(short, long)]
    verbose: bool,
    /// Directory to extract into
    #[clap(short = 'C', long = "directory", default_value = ".")]
    directory: PathBuf,
    /// Set extracted files' mtime from the archive
    #[clap(long)]
    preserve_mtime: bool,
    /// Set extracted files' permissions from the archive
    #[clap(long)]
    preserve_permissions: bool,
    /// Reject headers with a bad checksum
    #[clap(long)]
    verify_checksums: bool,
    /// Write exactly the recorded size instead of whole blocks
    #[clap(long)]
    trim_padding: bool,
    /// Only process these members
    names: Vec<String>,
}

impl App {
    fn into_request(self) -> Request {
        let operation = if self.extract {
            Operation::Extract
        } else {
            Operation::List
        };
        Request {
            operation,
            archive: self.archive,
            names: self.names,
            verbose: self.verbose,
            verify_checksums: self.verify_checksums,
            extract: ExtractOptions {
                unpack_dir: self.directory,
                preserve_mtime: self.preserve_mtime,
                preserve_permissions: self.preserve_permissions,
                trim_padding: self.trim_padding,
            },
        }
    }
}

fn run(request: Request) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    tarwalk::run(&request, &mut out)
        .with_context(|| format!("failed to process `{}`", request.archive.display()))?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let request = App::parse().into_request();
    match run(request) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<TarError>() {
                Some(TarError::NameNotFound(names)) => {
                    for name in names {
                        eprintln!("tarwalk: {}: Not found in archive", name);
                    }
                    eprintln!("tarwalk: Exiting with failure status due to previous errors");
                }
                Some(TarError::UnexpectedEof) => {
                    eprintln!("tarwalk: Unexpected EOF in archive");
                    eprintln!("tarwalk: Error is not recoverable: exiting now");
                }
                _ => eprintln!("tarwalk: {:#}", err),
            }
            ExitCode::from(2)
        }
    }
}
