//! A reader for USTAR archives.
//!
//! This library walks a tar archive [1] block by block and either lists the
//! names of its regular-file entries or extracts them to the filesystem,
//! optionally restricted to a set of member names. Entry bodies are streamed
//! straight from the archive; nothing is held in memory beyond one block.
//!
//! Only the POSIX ustar and old GNU header signatures are accepted, and only
//! regular files. Anything else aborts the run.
//!
//! [1]: http://en.wikipedia.org/wiki/Tar_%28computing%29
//!
//! # Examples
//!
//! ```no_run
//! use tarwalk::{Operation, Request};
//!
//! let request = Request::new(Operation::List, "foo.tar");
//! tarwalk::run(&request, std::io::stdout().lock()).unwrap();
//! ```

#![deny(missing_docs)]

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

pub use crate::archive::{Archive, Summary};
pub use crate::block::{blocks_for_bytes, decode_octal, padded_len, BLOCK_SIZE};
pub use crate::entry::{EntryAction, ExtractOptions};
pub use crate::entry_type::EntryType;
pub use crate::error::{Result, TarError};
pub use crate::filter::NameFilter;
pub use crate::header::Header;

mod archive;
mod block;
mod entry;
mod entry_type;
mod error;
mod filter;
mod footer;
mod header;

/// The two things a run can do with the selected entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Print entry names.
    List,
    /// Write entry bodies to files named after the entries.
    Extract,
}

/// A validated request to process one archive.
#[derive(Clone, Debug)]
pub struct Request {
    /// What to do with each selected entry.
    pub operation: Operation,
    /// Path of the archive to read.
    pub archive: PathBuf,
    /// Member names to restrict the run to; empty selects every entry.
    pub names: Vec<String>,
    /// Print names of extracted entries.
    pub verbose: bool,
    /// Reject headers whose checksum does not match.
    pub verify_checksums: bool,
    /// Where and how extracted entries are written.
    pub extract: ExtractOptions,
}

impl Request {
    /// Creates a request for every entry of `archive`, with everything else
    /// left at its default.
    pub fn new<P: Into<PathBuf>>(operation: Operation, archive: P) -> Request {
        Request {
            operation,
            archive: archive.into(),
            names: Vec::new(),
            verbose: false,
            verify_checksums: false,
            extract: ExtractOptions::default(),
        }
    }
}

/// Runs `request`, writing listed (or verbosely extracted) names to `out`.
///
/// The archive file is opened for the duration of the call and closed on
/// every return path.
pub fn run<W: Write>(request: &Request, out: W) -> Result<Summary> {
    let file = File::open(&request.archive).map_err(|e| {
        TarError::io(
            format!("failed to open `{}`", request.archive.display()),
            e,
        )
    })?;

    let mut action = match request.operation {
        Operation::List => EntryAction::List { out },
        Operation::Extract => EntryAction::Extract {
            out,
            verbose: request.verbose,
            options: request.extract.clone(),
        },
    };
    let mut filter = NameFilter::new(request.names.iter().cloned());

    let mut archive = Archive::new(BufReader::new(file));
    archive.set_verify_checksums(request.verify_checksums);
    archive.walk(&mut filter, &mut action)
}
