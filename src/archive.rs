use std::io::{self, prelude::*, SeekFrom};

use log::{debug, trace, warn};

use crate::block::{is_zero_block, BLOCK_SIZE};
use crate::entry::EntryAction;
use crate::error::{Result, TarError};
use crate::filter::NameFilter;
use crate::footer;
use crate::Header;

/// A top-level representation of an archive file.
///
/// The archive is walked front to back exactly once per [`Archive::walk`],
/// starting from wherever the underlying object is positioned.
pub struct Archive<R: Read + Seek> {
    obj: R,
    pos: u64,
    verify_checksums: bool,
}

/// What a completed walk saw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of entry headers parsed.
    pub entries: u64,
    /// Number of entries handed to the action.
    pub selected: u64,
    /// Set when the archive ends in a single zero block; holds the block
    /// count of the stream.
    pub lone_zero_block: Option<u64>,
}

enum State {
    Reading,
    Selecting(Header),
    Skipping { next: u64 },
    Terminated,
}

impl<R: Read + Seek> Archive<R> {
    /// Create a new archive with the underlying object as the reader.
    pub fn new(obj: R) -> Archive<R> {
        Archive {
            obj,
            pos: 0,
            verify_checksums: false,
        }
    }

    /// Indicate whether header checksums are validated while walking.
    ///
    /// This flag is disabled by default; headers are accepted whatever their
    /// checksum field says.
    pub fn set_verify_checksums(&mut self, verify: bool) {
        self.verify_checksums = verify;
    }

    /// Walks every entry of this archive.
    ///
    /// Entries selected by `filter` are handed to `action` together with a
    /// reader over their body blocks. Traversal stops at the first zero block
    /// or at a short read. Afterwards the archive is checked for a truncated
    /// last entry, then for a lone zero block (only logged), and finally for
    /// requested names that never matched.
    ///
    /// Any error aborts the walk; nothing is retried.
    pub fn walk<W: Write>(
        &mut self,
        filter: &mut NameFilter,
        action: &mut EntryAction<W>,
    ) -> Result<Summary> {
        let (start, len) = self.bounds()?;
        self.pos = start;

        let mut summary = Summary::default();
        let mut state = State::Reading;
        loop {
            state = match state {
                State::Reading => match self.read_block()? {
                    Some(block) if !is_zero_block(&block) => State::Selecting(self.parse(&block)?),
                    _ => State::Terminated,
                },
                State::Selecting(header) => {
                    let body = self.pos;
                    let span = header.entry_size()?;
                    let next = body
                        .checked_add(span)
                        .ok_or_else(|| TarError::InvalidSize(span.to_string()))?;
                    summary.entries += 1;
                    debug!("entry `{}`: {} body bytes at {}", header.path(), span, body);

                    if filter.select(&header.path_bytes()) {
                        summary.selected += 1;
                        action.apply(&header, (&mut self.obj).take(span))?;
                    }
                    State::Skipping { next }
                }
                State::Skipping { next } => {
                    self.seek_to(next)?;
                    State::Reading
                }
                State::Terminated => break,
            };
        }

        // Seeking past the end is allowed, so a last entry that claims more
        // bytes than exist only shows up here.
        if self.pos > len {
            return Err(TarError::UnexpectedEof);
        }

        summary.lone_zero_block = footer::lone_zero_block(&mut self.obj, len)
            .map_err(|e| TarError::io("failed to read archive trailer", e))?;
        if let Some(block) = summary.lone_zero_block {
            warn!("A lone zero block at {}", block);
        }
        self.seek_to(self.pos)?;

        let missing: Vec<String> = filter.unmatched().map(String::from).collect();
        if !missing.is_empty() {
            return Err(TarError::NameNotFound(missing));
        }
        Ok(summary)
    }

    fn parse(&self, block: &[u8; BLOCK_SIZE]) -> Result<Header> {
        let header = Header::parse(block)?;
        if self.verify_checksums {
            header.verify_checksum()?;
        }
        Ok(header)
    }

    // Current position and total length of the underlying object.
    fn bounds(&mut self) -> Result<(u64, u64)> {
        let seek = |obj: &mut R| -> io::Result<(u64, u64)> {
            let start = obj.stream_position()?;
            let len = obj.seek(SeekFrom::End(0))?;
            obj.seek(SeekFrom::Start(start))?;
            Ok((start, len))
        };
        seek(&mut self.obj).map_err(|e| TarError::io("failed to determine archive length", e))
    }

    // Fills one block, returning `None` if the stream ends first.
    fn read_block(&mut self) -> Result<Option<[u8; BLOCK_SIZE]>> {
        let mut block = [0; BLOCK_SIZE];
        let mut read = 0;
        while read < BLOCK_SIZE {
            match self.obj.read(&mut block[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(TarError::io("failed to read archive block", e)),
            }
        }
        trace!("read {} bytes at {}", read, self.pos);
        self.pos += read as u64;
        Ok(if read == BLOCK_SIZE { Some(block) } else { None })
    }

    fn seek_to(&mut self, pos: u64) -> Result<()> {
        self.obj
            .seek(SeekFrom::Start(pos))
            .map_err(|e| TarError::io("failed to seek in archive", e))?;
        self.pos = pos;
        Ok(())
    }
}
