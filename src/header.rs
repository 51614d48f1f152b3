use std::borrow::Cow;
use std::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::block::{decode_octal, padded_len, BLOCK_SIZE};
use crate::error::{Result, TarError};
use crate::EntryType;

const USTAR_MAGIC: &[u8; 6] = b"ustar\0";
const GNU_MAGIC: &[u8; 6] = b"ustar ";
const GNU_VERSION: &[u8; 2] = b" \0";

/// Representation of the header of an entry in an archive
///
/// The layout is the 512-byte USTAR header block, field for field. Values are
/// kept in their on-disk encoding and decoded on access.
#[derive(Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
#[allow(missing_docs)]
pub struct Header {
    pub name: [u8; 100],
    pub mode: [u8; 8],
    pub owner_id: [u8; 8],
    pub group_id: [u8; 8],
    pub size: [u8; 12],
    pub mtime: [u8; 12],
    pub cksum: [u8; 8],
    pub typeflag: [u8; 1],
    pub linkname: [u8; 100],

    // UStar format
    pub magic: [u8; 6],
    pub version: [u8; 2],
    pub owner_name: [u8; 32],
    pub group_name: [u8; 32],
    pub dev_major: [u8; 8],
    pub dev_minor: [u8; 8],
    pub prefix: [u8; 155],
    pub pad: [u8; 12],
}

impl Header {
    /// Interprets one block read from an archive as a header.
    ///
    /// The block must carry a ustar signature (`"ustar\0"` or the old GNU
    /// `"ustar  \0"`) and describe a regular file. The checksum is not looked
    /// at here, see [`Header::verify_checksum`].
    pub fn parse(block: &[u8; BLOCK_SIZE]) -> Result<Header> {
        let header: Header = zerocopy::transmute!(*block);
        if !header.is_ustar() && !header.is_gnu() {
            return Err(TarError::NotATar);
        }
        let kind = header.entry_type();
        if !kind.is_file() {
            return Err(TarError::UnsupportedType(kind));
        }
        Ok(header)
    }

    /// Returns a view into this header as a byte array.
    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        zerocopy::transmute_ref!(self)
    }

    /// Returns whether this header carries the POSIX ustar signature.
    pub fn is_ustar(&self) -> bool {
        &self.magic == USTAR_MAGIC
    }

    /// Returns whether this header carries the old GNU signature.
    pub fn is_gnu(&self) -> bool {
        &self.magic == GNU_MAGIC && &self.version == GNU_VERSION
    }

    /// Returns the pathname stored in this header as a byte array.
    ///
    /// For POSIX ustar headers a non-empty `prefix` field is joined in front
    /// of `name` with a `/`. Old GNU headers reuse that region for other
    /// metadata, so only `name` is used for them.
    pub fn path_bytes(&self) -> Cow<'_, [u8]> {
        let name = truncate(&self.name);
        let prefix = truncate(&self.prefix);
        if !self.is_ustar() || prefix.is_empty() {
            return Cow::Borrowed(name);
        }
        let mut bytes = Vec::with_capacity(prefix.len() + 1 + name.len());
        bytes.extend_from_slice(prefix);
        bytes.push(b'/');
        bytes.extend_from_slice(name);
        Cow::Owned(bytes)
    }

    /// Returns the pathname as a string, replacing invalid UTF-8 sequences.
    pub fn path(&self) -> Cow<'_, str> {
        match self.path_bytes() {
            Cow::Borrowed(b) => String::from_utf8_lossy(b),
            Cow::Owned(b) => Cow::Owned(String::from_utf8_lossy(&b).into_owned()),
        }
    }

    /// Returns the byte length of the entry body.
    ///
    /// May return an error if the field is corrupted.
    pub fn size(&self) -> Result<u64> {
        decode_octal(&self.size)
    }

    /// Returns the number of archive bytes the body occupies, including the
    /// padding up to the next block boundary.
    pub fn entry_size(&self) -> Result<u64> {
        padded_len(self.size()?)
    }

    /// Returns the mode bits for this file
    pub fn mode(&self) -> Result<u32> {
        decode_octal(&self.mode).map(|m| (m & 0o7777) as u32)
    }

    /// Returns the last modification time in Unix time format
    pub fn mtime(&self) -> Result<u64> {
        decode_octal(&self.mtime)
    }

    /// Returns the checksum field of this header.
    pub fn cksum(&self) -> Result<u64> {
        decode_octal(&self.cksum)
    }

    /// Returns the type of file described by this header.
    pub fn entry_type(&self) -> EntryType {
        EntryType::new(self.typeflag[0])
    }

    /// Computes the checksum of this header: the sum of every byte, with the
    /// checksum field itself counted as spaces.
    pub fn compute_cksum(&self) -> u64 {
        let bytes = self.as_bytes();
        let sum: u64 = bytes[..148]
            .iter()
            .chain(&bytes[156..])
            .map(|b| u64::from(*b))
            .sum();
        sum + 8 * u64::from(b' ')
    }

    /// Checks the stored checksum against the header contents.
    pub fn verify_checksum(&self) -> Result<()> {
        let expected = self.cksum()?;
        let computed = self.compute_cksum();
        if expected != computed {
            return Err(TarError::ChecksumMismatch { expected, computed });
        }
        Ok(())
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("path", &self.path())
            .field("entry_type", &self.entry_type())
            .field("size", &self.size().ok())
            .field("is_ustar", &self.is_ustar())
            .field("is_gnu", &self.is_gnu())
            .finish()
    }
}

pub(crate) fn truncate(slice: &[u8]) -> &[u8] {
    match slice.iter().position(|i| *i == 0) {
        Some(i) => &slice[..i],
        None => slice,
    }
}
