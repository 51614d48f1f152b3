// See https://en.wikipedia.org/wiki/Tar_%28computing%29#UStar_format
use std::fmt;

/// Indicate for the type of file described by a header.
///
/// Each `Header` has an `entry_type` method returning an instance of this type
/// which can be used to inspect what the header is describing. Only regular
/// files can be listed or extracted; the other kinds exist so that rejections
/// can say what was found.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EntryType {
    byte: u8,
}

impl EntryType {
    /// Creates a new entry type from a raw byte.
    pub fn new(byte: u8) -> EntryType {
        EntryType { byte }
    }

    /// Returns whether this type represents a regular file.
    ///
    /// Old archives mark regular files with a NUL byte instead of `'0'`.
    pub fn is_file(&self) -> bool {
        self.byte == 0 || self.byte == b'0'
    }

    /// Returns the raw underlying byte that this entry type represents.
    pub fn as_byte(&self) -> u8 {
        self.byte
    }

    fn describe(&self) -> &'static str {
        match self.byte {
            0 | b'0' => "regular file",
            b'1' => "hard link",
            b'2' => "symlink",
            b'3' => "character device",
            b'4' => "block device",
            b'5' => "directory",
            b'6' => "fifo",
            b'7' => "contiguous file",
            b'g' => "pax global extensions",
            b'x' => "pax extensions",
            b'K' => "GNU long link",
            b'L' => "GNU long name",
            b'S' => "GNU sparse file",
            _ => "unknown",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.byte, self.describe())
    }
}
