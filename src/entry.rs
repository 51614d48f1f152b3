use std::fs;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use filetime::FileTime;
use log::{debug, warn};

use crate::error::{Result, TarError};
use crate::Header;

/// What to do with each selected entry.
///
/// The variant is picked once per run; the walker calls [`EntryAction::apply`]
/// for every entry the name filter lets through.
pub enum EntryAction<W: Write> {
    /// Print the entry name, one per line.
    List {
        /// Sink for entry names.
        out: W,
    },
    /// Write the entry body to the filesystem.
    Extract {
        /// Sink for entry names when `verbose` is set.
        out: W,
        /// Print each name once its file has been written.
        verbose: bool,
        /// Where and how files are written.
        options: ExtractOptions,
    },
}

/// Knobs for [`EntryAction::Extract`].
#[derive(Clone, Debug, Default)]
pub struct ExtractOptions {
    /// Directory the entry names are resolved against. Empty means the
    /// current directory.
    pub unpack_dir: PathBuf,
    /// Set the mtime of written files from the header.
    pub preserve_mtime: bool,
    /// Apply the header mode bits to written files.
    pub preserve_permissions: bool,
    /// Write exactly `size` bytes instead of the whole block-rounded body.
    pub trim_padding: bool,
}

impl<W: Write> EntryAction<W> {
    /// Runs this action for one entry.
    ///
    /// `body` yields the entry's body blocks, padding included, and nothing
    /// past them. Whatever is left unread is skipped by the caller.
    pub fn apply<R: Read>(&mut self, header: &Header, body: R) -> Result<()> {
        match self {
            EntryAction::List { out } => print_name(out, header),
            EntryAction::Extract {
                out,
                verbose,
                options,
            } => {
                if options.unpack(header, body)? && *verbose {
                    print_name(out, header)?;
                }
                Ok(())
            }
        }
    }

    /// Unwrap this action, returning the output sink.
    pub fn into_inner(self) -> W {
        match self {
            EntryAction::List { out } | EntryAction::Extract { out, .. } => out,
        }
    }
}

fn print_name<W: Write>(out: &mut W, header: &Header) -> Result<()> {
    out.write_all(&header.path_bytes())
        .and_then(|()| out.write_all(b"\n"))
        .and_then(|()| out.flush())
        .map_err(|e| TarError::io("failed to write entry name", e))
}

impl ExtractOptions {
    /// Writes the entry to disk, returning `false` if its name was refused.
    fn unpack<R: Read>(&self, header: &Header, body: R) -> Result<bool> {
        let name = header.path_bytes();
        let dst = match self.target(&name) {
            Some(dst) => dst,
            None => {
                warn!(
                    "skipping `{}`: not a safe path to extract to",
                    String::from_utf8_lossy(&name)
                );
                return Ok(false);
            }
        };

        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TarError::io(format!("failed to create `{}`", parent.display()), e)
            })?;
        }

        let len = if self.trim_padding {
            header.size()?
        } else {
            header.entry_size()?
        };
        {
            let mut f = fs::File::create(&dst).map_err(|e| {
                TarError::io(format!("failed to create `{}`", dst.display()), e)
            })?;
            let written = io::copy(&mut body.take(len), &mut f).map_err(|e| {
                TarError::io(
                    format!("failed to unpack `{}` into `{}`", header.path(), dst.display()),
                    e,
                )
            })?;
            debug!("wrote {} bytes to {}", written, dst.display());
        }

        if self.preserve_mtime {
            let mtime = FileTime::from_unix_time(header.mtime()? as i64, 0);
            filetime::set_file_mtime(&dst, mtime).map_err(|e| {
                TarError::io(format!("failed to set mtime for `{}`", dst.display()), e)
            })?;
        }
        if self.preserve_permissions {
            let mode = header.mode()?;
            set_perms(&dst, mode).map_err(|e| {
                TarError::io(
                    format!("failed to set permissions to {:o} for `{}`", mode, dst.display()),
                    e,
                )
            })?;
        }
        Ok(true)
    }

    // Leading '/' characters, root paths and '.' components are dropped. A
    // name containing '..' anywhere, or one that reduces to nothing, is
    // refused.
    fn target(&self, name: &[u8]) -> Option<PathBuf> {
        let path = bytes2path(name)?;
        let mut dst = self.unpack_dir.clone();
        for part in path.components() {
            match part {
                Component::Prefix(..) | Component::RootDir | Component::CurDir => continue,
                Component::ParentDir => return None,
                Component::Normal(part) => dst.push(part),
            }
        }
        if dst == self.unpack_dir {
            return None;
        }
        Some(dst)
    }
}

#[cfg(unix)]
fn bytes2path(bytes: &[u8]) -> Option<&Path> {
    use std::ffi::OsStr;
    use std::os::unix::prelude::*;

    Some(Path::new(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn bytes2path(bytes: &[u8]) -> Option<&Path> {
    std::str::from_utf8(bytes).ok().map(Path::new)
}

#[cfg(unix)]
fn set_perms(dst: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::prelude::*;

    fs::set_permissions(dst, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_perms(dst: &Path, mode: u32) -> io::Result<()> {
    let mut perm = fs::metadata(dst)?.permissions();
    perm.set_readonly(mode & 0o200 != 0o200);
    fs::set_permissions(dst, perm)
}
