use std::io::{self, Read, Seek, SeekFrom};

use crate::block::{blocks_for_bytes, is_zero_block, BLOCK_SIZE};

/// Looks at the last two blocks of a stream of `len` bytes.
///
/// Returns the block count of the stream if it ends in a single zero block
/// preceded by a non-zero one. Streams shorter than two blocks are never
/// flagged. The read position is left wherever the tail read ends.
pub fn lone_zero_block<R: Read + Seek>(obj: &mut R, len: u64) -> io::Result<Option<u64>> {
    let tail_len = 2 * BLOCK_SIZE as u64;
    if len < tail_len {
        return Ok(None);
    }
    obj.seek(SeekFrom::Start(len - tail_len))?;
    let mut tail = [0; 2 * BLOCK_SIZE];
    obj.read_exact(&mut tail)?;

    let (second_last, last) = tail.split_at(BLOCK_SIZE);
    if is_zero_block(last) && !is_zero_block(second_last) {
        Ok(Some(blocks_for_bytes(len)))
    } else {
        Ok(None)
    }
}
