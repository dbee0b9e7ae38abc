use crate::{Error, Result};
use std::io::Write;

/// 8 bytes PNG signature, aka the magic bytes
pub const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Largest payload a chunk length field may declare
const MAX_CHUNK_LEN: usize = (1 << 31) - 1;

/// Return the CRC of the bytes
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// One chunk to be written: length, type, data and (optionally) CRC.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    pub tag: [u8; 4],
    pub data: &'a [u8],
    /// Write the CRC after the data
    pub crc: bool,
    /// Declare 4 bytes less than `data.len()`, so the last 4 data bytes sit where the CRC
    /// is expected. Used together with `crc: false` to save the CRC of the chunk.
    pub overflow_into_crc: bool,
}

impl<'a> Chunk<'a> {
    pub fn new(tag: &[u8; 4], data: &'a [u8]) -> Self {
        Self { tag: *tag, data, crc: true, overflow_into_crc: false }
    }

    /// Value of the length field
    pub fn declared_len(&self) -> Result<u32> {
        let len = self.data.len();
        let too_large = || Error::ChunkTooLarge { tag: self.tag, len };
        if len > MAX_CHUNK_LEN {
            return Err(too_large());
        }
        let declared = if self.overflow_into_crc { len.checked_sub(4).ok_or_else(too_large)? } else { len };
        Ok(declared as u32)
    }

    /// Bytes `write_to` will produce
    pub fn encoded_len(&self) -> usize {
        8 + self.data.len() + if self.crc { 4 } else { 0 }
    }

    /// Writes the framed chunk. Stops at the first failed write; the sink keeps what was written.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W, section: &'static str) -> Result<usize> {
        let declared = self.declared_len()?;
        log::trace!("{} chunk: {} bytes, declared {}, crc {}", String::from_utf8_lossy(&self.tag), self.data.len(), declared, self.crc);
        /*1: length*/
        out.write_all(&declared.to_be_bytes()).map_err(Error::write(section))?;
        /*2: chunk name (4 letters)*/
        out.write_all(&self.tag).map_err(Error::write(section))?;
        /*3: the data*/
        out.write_all(self.data).map_err(Error::write(section))?;
        /*4: CRC (of the chunkname characters and the data)*/
        if self.crc {
            let mut crc = crc32fast::Hasher::new();
            crc.update(&self.tag);
            crc.update(self.data);
            out.write_all(&crc.finalize().to_be_bytes()).map_err(Error::write(section))?;
        }
        Ok(self.encoded_len())
    }
}

/// Borrowed view of a well-formed chunk (length, type, data, CRC) in a PNG byte stream.
#[derive(Debug, Clone, Copy)]
pub struct ChunkRef<'a> {
    data: &'a [u8],
}

impl<'a> ChunkRef<'a> {
    /// `data` starts at the chunk length field and may continue past the chunk
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        if data.len() < 12 {
            return Err(Error::Truncated { available: data.len() });
        }
        let len = read_u32(data) as usize;
        if len > MAX_CHUNK_LEN {
            let mut tag = [0; 4];
            tag.copy_from_slice(&data[4..8]);
            return Err(Error::ChunkTooLarge { tag, len });
        }
        if data.len() < len + 12 {
            return Err(Error::Truncated { available: data.len() });
        }
        Ok(Self { data: &data[..len + 12] })
    }

    pub fn len(&self) -> usize {
        self.data.len() - 12
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn name(&self) -> [u8; 4] {
        let mut tag = [0; 4];
        tag.copy_from_slice(&self.data[4..8]);
        tag
    }

    pub fn is_type<C: AsRef<[u8]>>(&self, name: C) -> bool {
        &self.name()[..] == name.as_ref()
    }

    pub fn data(&self) -> &'a [u8] {
        &self.data[8..self.data.len() - 4]
    }

    pub fn crc(&self) -> u32 {
        read_u32(&self.data[self.data.len() - 4..])
    }

    /// The CRC is taken of the data and the 4 chunk type letters, not the length
    pub fn check_crc(&self) -> bool {
        self.crc() == crc32(&self.data[4..self.data.len() - 4])
    }
}

fn read_u32(buffer: &[u8]) -> u32 {
    u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]])
}

/// Iterates chunks after the signature of a strictly framed PNG.
///
/// Output written with format hacks can't be walked this way; the chunk boundaries only
/// line up for lenient readers.
pub struct ChunksIter<'a> {
    data: &'a [u8],
}

impl<'a> ChunksIter<'a> {
    /// `png` must start with the signature
    pub fn new(png: &'a [u8]) -> Self {
        let data = png.strip_prefix(&SIGNATURE[..]).unwrap_or(&[]);
        Self { data }
    }
}

impl<'a> Iterator for ChunksIter<'a> {
    type Item = Result<ChunkRef<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        let ch = match ChunkRef::new(self.data) {
            Ok(ch) => ch,
            Err(e) => {
                self.data = &[];
                return Some(Err(e));
            },
        };
        self.data = &self.data[ch.len() + 12..];
        Some(Ok(ch))
    }
}
