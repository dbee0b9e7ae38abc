//! Packs a script into a PNG that unpacks and runs itself when opened as HTML.
//!
//! The script becomes the pixels of an 8-bit greyscale image, compressed with zopfli (or zlib),
//! and a custom `jawh` chunk carries a tiny `<canvas>` bootstrap. Save the output as `.png.html`:
//! the browser renders the bootstrap, which loads the document itself as an image, reads the grey
//! values back into a string and `eval`s it.
//!
//! ```no_run
//! let mut encoder = pnginator::Encoder::new();
//! encoder.settings_mut().zlibsettings.set_iterations(std::num::NonZeroU64::new(15).unwrap());
//! let report = encoder.encode_file("demo.js".as_ref(), "demo.png.html".as_ref())?;
//! println!("{report}");
//! # Ok::<_, pnginator::Error>(())
//! ```
//!
//! By default the output uses format hacks: the custom chunk and `IDAT` have no CRC, the custom
//! chunk's length overlaps its CRC slot, and there's no `IEND`. Browsers don't mind, but strict
//! PNG decoders reject such files. Turn them off with [`Encoder::set_format_hacks`].

use std::fs;
use std::io::{BufWriter, Write};
use std::num::NonZeroU64;
use std::path::Path;

pub mod bootstrap;
pub mod chunk;
pub mod cli;
pub mod raster;
mod error;
mod report;
mod zlib;

pub use crate::chunk::{Chunk, ChunkRef, ChunksIter};
pub use crate::error::Error;
pub use crate::raster::{rasterize, Raster};
pub use crate::report::Report;
pub use crate::zlib::compress;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Custom ancillary chunk holding the HTML bootstrap
pub const BOOTSTRAP_CHUNK: [u8; 4] = *b"jawh";

/// Zopfli iterations unless configured otherwise
pub const DEFAULT_ITERATIONS: u64 = 10;

/// Compression backend and its tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressSettings {
    /// Use single-pass zlib (level 9) instead of zopfli
    pub use_fallback: bool,
    /// Zopfli only. More iterations take more time but can compress slightly better.
    pub iterations: NonZeroU64,
    /// Zopfli only
    pub block_splitting: bool,
}

impl CompressSettings {
    pub fn new() -> Self {
        Self {
            use_fallback: false,
            iterations: NonZeroU64::new(DEFAULT_ITERATIONS).unwrap_or(NonZeroU64::MIN),
            block_splitting: true,
        }
    }

    pub fn set_fallback(&mut self, use_fallback: bool) {
        self.use_fallback = use_fallback;
    }

    /// Zopfli needs at least one iteration, hence `NonZeroU64`
    pub fn set_iterations(&mut self, iterations: NonZeroU64) {
        self.iterations = iterations;
    }

    pub fn set_block_splitting(&mut self, block_splitting: bool) {
        self.block_splitting = block_splitting;
    }
}

impl Default for CompressSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    pub zlibsettings: CompressSettings,
    /// Omit CRCs of the custom chunk and `IDAT`, overflow the custom chunk into its CRC slot,
    /// and omit `IEND`. Saves 20 bytes.
    pub format_hacks: bool,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            zlibsettings: CompressSettings::new(),
            format_hacks: true,
        }
    }
}

/// Builds the PNG: signature, `IHDR`, bootstrap chunk, `IDAT` and (without hacks) `IEND`.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    settings: EncoderSettings,
}

impl Encoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut EncoderSettings {
        &mut self.settings
    }

    #[inline]
    pub fn set_format_hacks(&mut self, enable: bool) {
        self.settings.format_hacks = enable;
    }

    /// Packs `source` into a PNG in memory
    pub fn encode(&self, source: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_to(source, &mut out)?;
        Ok(out)
    }

    /// Packs `source` and streams the PNG to `out`.
    ///
    /// Chunks are written as soon as they're ready, so if compression or a write fails,
    /// `out` keeps everything up to that point.
    pub fn encode_to<W: Write + ?Sized>(&self, source: &[u8], out: &mut W) -> Result<Report> {
        let raster = rasterize(source);
        if !raster.is_multi_row() && source.contains(&0) {
            log::warn!("input contains a zero byte, the bootstrap will stop reading there");
        }
        let hacks = self.settings.format_hacks;

        out.write_all(&chunk::SIGNATURE).map_err(Error::write("PNG header"))?;
        let mut written = chunk::SIGNATURE.len();

        let header = ihdr(&raster)?;
        written += Chunk::new(b"IHDR", &header).write_to(out, "IHDR")?;

        let unpack = bootstrap::render(raster.height);
        let custom = Chunk {
            crc: !hacks,
            overflow_into_crc: hacks,
            ..Chunk::new(&BOOTSTRAP_CHUNK, unpack.as_bytes())
        };
        written += custom.write_to(out, "custom chunk")?;

        let compressed = compress(&raster.data, &self.settings.zlibsettings)?;
        written += Chunk { crc: !hacks, ..Chunk::new(b"IDAT", &compressed) }.write_to(out, "IDAT")?;

        if !hacks {
            written += Chunk::new(b"IEND", &[]).write_to(out, "IEND")?;
        }
        out.flush().map_err(Error::write("flush"))?;

        log::debug!("wrote {} bytes for {} source bytes", written, source.len());
        Ok(Report {
            input_size: source.len(),
            output_size: written,
            multi_row: raster.is_multi_row(),
        })
    }

    /// Reads the script at `input` and writes the PNG to `output`, overwriting it.
    ///
    /// Nothing is created if the input can't be read. A failure after that leaves a partial file.
    pub fn encode_file(&self, input: &Path, output: &Path) -> Result<Report> {
        let source = fs::read(input).map_err(|source| Error::InputRead { path: input.to_owned(), source })?;
        let file = fs::File::create(output).map_err(|source| Error::OutputOpen { path: output.to_owned(), source })?;
        let mut out = BufWriter::new(file);
        self.encode_to(&source, &mut out)
    }
}

/// 13 bytes: width, height, bit depth 8, color type 0 (grey), compression, filter and interlace 0
fn ihdr(raster: &Raster) -> Result<[u8; 13]> {
    let dim = |v: usize| u32::try_from(v).map_err(|_| Error::ChunkTooLarge { tag: *b"IHDR", len: v });
    let mut header = [0u8; 13];
    header[0..4].copy_from_slice(&dim(raster.width)?.to_be_bytes());
    header[4..8].copy_from_slice(&dim(raster.height)?.to_be_bytes());
    header[8] = 8;
    Ok(header)
}

/// Packs `source` with default settings
pub fn encode_memory(source: &[u8]) -> Result<Vec<u8>> {
    Encoder::new().encode(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let s = EncoderSettings::default();
        assert!(s.format_hacks);
        assert!(!s.zlibsettings.use_fallback);
        assert!(s.zlibsettings.block_splitting);
        assert_eq!(s.zlibsettings.iterations.get(), DEFAULT_ITERATIONS);
    }

    #[test]
    fn set_iterations_stores_value() {
        let mut s = CompressSettings::new();
        s.set_iterations(NonZeroU64::MIN);
        assert_eq!(s.iterations.get(), 1);
        s.set_iterations(NonZeroU64::new(200).unwrap());
        assert_eq!(s.iterations.get(), 200);
    }

    #[test]
    fn header_fields() {
        let h = ihdr(&rasterize(b"0123456789")).unwrap();
        assert_eq!(h, [0, 0, 0, 11, 0, 0, 0, 1, 8, 0, 0, 0, 0]);
        let h = ihdr(&rasterize(&[b'x'; 5000])).unwrap();
        assert_eq!(&h[..8], &[0, 0, 16, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn report_counts_written_bytes() {
        let mut enc = Encoder::new();
        enc.settings_mut().zlibsettings.set_fallback(true);
        let mut out = Vec::new();
        let report = enc.encode_to(b"alert(42)", &mut out).unwrap();
        assert_eq!(report.output_size, out.len());
        assert_eq!(report.input_size, 9);
        assert!(!report.multi_row);
    }
}
