use crate::{CompressSettings, Error, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;
use std::num::NonZeroU64;

/// A zlib stream producer. Both variants emit header, deflate data and Adler-32 trailer.
pub(crate) enum Compressor {
    /// Iterated optimal parsing; slow, smallest output
    Zopfli { iterations: NonZeroU64, block_splitting: bool },
    /// Single pass at level 9
    Flate,
}

impl Compressor {
    pub fn new(settings: &CompressSettings) -> Self {
        if settings.use_fallback {
            Self::Flate
        } else {
            Self::Zopfli {
                iterations: settings.iterations,
                block_splitting: settings.block_splitting,
            }
        }
    }

    pub fn compress(&self, inp: &[u8]) -> Result<Vec<u8>> {
        match *self {
            Self::Zopfli { iterations, block_splitting } => {
                let mut options = zopfli::Options::default();
                options.iteration_count = iterations;
                if !block_splitting {
                    /*a single block is never split*/
                    options.maximum_block_splits = 1;
                }
                log::debug!("zopfli: {} bytes, {} iterations, block splitting {}", inp.len(), iterations, block_splitting);
                let mut out = Vec::new();
                zopfli::compress(options, zopfli::Format::Zlib, inp, &mut out).map_err(Error::Compression)?;
                Ok(out)
            },
            Self::Flate => {
                log::debug!("zlib deflate: {} bytes at level 9", inp.len());
                let mut z = ZlibEncoder::new(Vec::with_capacity(inp.len() / 2 + 64), Compression::best());
                z.write_all(inp).map_err(Error::Compression)?;
                z.finish().map_err(Error::Compression)
            },
        }
    }
}

/// Compresses unfiltered scanlines with the backend chosen in `settings`.
pub fn compress(inp: &[u8], settings: &CompressSettings) -> Result<Vec<u8>> {
    Compressor::new(settings).compress(inp)
}
