//! Layout of source bytes as 8-bit grey PNG scanlines.
//!
//! The bootstraps read pixels back in two different ways, so there are two layouts:
//!
//! * short sources go into a single row, followed by a zero terminator. The single-row
//!   bootstrap walks the row until it hits a zero.
//! * longer sources are wrapped into rows of [`MAX_ROW_WIDTH`] pixels. The first pixel is a dummy,
//!   because the multi-row bootstrap pre-increments its read offset. The last row is padded with zeros.
//!
//! Every scanline starts with filter type 0 ("None"), so the pixel data is the source itself.

/// Sources shorter than this fit in a single row
pub const MAX_ROW_WIDTH: usize = 4096;

/// PNG filter type "None", written in front of every scanline
const FILTER_NONE: u8 = 0;

/// Unfiltered PNG scanlines of a one-channel, 8-bit image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    /// `height` scanlines of `1 + width` bytes each
    pub data: Vec<u8>,
}

impl Raster {
    /// `true` when the multi-row bootstrap has to be used
    #[inline]
    pub fn is_multi_row(&self) -> bool {
        self.height > 1
    }

    /// Bytes per scanline, including the filter type byte
    #[inline]
    pub fn stride(&self) -> usize {
        self.width + 1
    }

    /// Iterates pixel bytes of each row, without the filter type byte
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.stride()).map(|line| &line[1..])
    }

    /// Recovers `source_len` bytes of the source that was rasterized.
    ///
    /// Skips the multi-row dummy pixel; the terminator and padding fall beyond `source_len`.
    pub fn source_bytes(&self, source_len: usize) -> Vec<u8> {
        let skip = usize::from(self.is_multi_row());
        let mut out = Vec::with_capacity(self.width * self.height);
        for row in self.rows() {
            out.extend_from_slice(row);
        }
        out.drain(..skip.min(out.len()));
        out.truncate(source_len);
        out
    }
}

/// Lays out `source` as scanlines the matching bootstrap can read back.
pub fn rasterize(source: &[u8]) -> Raster {
    if source.len() < MAX_ROW_WIDTH {
        single_row(source)
    } else {
        multi_row(source)
    }
}

fn single_row(source: &[u8]) -> Raster {
    let width = source.len() + 1;
    let mut data = Vec::with_capacity(1 + width);
    data.push(FILTER_NONE);
    data.extend_from_slice(source);
    /*end marker for the unpacking loop*/
    data.push(0);
    log::debug!("single row raster: {}x1 for {} source bytes", width, source.len());
    Raster { width, height: 1, data }
}

fn multi_row(source: &[u8]) -> Raster {
    let width = MAX_ROW_WIDTH;
    let height = (source.len() + 1 + width - 1) / width;
    let stride = width + 1;
    let mut data = vec![0u8; stride * height];

    /*the dummy pixel takes the place of one source byte in the first row*/
    let (first, rest) = source.split_at(source.len().min(width - 1));
    data[2..2 + first.len()].copy_from_slice(first);
    for (line, chunk) in data[stride..].chunks_exact_mut(stride).zip(rest.chunks(width)) {
        line[0] = FILTER_NONE;
        line[1..1 + chunk.len()].copy_from_slice(chunk);
    }
    log::debug!("multi row raster: {}x{} for {} source bytes", width, height, source.len());
    Raster { width, height, data }
}
