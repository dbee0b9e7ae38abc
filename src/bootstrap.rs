//! HTML unpackers stored in the custom chunk.
//!
//! A browser opening the PNG as HTML skips the binary junk, finds the `<img src=#>` pointing
//! at the document itself, draws it to a canvas and reads the grey values back as characters.
//! Both strings are executed verbatim, so every byte matters.

use crate::raster::MAX_ROW_WIDTH;

/// p01's single-pixel-row bootstrap, with Gasman's edits (`drawImage` moved out of the
/// `getImageData` arguments, `(1,eval)` for global evaluation).
///
/// Reads pixels right-to-left by drawing the image at decreasing x, until it reads a zero.
pub const SINGLE_ROW: &str = "<canvas id=c><img onload=with(c.getContext('2d'))for(p=e='';drawImage(this,p--,0),t=getImageData(0,0,1,1).data[0];)e+=String.fromCharCode(t);(1,eval)(e) src=#>";

/// p01's multi-row bootstrap, text before the row count.
///
/// The canvas width is set explicitly, since the default of 300 is too narrow.
/// `d[p+=4]` pre-increments, so the first pixel is never read (hence the dummy pixel).
const MULTI_ROW_HEAD: &str = "<canvas id=c><img onload=for(w=c.width=4096,a=c.getContext('2d'),a.drawImage(this,p=0,0),e='',d=a.getImageData(0,0,w,";
const MULTI_ROW_TAIL: &str = ").data;t=d[p+=4];)e+=String.fromCharCode(t);(1,eval)(e) src=#>";

// The canvas width in the bootstrap must agree with the raster row width
const _: () = assert!(MAX_ROW_WIDTH == 4096);

/// Unpacker for an image of `height` rows.
pub fn render(height: usize) -> String {
    if height <= 1 {
        SINGLE_ROW.to_owned()
    } else {
        format!("{MULTI_ROW_HEAD}{height}{MULTI_ROW_TAIL}")
    }
}
