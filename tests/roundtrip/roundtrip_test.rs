use flate2::read::ZlibDecoder;
use pnginator::raster::MAX_ROW_WIDTH;
use pnginator::*;
use std::io::Read;

#[test]
fn roundtrip_boundary_lengths() {
    for len in [0, 1, 4095, 4096, 4097, 100_000] {
        let mut data = vec![0; len];
        randomize(&mut data);
        roundtrip_data(&data);
    }
}

#[test]
fn roundtrip_row_edges() {
    for len in [2 * MAX_ROW_WIDTH - 2, 2 * MAX_ROW_WIDTH - 1, 2 * MAX_ROW_WIDTH, 3 * MAX_ROW_WIDTH + 17] {
        let mut data = vec![7; len];
        randomize(&mut data);
        roundtrip_data(&data);
    }
}

/// Nonzero pseudo-random bytes, since zero ends the single-row bootstrap
fn randomize(data: &mut [u8]) {
    let mut seed = 1u32;
    for b in data {
        seed = 1103515245u32.wrapping_mul(seed).wrapping_add(12345);
        *b = ((seed >> 17) as u8 % 95) + 32;
    }
}

#[track_caller]
fn roundtrip_data(data: &[u8]) {
    let raster = rasterize(data);
    if data.len() < MAX_ROW_WIDTH {
        assert_eq!((raster.width, raster.height), (data.len() + 1, 1));
        assert_eq!(raster.data.last(), Some(&0));
    } else {
        assert_eq!(raster.width, MAX_ROW_WIDTH);
        assert_eq!(raster.height, (data.len() + 1 + MAX_ROW_WIDTH - 1) / MAX_ROW_WIDTH);
    }
    assert_eq!(raster.data.len(), raster.height * (raster.width + 1));
    assert_eq!(unrasterize(&raster, data.len()), data);

    let mut settings = CompressSettings::new();
    settings.set_fallback(true);
    let compressed = compress(&raster.data, &settings).unwrap();
    let mut inflated = Vec::new();
    ZlibDecoder::new(&compressed[..]).read_to_end(&mut inflated).unwrap();
    assert_eq!(inflated, raster.data);
}

/// What the bootstraps do: drop filter bytes, then read until zero (single row)
/// or skip the dummy pixel (multi row).
fn unrasterize(raster: &Raster, len: usize) -> Vec<u8> {
    let pixels: Vec<u8> = raster.data.chunks(raster.width + 1).flat_map(|line| line[1..].iter().copied()).collect();
    if raster.height == 1 {
        pixels.split(|&b| b == 0).next().unwrap_or(&[]).to_vec()
    } else {
        pixels[1..1 + len].to_vec()
    }
}
