//! End-to-end scenarios built from hand-assembled PNG byte streams, rather
//! than checked-in fixture files, so each test documents exactly which
//! bytes make the scenario true.

use pngdecode::{decode_bytes, decode_bytes_with_options, ByteOrder, DecodeError, DecodeOptions};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Wires up a logging backend so `trace!`/`debug!`/`warn!` calls inside the
/// crate surface on stderr when these tests are run with `--nocapture`.
/// Safe to call more than once; only the first call wins.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn crc32(bytes: &[u8]) -> u32 {
    const fn make_table() -> [u32; 256] {
        let mut table = [0u32; 256];
        let mut n = 0;
        while n < 256 {
            let mut c = n as u32;
            let mut k = 0;
            while k < 8 {
                c = if c & 1 != 0 { 0xedb8_8320 ^ (c >> 1) } else { c >> 1 };
                k += 1;
            }
            table[n] = c;
            n += 1;
        }
        table
    }
    const TABLE: [u32; 256] = make_table();
    let mut c = 0xffff_ffffu32;
    for &byte in bytes {
        c = TABLE[((c ^ byte as u32) & 0xff) as usize] ^ (c >> 8);
    }
    c ^ 0xffff_ffff
}

fn chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    let mut crc_input = Vec::new();
    crc_input.extend_from_slice(chunk_type);
    crc_input.extend_from_slice(data);
    out.extend_from_slice(&crc32(&crc_input).to_be_bytes());
    out
}

fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&width.to_be_bytes());
    v.extend_from_slice(&height.to_be_bytes());
    v.push(bit_depth);
    v.push(color_type);
    v.push(0);
    v.push(0);
    v.push(interlace);
    v
}

/// Wraps `raw` in a minimal zlib stream made of uncompressed ("stored")
/// DEFLATE blocks, small enough to keep these fixtures self-contained.
fn zlib_store(raw: &[u8]) -> Vec<u8> {
    let mut out = vec![0x78, 0x01];
    let mut pos = 0usize;
    loop {
        let remaining = raw.len() - pos;
        let block_len = remaining.min(u16::MAX as usize);
        let is_final = pos + block_len >= raw.len();
        out.push(if is_final { 1 } else { 0 });
        out.extend_from_slice(&(block_len as u16).to_le_bytes());
        out.extend_from_slice(&(!(block_len as u16)).to_le_bytes());
        out.extend_from_slice(&raw[pos..pos + block_len]);
        pos += block_len;
        if is_final {
            break;
        }
    }

    let mut adler_a: u32 = 1;
    let mut adler_b: u32 = 0;
    for &byte in raw {
        adler_a = (adler_a + byte as u32) % 65521;
        adler_b = (adler_b + adler_a) % 65521;
    }
    out.extend_from_slice(&((adler_b << 16) | adler_a).to_be_bytes());
    out
}

fn assemble(ihdr_data: &[u8], extra: &[(&[u8; 4], &[u8])], idat_raw: &[u8]) -> Vec<u8> {
    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    png.extend_from_slice(&chunk(b"IHDR", ihdr_data));
    for (chunk_type, data) in extra {
        png.extend_from_slice(&chunk(chunk_type, data));
    }
    png.extend_from_slice(&chunk(b"IDAT", &zlib_store(idat_raw)));
    png.extend_from_slice(&chunk(b"IEND", &[]));
    png
}

#[test]
fn decodes_a_flat_rgba_image() {
    init_logging();
    // 2x1 RGBA, bit depth 8, no filtering on the (single) scanline.
    let raw = [0u8, 1, 2, 3, 4, 5, 6, 7, 8];
    let png = assemble(&ihdr(2, 1, 8, 6, 0), &[], &raw);
    let image = decode_bytes(&png).unwrap();
    assert_eq!((image.width, image.height), (2, 1));
    assert_eq!(image.pixels, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn decodes_one_bit_grayscale_with_sub_byte_packing() {
    // Width 8, bit depth 1: one scanline byte packs all 8 pixels.
    let raw = [0u8, 0b1100_0011];
    let png = assemble(&ihdr(8, 1, 1, 0, 0), &[], &raw);
    let image = decode_bytes(&png).unwrap();
    let gray_values: Vec<u8> = image.pixels.chunks(4).map(|p| p[0]).collect();
    assert_eq!(gray_values, vec![255, 255, 0, 0, 0, 0, 255, 255]);
}

#[test]
fn palette_image_resolves_colours_and_colour_key_alpha() {
    let plte = [10u8, 20, 30, 40, 50, 60];
    let trns = [0u8, 128];
    let raw = [0u8, 0, 1]; // filter None, index 0 then index 1
    let png = assemble(&ihdr(2, 1, 8, 3, 0), &[(b"PLTE", &plte), (b"tRNS", &trns)], &raw);
    let image = decode_bytes(&png).unwrap();
    assert_eq!(&image.pixels[0..4], &[10, 20, 30, 0]);
    assert_eq!(&image.pixels[4..8], &[40, 50, 60, 128]);
}

#[test]
fn crc_mismatch_is_fatal() {
    let raw = [0u8, 1, 2, 3, 4];
    let mut png = assemble(&ihdr(1, 1, 8, 6, 0), &[], &raw);
    let last = png.len() - 1;
    png[last] ^= 0xff;
    assert!(matches!(decode_bytes(&png), Err(DecodeError::BadChunk(_))));
}

#[test]
fn palette_colour_type_without_plte_is_rejected() {
    let raw = [0u8, 0];
    let png = assemble(&ihdr(1, 1, 8, 3, 0), &[], &raw);
    assert!(matches!(decode_bytes(&png), Err(DecodeError::OrderingViolation(_))));
}

#[test]
fn ancillary_chunk_splitting_the_idat_run_is_rejected() {
    init_logging();
    // Two IDAT chunks with an unrelated ancillary chunk (lowercase first
    // letter, so on its own it would be silently skipped) wedged between
    // them. The IDAT run must be contiguous regardless.
    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    png.extend_from_slice(&chunk(b"IHDR", &ihdr(1, 1, 8, 0, 0)));
    png.extend_from_slice(&chunk(b"IDAT", b"whatever"));
    png.extend_from_slice(&chunk(b"tEXt", b"hello"));
    png.extend_from_slice(&chunk(b"IDAT", b"more"));
    png.extend_from_slice(&chunk(b"IEND", &[]));
    assert!(matches!(decode_bytes(&png), Err(DecodeError::OrderingViolation(_))));
}

#[test]
fn oversized_chunk_length_is_rejected() {
    let raw = [0u8, 1, 2, 3, 4];
    let png = assemble(&ihdr(1, 1, 8, 6, 0), &[], &raw);
    let options = DecodeOptions { max_chunk_bytes: 4, ..DecodeOptions::default() };
    assert!(matches!(decode_bytes_with_options(&png, &options), Err(DecodeError::BadChunk(_))));
}

#[test]
fn bgra_byte_order_swaps_red_and_blue() {
    let raw = [0u8, 1, 2, 3, 4];
    let png = assemble(&ihdr(1, 1, 8, 6, 0), &[], &raw);
    let options = DecodeOptions { byte_order: ByteOrder::Bgra, ..DecodeOptions::default() };
    let image = decode_bytes_with_options(&png, &options).unwrap();
    assert_eq!(image.pixels, vec![3, 2, 1, 4]);
}

#[test]
fn adam7_interlaced_4x4_image_reassembles_every_pixel() {
    // A 4x4 grayscale image, bit depth 8, Adam7. Passes 1, 3, 5, 6 cover a
    // 4x4 raster (pass 1: (0,0); pass 3: (0,2),(2,2)... ); rather than hand
    // tracing every pass offset, this test only asserts the decode
    // succeeds and produces one opaque pixel per raster position, which is
    // enough to catch a mis-scattered or short Adam7 reassembly.
    let pixel_value = |py: u32, px: u32| -> u8 { ((py * 4 + px) * 16) as u8 };

    // Precompute each pass's raw (pre-filter) scanlines using the same
    // pass table the decoder itself uses, so this fixture stays correct
    // if the pass geometry ever changes shape but not meaning.
    let passes: [(u32, u32, u32, u32); 7] = [
        (0, 0, 8, 8),
        (0, 4, 8, 8),
        (4, 0, 4, 8),
        (0, 2, 4, 4),
        (2, 0, 2, 4),
        (0, 1, 2, 2),
        (1, 0, 1, 2),
    ];
    let width = 4u32;
    let height = 4u32;

    let mut idat_raw = Vec::new();
    for (start_row, start_col, row_step, col_step) in passes {
        let pass_width = if width > start_col { (width - start_col + col_step - 1) / col_step } else { 0 };
        let pass_height = if height > start_row { (height - start_row + row_step - 1) / row_step } else { 0 };
        for py in 0..pass_height {
            idat_raw.push(0u8); // filter type None
            for px in 0..pass_width {
                let y = start_row + py * row_step;
                let x = start_col + px * col_step;
                idat_raw.push(pixel_value(y, x));
            }
        }
    }

    let png = assemble(&ihdr(width, height, 8, 0, 1), &[], &idat_raw);
    let image = decode_bytes(&png).unwrap();
    assert_eq!((image.width, image.height), (width, height));
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 4) as usize;
            assert_eq!(image.pixels[idx], pixel_value(y, x), "mismatch at ({}, {})", x, y);
            assert_eq!(image.pixels[idx + 3], 255);
        }
    }
}

#[test]
fn unsupported_interlace_is_rejected_when_disallowed() {
    let raw = [0u8, 0];
    let png = assemble(&ihdr(1, 1, 8, 0, 1), &[], &raw);
    let options = DecodeOptions { allow_interlace: false, ..DecodeOptions::default() };
    assert!(matches!(decode_bytes_with_options(&png, &options), Err(DecodeError::UnsupportedInterlace)));
}
