//! Adam7 interlacing: the full image is decomposed into seven reduced
//! images, each a regular sub-sampling of the final raster, stored one
//! after another in the same IDAT stream and scattered back into place
//! once each is independently defiltered.

/// Starting row, starting column, row step and column step of each of the
/// seven Adam7 passes, in stream order.
pub const PASSES: [(u32, u32, u32, u32); 7] = [
    (0, 0, 8, 8),
    (0, 4, 8, 8),
    (4, 0, 4, 8),
    (0, 2, 4, 4),
    (2, 0, 2, 4),
    (0, 1, 2, 2),
    (1, 0, 1, 2),
];

/// Width and height of the reduced image produced by one Adam7 pass, given
/// the full image's dimensions.
pub fn pass_dimensions(pass: usize, width: u32, height: u32) -> (u32, u32) {
    let (start_row, start_col, row_step, col_step) = PASSES[pass];
    let pass_width = if width > start_col { (width - start_col + col_step - 1) / col_step } else { 0 };
    let pass_height = if height > start_row { (height - start_row + row_step - 1) / row_step } else { 0 };
    (pass_width, pass_height)
}

/// Scatters one fully-decoded, already-normalised reduced image (RGBA, one
/// `[u8; 4]` per pixel, row-major) into its place within the final raster.
pub fn scatter(pass: usize, width: u32, pixels: &[[u8; 4]], pass_width: u32, pass_height: u32, out: &mut [[u8; 4]]) {
    let (start_row, start_col, row_step, col_step) = PASSES[pass];
    for py in 0..pass_height {
        for px in 0..pass_width {
            let src = (py * pass_width + px) as usize;
            let dst_x = start_col + px * col_step;
            let dst_y = start_row + py * row_step;
            let dst = (dst_y * width + dst_x) as usize;
            out[dst] = pixels[src];
        }
    }
}
