//! Target size arithmetic for card reduction.

/// Halve both dimensions (truncating) until neither exceeds `limit`.
pub fn halve_within_limit(width: u32, height: u32, limit: u32) -> (u32, u32) {
    let (mut w, mut h) = (width, height);
    while w > limit || h > limit {
        w /= 2;
        h /= 2;
    }
    (w, h)
}

/// Round dimensions up to a grid that suits mip-mapped textures.
///
/// The grid is 4 pixels, 8 when both sides exceed 512 and 32 when both exceed 1024.
pub fn mip_map_size(width: u32, height: u32) -> (u32, u32) {
    let mut divisor = 4;
    if width > 512 && height > 512 {
        divisor = 8;
    }
    if width > 1024 && height > 1024 {
        divisor = 32;
    }
    (width.div_ceil(divisor) * divisor, height.div_ceil(divisor) * divisor)
}

/// Largest size with the source aspect ratio that fits inside the bounding box.
///
/// Never upscales: a source already inside the box keeps its size.
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (w, h) = source;
    let (bw, bh) = (bounds.0.max(1), bounds.1.max(1));
    if w <= bw && h <= bh {
        return (w, h);
    }

    let (w64, h64, bw64, bh64) = (w as u64, h as u64, bw as u64, bh as u64);
    if w64 * bh64 > h64 * bw64 {
        let scaled = (h64 * bw64 + w64 / 2) / w64;
        (bw, scaled.clamp(1, bh64) as u32)
    } else {
        let scaled = (w64 * bh64 + h64 / 2) / h64;
        (scaled.clamp(1, bw64) as u32, bh)
    }
}
