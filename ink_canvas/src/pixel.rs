//! Packed `0xAARRGGBB` pixels with straight (non-premultiplied) alpha.

pub const TRANSPARENT: u32 = 0x0000_0000;

pub fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

pub fn unpack(c: u32) -> (u8, u8, u8, u8) {
    ((c >> 24) as u8, (c >> 16) as u8, (c >> 8) as u8, c as u8)
}

pub fn alpha(c: u32) -> u8 { (c >> 24) as u8 }

/// Source-over: `src` painted on top of `dst`.
pub fn over(dst: u32, src: u32) -> u32 {
    let (sa, sr, sg, sb) = unpack(src);
    if sa == 0xFF { return src; }
    if sa == 0    { return dst; }
    let (da, dr, dg, db) = unpack(dst);

    let sa = sa as f32 / 255.0;
    let da = da as f32 / 255.0;
    let oa = sa + da * (1.0 - sa);
    if oa <= 0.0 { return TRANSPARENT; }

    let mix = |s: u8, d: u8| {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / oa).round() as u8
    };
    argb((oa * 255.0).round() as u8, mix(sr, dr), mix(sg, dg), mix(sb, db))
}

/// Destination-out: `src`'s alpha punches through `dst`.  Color channels are
/// kept; a pixel left with zero alpha collapses to [`TRANSPARENT`].
pub fn erase(dst: u32, src: u32) -> u32 {
    let sa = alpha(src) as f32 / 255.0;
    let (da, r, g, b) = unpack(dst);
    let oa = (da as f32 * (1.0 - sa)).round() as u8;
    if oa == 0 { TRANSPARENT } else { argb(oa, r, g, b) }
}
