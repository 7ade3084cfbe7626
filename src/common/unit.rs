//! Length and font-size units used by DrawingML.

pub const EMUS_PER_INCH: i64 = 914_400;

/// DrawingML font sizes (`sz`) are stored in hundredths of a point.
pub const CENTIPOINTS_PER_PT: f64 = 100.0;

#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * CENTIPOINTS_PER_PT).round().max(0.0) as u32
}

#[inline]
pub fn centipoints_to_pt(centipoints: u32) -> f64 {
    f64::from(centipoints) / CENTIPOINTS_PER_PT
}

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64) as i64
}
