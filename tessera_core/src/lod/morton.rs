/// Exclusive upper bound of tile-local pixel coordinates.
pub const MAX_COORD: f32 = 256.0;

/// Exclusive upper bound of Morton codes produced by [`morton`].
pub const MAX_MORTON: u32 = 1 << 16;

/// Interleaves the bits of the quantized coordinates: x takes the even bits, y the odd bits.
///
/// Coordinates are truncated to integers and clamped into `[0, 255]`.
///
/// ```
/// use tessera_core::lod::morton;
///
/// assert_eq!(morton(0.0, 0.0), 0);
/// assert_eq!(morton(1.0, 0.0), 1);
/// assert_eq!(morton(0.0, 1.0), 2);
/// assert_eq!(morton(255.9, 255.9), 0xFFFF);
/// ```
#[must_use]
pub fn morton(x: f32, y: f32) -> u32 {
	spread(quantize(x)) | (spread(quantize(y)) << 1)
}

fn quantize(value: f32) -> u32 {
	if value.is_nan() {
		return 0;
	}
	value.clamp(0.0, MAX_COORD - 1.0) as u32
}

fn spread(value: u32) -> u32 {
	let mut v = value & 0x00FF;
	v = (v | (v << 4)) & 0x0F0F;
	v = (v | (v << 2)) & 0x3333;
	(v | (v << 1)) & 0x5555
}
