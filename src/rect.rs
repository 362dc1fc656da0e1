/*!
# `WebPDec`: Points and Rectangles
*/

use std::os::raw::c_int;



#[derive(Debug, Default, Clone, Copy, Eq, Hash, PartialEq)]
/// # Point.
///
/// Coordinates use the same integer type as the `libwebp` option fields they
/// end up in.
pub struct Point {
	/// # Horizontal.
	pub x: c_int,

	/// # Vertical.
	pub y: c_int,
}

impl Point {
	/// # Origin.
	pub const ZERO: Self = Self::new(0, 0);

	#[must_use]
	/// # New.
	pub const fn new(x: c_int, y: c_int) -> Self { Self { x, y } }
}



#[derive(Debug, Default, Clone, Copy, Eq, Hash, PartialEq)]
/// # Rectangle.
///
/// A `min`/`max` corner pair, stored exactly as given. Unlike most rectangle
/// types the corners are never swapped or normalized, because the decoder
/// options read them individually (see [`DecodeOptions`](crate::DecodeOptions)).
pub struct Rect {
	/// # Minimum Corner.
	pub min: Point,

	/// # Maximum Corner.
	pub max: Point,
}

impl Rect {
	/// # Zero.
	///
	/// Both corners at the origin; used to mean "disabled".
	pub const ZERO: Self = Self::new(0, 0, 0, 0);

	#[must_use]
	/// # New.
	pub const fn new(x0: c_int, y0: c_int, x1: c_int, y1: c_int) -> Self {
		Self {
			min: Point::new(x0, y0),
			max: Point::new(x1, y1),
		}
	}

	#[must_use]
	/// # Is Enabled?
	///
	/// Cropping and scaling are only switched on when both coordinates of the
	/// _maximum_ corner are positive. The minimum corner plays no part.
	pub const fn is_enabled(self) -> bool { 0 < self.max.x && 0 < self.max.y }
}
