/*!
# `WebPDec`: Image
*/

use crate::DecodeError;
use rgb::{
	FromSlice,
	RGBA8,
};
use std::ops::{
	Deref,
	DerefMut,
};



#[derive(Debug, Default, Clone, Eq, PartialEq)]
/// # NRGBA Image.
///
/// This holds decoded pixels as a contiguous `u8` buffer using 4 bytes per
/// pixel: red, green, blue, alpha. Alpha is _not_ premultiplied into the
/// color channels. Rows are stored top to bottom with no padding, so the
/// stride is always `width * 4`.
///
/// The underlying buffer can be accessed through `Deref` as an `&[u8]`.
pub struct Nrgba {
	buf: Vec<u8>,
	width: usize,
	height: usize,
}

impl Deref for Nrgba {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.buf }
}

impl DerefMut for Nrgba {
	#[inline]
	fn deref_mut(&mut self) -> &mut Self::Target { &mut self.buf }
}

impl Nrgba {
	#[must_use]
	/// # New.
	///
	/// Allocate a new, zeroed (fully transparent black) image.
	///
	/// If the buffer cannot be allocated, an empty 0x0 image is returned
	/// instead; use [`Nrgba::try_new`] to find out why.
	pub fn new(width: usize, height: usize) -> Self {
		Self::try_new(width, height).unwrap_or_default()
	}

	/// # Try New.
	///
	/// Allocate a new, zeroed image.
	///
	/// ## Errors
	///
	/// Returns [`DecodeError::Overflow`] if `width * height * 4` overflows
	/// `usize` or the allocation fails.
	pub fn try_new(width: usize, height: usize) -> Result<Self, DecodeError> {
		let len = buffer_len(width, height).ok_or(DecodeError::Overflow)?;
		let mut buf = Vec::new();
		buf.try_reserve_exact(len).map_err(|_| DecodeError::Overflow)?;
		buf.resize(len, 0);
		Ok(Self { buf, width, height })
	}

	#[must_use]
	/// # From Raw.
	///
	/// Wrap an existing RGBA buffer. This returns `None` if the buffer length
	/// does not match the dimensions.
	pub fn from_raw(width: usize, height: usize, buf: Vec<u8>) -> Option<Self> {
		if Some(buf.len()) == buffer_len(width, height) {
			Some(Self { buf, width, height })
		}
		else { None }
	}

	/// # Reset.
	///
	/// Reshape the image to the new dimensions and zero every byte, reusing
	/// the existing allocation where possible.
	///
	/// If the new size cannot be allocated, the image is left empty (0x0).
	pub(crate) fn reset(&mut self, width: usize, height: usize) {
		self.buf.clear();
		match buffer_len(width, height) {
			Some(len) if self.buf.try_reserve_exact(len).is_ok() => {
				self.buf.resize(len, 0);
				self.width = width;
				self.height = height;
			},
			_ => {
				self.width = 0;
				self.height = 0;
			},
		}
	}

	#[must_use]
	/// # Into Raw.
	pub fn into_raw(self) -> Vec<u8> { self.buf }
}

impl Nrgba {
	#[must_use]
	#[inline]
	/// # Width.
	pub const fn width(&self) -> usize { self.width }

	#[must_use]
	#[inline]
	/// # Height.
	pub const fn height(&self) -> usize { self.height }

	#[must_use]
	#[inline]
	/// # Stride.
	///
	/// The number of bytes per row.
	pub const fn stride(&self) -> usize { self.width * 4 }

	#[must_use]
	/// # Pixels.
	pub fn pixels(&self) -> &[RGBA8] { self.buf.as_rgba() }

	#[must_use]
	/// # Pixel.
	///
	/// Return the pixel at the given position, or `None` if out of bounds.
	pub fn pixel(&self, x: usize, y: usize) -> Option<RGBA8> {
		if x < self.width && y < self.height {
			self.pixels().get(y * self.width + x).copied()
		}
		else { None }
	}
}



/// # Buffer Length.
fn buffer_len(width: usize, height: usize) -> Option<usize> {
	width.checked_mul(height).and_then(|x| x.checked_mul(4))
}
