/*!
# `WebPDec`: Decoding

The pixel work is all done by `libwebp`. This module just reads the encoded
bytes, sizes and acquires the output image, and hands everything to
`WebPDecode` along with the translated [`DecoderConfig`](crate::DecoderConfig).
*/

use crate::{
	DecodeError,
	DecodeOptions,
	DefaultImageFactory,
	ImageFactory,
	Nrgba,
};
use libwebp_sys::{
	VP8_STATUS_OK,
	WEBP_MAX_DIMENSION,
	WebPBitstreamFeatures,
	WebPDecode,
	WebPGetFeatures,
};
use log::debug;
use std::{
	error::Error,
	fmt,
	io::Read,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Bitstream Format.
pub enum BitstreamFormat {
	/// # Undefined (or mixed).
	Undefined,

	/// # Lossy (VP8).
	Lossy,

	/// # Lossless (VP8L).
	Lossless,
}

impl BitstreamFormat {
	/// # From `libwebp` Value.
	const fn from_raw(raw: i32) -> Self {
		match raw {
			1 => Self::Lossy,
			2 => Self::Lossless,
			_ => Self::Undefined,
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Bitstream Features.
///
/// Information read from the WebP header without decoding the image.
pub struct Features {
	width: usize,
	height: usize,
	has_alpha: bool,
	has_animation: bool,
	format: BitstreamFormat,
}

impl TryFrom<&[u8]> for Features {
	type Error = DecodeError;

	fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
		let mut raw: WebPBitstreamFeatures = unsafe { std::mem::zeroed() };
		let status = unsafe { WebPGetFeatures(src.as_ptr(), src.len(), &mut raw) };
		if VP8_STATUS_OK != status { return Err(DecodeError::Features); }

		let width = usize::try_from(raw.width).map_err(|_| DecodeError::Overflow)?;
		let height = usize::try_from(raw.height).map_err(|_| DecodeError::Overflow)?;
		if width == 0 || height == 0 { return Err(DecodeError::Overflow); }

		Ok(Self {
			width,
			height,
			has_alpha: 0 != raw.has_alpha,
			has_animation: 0 != raw.has_animation,
			format: BitstreamFormat::from_raw(raw.format),
		})
	}
}

impl Features {
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
	/// # Has Alpha?
	pub const fn has_alpha(&self) -> bool { self.has_alpha }

	#[must_use]
	#[inline]
	/// # Is Animated?
	pub const fn has_animation(&self) -> bool { self.has_animation }

	#[must_use]
	#[inline]
	/// # Format.
	pub const fn format(&self) -> BitstreamFormat { self.format }
}



#[derive(Debug)]
/// # Input Error.
///
/// Returned by [`Decoder::new`] when the input cannot be read or parsed. It
/// carries the input buffer (the caller's [`DecodeOptions::buffer`], if one
/// was provided) so it can be reused.
///
/// It converts into a plain [`DecodeError`] with `?`.
pub struct InputError {
	err: DecodeError,
	buf: Vec<u8>,
}

impl Error for InputError {
	#[inline]
	fn source(&self) -> Option<&(dyn Error + 'static)> { Some(&self.err) }
}

impl fmt::Display for InputError {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.err.as_str())
	}
}

impl From<InputError> for DecodeError {
	#[inline]
	fn from(src: InputError) -> Self { src.err }
}

impl InputError {
	#[must_use]
	#[inline]
	/// # Error.
	pub const fn error(&self) -> DecodeError { self.err }

	#[must_use]
	#[inline]
	/// # Into Buffer.
	///
	/// Recover the input buffer so its allocation can be reused.
	pub fn into_buffer(self) -> Vec<u8> { self.buf }
}



#[derive(Debug)]
/// # Decoder.
///
/// This holds a complete encoded WebP in memory along with the options to
/// decode it with.
///
/// ## Examples
///
/// ```no_run
/// use webpdec::{Decoder, DecodeOptions, Rect};
///
/// let file = std::fs::File::open("image.webp").unwrap();
/// let opts = DecodeOptions::default().with_scale(Rect::new(0, 0, 64, 64));
/// let img = Decoder::new(file, opts).unwrap().decode().unwrap();
/// assert_eq!(img.width(), 64);
/// ```
pub struct Decoder {
	raw: Vec<u8>,
	features: Features,
	options: DecodeOptions,
}

impl Decoder {
	/// # New.
	///
	/// Read the entire stream into memory (reusing `options.buffer` if one
	/// was provided) and parse the WebP header.
	///
	/// ## Errors
	///
	/// Returns an error if the reader fails or the data is not a WebP. The
	/// buffer is handed back either way; see [`InputError::into_buffer`].
	pub fn new<R: Read>(mut reader: R, mut options: DecodeOptions)
	-> Result<Self, InputError> {
		let mut raw = options.buffer.take().unwrap_or_default();
		raw.clear();
		if reader.read_to_end(&mut raw).is_err() {
			return Err(InputError { err: DecodeError::Read, buf: raw });
		}

		let features = match Features::try_from(raw.as_slice()) {
			Ok(f) => f,
			Err(err) => return Err(InputError { err, buf: raw }),
		};
		debug!(
			"Read {} WebP bytes: {}x{} {:?}.",
			raw.len(),
			features.width,
			features.height,
			features.format,
		);

		Ok(Self { raw, features, options })
	}

	#[must_use]
	#[inline]
	/// # Features.
	pub const fn features(&self) -> Features { self.features }

	#[must_use]
	#[inline]
	/// # Options.
	pub const fn options(&self) -> &DecodeOptions { &self.options }

	/// # Output Size.
	///
	/// Return the dimensions the decoded image will have. Scaling takes
	/// priority over cropping; cropping uses `crop.max` as the size.
	///
	/// ## Errors
	///
	/// Returns [`DecodeError::Overflow`] if a requested scale or crop size
	/// exceeds the `WebP` maximum dimension.
	pub fn output_size(&self) -> Result<(usize, usize), DecodeError> {
		let (width, height) =
			if self.options.scale.is_enabled() { (self.options.scale.max.x, self.options.scale.max.y) }
			else if self.options.crop.is_enabled() { (self.options.crop.max.x, self.options.crop.max.y) }
			else { return Ok((self.features.width, self.features.height)); };

		// Nothing bigger can be decoded, so don't try to allocate for it.
		if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
			return Err(DecodeError::Overflow);
		}

		Ok((
			usize::try_from(width).map_err(|_| DecodeError::Overflow)?,
			usize::try_from(height).map_err(|_| DecodeError::Overflow)?,
		))
	}

	/// # Decode.
	///
	/// Decode the image into a buffer obtained from the configured
	/// [`ImageFactory`]. If decoding fails, the buffer is handed back to the
	/// factory via [`ImageFactory::recycle`].
	///
	/// ## Errors
	///
	/// Returns an error if the configuration cannot be built, the output size
	/// is out of range, the factory returns a mis-sized image (including an
	/// empty one after a failed allocation), or `libwebp` rejects the data or
	/// options.
	pub fn decode(&self) -> Result<Nrgba, DecodeError> {
		let mut config = self.options.config()?;
		let (width, height) = self.output_size()?;

		let factory: &dyn ImageFactory = self.options.image_factory
			.as_deref()
			.unwrap_or(&DefaultImageFactory);

		let mut img = factory.get(width, height);
		if img.width() != width || img.height() != height {
			factory.recycle(img);
			return Err(DecodeError::Image);
		}

		if let Err(e) = config.set_output(&mut img) {
			factory.recycle(img);
			return Err(e);
		}

		debug!("Decoding into {width}x{height} RGBA.");
		let status = unsafe {
			WebPDecode(self.raw.as_ptr(), self.raw.len(), config.as_mut_ptr())
		};

		// The native buffer points into img, so release it first.
		drop(config);

		if VP8_STATUS_OK == status { Ok(img) }
		else {
			debug!("WebPDecode failed.");
			factory.recycle(img);
			Err(DecodeError::Decode)
		}
	}

	#[must_use]
	/// # Into Buffer.
	///
	/// Recover the input buffer so its allocation can be reused, e.g. with
	/// [`DecodeOptions::with_buffer`].
	pub fn into_buffer(self) -> Vec<u8> { self.raw }
}
