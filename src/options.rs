/*!
# `WebPDec`: Decode Options

This uses [`libwebp-sys2`](https://crates.io/crates/libwebp-sys2) bindings to
Google's `libwebp`. [`DecodeOptions`] are translated field-for-field into the
`WebPDecoderConfig` the library's advanced decoding API expects.
*/

use crate::{
	DecodeError,
	ImageFactory,
	Nrgba,
	Rect,
};
use libwebp_sys::{
	MODE_RGBA,
	WebPDecBuffer,
	WebPDecoderConfig,
	WebPDecoderOptions,
	WebPFreeDecBuffer,
	WebPInitDecoderConfig,
	WebPRGBABuffer,
};
use std::{
	fmt,
	os::raw::c_int,
	sync::Arc,
};



#[derive(Clone, Default)]
/// # Decode Options.
///
/// Everything defaults to off/zero/none, which leaves `libwebp`'s own
/// defaults in place.
///
/// ## Cropping
///
/// Cropping is enabled when both coordinates of `crop.max` are positive. The
/// crop _origin_ comes from `crop.min`, but the crop _size_ comes from
/// `crop.max` as-is. `crop.max` is **not** treated as the opposite corner:
/// `Rect::new(10, 10, 20, 20)` crops a 20x20 region starting at (10, 10), not
/// a 10x10 one. Existing callers depend on this, so it is kept.
///
/// ## Scaling
///
/// Scaling is enabled when both coordinates of `scale.max` are positive, and
/// the output is resized to exactly `scale.max.x` by `scale.max.y`.
///
/// ## Dithering
///
/// Strengths are nominally `0..=100` but are passed to `libwebp` unchecked.
pub struct DecodeOptions {
	/// # Skip in-loop filtering.
	pub bypass_filtering: bool,

	/// # Use simple (faster) chroma upsampling.
	pub no_fancy_upsampling: bool,

	/// # Crop region.
	pub crop: Rect,

	/// # Output size.
	pub scale: Rect,

	/// # Allow `libwebp` to decode using worker threads.
	pub use_threads: bool,

	/// # Flip the output vertically.
	pub flip: bool,

	/// # Dithering strength.
	pub dithering_strength: c_int,

	/// # Alpha dithering strength.
	pub alpha_dithering_strength: c_int,

	/// # Image factory.
	///
	/// If `None`, [`DefaultImageFactory`](crate::DefaultImageFactory) is
	/// used. A pooling factory hands out images that must be returned to it
	/// once the caller is done with them.
	pub image_factory: Option<Arc<dyn ImageFactory>>,

	/// # Input buffer.
	///
	/// If `None`, a new buffer is allocated to hold the encoded bytes. Pass
	/// in the buffer recovered from [`Decoder::into_buffer`](crate::Decoder::into_buffer)
	/// to reuse its allocation.
	pub buffer: Option<Vec<u8>>,
}

impl fmt::Debug for DecodeOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DecodeOptions")
			.field("bypass_filtering", &self.bypass_filtering)
			.field("no_fancy_upsampling", &self.no_fancy_upsampling)
			.field("crop", &self.crop)
			.field("scale", &self.scale)
			.field("use_threads", &self.use_threads)
			.field("flip", &self.flip)
			.field("dithering_strength", &self.dithering_strength)
			.field("alpha_dithering_strength", &self.alpha_dithering_strength)
			.field("image_factory", &self.image_factory)
			.field("buffer", &self.buffer.as_ref().map(Vec::capacity))
			.finish()
	}
}

impl DecodeOptions {
	#[must_use]
	/// # With Bypass Filtering.
	pub fn with_bypass_filtering(mut self, on: bool) -> Self {
		self.bypass_filtering = on;
		self
	}

	#[must_use]
	/// # With No Fancy Upsampling.
	pub fn with_no_fancy_upsampling(mut self, on: bool) -> Self {
		self.no_fancy_upsampling = on;
		self
	}

	#[must_use]
	/// # With Crop.
	///
	/// See the type-level docs for how the rectangle is interpreted.
	pub fn with_crop(mut self, crop: Rect) -> Self {
		self.crop = crop;
		self
	}

	#[must_use]
	/// # With Scale.
	pub fn with_scale(mut self, scale: Rect) -> Self {
		self.scale = scale;
		self
	}

	#[must_use]
	/// # With Threads.
	pub fn with_threads(mut self, on: bool) -> Self {
		self.use_threads = on;
		self
	}

	#[must_use]
	/// # With Flip.
	pub fn with_flip(mut self, on: bool) -> Self {
		self.flip = on;
		self
	}

	#[must_use]
	/// # With Dithering Strength.
	pub fn with_dithering_strength(mut self, strength: c_int) -> Self {
		self.dithering_strength = strength;
		self
	}

	#[must_use]
	/// # With Alpha Dithering Strength.
	pub fn with_alpha_dithering_strength(mut self, strength: c_int) -> Self {
		self.alpha_dithering_strength = strength;
		self
	}

	#[must_use]
	/// # With Image Factory.
	pub fn with_image_factory(mut self, factory: Arc<dyn ImageFactory>) -> Self {
		self.image_factory = Some(factory);
		self
	}

	#[must_use]
	/// # With Buffer.
	pub fn with_buffer(mut self, buf: Vec<u8>) -> Self {
		self.buffer = Some(buf);
		self
	}

	#[inline]
	/// # Decoder Config.
	///
	/// Build the `libwebp` configuration matching these options. This is the
	/// same as `DecoderConfig::try_from(&options)`.
	///
	/// ## Errors
	///
	/// Returns [`DecodeError::Config`] if `libwebp` fails to initialize the
	/// config struct.
	pub fn config(&self) -> Result<DecoderConfig, DecodeError> {
		DecoderConfig::try_from(self)
	}
}



/// # Decoder Config.
///
/// This `C` struct is Rust-wrapped so its output buffer is always released,
/// whether or not the decode it was built for succeeds.
pub struct DecoderConfig(WebPDecoderConfig);

impl fmt::Debug for DecoderConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let o = &self.0.options;
		f.debug_struct("DecoderConfig")
			.field("bypass_filtering", &o.bypass_filtering)
			.field("no_fancy_upsampling", &o.no_fancy_upsampling)
			.field("use_cropping", &o.use_cropping)
			.field("crop_left", &o.crop_left)
			.field("crop_top", &o.crop_top)
			.field("crop_width", &o.crop_width)
			.field("crop_height", &o.crop_height)
			.field("use_scaling", &o.use_scaling)
			.field("scaled_width", &o.scaled_width)
			.field("scaled_height", &o.scaled_height)
			.field("use_threads", &o.use_threads)
			.field("dithering_strength", &o.dithering_strength)
			.field("flip", &o.flip)
			.field("alpha_dithering_strength", &o.alpha_dithering_strength)
			.finish_non_exhaustive()
	}
}

impl Drop for DecoderConfig {
	#[inline]
	fn drop(&mut self) { unsafe { WebPFreeDecBuffer(&mut self.0.output); } }
}

impl TryFrom<&DecodeOptions> for DecoderConfig {
	type Error = DecodeError;

	fn try_from(src: &DecodeOptions) -> Result<Self, Self::Error> {
		let mut out = Self(unsafe { std::mem::zeroed() });
		maybe_die(unsafe { WebPInitDecoderConfig(&mut out.0) })?;

		let opts = &mut out.0.options;
		opts.bypass_filtering = c_int::from(src.bypass_filtering);
		opts.no_fancy_upsampling = c_int::from(src.no_fancy_upsampling);

		// Max is the crop size here, not the far corner.
		if src.crop.is_enabled() {
			opts.use_cropping = 1;
			opts.crop_left = src.crop.min.x;
			opts.crop_top = src.crop.min.y;
			opts.crop_width = src.crop.max.x;
			opts.crop_height = src.crop.max.y;
		}

		if src.scale.is_enabled() {
			opts.use_scaling = 1;
			opts.scaled_width = src.scale.max.x;
			opts.scaled_height = src.scale.max.y;
		}

		opts.use_threads = c_int::from(src.use_threads);
		opts.dithering_strength = src.dithering_strength;
		opts.flip = c_int::from(src.flip);
		opts.alpha_dithering_strength = src.alpha_dithering_strength;

		Ok(out)
	}
}

impl DecoderConfig {
	#[must_use]
	#[inline]
	/// # Options.
	///
	/// The native decoding options.
	pub const fn options(&self) -> &WebPDecoderOptions { &self.0.options }

	#[must_use]
	#[inline]
	/// # Output.
	///
	/// The native output buffer description.
	pub const fn output(&self) -> &WebPDecBuffer { &self.0.output }

	#[inline]
	/// # Raw Pointer.
	pub(crate) fn as_mut_ptr(&mut self) -> *mut WebPDecoderConfig { &mut self.0 }

	/// # Set Output Image.
	///
	/// Point the output buffer at `img` so `libwebp` writes RGBA pixels
	/// directly into it.
	///
	/// The image must outlive any decode performed with this config, and its
	/// buffer must not be reallocated in the meantime.
	///
	/// ## Errors
	///
	/// Returns an error if the dimensions do not fit a `c_int`.
	pub(crate) fn set_output(&mut self, img: &mut Nrgba) -> Result<(), DecodeError> {
		let width = c_int::try_from(img.width()).map_err(|_| DecodeError::Overflow)?;
		let height = c_int::try_from(img.height()).map_err(|_| DecodeError::Overflow)?;
		let stride = c_int::try_from(img.stride()).map_err(|_| DecodeError::Overflow)?;

		let out = &mut self.0.output;
		out.colorspace = MODE_RGBA;
		out.width = width;
		out.height = height;
		out.is_external_memory = 1;
		out.u.RGBA = WebPRGBABuffer {
			rgba: img.as_mut_ptr(),
			stride,
			size: img.len(),
		};

		Ok(())
	}
}



#[inline]
/// # Verify Init Status.
///
/// This converts unsuccessful `libwebp` initialization results into proper
/// Rust errors.
const fn maybe_die(res: c_int) -> Result<(), DecodeError> {
	if 0 == res { Err(DecodeError::Config) }
	else { Ok(()) }
}
