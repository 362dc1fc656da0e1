/*!
# `WebPDec`: Error
*/

use std::{
	error::Error,
	fmt,
};



#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// # Errors.
pub enum DecodeError {
	/// # Decoder configuration could not be initialized.
	///
	/// This is the only error the option translation itself can raise;
	/// `libwebp` refused to initialize its configuration struct, usually
	/// because of a version mismatch.
	Config,

	/// # Decoding failed.
	Decode,

	/// # Unreadable bitstream header.
	Features,

	/// # The image factory returned a buffer of the wrong size.
	Image,

	/// # Image dimensions are zero or out of range.
	Overflow,

	/// # I/O read error.
	Read,
}

impl Error for DecodeError {}

impl AsRef<str> for DecodeError {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for DecodeError {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl DecodeError {
	#[must_use]
	/// # As Str.
	///
	/// Return the error as an English string slice.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Config => "Cannot initialize decoder configuration.",
			Self::Decode => "The image could not be decoded.",
			Self::Features => "The WebP bitstream header could not be read.",
			Self::Image => "The image factory returned a buffer of the wrong size.",
			Self::Overflow => "The image dimensions are out of range.",
			Self::Read => "Unable to read the source data.",
		}
	}
}
