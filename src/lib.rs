/*!
# `WebPDec`

Translate WebP decoding options (cropping, scaling, threading, dithering,
filtering toggles) into the `WebPDecoderConfig` expected by Google's
`libwebp`, and decode into caller-supplied (optionally pooled) RGBA buffers.

All of the actual decoding is performed by `libwebp` itself.

## Examples

```no_run
use std::sync::Arc;
use webpdec::{Decoder, DecodeOptions, ImagePool, Rect};

let pool = Arc::new(ImagePool::default());
let opts = DecodeOptions::default()
	.with_crop(Rect::new(0, 0, 100, 50))
	.with_threads(true)
	.with_image_factory(pool.clone());

let raw = std::fs::read("image.webp").unwrap();
let img = Decoder::new(raw.as_slice(), opts).unwrap().decode().unwrap();
assert_eq!((img.width(), img.height()), (100, 50));

// Pooled images go back when you're done with them.
pool.put(img);
```
*/

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod decode;
mod error;
mod factory;
mod image;
mod options;
mod rect;


pub use decode::{
	BitstreamFormat,
	Decoder,
	Features,
	InputError,
};
pub use error::DecodeError;
pub use factory::{
	DefaultImageFactory,
	ImageFactory,
	ImagePool,
};
pub use image::Nrgba;
pub use options::{
	DecodeOptions,
	DecoderConfig,
};
pub use rect::{
	Point,
	Rect,
};
