use libwebp_sys::{
	WebPEncodeLosslessRGBA,
	WebPFree,
};
use std::os::raw::c_int;
use std::sync::{
	Arc,
	atomic::{
		AtomicUsize,
		Ordering::SeqCst,
	},
};
use webpdec::{
	BitstreamFormat,
	DecodeError,
	DecodeOptions,
	Decoder,
	ImageFactory,
	ImagePool,
	Nrgba,
	Rect,
};



/// # Test Pattern.
///
/// An opaque image where every pixel is unique: red is x, green is y.
fn pattern(width: u8, height: u8) -> Vec<u8> {
	let mut out = Vec::with_capacity(usize::from(width) * usize::from(height) * 4);
	for y in 0..height {
		for x in 0..width {
			out.extend_from_slice(&[x * 10, y * 10, 200, 255]);
		}
	}
	out
}

/// # Encode (Lossless).
fn encode(rgba: &[u8], width: i32, height: i32) -> Vec<u8> {
	let mut ptr: *mut u8 = std::ptr::null_mut();
	let len = unsafe {
		WebPEncodeLosslessRGBA(rgba.as_ptr(), width, height, width * 4, &mut ptr)
	};
	assert!(0 < len && ! ptr.is_null(), "Encoding failed.");

	let out = unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec();
	unsafe { WebPFree(ptr.cast()); }
	out
}

/// # Decode Shorthand.
fn decode(raw: &[u8], opts: DecodeOptions) -> Result<Nrgba, DecodeError> {
	Decoder::new(raw, opts)?.decode()
}



#[test]
fn t_features() {
	let raw = encode(&pattern(6, 4), 6, 4);
	let dec = Decoder::new(raw.as_slice(), DecodeOptions::default())
		.expect("Valid WebP.");

	let f = dec.features();
	assert_eq!((f.width(), f.height()), (6, 4));
	assert_eq!(f.format(), BitstreamFormat::Lossless);
	assert!(! f.has_animation());
	assert_eq!(dec.output_size(), Ok((6, 4)));
}

#[test]
fn t_decode_plain() {
	let src = pattern(6, 4);
	let img = decode(&encode(&src, 6, 4), DecodeOptions::default())
		.expect("Decode failed.");

	assert_eq!((img.width(), img.height()), (6, 4));
	assert_eq!(img.len(), 6 * 4 * 4);
	assert_eq!(&*img, src.as_slice());
}

#[test]
fn t_decode_flip() {
	let src = pattern(3, 2);
	let img = decode(&encode(&src, 3, 2), DecodeOptions::default().with_flip(true))
		.expect("Decode failed.");

	// Rows are swapped.
	assert_eq!(&img[..12], &src[12..]);
	assert_eq!(&img[12..], &src[..12]);
}

#[test]
fn t_decode_crop() {
	let src = pattern(4, 4);
	let raw = encode(&src, 4, 4);

	// Origin (2, 0), size 2x2; max is a size, not a corner.
	let opts = DecodeOptions::default().with_crop(Rect::new(2, 0, 2, 2));
	let dec = Decoder::new(raw.as_slice(), opts).expect("Valid WebP.");
	assert_eq!(dec.output_size(), Ok((2, 2)));

	let img = dec.decode().expect("Decode failed.");
	assert_eq!((img.width(), img.height()), (2, 2));
	for y in 0..2 {
		for x in 0..2 {
			let px = img.pixel(x, y).expect("In bounds.");
			assert_eq!(usize::from(px.r), (x + 2) * 10);
			assert_eq!(usize::from(px.g), y * 10);
			assert_eq!(px.a, 255);
		}
	}

	// A crop that runs off the image is rejected by libwebp.
	let opts = DecodeOptions::default().with_crop(Rect::new(3, 3, 4, 4));
	assert_eq!(decode(&raw, opts), Err(DecodeError::Decode));
}

#[test]
fn t_decode_scale() {
	let raw = encode(&pattern(8, 8), 8, 8);
	let opts = DecodeOptions::default()
		.with_scale(Rect::new(0, 0, 4, 2))
		.with_crop(Rect::new(0, 0, 6, 6));

	// Scale wins when both are set.
	let dec = Decoder::new(raw.as_slice(), opts).expect("Valid WebP.");
	assert_eq!(dec.output_size(), Ok((4, 2)));

	let img = dec.decode().expect("Decode failed.");
	assert_eq!((img.width(), img.height()), (4, 2));
	assert_eq!(img.len(), 4 * 2 * 4);
	assert!(img.pixels().iter().all(|px| px.a == 255));
}

#[test]
fn t_decode_pooled() {
	let pool = Arc::new(ImagePool::with_capacity(2));
	let raw = encode(&pattern(5, 5), 5, 5);

	let opts = DecodeOptions::default().with_image_factory(pool.clone());
	let img = decode(&raw, opts).expect("Decode failed.");
	let ptr = img.as_ptr();
	pool.put(img);
	assert_eq!(pool.idle(), 1);

	// The second decode should land in the same buffer.
	let opts = DecodeOptions::default().with_image_factory(pool.clone());
	let img = decode(&raw, opts).expect("Decode failed.");
	assert_eq!(img.as_ptr(), ptr);
	assert_eq!(pool.idle(), 0);

	// Failures hand the image back.
	let opts = DecodeOptions::default()
		.with_crop(Rect::new(4, 4, 5, 5))
		.with_image_factory(pool.clone());
	assert_eq!(decode(&raw, opts), Err(DecodeError::Decode));
	assert_eq!(pool.idle(), 1);
}

#[test]
fn t_decode_bad_factory() {
	#[derive(Debug, Default)]
	struct Tiny(AtomicUsize);

	impl ImageFactory for Tiny {
		fn get(&self, _width: usize, _height: usize) -> Nrgba { Nrgba::new(1, 1) }
		fn recycle(&self, _img: Nrgba) { self.0.fetch_add(1, SeqCst); }
	}

	let factory = Arc::new(Tiny::default());
	let raw = encode(&pattern(3, 3), 3, 3);
	let opts = DecodeOptions::default().with_image_factory(factory.clone());

	assert_eq!(decode(&raw, opts), Err(DecodeError::Image));
	assert_eq!(factory.0.load(SeqCst), 1);
}

#[test]
fn t_buffer_reuse() {
	let raw = encode(&pattern(4, 4), 4, 4);
	let mut buf = Vec::with_capacity(raw.len() * 2);
	buf.extend_from_slice(b"stale junk");
	let ptr = buf.as_ptr();

	let dec = Decoder::new(raw.as_slice(), DecodeOptions::default().with_buffer(buf))
		.expect("Valid WebP.");
	let _img = dec.decode().expect("Decode failed.");

	let buf = dec.into_buffer();
	assert_eq!(buf.as_ptr(), ptr);
	assert_eq!(buf, raw);
}

#[test]
fn t_bad_input() {
	assert_eq!(
		decode(b"RIFF\0\0\0\0WEBPnope", DecodeOptions::default()),
		Err(DecodeError::Features),
	);
	assert_eq!(decode(&[], DecodeOptions::default()), Err(DecodeError::Features));

	struct Broken;
	impl std::io::Read for Broken {
		fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
			Err(std::io::Error::other("nope"))
		}
	}
	assert_eq!(
		Decoder::new(Broken, DecodeOptions::default()).map(|_| ()).map_err(|e| e.error()),
		Err(DecodeError::Read),
	);
}

#[test]
fn t_buffer_returned_on_error() {
	let mut buf = Vec::with_capacity(256);
	buf.extend_from_slice(b"leftovers");
	let ptr = buf.as_ptr();

	// Not a WebP.
	let err = Decoder::new(&b"garbage in, garbage out"[..], DecodeOptions::default().with_buffer(buf))
		.expect_err("Garbage should not parse.");
	assert_eq!(err.error(), DecodeError::Features);

	let buf = err.into_buffer();
	assert_eq!(buf.as_ptr(), ptr);
	assert_eq!(buf, b"garbage in, garbage out");

	// Unreadable.
	struct Broken;
	impl std::io::Read for Broken {
		fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
			Err(std::io::Error::other("nope"))
		}
	}

	let err = Decoder::new(Broken, DecodeOptions::default().with_buffer(buf))
		.expect_err("Reader should fail.");
	assert_eq!(err.error(), DecodeError::Read);
	assert_eq!(err.into_buffer().as_ptr(), ptr);
}

#[test]
fn t_decode_oversized() {
	let raw = encode(&pattern(4, 4), 4, 4);

	// These must fail cleanly rather than trying to allocate terabytes.
	for opts in [
		DecodeOptions::default().with_scale(Rect::new(0, 0, 1_000_000, 1_000_000)),
		DecodeOptions::default().with_scale(Rect::new(0, 0, 2, c_int::MAX)),
		DecodeOptions::default().with_crop(Rect::new(0, 0, 1_000_000, 1_000_000)),
	] {
		let dec = Decoder::new(raw.as_slice(), opts).expect("Valid WebP.");
		assert_eq!(dec.output_size(), Err(DecodeError::Overflow));
		assert_eq!(dec.decode(), Err(DecodeError::Overflow));
	}
}
