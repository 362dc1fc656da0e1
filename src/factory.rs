/*!
# `WebPDec`: Image Factories

The decoder never allocates its output directly. It asks an [`ImageFactory`]
for a buffer of the right size instead, so callers can pool and reuse image
memory between decodes.
*/

use crate::Nrgba;
use log::trace;
use std::{
	fmt,
	sync::{
		Mutex,
		MutexGuard,
		PoisonError,
	},
};



/// # Image Factory.
///
/// This is implemented for types that can hand out [`Nrgba`] images of a
/// given size.
pub trait ImageFactory: fmt::Debug + Send + Sync {
	/// # Get.
	///
	/// Return an image with exactly `width × height` pixels. Both dimensions
	/// are always non-zero when called by the decoder.
	fn get(&self, width: usize, height: usize) -> Nrgba;

	#[inline]
	/// # Recycle.
	///
	/// The decoder calls this with an image it obtained from [`ImageFactory::get`]
	/// but could not fill, e.g. because decoding failed. Factories without a
	/// pool can simply let it drop, which is what the default does.
	fn recycle(&self, img: Nrgba) { drop(img); }
}



#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
/// # Default Factory.
///
/// Allocate a fresh image on every call.
pub struct DefaultImageFactory;

impl ImageFactory for DefaultImageFactory {
	#[inline]
	fn get(&self, width: usize, height: usize) -> Nrgba { Nrgba::new(width, height) }
}



/// # Image Pool.
///
/// A factory that recycles buffers. Images handed out by [`ImagePool::get`]
/// belong to the caller until they are given back with [`ImagePool::put`];
/// the pool holds no references to images in use.
///
/// At most [`ImagePool::capacity`] idle images are retained. Extras are
/// dropped.
pub struct ImagePool {
	free: Mutex<Vec<Nrgba>>,
	capacity: usize,
}

impl Default for ImagePool {
	#[inline]
	fn default() -> Self { Self::with_capacity(Self::DEFAULT_CAPACITY) }
}

impl fmt::Debug for ImagePool {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ImagePool")
			.field("idle", &self.idle())
			.field("capacity", &self.capacity)
			.finish()
	}
}

impl ImageFactory for ImagePool {
	fn get(&self, width: usize, height: usize) -> Nrgba {
		let recycled = self.lock().pop();
		if let Some(mut img) = recycled {
			trace!("Reusing pooled image for {width}x{height}.");
			img.reset(width, height);
			img
		}
		else {
			trace!("Pool empty; allocating {width}x{height}.");
			Nrgba::new(width, height)
		}
	}

	#[inline]
	fn recycle(&self, img: Nrgba) { self.put(img); }
}

impl ImagePool {
	/// # Default Capacity.
	pub const DEFAULT_CAPACITY: usize = 8;

	#[must_use]
	/// # With Capacity.
	///
	/// Create an empty pool that will retain up to `capacity` idle images.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			free: Mutex::new(Vec::with_capacity(capacity)),
			capacity,
		}
	}

	#[must_use]
	#[inline]
	/// # Capacity.
	pub const fn capacity(&self) -> usize { self.capacity }

	#[must_use]
	/// # Idle Images.
	///
	/// Return the number of images currently waiting for reuse.
	pub fn idle(&self) -> usize { self.lock().len() }

	/// # Put.
	///
	/// Return an image to the pool once you are done with it.
	pub fn put(&self, img: Nrgba) {
		let mut free = self.lock();
		if free.len() < self.capacity { free.push(img); }
		else { trace!("Pool full; dropping {}x{} image.", img.width(), img.height()); }
	}

	/// # Lock.
	///
	/// The free list is always left in a valid state, so a poisoned lock is
	/// simply reclaimed.
	fn lock(&self) -> MutexGuard<'_, Vec<Nrgba>> {
		self.free.lock().unwrap_or_else(PoisonError::into_inner)
	}
}
