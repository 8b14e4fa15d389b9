//! Convenience helpers for loading camera frames via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Colour inputs are
//! converted to luma before use.

use crate::image::{ImageView, OwnedImage};
use crate::util::{BeamDeltaError, BeamDeltaResult};
use std::path::Path;

/// Creates a borrowed view from an 8-bit grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> BeamDeltaResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned 8-bit image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> BeamDeltaResult<OwnedImage<u8>> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Creates an owned 16-bit image from a dynamic image.
pub fn owned16_from_dynamic_image(img: &image::DynamicImage) -> BeamDeltaResult<OwnedImage<u16>> {
    let gray = img.to_luma16();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to 8-bit grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> BeamDeltaResult<OwnedImage<u8>> {
    owned_from_dynamic_image(&open(path.as_ref())?)
}

/// Loads an image from disk and converts it to 16-bit grayscale.
///
/// Useful for scientific cameras that write 12- or 16-bit PNGs.
pub fn load_gray16_image<P: AsRef<Path>>(path: P) -> BeamDeltaResult<OwnedImage<u16>> {
    owned16_from_dynamic_image(&open(path.as_ref())?)
}

fn open(path: &Path) -> BeamDeltaResult<image::DynamicImage> {
    image::open(path).map_err(|err| BeamDeltaError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })
}
