//! Image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! Coordinates follow the camera convention used throughout the crate: `y` is
//! the row (first axis), `x` is the column (second axis).

use crate::util::{BeamDeltaError, BeamDeltaResult};

#[cfg(feature = "image-io")]
pub mod io;
mod sample;

pub use sample::Sample;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> BeamDeltaResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> BeamDeltaResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(BeamDeltaError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(height, width)`, matching the `(row, col)` centroid order.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Iterates over rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> BeamDeltaResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(BeamDeltaError::InvalidDimensions { width, height });
        }
        let end_x = x.checked_add(width);
        let end_y = y.checked_add(height);
        match (end_x, end_y) {
            (Some(end_x), Some(end_y)) if end_x <= self.width && end_y <= self.height => {}
            _ => return Err(BeamDeltaError::InvalidInput("roi exceeds image bounds")),
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(BeamDeltaError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(BeamDeltaError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> BeamDeltaResult<usize> {
    if width == 0 || height == 0 {
        return Err(BeamDeltaError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(BeamDeltaError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(BeamDeltaError::InvalidDimensions { width, height })
}

/// Owned contiguous image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy> OwnedImage<T> {
    /// Creates an owned image from a contiguous row-major buffer.
    ///
    /// The buffer length must equal `width * height` exactly.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> BeamDeltaResult<Self> {
        if width == 0 || height == 0 {
            return Err(BeamDeltaError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(BeamDeltaError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(BeamDeltaError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(BeamDeltaError::InvalidInput(
                "buffer length does not match width * height",
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image of the given shape with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> BeamDeltaResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(BeamDeltaError::InvalidDimensions { width, height })?;
        Self::new(vec![value; len], width, height)
    }

    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, T>) -> BeamDeltaResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = view.row(y).ok_or(BeamDeltaError::BufferTooSmall {
                needed: y * view.stride() + width,
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the contiguous sample buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable reference to the sample at `(x, y)`.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut(y * self.width + x)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}
