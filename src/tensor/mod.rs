//! Image tensors in the host's `(batch, height, width, channel)` layout

use crate::error::Result;
use image::{DynamicImage, RgbImage};
use tracing::debug;

/// Side length of the failure placeholder
pub const PLACEHOLDER_SIZE: usize = 64;

/// Channels per pixel; every tensor is RGB
pub const CHANNELS: usize = 3;

/// A batch of RGB images stored row-major as `f32` in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl ImageTensor {
    /// All-zero tensor of shape `(batch, height, width, 3)`
    pub fn zeros(batch: usize, height: usize, width: usize) -> Self {
        Self {
            shape: [batch, height, width, CHANNELS],
            data: vec![0.0; batch * height * width * CHANNELS],
        }
    }

    /// The 1x64x64x3 all-red image returned whenever a search fails
    pub fn placeholder() -> Self {
        let mut tensor = Self::zeros(1, PLACEHOLDER_SIZE, PLACEHOLDER_SIZE);
        for pixel in tensor.data.chunks_exact_mut(CHANNELS) {
            pixel[0] = 1.0;
        }
        tensor
    }

    /// Decode encoded image bytes (PNG, JPEG, GIF, WebP, BMP) into a batch of one
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?;
        debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded image"
        );
        Ok(Self::from_image(&image))
    }

    /// Convert to RGB, scale to `[0, 1]` and add a batch dimension of 1.
    ///
    /// Alpha is dropped without compositing, grayscale is replicated across
    /// channels and 16-bit or float sources are reduced to 8 bits first.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let data = rgb
            .into_raw()
            .into_iter()
            .map(|v| f32::from(v) / 255.0)
            .collect();

        Self {
            shape: [1, height as usize, width as usize, CHANNELS],
            data,
        }
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn batch(&self) -> usize {
        self.shape[0]
    }

    pub fn height(&self) -> usize {
        self.shape[1]
    }

    pub fn width(&self) -> usize {
        self.shape[2]
    }

    pub fn channels(&self) -> usize {
        self.shape[3]
    }

    /// Flat row-major values
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Value at `(b, y, x, c)`, or `None` when out of bounds
    pub fn get(&self, b: usize, y: usize, x: usize, c: usize) -> Option<f32> {
        let [batch, height, width, channels] = self.shape;
        if b >= batch || y >= height || x >= width || c >= channels {
            return None;
        }
        let index = ((b * height + y) * width + x) * channels + c;
        self.data.get(index).copied()
    }

    /// Every value of one channel across the whole batch
    pub fn channel(&self, c: usize) -> impl Iterator<Item = f32> + '_ {
        self.data
            .chunks_exact(self.channels())
            .filter_map(move |pixel| pixel.get(c).copied())
    }

    /// Whether this tensor equals the failure placeholder
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }

    /// First image of the batch as 8-bit RGB
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        if self.batch() == 0 {
            return None;
        }
        let len = self.height() * self.width() * CHANNELS;
        let raw = self.data[..len]
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        RgbImage::from_raw(self.width() as u32, self.height() as u32, raw)
    }
}
