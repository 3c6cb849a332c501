// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Image reading.
//!
//! Decoding is delegated to the `image` crate. Two output backends are
//! provided:
//!
//! - [`ImageBackend::Buffer`] returns a packed [`PixelBuffer`] matrix
//!   (width x height x channels, row-major `u8` data).
//! - [`ImageBackend::Dynamic`] returns the decoder's
//!   [`image::DynamicImage`] for callers that want the richer API.
//!
//! Color handling follows [`ColorMode`]: `Color` forces 3 channels,
//! `Grayscale` forces 1, and `Auto` collapses to grayscale when every pixel
//! has equal channels (the Dynamic backend leaves `Auto` images in whatever
//! mode the codec produced).

use std::path::Path;

use image::{DynamicImage, ImageError};

use crate::core::{ColorMode, FrameError, Result};

/// Output representation for image reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageBackend {
    /// Packed pixel matrix
    #[default]
    Buffer,
    /// `image::DynamicImage`
    Dynamic,
}

/// Options controlling an image read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageReadOptions {
    /// Output representation
    pub backend: ImageBackend,
    /// Color handling
    pub color: ColorMode,
}

impl ImageReadOptions {
    /// Options for the buffer backend with the given color mode.
    pub fn buffer(color: ColorMode) -> Self {
        ImageReadOptions {
            backend: ImageBackend::Buffer,
            color,
        }
    }

    /// Options for the dynamic backend with the given color mode.
    pub fn dynamic(color: ColorMode) -> Self {
        ImageReadOptions {
            backend: ImageBackend::Dynamic,
            color,
        }
    }
}

/// A packed pixel matrix.
///
/// Data is row-major with `channels` interleaved bytes per pixel (3 for
/// color, 1 for grayscale).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bytes per pixel (1 or 3)
    pub channels: u8,
    /// Packed pixel data, `width * height * channels` bytes
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Byte offset of a pixel's first channel.
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    /// Get the channel bytes for one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let off = self.offset(x, y);
        &self.data[off..off + self.channels as usize]
    }
}

/// Decoded image data.
#[derive(Debug, Clone)]
pub enum ImageData {
    /// Packed pixel matrix
    Buffer(PixelBuffer),
    /// Rich decoder image
    Dynamic(DynamicImage),
}

impl ImageData {
    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            ImageData::Buffer(buf) => buf.width,
            ImageData::Dynamic(img) => img.width(),
        }
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            ImageData::Buffer(buf) => buf.height,
            ImageData::Dynamic(img) => img.height(),
        }
    }

    /// Number of color channels in the stored representation.
    pub fn channels(&self) -> u8 {
        match self {
            ImageData::Buffer(buf) => buf.channels,
            ImageData::Dynamic(img) => img.color().channel_count(),
        }
    }
}

/// Read an image with default options (buffer backend, forced color).
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    read_image_with(path, &ImageReadOptions::default())
}

/// Read an image with explicit backend and color options.
pub fn read_image_with<P: AsRef<Path>>(path: P, options: &ImageReadOptions) -> Result<ImageData> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| map_image_error(path, e))?;

    match options.backend {
        ImageBackend::Buffer => Ok(ImageData::Buffer(to_buffer(img, options.color))),
        ImageBackend::Dynamic => Ok(ImageData::Dynamic(to_dynamic(img, options.color))),
    }
}

fn map_image_error(path: &Path, err: ImageError) -> FrameError {
    match err {
        ImageError::IoError(io) => FrameError::read(path.display().to_string(), io.to_string()),
        other => FrameError::decode("Image", other.to_string()),
    }
}

fn to_buffer(img: DynamicImage, color: ColorMode) -> PixelBuffer {
    match color {
        ColorMode::Color => rgb_buffer(&img),
        ColorMode::Grayscale => luma_buffer(&img),
        ColorMode::Auto => {
            let rgb = rgb_buffer(&img);
            if is_uniform_gray(&rgb) {
                luma_buffer(&img)
            } else {
                rgb
            }
        }
    }
}

fn to_dynamic(img: DynamicImage, color: ColorMode) -> DynamicImage {
    match color {
        ColorMode::Color => DynamicImage::ImageRgb8(img.to_rgb8()),
        ColorMode::Grayscale => DynamicImage::ImageLuma8(img.to_luma8()),
        // Keep whatever mode the codec produced
        ColorMode::Auto => img,
    }
}

fn rgb_buffer(img: &DynamicImage) -> PixelBuffer {
    let rgb = img.to_rgb8();
    PixelBuffer {
        width: rgb.width(),
        height: rgb.height(),
        channels: 3,
        data: rgb.into_raw(),
    }
}

fn luma_buffer(img: &DynamicImage) -> PixelBuffer {
    let luma = img.to_luma8();
    PixelBuffer {
        width: luma.width(),
        height: luma.height(),
        channels: 1,
        data: luma.into_raw(),
    }
}

/// True when every pixel of a 3-channel buffer has r == g == b.
fn is_uniform_gray(buf: &PixelBuffer) -> bool {
    buf.channels == 3
        && buf
            .data
            .chunks_exact(3)
            .all(|px| px[0] == px[1] && px[1] == px[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_rgb_image(w: u32, h: u32) -> DynamicImage {
        let buf = image::RgbImage::from_fn(w, h, |x, y| {
            let v = ((x + y) % 256) as u8;
            image::Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(buf)
    }

    fn color_image(w: u32, h: u32) -> DynamicImage {
        let buf = image::RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 7])
        });
        DynamicImage::ImageRgb8(buf)
    }

    #[test]
    fn test_buffer_color_channels() {
        let buf = to_buffer(color_image(4, 3), ColorMode::Color);
        assert_eq!(buf.width, 4);
        assert_eq!(buf.height, 3);
        assert_eq!(buf.channels, 3);
        assert_eq!(buf.data.len(), 4 * 3 * 3);
    }

    #[test]
    fn test_buffer_grayscale_channels() {
        let buf = to_buffer(color_image(4, 3), ColorMode::Grayscale);
        assert_eq!(buf.channels, 1);
        assert_eq!(buf.data.len(), 4 * 3);
    }

    #[test]
    fn test_auto_collapses_gray_image() {
        let buf = to_buffer(gray_rgb_image(5, 5), ColorMode::Auto);
        assert_eq!(buf.channels, 1);
    }

    #[test]
    fn test_auto_keeps_color_image() {
        let buf = to_buffer(color_image(5, 5), ColorMode::Auto);
        assert_eq!(buf.channels, 3);
    }

    #[test]
    fn test_dynamic_grayscale_mode() {
        let img = to_dynamic(color_image(4, 4), ColorMode::Grayscale);
        assert_eq!(img.color().channel_count(), 1);
    }

    #[test]
    fn test_pixel_accessor() {
        let buf = to_buffer(color_image(4, 3), ColorMode::Color);
        assert_eq!(buf.pixel(2, 1), &[2, 1, 7]);
    }

    #[test]
    fn test_is_uniform_gray() {
        assert!(is_uniform_gray(&rgb_buffer(&gray_rgb_image(3, 3))));
        assert!(!is_uniform_gray(&rgb_buffer(&color_image(3, 3))));
    }
}
