// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::color::{Color, PackedColor};
use crate::error::DrawError;
use crate::geom::IntSize;

/// Number of bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Maximum width or height of a surface.
pub const MAX_DIMENSION: u32 = 16384;

/// Maximum surface area in pixels.
pub const MAX_AREA: u64 = 1 << 28;

/// A container that owns a grid of RGBA pixels.
///
/// Pixels are stored non-premultiplied, 8 bits per channel, in R, G, B, A
/// byte order. The data is not aligned, therefore width == stride.
///
/// The same storage is exposed through two aliased views: a byte view
/// ([`data`](Self::data)) and a 32-bit word view ([`words`](Self::words)).
/// The word view exists so fully opaque writes cost one store per pixel.
#[derive(Clone, PartialEq)]
pub struct Surface {
    data: Vec<u8>,
    size: IntSize,
}

impl Surface {
    /// Allocates a new surface, filled with transparent black.
    ///
    /// Dimensions are validated before any allocation happens:
    /// both must be in `1..=16384` and the area must not exceed 2^28.
    pub fn new(width: u32, height: u32) -> Result<Self, DrawError> {
        let size = check_size(width, height)?;
        let data_len = size.area() as usize * BYTES_PER_PIXEL;

        Ok(Surface {
            data: vec![0; data_len],
            size,
        })
    }

    /// Returns surface's width.
    pub fn width(&self) -> u32 {
        self.size.width()
    }

    /// Returns surface's height.
    pub fn height(&self) -> u32 {
        self.size.height()
    }

    /// Returns surface's size.
    #[allow(dead_code)]
    pub(crate) fn size(&self) -> IntSize {
        self.size
    }

    /// Returns the internal data.
    ///
    /// Bytes are ordered as RGBA.
    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Returns the mutable internal data.
    ///
    /// Bytes are ordered as RGBA.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data.as_mut_slice()
    }

    /// Returns the 32-bit view over the same storage.
    pub fn words(&self) -> &[PackedColor] {
        bytemuck::cast_slice(self.data())
    }

    /// Returns the mutable 32-bit view over the same storage.
    pub fn words_mut(&mut self) -> &mut [PackedColor] {
        bytemuck::cast_slice_mut(self.data_mut())
    }

    /// Returns a pixel color.
    ///
    /// Returns `None` when position is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }

        Some(self.get(self.pixel_index(x, y)))
    }

    /// Sets a pixel color.
    ///
    /// Out of bounds positions are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width() && y < self.height() {
            let idx = self.pixel_index(x, y);
            self.set(idx, color);
        }
    }

    /// Fills the entire surface with a specified color.
    pub fn fill(&mut self, color: Color) {
        let packed = color.pack();
        for word in self.words_mut() {
            *word = packed;
        }
    }

    #[inline]
    pub(crate) fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y * self.width() + x) as usize
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Color {
        self.words()[index].unpack()
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, color: Color) {
        self.words_mut()[index] = color.pack();
    }

    /// Consumes the internal data.
    ///
    /// Bytes are ordered as RGBA.
    pub fn take(self) -> Vec<u8> {
        self.data
    }

    /// Decodes PNG data into a `Surface`.
    ///
    /// Only 8-bit images are supported. Indexed PNGs are not supported.
    ///
    /// Pixels land in the surface as-is: this engine stores straight
    /// alpha, so no premultiplication happens here.
    #[cfg(feature = "png-format")]
    pub fn decode_png(data: &[u8]) -> Result<Self, png::DecodingError> {
        fn make_custom_png_error(msg: &str) -> png::DecodingError {
            std::io::Error::new(std::io::ErrorKind::Other, msg).into()
        }

        let mut decoder = png::Decoder::new(data);
        decoder.set_transformations(png::Transformations::normalize_to_color8());
        let mut reader = decoder.read_info()?;
        let mut img_data = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut img_data)?;

        if info.bit_depth != png::BitDepth::Eight {
            return Err(make_custom_png_error("unsupported bit depth"));
        }

        let mut surface = Surface::new(info.width, info.height)
            .map_err(|_| make_custom_png_error("invalid image size"))?;

        match info.color_type {
            png::ColorType::Rgba => {
                surface.data_mut().copy_from_slice(&img_data);
            }
            png::ColorType::Rgb => {
                for (dst, rgb) in surface
                    .data_mut()
                    .chunks_exact_mut(BYTES_PER_PIXEL)
                    .zip(img_data.chunks_exact(3))
                {
                    dst[0] = rgb[0];
                    dst[1] = rgb[1];
                    dst[2] = rgb[2];
                    dst[3] = crate::color::ALPHA_U8_OPAQUE;
                }
            }
            png::ColorType::Grayscale => {
                for (dst, gray) in surface
                    .data_mut()
                    .chunks_exact_mut(BYTES_PER_PIXEL)
                    .zip(img_data.iter())
                {
                    dst[0] = *gray;
                    dst[1] = *gray;
                    dst[2] = *gray;
                    dst[3] = crate::color::ALPHA_U8_OPAQUE;
                }
            }
            png::ColorType::GrayscaleAlpha => {
                for (dst, ga) in surface
                    .data_mut()
                    .chunks_exact_mut(BYTES_PER_PIXEL)
                    .zip(img_data.chunks_exact(2))
                {
                    dst[0] = ga[0];
                    dst[1] = ga[0];
                    dst[2] = ga[0];
                    dst[3] = ga[1];
                }
            }
            png::ColorType::Indexed => {
                return Err(make_custom_png_error("indexed PNG is not supported"));
            }
        }

        Ok(surface)
    }

    /// Loads a PNG file into a `Surface`.
    #[cfg(feature = "png-format")]
    pub fn load_png<P: AsRef<std::path::Path>>(path: P) -> Result<Self, png::DecodingError> {
        // `png::Decoder` is generic over the input, so feeding it a
        // `File` would instance a second copy of the decoder. One
        // input type keeps the code lean.
        let data = std::fs::read(path)?;
        Self::decode_png(&data)
    }

    /// Encodes the surface into PNG data.
    #[cfg(feature = "png-format")]
    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        let mut data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut data, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.data)?;
        }

        Ok(data)
    }

    /// Saves the surface as a PNG file.
    #[cfg(feature = "png-format")]
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), png::EncodingError> {
        let data = self.encode_png()?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

impl core::fmt::Debug for Surface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Surface")
            .field("data", &"...")
            .field("width", &self.size.width())
            .field("height", &self.size.height())
            .finish()
    }
}

fn check_size(width: u32, height: u32) -> Result<IntSize, DrawError> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(DrawError::InvalidSurfaceDimensions);
    }

    let size = IntSize::from_wh(width, height).ok_or(DrawError::InvalidSurfaceDimensions)?;
    if size.area() > MAX_AREA {
        return Err(DrawError::InvalidSurfaceDimensions);
    }

    Ok(size)
}
