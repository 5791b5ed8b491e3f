// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use limner_path::NormalizedF32;

/// 8-bit type for an alpha value. 255 is 100% opaque, zero is 100% transparent.
pub type AlphaU8 = u8;

/// Represents fully transparent AlphaU8 value.
pub const ALPHA_U8_TRANSPARENT: AlphaU8 = 0x00;

/// Represents fully opaque AlphaU8 value.
pub const ALPHA_U8_OPAQUE: AlphaU8 = 0xFF;

/// An RGBA color value, 8 bits per component, non-premultiplied.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    /// A transparent color.
    pub const TRANSPARENT: Color = Color::from_rgba8(0, 0, 0, 0);
    /// A black color.
    pub const BLACK: Color = Color::from_rgba8(0, 0, 0, 255);
    /// A white color.
    pub const WHITE: Color = Color::from_rgba8(255, 255, 255, 255);

    /// Creates a new color.
    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Creates a new opaque color.
    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::from_rgba8(r, g, b, ALPHA_U8_OPAQUE)
    }

    /// Returns color's red component.
    #[inline]
    pub const fn red(self) -> u8 {
        self.r
    }

    /// Returns color's green component.
    #[inline]
    pub const fn green(self) -> u8 {
        self.g
    }

    /// Returns color's blue component.
    #[inline]
    pub const fn blue(self) -> u8 {
        self.b
    }

    /// Returns color's alpha component.
    #[inline]
    pub const fn alpha(self) -> u8 {
        self.a
    }

    /// Check that color is opaque.
    ///
    /// Alpha == 255
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a == ALPHA_U8_OPAQUE
    }

    /// Check that color is transparent.
    ///
    /// Alpha == 0
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == ALPHA_U8_TRANSPARENT
    }

    /// Returns the color with its alpha channel multiplied by `alpha`,
    /// rounded to the nearest integer.
    ///
    /// RGB components are unchanged: the color stays non-premultiplied.
    #[inline]
    pub fn with_global_alpha(&self, alpha: NormalizedF32) -> Color {
        Color {
            a: scale_alpha_u8(self.a, alpha.get()),
            ..*self
        }
    }

    /// Packs into the 32-bit word form.
    #[inline]
    pub fn pack(&self) -> PackedColor {
        PackedColor::from_color(*self)
    }
}

/// Returns `round(a * alpha)` for `alpha` in 0..=1.
#[inline]
pub(crate) fn scale_alpha_u8(a: u8, alpha: f32) -> u8 {
    (f32::from(a) * alpha + 0.5) as u8
}

/// A 32-bit packed RGBA color value.
///
/// The logical word layout is little-endian ABGR:
/// `(a << 24) | (b << 16) | (g << 8) | r`, so the in-memory byte order
/// is always R, G, B, A regardless of the host endianness. This is the
/// pixel format of [`Surface`](crate::Surface)'s 32-bit view.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PackedColor(u32);

// Any bit pattern is a valid packed pixel, which is what makes the
// Surface's word view a plain cast.
unsafe impl bytemuck::Zeroable for PackedColor {}
unsafe impl bytemuck::Pod for PackedColor {}

impl PackedColor {
    /// A transparent pixel.
    pub const TRANSPARENT: Self = PackedColor(0);

    /// Packs a color.
    #[inline]
    pub fn from_color(c: Color) -> Self {
        PackedColor(u32::from_ne_bytes([c.r, c.g, c.b, c.a]))
    }

    /// Creates a packed pixel from the logical ABGR word.
    #[inline]
    pub fn from_abgr(word: u32) -> Self {
        PackedColor(u32::from_ne_bytes(word.to_le_bytes()))
    }

    /// Returns the logical ABGR word: `(a << 24) | (b << 16) | (g << 8) | r`.
    ///
    /// Big-endian hosts byte-swap here; little-endian hosts compile
    /// this to a no-op.
    #[inline]
    pub fn abgr(self) -> u32 {
        u32::from_le_bytes(self.0.to_ne_bytes())
    }

    /// Returns color's red component.
    #[inline]
    pub fn red(self) -> u8 {
        self.0.to_ne_bytes()[0]
    }

    /// Returns color's green component.
    #[inline]
    pub fn green(self) -> u8 {
        self.0.to_ne_bytes()[1]
    }

    /// Returns color's blue component.
    #[inline]
    pub fn blue(self) -> u8 {
        self.0.to_ne_bytes()[2]
    }

    /// Returns color's alpha component.
    #[inline]
    pub fn alpha(self) -> u8 {
        self.0.to_ne_bytes()[3]
    }

    /// Unpacks into component form.
    #[inline]
    pub fn unpack(self) -> Color {
        let [r, g, b, a] = self.0.to_ne_bytes();
        Color::from_rgba8(r, g, b, a)
    }
}

impl core::fmt::Debug for PackedColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PackedColor")
            .field("r", &self.red())
            .field("g", &self.green())
            .field("b", &self.blue())
            .field("a", &self.alpha())
            .finish()
    }
}
