//! Texture pages: glyph coverage composited into PNG images.

use std::fmt;
use std::str::FromStr;

use fontbake_core::glyph::{FontSlot, GlyphTable};
use fontbake_core::layout::{Padding, PageSize};
use fontbake_core::logging::targets;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};

use crate::error::{RenderError, RenderResult};
use crate::font::{GlyphBitmap, GlyphRasterizer};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Mix with `other` by `alpha` out of 256.
    fn blend(self, other: Self, alpha: u8) -> Self {
        let alpha = u32::from(alpha);
        let mix = |under: u8, over: u8| {
            ((u32::from(under) * (256 - alpha) + u32::from(over) * alpha) >> 8) as u8
        };
        Self::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse `r,g,b` with each component in `0..=255`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = components.as_slice() else {
            return Err(format!("invalid color '{s}', expected r,g,b"));
        };
        let parse = |value: &str| {
            let digits = (1..=3).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit());
            digits
                .then(|| value.parse::<u8>().ok())
                .flatten()
                .ok_or_else(|| format!("invalid color component '{value}' in '{s}'"))
        };
        Ok(Self::rgb(parse(r)?, parse(g)?, parse(b)?))
    }
}

/// Colors of the generated textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureStyle {
    /// Glyph color.
    pub color: Color,
    /// Background color; `None` keeps the background transparent.
    pub background: Option<Color>,
}

impl Default for TextureStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            background: None,
        }
    }
}

/// The rasterizers behind the two font slots.
#[derive(Clone, Copy)]
pub struct GlyphSources<'a> {
    pub primary: &'a dyn GlyphRasterizer,
    pub secondary: Option<&'a dyn GlyphRasterizer>,
}

impl<'a> GlyphSources<'a> {
    pub fn new(primary: &'a dyn GlyphRasterizer) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(mut self, secondary: &'a dyn GlyphRasterizer) -> Self {
        self.secondary = Some(secondary);
        self
    }

    fn get(&self, slot: FontSlot) -> &'a dyn GlyphRasterizer {
        match (slot, self.secondary) {
            (FontSlot::Secondary, Some(secondary)) => secondary,
            _ => self.primary,
        }
    }
}

impl fmt::Debug for GlyphSources<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphSources")
            .field("secondary", &self.secondary.is_some())
            .finish_non_exhaustive()
    }
}

/// Coverage of one page before colors are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveragePage {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl CoveragePage {
    /// A fully uncovered page.
    pub fn new(size: PageSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            coverage: vec![0; size.width as usize * size.height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at a pixel; zero outside the page.
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[y as usize * self.width as usize + x as usize]
    }

    /// Copy a glyph bitmap with its top-left corner at `(x, y)`.
    pub fn draw(&mut self, glyph: u32, bitmap: &GlyphBitmap, x: u32, y: u32) -> RenderResult<()> {
        if bitmap.width == 0 || bitmap.height == 0 {
            return Ok(());
        }
        let fits = x.checked_add(bitmap.width).is_some_and(|right| right <= self.width)
            && y.checked_add(bitmap.height).is_some_and(|bottom| bottom <= self.height);
        if !fits {
            return Err(RenderError::OutOfBounds {
                glyph,
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let row_len = bitmap.width as usize;
        for (row, source) in bitmap.coverage.chunks_exact(row_len).enumerate() {
            let start = (y as usize + row) * self.width as usize + x as usize;
            self.coverage[start..start + row_len].copy_from_slice(source);
        }
        Ok(())
    }

    /// Apply colors: RGBA with coverage as alpha, or RGB blended over the background.
    pub fn compose(&self, style: &TextureStyle) -> DynamicImage {
        let fg = style.color;
        match style.background {
            None => DynamicImage::ImageRgba8(RgbaImage::from_fn(self.width, self.height, |x, y| {
                Rgba([fg.r, fg.g, fg.b, self.coverage_at(x, y)])
            })),
            Some(bg) => DynamicImage::ImageRgb8(RgbImage::from_fn(self.width, self.height, |x, y| {
                let color = bg.blend(fg, self.coverage_at(x, y));
                Rgb([color.r, color.g, color.b])
            })),
        }
    }
}

/// Rasterize every visible glyph onto its page.
///
/// Glyph bitmaps are placed inside their padding, at `(x + left, y + up)`.
pub fn render_pages(
    glyphs: &GlyphTable,
    pages: &[PageSize],
    sources: GlyphSources<'_>,
    padding: Padding,
) -> RenderResult<Vec<CoveragePage>> {
    let mut canvases: Vec<CoveragePage> = pages.iter().copied().map(CoveragePage::new).collect();

    for (key, glyph) in glyphs {
        if glyph.is_empty() {
            continue;
        }
        let Some(canvas) = canvases.get_mut(glyph.page as usize) else {
            return Err(RenderError::OutOfBounds {
                glyph: key.index,
                x: glyph.x,
                y: glyph.y,
                width: 0,
                height: 0,
            });
        };
        let bitmap = sources.get(key.slot).rasterize(key.index)?;
        canvas.draw(key.index, &bitmap, glyph.x + padding.left, glyph.y + padding.up)?;
    }

    tracing::debug!(target: targets::RENDER, pages = canvases.len(), "pages rasterized");
    Ok(canvases)
}

/// Encode a page as PNG with the best compression.
pub fn encode_png(image: &DynamicImage) -> RenderResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(image.as_bytes(), image.width(), image.height(), image.color().into())
        .map_err(|e| RenderError::ImageEncode(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontbake_core::glyph::{GlyphKey, GlyphRecord};

    /// Every glyph is a solid block whose coverage is its index.
    struct Blocks;

    impl GlyphRasterizer for Blocks {
        fn rasterize(&self, glyph: u32) -> RenderResult<GlyphBitmap> {
            Ok(GlyphBitmap {
                width: 2,
                height: 3,
                left: 0,
                top: 3,
                coverage: vec![glyph as u8; 6],
            })
        }
    }

    fn glyph(page: u32, x: u32, y: u32) -> GlyphRecord {
        GlyphRecord { width: 2, height: 3, page, x, y, ..Default::default() }
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("255, 128,0".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert!("1,2".parse::<Color>().is_err());
        assert!("1,2,256".parse::<Color>().is_err());
        assert!("1,+2,3".parse::<Color>().is_err());
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "1,2,3");
    }

    #[test]
    fn test_blend() {
        let bg = Color::rgb(0, 0, 255);
        let fg = Color::rgb(255, 255, 255);
        assert_eq!(bg.blend(fg, 0), bg);
        assert_eq!(bg.blend(fg, 255), Color::rgb(254, 254, 255));
        assert_eq!(bg.blend(fg, 128), Color::rgb(127, 127, 255));
    }

    #[test]
    fn test_glyphs_drawn_inside_padding() {
        let mut glyphs = GlyphTable::new();
        glyphs.insert(GlyphKey::primary(9), glyph(0, 1, 2));
        glyphs.insert(GlyphKey::primary(7), glyph(1, 0, 0));
        glyphs.insert(GlyphKey::primary(5), GlyphRecord::default());

        let padding = Padding { up: 1, right: 0, down: 0, left: 2 };
        let pages = [PageSize::new(8, 8), PageSize::new(4, 4)];
        let canvases = render_pages(&glyphs, &pages, GlyphSources::new(&Blocks), padding).unwrap();

        assert_eq!(canvases.len(), 2);
        assert_eq!(canvases[0].coverage_at(3, 3), 9);
        assert_eq!(canvases[0].coverage_at(4, 5), 9);
        assert_eq!(canvases[0].coverage_at(5, 3), 0);
        assert_eq!(canvases[0].coverage_at(3, 2), 0);
        assert_eq!(canvases[1].coverage_at(2, 1), 7);
    }

    #[test]
    fn test_secondary_slot_uses_secondary_rasterizer() {
        struct Faint;
        impl GlyphRasterizer for Faint {
            fn rasterize(&self, _glyph: u32) -> RenderResult<GlyphBitmap> {
                Ok(GlyphBitmap { width: 2, height: 3, coverage: vec![1; 6], ..Default::default() })
            }
        }

        let mut glyphs = GlyphTable::new();
        glyphs.insert(GlyphKey::secondary(9), glyph(0, 0, 0));
        let sources = GlyphSources::new(&Blocks).with_secondary(&Faint);
        let canvases =
            render_pages(&glyphs, &[PageSize::new(4, 4)], sources, Padding::default()).unwrap();
        assert_eq!(canvases[0].coverage_at(0, 0), 1);
    }

    #[test]
    fn test_glyph_outside_page_is_an_error() {
        let mut glyphs = GlyphTable::new();
        glyphs.insert(GlyphKey::primary(1), glyph(0, 3, 0));
        let result = render_pages(&glyphs, &[PageSize::new(4, 4)], GlyphSources::new(&Blocks), Padding::default());
        assert!(matches!(result, Err(RenderError::OutOfBounds { glyph: 1, .. })));
    }

    #[test]
    fn test_compose_transparent_and_opaque() {
        let mut canvas = CoveragePage::new(PageSize::new(2, 1));
        let bitmap = GlyphBitmap { width: 1, height: 1, coverage: vec![200], ..Default::default() };
        canvas.draw(1, &bitmap, 1, 0).unwrap();

        let style = TextureStyle { color: Color::rgb(10, 20, 30), background: None };
        let rgba = canvas.compose(&style).to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0, [10, 20, 30, 0]);
        assert_eq!(rgba.get_pixel(1, 0).0, [10, 20, 30, 200]);

        let style = TextureStyle { color: Color::WHITE, background: Some(Color::BLACK) };
        let image = canvas.compose(&style);
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));
        let rgb = image.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [199, 199, 199]);
    }

    #[test]
    fn test_png_signature() {
        let canvas = CoveragePage::new(PageSize::new(3, 2));
        let png = encode_png(&canvas.compose(&TextureStyle::default())).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }
}
