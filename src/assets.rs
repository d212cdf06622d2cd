//! Font loading for panel labels.
//!
//! Fonts are rasterized once with `fontdue` into a single-channel atlas
//! covering printable ASCII. No font ships with the crate; the viewer loads
//! the one named in its [`AppConfig`](crate::AppConfig), if any.

use std::collections::HashMap;
use std::path::Path;

use fontdue::{Font, FontSettings};

use crate::gpu::GpuContext;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read font: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse font: {0}")]
    Font(&'static str),
}

/// Information about a single glyph in the font atlas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphInfo {
    /// UV rectangle in the atlas (x, y, width, height) normalized to [0, 1].
    pub uv: [f32; 4],
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the glyph's bottom-left corner.
    pub offset_x: f32,
    pub offset_y: f32,
    pub advance: f32,
}

/// Glyph bitmaps packed into one coverage image.
struct PackedAtlas {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
    glyphs: HashMap<char, GlyphInfo>,
}

const PADDING: u32 = 1;

/// Row-packs `(char, metrics, bitmap)` triples, doubling the atlas until
/// everything fits.
fn pack_glyphs(rasterized: &[(char, fontdue::Metrics, Vec<u8>)]) -> PackedAtlas {
    let fits = |width: u32, height: u32| {
        let (mut x, mut y, mut row_height) = (PADDING, PADDING, 0);
        for (_, metrics, _) in rasterized {
            let (w, h) = (metrics.width as u32, metrics.height as u32);
            if w + 2 * PADDING > width {
                return false;
            }
            if x + w + PADDING > width {
                x = PADDING;
                y += row_height + PADDING;
                row_height = 0;
            }
            if y + h + PADDING > height {
                return false;
            }
            x += w + PADDING;
            row_height = row_height.max(h);
        }
        true
    };

    let (mut width, mut height) = (256u32, 256u32);
    while !fits(width, height) {
        if width <= height {
            width *= 2;
        } else {
            height *= 2;
        }
    }

    let mut coverage = vec![0u8; (width * height) as usize];
    let mut glyphs = HashMap::with_capacity(rasterized.len());
    let (mut x, mut y, mut row_height) = (PADDING, PADDING, 0);

    for (c, metrics, bitmap) in rasterized {
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        if x + w + PADDING > width {
            x = PADDING;
            y += row_height + PADDING;
            row_height = 0;
        }

        for row in 0..h {
            let src = (row * w) as usize;
            let dst = ((y + row) * width + x) as usize;
            coverage[dst..dst + w as usize].copy_from_slice(&bitmap[src..src + w as usize]);
        }

        glyphs.insert(
            *c,
            GlyphInfo {
                uv: [
                    x as f32 / width as f32,
                    y as f32 / height as f32,
                    w as f32 / width as f32,
                    h as f32 / height as f32,
                ],
                width: w,
                height: h,
                offset_x: metrics.xmin as f32,
                offset_y: metrics.ymin as f32,
                advance: metrics.advance_width,
            },
        );

        x += w + PADDING;
        row_height = row_height.max(h);
    }

    PackedAtlas {
        width,
        height,
        coverage,
        glyphs,
    }
}

/// A font rasterized at one size and uploaded to the GPU.
pub struct FontAtlas {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    glyphs: HashMap<char, GlyphInfo>,
    size: f32,
}

impl FontAtlas {
    /// Rasterizes printable ASCII from TTF/OTF data.
    pub fn new(gpu: &GpuContext, font_data: &[u8], size: f32) -> Result<Self, AssetError> {
        let font = Font::from_bytes(font_data, FontSettings::default()).map_err(AssetError::Font)?;

        let rasterized: Vec<_> = (32u8..=126u8)
            .map(char::from)
            .map(|c| {
                let (metrics, bitmap) = font.rasterize(c, size);
                (c, metrics, bitmap)
            })
            .collect();
        let packed = pack_glyphs(&rasterized);

        let extent = wgpu::Extent3d {
            width: packed.width,
            height: packed.height,
            depth_or_array_layers: 1,
        };
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Font Atlas"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &packed.coverage,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(packed.width),
                rows_per_image: Some(packed.height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Font Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::debug!(
            "font atlas {}x{} with {} glyphs at {}px",
            packed.width,
            packed.height,
            packed.glyphs.len(),
            size
        );

        Ok(Self {
            view,
            sampler,
            glyphs: packed.glyphs,
            size,
        })
    }

    /// Reads and rasterizes a font file.
    pub fn from_file(gpu: &GpuContext, path: impl AsRef<Path>, size: f32) -> Result<Self, AssetError> {
        let data = std::fs::read(path.as_ref())?;
        Self::new(gpu, &data, size)
    }

    pub fn glyph(&self, c: char) -> Option<&GlyphInfo> {
        self.glyphs.get(&c)
    }

    /// The pixel size this atlas was rasterized at.
    pub fn size(&self) -> f32 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: usize, height: usize) -> fontdue::Metrics {
        fontdue::Metrics {
            xmin: 1,
            ymin: -2,
            width,
            height,
            advance_width: width as f32 + 1.0,
            advance_height: 0.0,
            bounds: fontdue::OutlineBounds::default(),
        }
    }

    #[test]
    fn packs_bitmaps_without_overlap() {
        let glyphs: Vec<_> = ('a'..='z')
            .map(|c| (c, metrics(20, 30), vec![c as u8; 600]))
            .collect();
        let packed = pack_glyphs(&glyphs);

        assert_eq!(packed.glyphs.len(), 26);
        for (c, info) in &packed.glyphs {
            let x = (info.uv[0] * packed.width as f32).round() as u32;
            let y = (info.uv[1] * packed.height as f32).round() as u32;
            assert!(x + info.width <= packed.width);
            assert!(y + info.height <= packed.height);
            // Corners of each glyph hold its own fill byte.
            assert_eq!(packed.coverage[(y * packed.width + x) as usize], *c as u8);
            let last = ((y + info.height - 1) * packed.width + x + info.width - 1) as usize;
            assert_eq!(packed.coverage[last], *c as u8);
        }
    }

    #[test]
    fn atlas_grows_when_glyphs_do_not_fit() {
        let glyphs = vec![('W', metrics(300, 40), vec![255u8; 12000])];
        let packed = pack_glyphs(&glyphs);
        assert_eq!((packed.width, packed.height), (512, 256));
        let info = &packed.glyphs[&'W'];
        assert!(info.uv[0] + info.uv[2] <= 1.0);
        assert!(info.uv[1] + info.uv[3] <= 1.0);
        assert_eq!(info.offset_y, -2.0);
    }

    #[test]
    fn wide_glyph_stays_on_one_atlas_row() {
        let glyphs = vec![
            ('a', metrics(10, 10), vec![1u8; 100]),
            ('W', metrics(300, 2), vec![9u8; 600]),
        ];
        let packed = pack_glyphs(&glyphs);
        let info = &packed.glyphs[&'W'];
        let x = (info.uv[0] * packed.width as f32).round() as u32;
        let y = (info.uv[1] * packed.height as f32).round() as u32;
        assert!(x + info.width <= packed.width);
        for row in y..y + info.height {
            let start = (row * packed.width + x) as usize;
            assert!(packed.coverage[start..start + 300].iter().all(|&b| b == 9));
        }
    }

    #[test]
    fn empty_glyphs_take_no_space() {
        let glyphs = vec![(' ', metrics(0, 0), Vec::new())];
        let packed = pack_glyphs(&glyphs);
        assert_eq!((packed.width, packed.height), (256, 256));
        assert_eq!(packed.glyphs[&' '].advance, 1.0);
    }
}
