//! Texture resource management for wgpu
//!
//! Provides utilities for creating GPU textures, views, and samplers: the
//! depth buffer and mipmapped color textures uploaded from decoded images.

use image::{imageops::FilterType, RgbaImage};

use super::image_loader::DecodedImage;

/// GPU texture resource containing texture, view, and sampler
///
/// Bundles the three main components needed for texture operations:
/// - Texture: The actual GPU memory allocation
/// - View: Interface for shader access
/// - Sampler: Filtering and addressing configuration
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Color format of every sampled scene texture
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Creates a depth texture matching the surface configuration
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `config` - Surface configuration to match dimensions
    /// * `label` - Debug label for the texture
    ///
    /// # Returns
    /// TextureResource configured for depth testing
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };

        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads a decoded image as a repeating, linearly filtered texture
    /// with a full mip chain
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `queue` - WGPU queue for uploading data
    /// * `image` - Decoded RGB or RGBA pixels, bottom row first
    /// * `label` - Debug label for the texture
    pub fn from_decoded_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        label: &str,
    ) -> Self {
        let levels = mip_chain(image.width, image.height, image.to_rgba8());
        Self::from_mip_levels(device, queue, &levels, label)
    }

    /// A 1x1 opaque white texture, bound whenever a draw samples nothing
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let pixel = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        Self::from_mip_levels(device, queue, &[pixel], "White Fallback")
    }

    fn from_mip_levels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        levels: &[RgbaImage],
        label: &str,
    ) -> Self {
        let (width, height) = levels.first().map_or((1, 1), |base| base.dimensions());
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: levels.len().max(1) as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            let (level_width, level_height) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level_width),
                    rows_per_image: Some(level_height),
                },
                wgpu::Extent3d {
                    width: level_width,
                    height: level_height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Number of mip levels down to 1x1
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Builds every mip level of an RGBA8 image, halving each dimension per level
pub fn mip_chain(width: u32, height: u32, rgba: Vec<u8>) -> Vec<RgbaImage> {
    let Some(base) = RgbaImage::from_raw(width, height, rgba) else {
        log::warn!("Pixel buffer does not match {}x{}, uploading a blank texture", width, height);
        return vec![RgbaImage::new(width.max(1), height.max(1))];
    };

    let count = mip_level_count(width, height);
    let mut levels = Vec::with_capacity(count as usize);
    levels.push(base);
    for level in 1..count {
        let level_width = (width >> level).max(1);
        let level_height = (height >> level).max(1);
        let previous = &levels[levels.len() - 1];
        let next = image::imageops::resize(previous, level_width, level_height, FilterType::Triangle);
        levels.push(next);
    }
    levels
}
