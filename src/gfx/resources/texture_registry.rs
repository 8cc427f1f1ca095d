//! Texture registry
//!
//! Maps short tags to uploaded GPU textures and the texture unit each one is
//! sampled through. Entries are append-only: the n-th texture registered is
//! bound to unit n for the whole lifetime of the registry.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::image_loader::decode_image;
use crate::gfx::backend::TextureBackend;

/// Texture units every GPU is guaranteed to provide
pub const MAX_TEXTURE_UNITS: usize = 16;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not load image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image {path} has {channels} channels; only RGB and RGBA are supported")]
    UnsupportedChannels { path: PathBuf, channels: u8 },
    #[error("a texture is already registered under tag '{0}'")]
    DuplicateTag(String),
    #[error("all {max} texture units are in use")]
    CapacityExceeded { max: usize },
    #[error("texture '{label}' is {width}x{height}; the GPU supports at most {max}x{max}")]
    TooLarge {
        label: String,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// A registered texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureEntry<H> {
    pub tag: String,
    pub handle: H,
    /// Texture unit index, equal to the registration position
    pub slot: usize,
}

/// Ordered, append-only registry of textures keyed by tag
#[derive(Debug)]
pub struct TextureRegistry<H> {
    entries: Vec<TextureEntry<H>>,
}

impl<H> Default for TextureRegistry<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Copy + std::fmt::Debug + PartialEq> TextureRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the image at `path`, uploads it and registers it under `tag`
    ///
    /// # Returns
    /// The texture unit assigned to the new entry
    ///
    /// # Errors
    /// A failed load leaves the registry untouched. `CapacityExceeded` means
    /// the caller registered more textures than there are units, which is a
    /// programming error.
    pub fn load<B>(&mut self, backend: &mut B, path: &Path, tag: &str) -> Result<usize, TextureError>
    where
        B: TextureBackend<TextureHandle = H> + ?Sized,
    {
        if self.entries.len() >= MAX_TEXTURE_UNITS {
            return Err(TextureError::CapacityExceeded {
                max: MAX_TEXTURE_UNITS,
            });
        }
        if self.find_slot(tag).is_some() {
            return Err(TextureError::DuplicateTag(tag.to_string()));
        }

        let image = decode_image(path)?;
        let handle = backend.create_texture(&image, tag)?;
        log::info!(
            "Loaded image {}: width {}, height {}, channels {}",
            path.display(),
            image.width,
            image.height,
            image.channels
        );

        let slot = self.entries.len();
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
            slot,
        });

        Ok(slot)
    }

    /// Binds every registered texture to its texture unit
    ///
    /// Must run after the last `load` and before any draw samples a texture.
    pub fn bind_all<B>(&self, backend: &mut B)
    where
        B: TextureBackend<TextureHandle = H> + ?Sized,
    {
        for entry in &self.entries {
            backend.bind_texture_unit(entry.slot, entry.handle);
        }
    }

    /// Texture unit registered under `tag`, if any
    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.slot)
    }

    /// GPU handle registered under `tag`, if any
    pub fn find_handle(&self, tag: &str) -> Option<H> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.handle)
    }

    pub fn entries(&self) -> &[TextureEntry<H>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Releases every GPU texture and empties the registry
    pub fn destroy<B>(&mut self, backend: &mut B)
    where
        B: TextureBackend<TextureHandle = H> + ?Sized,
    {
        for entry in self.entries.drain(..) {
            backend.release_texture(entry.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::testing::{write_rgb_image, BackendCall, RecordingBackend};
    use image::{LumaA, ImageBuffer};

    #[test]
    fn test_slots_follow_registration_order() {
        let dir = tempfile::tempdir().unwrap();
        let floor = write_rgb_image(dir.path(), "floor.png");
        let mouse = write_rgb_image(dir.path(), "mouse.png");

        let mut backend = RecordingBackend::new();
        let mut registry = TextureRegistry::new();

        assert_eq!(registry.load(&mut backend, &floor, "floor").unwrap(), 0);
        assert_eq!(registry.load(&mut backend, &mouse, "mouse").unwrap(), 1);

        assert_eq!(registry.find_slot("floor"), Some(0));
        assert_eq!(registry.find_slot("mouse"), Some(1));
        assert_eq!(registry.find_slot("laptop"), None);
        assert_eq!(backend.textures_created(), 2);
    }

    #[test]
    fn test_failed_load_registers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let gray = dir.path().join("gray_alpha.png");
        ImageBuffer::from_pixel(2, 2, LumaA([90u8, 255])).save(&gray).unwrap();

        let mut backend = RecordingBackend::new();
        let mut registry = TextureRegistry::new();

        assert!(matches!(
            registry.load(&mut backend, &gray, "gray"),
            Err(TextureError::UnsupportedChannels { channels: 2, .. })
        ));
        assert!(matches!(
            registry.load(&mut backend, &dir.path().join("nope.png"), "nope"),
            Err(TextureError::Decode { .. })
        ));
        assert!(registry.is_empty());
        assert_eq!(backend.textures_created(), 0);
    }

    #[test]
    fn test_oversized_texture_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let wide = write_rgb_image(dir.path(), "wide.png");
        let mut backend = RecordingBackend::new().with_max_texture_dimension(3);
        let mut registry = TextureRegistry::new();

        assert!(matches!(
            registry.load(&mut backend, &wide, "wide"),
            Err(TextureError::TooLarge { width: 4, height: 2, max: 3, .. })
        ));
        assert!(registry.is_empty());
        assert_eq!(backend.textures_created(), 0);

        let mut backend = RecordingBackend::new().with_max_texture_dimension(4);
        assert_eq!(registry.load(&mut backend, &wide, "wide").unwrap(), 0);
    }

    #[test]
    fn test_duplicate_tag_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb_image(dir.path(), "floor.png");

        let mut backend = RecordingBackend::new();
        let mut registry = TextureRegistry::new();
        registry.load(&mut backend, &path, "floor").unwrap();

        assert!(matches!(
            registry.load(&mut backend, &path, "floor"),
            Err(TextureError::DuplicateTag(tag)) if tag == "floor"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_capacity_overflow_is_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb_image(dir.path(), "tile.png");

        let mut backend = RecordingBackend::new();
        let mut registry = TextureRegistry::new();
        for i in 0..MAX_TEXTURE_UNITS {
            let slot = registry.load(&mut backend, &path, &format!("tile{}", i)).unwrap();
            assert_eq!(slot, i);
        }

        assert!(matches!(
            registry.load(&mut backend, &path, "one_too_many"),
            Err(TextureError::CapacityExceeded { max: MAX_TEXTURE_UNITS })
        ));
        assert_eq!(registry.len(), MAX_TEXTURE_UNITS);
        assert!(registry.entries().iter().all(|entry| entry.slot < MAX_TEXTURE_UNITS));
    }

    #[test]
    fn test_bind_all_and_destroy() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb_image(dir.path(), "tile.png");

        let mut backend = RecordingBackend::new();
        let mut registry = TextureRegistry::new();
        registry.load(&mut backend, &path, "a").unwrap();
        registry.load(&mut backend, &path, "b").unwrap();
        let a = registry.find_handle("a").unwrap();
        let b = registry.find_handle("b").unwrap();

        backend.clear_calls();
        registry.bind_all(&mut backend);
        assert_eq!(
            backend.calls(),
            &[
                BackendCall::BindTexture { slot: 0, handle: a },
                BackendCall::BindTexture { slot: 1, handle: b },
            ]
        );

        backend.clear_calls();
        registry.destroy(&mut backend);
        assert_eq!(
            backend.calls(),
            &[BackendCall::ReleaseTexture(a), BackendCall::ReleaseTexture(b)]
        );
        assert!(registry.is_empty());
    }
}
