//! Material system for Phong-lit objects
//!
//! Provides material records and a registry that maps short tags to them.
//! Objects reference materials by tag; the registry is populated once while
//! the scene is prepared and read-only afterwards.

use cgmath::Vector3;

/// Material tag used for lookups
pub type MaterialId = String;

/// Lighting response coefficients of a drawn object
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    pub tag: MaterialId,
    pub ambient_color: Vector3<f32>,
    /// Weight of the ambient term, in [0, 1]
    pub ambient_strength: f32,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl MaterialRecord {
    /// Creates a material with a neutral grey response
    ///
    /// # Arguments
    /// * `tag` - Name objects use to reference this material
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ambient_color: Vector3::new(0.2, 0.2, 0.2),
            ambient_strength: 0.2,
            diffuse_color: Vector3::new(0.8, 0.8, 0.8),
            specular_color: Vector3::new(0.5, 0.5, 0.5),
            shininess: 32.0,
        }
    }

    /// Builder pattern: Set ambient color
    pub fn with_ambient(mut self, r: f32, g: f32, b: f32) -> Self {
        self.ambient_color = Vector3::new(r, g, b);
        self
    }

    /// Builder pattern: Set ambient strength
    pub fn with_ambient_strength(mut self, strength: f32) -> Self {
        self.ambient_strength = strength.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set diffuse color
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse_color = Vector3::new(r, g, b);
        self
    }

    /// Builder pattern: Set specular color
    pub fn with_specular(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular_color = Vector3::new(r, g, b);
        self
    }

    /// Builder pattern: Set shininess
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(f32::EPSILON);
        self
    }
}

/// Fixed catalog of named materials available to every scene
pub fn material_catalog() -> Vec<MaterialRecord> {
    vec![
        MaterialRecord::new("porcelain")
            .with_ambient(0.25, 0.25, 0.3)
            .with_ambient_strength(0.15)
            .with_diffuse(0.9, 0.9, 0.9)
            .with_specular(0.7, 0.7, 0.7)
            .with_shininess(50.0),
        MaterialRecord::new("gold")
            .with_ambient(0.247, 0.199, 0.074)
            .with_ambient_strength(0.3)
            .with_diffuse(0.751, 0.606, 0.226)
            .with_specular(0.628, 0.556, 0.366)
            .with_shininess(51.2),
        MaterialRecord::new("silver")
            .with_ambient(0.192, 0.192, 0.192)
            .with_ambient_strength(0.25)
            .with_diffuse(0.507, 0.507, 0.507)
            .with_specular(0.508, 0.508, 0.508)
            .with_shininess(51.2),
        MaterialRecord::new("bronze")
            .with_ambient(0.2125, 0.1275, 0.054)
            .with_ambient_strength(0.25)
            .with_diffuse(0.714, 0.4284, 0.18144)
            .with_specular(0.393, 0.271, 0.166)
            .with_shininess(25.6),
    ]
}

/// Ordered registry of materials keyed by tag
///
/// Lookup is a linear scan returning the first match, so a later record
/// with a duplicate tag is shadowed by the earlier one.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<MaterialRecord>,
    defined: bool,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates the registry with the material catalog
    ///
    /// Runs once per registry; later calls are ignored.
    pub fn define_all(&mut self) {
        if self.defined {
            log::warn!("Materials already defined, ignoring repeated definition");
            return;
        }

        for material in material_catalog() {
            self.add_material(material);
        }
        self.defined = true;
        log::debug!("Defined {} materials", self.materials.len());
    }

    /// Appends a material to the registry
    ///
    /// # Arguments
    /// * `material` - Material to add; shadowed if its tag is already taken
    pub fn add_material(&mut self, material: MaterialRecord) {
        if self.find(&material.tag).is_some() {
            log::warn!(
                "Material '{}' is already defined; the new definition is shadowed",
                material.tag
            );
        }
        self.materials.push(material);
    }

    /// Finds the first material registered under `tag`
    pub fn find(&self, tag: &str) -> Option<&MaterialRecord> {
        self.materials.iter().find(|material| material.tag == tag)
    }

    /// Lists all material tags in registration order
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.iter().map(|material| &material.tag).collect()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
