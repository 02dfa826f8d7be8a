//! Static mesh component

use crate::foundation::guid::Guid;
use crate::foundation::math::Transform;
use crate::renderer::Material;

/// Renders a mesh asset with a material
///
/// The material is a value: read it, change it, write the whole thing back.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticMeshComponent {
    /// Transform relative to the owning entity
    pub transform: Transform,
    /// Mesh asset, null when none is assigned
    pub mesh: Guid,
    /// Whether the mesh casts shadows
    pub casts_shadows: bool,
    material: Material,
}

impl Default for StaticMeshComponent {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            mesh: Guid::NULL,
            casts_shadows: true,
            material: Material::default(),
        }
    }
}

impl StaticMeshComponent {
    /// Create a component rendering `mesh`
    pub fn new(mesh: Guid) -> Self {
        Self {
            mesh,
            ..Self::default()
        }
    }

    /// Builder: set the material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Copy of the current material
    pub fn material(&self) -> Material {
        self.material.clone()
    }

    /// Replace the whole material
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }
}
