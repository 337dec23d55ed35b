//! Opaque handle types exchanged with a display provider.
//!
//! Handles are compared by identity. Two materials with identical settings but
//! different ids are different bindings as far as batching is concerned.

use batchmesh_core::color::Color32;
use batchmesh_core::math::{Vec2, Vec3};

/// A host-side drawable object (the thing that is shown or hidden and owns a material slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableHandle(pub u64);

/// A host-side geometry object bound 1:1 to a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub u64);

/// A material binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u64);

/// Static render state applied to every drawable when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderState {
    /// Host sorting layer; `None` keeps the host default.
    pub layer_name: Option<String>,
    /// Ordering offset within the layer.
    pub order: i32,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

/// Borrowed view of one combined mesh, handed to the provider for a single upload.
///
/// `vertices`, `uvs`, `colors` and `additional_colors` hold four entries per quad,
/// `indices` holds six.
#[derive(Debug, Clone, Copy)]
pub struct GeometryData<'a> {
    pub vertices: &'a [Vec3],
    pub uvs: &'a [Vec2],
    pub indices: &'a [u32],
    pub colors: &'a [Color32],
    pub additional_colors: &'a [Vec3],
}

impl GeometryData<'_> {
    /// Number of quads described by this data.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}
