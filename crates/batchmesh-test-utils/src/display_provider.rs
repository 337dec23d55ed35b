//! Trait abstracting the host engine's display surfaces.

use crate::handles::*;

/// Errors raised by a [`DisplayProvider`] while acquiring host resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The host refused to create a drawable.
    DrawableCreationFailed { name: String, reason: String },
    /// The host refused to create a geometry object.
    GeometryCreationFailed { name: String, reason: String },
}

impl std::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayError::DrawableCreationFailed { name, reason } => {
                write!(f, "Failed to create drawable '{}': {}", name, reason)
            }
            DisplayError::GeometryCreationFailed { name, reason } => {
                write!(f, "Failed to create geometry '{}': {}", name, reason)
            }
        }
    }
}

impl std::error::Error for DisplayError {}

/// Host display-surface operations consumed by the batching code.
///
/// Only creation can fail. Every other operation targets a handle the provider itself
/// handed out, so the provider treats them as infallible.
///
/// # Example
///
/// ```rust,no_run
/// use batchmesh_test_utils::{DisplayProvider, DisplayError};
///
/// fn create_surface(provider: &dyn DisplayProvider) -> Result<(), DisplayError> {
///     let drawable = provider.create_drawable("scene/Mesh/0")?;
///     let geometry = provider.create_geometry("scene")?;
///     provider.bind_geometry(drawable, Some(geometry));
///     provider.set_drawable_active(drawable, false);
///     Ok(())
/// }
/// ```
pub trait DisplayProvider: Send + Sync {
    /// Create a drawable with a diagnostic name. New drawables start inactive.
    fn create_drawable(&self, name: &str) -> Result<DrawableHandle, DisplayError>;

    /// Create an empty, dynamic geometry object.
    fn create_geometry(&self, name: &str) -> Result<GeometryHandle, DisplayError>;

    /// Bind (or with `None`, unbind) the geometry a drawable renders.
    fn bind_geometry(&self, drawable: DrawableHandle, geometry: Option<GeometryHandle>);

    /// Apply layer, ordering and shadow settings.
    fn apply_render_state(&self, drawable: DrawableHandle, state: &RenderState);

    /// Bind (or with `None`, clear) the material a drawable renders with.
    fn set_material(&self, drawable: DrawableHandle, material: Option<MaterialId>);

    /// Show or hide a drawable.
    fn set_drawable_active(&self, drawable: DrawableHandle, active: bool);

    /// Drop all vertex and index data held by a geometry object.
    fn clear_geometry(&self, geometry: GeometryHandle);

    /// Replace the contents of a geometry object in one batched update.
    fn upload_geometry(&self, geometry: GeometryHandle, data: &GeometryData<'_>);

    /// Recompute the bounds of a geometry object after an upload.
    fn recompute_bounds(&self, geometry: GeometryHandle);

    fn destroy_geometry(&self, geometry: GeometryHandle);

    fn destroy_drawable(&self, drawable: DrawableHandle);
}
