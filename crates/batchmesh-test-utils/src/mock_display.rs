//! Mock implementation of DisplayProvider for testing.
//!
//! Records every call and keeps enough per-handle state to assert on what a host
//! engine would currently be showing.

use crate::{display_provider::*, handles::*};
use batchmesh_core::alloc::HashMap;
use batchmesh_core::color::Color32;
use batchmesh_core::math::{Vec2, Vec3};
use parking_lot::Mutex;

/// Records a provider call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    CreateDrawable {
        name: String,
    },
    CreateGeometry {
        name: String,
    },
    BindGeometry {
        drawable: DrawableHandle,
        geometry: Option<GeometryHandle>,
    },
    ApplyRenderState {
        drawable: DrawableHandle,
        state: RenderState,
    },
    SetMaterial {
        drawable: DrawableHandle,
        material: Option<MaterialId>,
    },
    SetDrawableActive {
        drawable: DrawableHandle,
        active: bool,
    },
    ClearGeometry {
        geometry: GeometryHandle,
    },
    UploadGeometry {
        geometry: GeometryHandle,
        quads: usize,
    },
    RecomputeBounds {
        geometry: GeometryHandle,
    },
    DestroyGeometry {
        geometry: GeometryHandle,
    },
    DestroyDrawable {
        drawable: DrawableHandle,
    },
}

/// Host-side state of a mock drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct MockDrawable {
    pub name: String,
    pub active: bool,
    pub material: Option<MaterialId>,
    pub geometry: Option<GeometryHandle>,
    pub render_state: RenderState,
}

/// Host-side state of a mock geometry object, holding a copy of the last upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MockGeometry {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub colors: Vec<Color32>,
    pub additional_colors: Vec<Vec3>,
    pub uploads: usize,
    pub bounds_recomputed: usize,
}

impl MockGeometry {
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Mock implementation of [`DisplayProvider`].
///
/// # Example
///
/// ```rust
/// use batchmesh_test_utils::{DisplayProvider, MockDisplayProvider};
///
/// let mock = MockDisplayProvider::new();
/// mock.fail_drawable_creation_after(1);
///
/// assert!(mock.create_drawable("a").is_ok());
/// assert!(mock.create_drawable("b").is_err());
/// ```
pub struct MockDisplayProvider {
    /// Recorded calls for verification
    calls: Mutex<Vec<DisplayCall>>,

    drawables: Mutex<HashMap<DrawableHandle, MockDrawable>>,
    geometries: Mutex<HashMap<GeometryHandle, MockGeometry>>,

    /// Shared counter for generating handle ids
    next_id: Mutex<u64>,

    /// Remaining successful drawable creations before failures start
    drawable_budget: Mutex<Option<usize>>,
}

impl MockDisplayProvider {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            drawables: Mutex::new(HashMap::new()),
            geometries: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
            drawable_budget: Mutex::new(None),
        }
    }

    /// Let `count` more drawable creations succeed, then fail every later one.
    pub fn fail_drawable_creation_after(&self, count: usize) {
        *self.drawable_budget.lock() = Some(count);
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().clone()
    }

    /// Clear recorded calls (useful between frames in a test).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn count_matching(&self, pred: impl Fn(&DisplayCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    pub fn count_drawable_creates(&self) -> usize {
        self.count_matching(|call| matches!(call, DisplayCall::CreateDrawable { .. }))
    }

    pub fn count_uploads(&self) -> usize {
        self.count_matching(|call| matches!(call, DisplayCall::UploadGeometry { .. }))
    }

    pub fn count_material_binds(&self) -> usize {
        self.count_matching(|call| matches!(call, DisplayCall::SetMaterial { material: Some(_), .. }))
    }

    /// Count calls that hid a drawable.
    pub fn count_deactivations(&self) -> usize {
        self.count_matching(|call| matches!(call, DisplayCall::SetDrawableActive { active: false, .. }))
    }

    /// Snapshot of a live drawable.
    pub fn drawable(&self, handle: DrawableHandle) -> Option<MockDrawable> {
        self.drawables.lock().get(&handle).cloned()
    }

    /// Snapshot of a live geometry object.
    pub fn geometry(&self, handle: GeometryHandle) -> Option<MockGeometry> {
        self.geometries.lock().get(&handle).cloned()
    }

    pub fn live_drawables(&self) -> usize {
        self.drawables.lock().len()
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.lock().len()
    }

    /// Number of live drawables currently shown.
    pub fn active_drawables(&self) -> usize {
        self.drawables.lock().values().filter(|d| d.active).count()
    }

    fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock();
        let value = *id;
        *id += 1;
        value
    }

    fn record(&self, call: DisplayCall) {
        self.calls.lock().push(call);
    }
}

impl Default for MockDisplayProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayProvider for MockDisplayProvider {
    fn create_drawable(&self, name: &str) -> Result<DrawableHandle, DisplayError> {
        {
            let mut budget = self.drawable_budget.lock();
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    return Err(DisplayError::DrawableCreationFailed {
                        name: name.to_string(),
                        reason: "mock drawable budget exhausted".to_string(),
                    });
                }
                *remaining -= 1;
            }
        }

        let handle = DrawableHandle(self.next_id());
        self.drawables.lock().insert(
            handle,
            MockDrawable {
                name: name.to_string(),
                active: false,
                material: None,
                geometry: None,
                render_state: RenderState::default(),
            },
        );
        self.record(DisplayCall::CreateDrawable {
            name: name.to_string(),
        });
        Ok(handle)
    }

    fn create_geometry(&self, name: &str) -> Result<GeometryHandle, DisplayError> {
        let handle = GeometryHandle(self.next_id());
        self.geometries.lock().insert(
            handle,
            MockGeometry {
                name: name.to_string(),
                ..Default::default()
            },
        );
        self.record(DisplayCall::CreateGeometry {
            name: name.to_string(),
        });
        Ok(handle)
    }

    fn bind_geometry(&self, drawable: DrawableHandle, geometry: Option<GeometryHandle>) {
        if let Some(d) = self.drawables.lock().get_mut(&drawable) {
            d.geometry = geometry;
        }
        self.record(DisplayCall::BindGeometry { drawable, geometry });
    }

    fn apply_render_state(&self, drawable: DrawableHandle, state: &RenderState) {
        if let Some(d) = self.drawables.lock().get_mut(&drawable) {
            d.render_state = state.clone();
        }
        self.record(DisplayCall::ApplyRenderState {
            drawable,
            state: state.clone(),
        });
    }

    fn set_material(&self, drawable: DrawableHandle, material: Option<MaterialId>) {
        if let Some(d) = self.drawables.lock().get_mut(&drawable) {
            d.material = material;
        }
        self.record(DisplayCall::SetMaterial { drawable, material });
    }

    fn set_drawable_active(&self, drawable: DrawableHandle, active: bool) {
        if let Some(d) = self.drawables.lock().get_mut(&drawable) {
            d.active = active;
        }
        self.record(DisplayCall::SetDrawableActive { drawable, active });
    }

    fn clear_geometry(&self, geometry: GeometryHandle) {
        if let Some(g) = self.geometries.lock().get_mut(&geometry) {
            g.vertices.clear();
            g.uvs.clear();
            g.indices.clear();
            g.colors.clear();
            g.additional_colors.clear();
        }
        self.record(DisplayCall::ClearGeometry { geometry });
    }

    fn upload_geometry(&self, geometry: GeometryHandle, data: &GeometryData<'_>) {
        if let Some(g) = self.geometries.lock().get_mut(&geometry) {
            g.vertices = data.vertices.to_vec();
            g.uvs = data.uvs.to_vec();
            g.indices = data.indices.to_vec();
            g.colors = data.colors.to_vec();
            g.additional_colors = data.additional_colors.to_vec();
            g.uploads += 1;
        }
        self.record(DisplayCall::UploadGeometry {
            geometry,
            quads: data.quad_count(),
        });
    }

    fn recompute_bounds(&self, geometry: GeometryHandle) {
        if let Some(g) = self.geometries.lock().get_mut(&geometry) {
            g.bounds_recomputed += 1;
        }
        self.record(DisplayCall::RecomputeBounds { geometry });
    }

    fn destroy_geometry(&self, geometry: GeometryHandle) {
        self.geometries.lock().remove(&geometry);
        self.record(DisplayCall::DestroyGeometry { geometry });
    }

    fn destroy_drawable(&self, drawable: DrawableHandle) {
        self.drawables.lock().remove(&drawable);
        self.record(DisplayCall::DestroyDrawable { drawable });
    }
}
