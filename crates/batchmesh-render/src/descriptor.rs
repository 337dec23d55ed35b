use batchmesh_test_utils::RenderState;

/// Descriptor for creating a [`BatchAllocator`](crate::BatchAllocator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAllocatorDescriptor {
    /// Diagnostic label. Drawables are named `"<label>/Mesh/<n>"`.
    pub label: String,
    /// Host sorting layer applied to every surface (default: host default layer).
    pub sorting_layer_name: Option<String>,
    /// Base ordering offset applied to every surface (default: 0).
    pub sorting_order: i32,
    /// Skip creating the first surface up front (default: false).
    ///
    /// Child contexts that always delegate to a parent never render into their own
    /// pool, so they are created attaching.
    pub attaching: bool,
}

impl Default for BatchAllocatorDescriptor {
    fn default() -> Self {
        Self {
            label: "batchmesh".to_string(),
            sorting_layer_name: None,
            sorting_order: 0,
            attaching: false,
        }
    }
}

impl BatchAllocatorDescriptor {
    /// Descriptor with the given label and default settings.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Static render state for surfaces. Shadows are always off.
    pub fn render_state(&self) -> RenderState {
        RenderState {
            layer_name: self
                .sorting_layer_name
                .clone()
                .filter(|name| !name.is_empty()),
            order: self.sorting_order,
            cast_shadows: false,
            receive_shadows: false,
        }
    }

    pub fn drawable_name(&self, index: usize) -> String {
        format!("{}/Mesh/{}", self.label, index)
    }
}
