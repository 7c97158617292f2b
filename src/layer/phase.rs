//! Layer lifecycle phases.

/// Where a layer is in its lifecycle.
///
/// Transitions: Uninitialized -> Loading on the host's add call,
/// Loading -> Ready once every asset and GPU object is in place, and
/// any phase -> Removed on the host's remove call. Removed is
/// terminal. A layer whose loading failed stays in Loading and never
/// renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerPhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Removed,
}

impl LayerPhase {
    /// Whether render calls should draw in this phase.
    pub fn is_renderable(self) -> bool {
        matches!(self, LayerPhase::Ready)
    }

    pub fn is_removed(self) -> bool {
        matches!(self, LayerPhase::Removed)
    }

    pub fn label(self) -> &'static str {
        match self {
            LayerPhase::Uninitialized => "uninitialized",
            LayerPhase::Loading => "loading",
            LayerPhase::Ready => "ready",
            LayerPhase::Removed => "removed",
        }
    }
}
