use crate::memo::MemoId;
use crate::mesh::{Mesh, PickHit};
use crate::sculpt::SculptParams;

/// Everything that can change `ViewerState`. Produced by the window event
/// handlers, the loader and the egui panels.
pub enum ViewerEvent {
    MeshLoaded { name: String, mesh: Mesh },

    SetOpacity(f32),
    ToggleMemoMode,

    Picked(PickHit),
    /// Opens the edit dialog from the memo list instead of the scene.
    OpenMemo(MemoId),

    EditDraft(String),
    SaveDialog,
    RequestDelete,
    ConfirmDelete(bool),
    CancelDialog,
    AcknowledgeNotice,

    ToggleSculptMode,
    SetSculptParams(SculptParams),
    ApplySculpt,
    CancelSculpt,
}
