use glam::Vec3;
use std::sync::Arc;

use crate::memo::{MemoError, MemoId, MemoStore};
use crate::mesh::{Mesh, PickHit};
use crate::sculpt::{PlaceholderBrush, SculptBrush, SculptOutcome, SculptParams};
use crate::viewer::event::ViewerEvent;

#[derive(Clone, Debug, PartialEq)]
pub enum Dialog {
    None,
    NewMemo { position: Vec3, draft: String },
    EditMemo { id: MemoId, draft: String },
    ConfirmDelete { id: MemoId, draft: String },
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::None)
    }
}

/// Blocking alert shown over everything else until acknowledged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    EmptyMemoText,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::EmptyMemoText => "Please enter some memo text.",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSettings {
    pub opacity: f32,
    pub memo_mode: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            memo_mode: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SculptState {
    pub enabled: bool,
    pub params: SculptParams,
}

/// All session state. Owned by the event loop and replaced on every event via
/// [`ViewerState::apply`].
pub struct ViewerState {
    pub mesh: Option<Arc<Mesh>>,
    pub mesh_name: Option<String>,
    /// Bumped whenever the geometry is replaced so the renderer knows to upload.
    pub mesh_revision: u64,
    pub memos: MemoStore,
    pub view: ViewSettings,
    pub sculpt: SculptState,
    pub dialog: Dialog,
    pub notice: Option<Notice>,
    brush: Arc<dyn SculptBrush>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::with_brush(Arc::new(PlaceholderBrush))
    }
}

impl ViewerState {
    pub fn with_brush(brush: Arc<dyn SculptBrush>) -> Self {
        Self {
            mesh: None,
            mesh_name: None,
            mesh_revision: 0,
            memos: MemoStore::default(),
            view: ViewSettings::default(),
            sculpt: SculptState::default(),
            dialog: Dialog::None,
            notice: None,
            brush,
        }
    }

    /// True while a dialog or notice blocks interaction with the scene.
    pub fn is_modal(&self) -> bool {
        self.dialog.is_open() || self.notice.is_some()
    }

    pub fn apply(mut self, event: ViewerEvent) -> Self {
        match event {
            ViewerEvent::MeshLoaded { name, mesh } => {
                log::info!(
                    "loaded {name}: {} triangles, {} memos cleared",
                    mesh.mesh.triangle_count(),
                    self.memos.len()
                );
                self.replace_mesh(mesh);
                self.mesh_name = Some(name);
                self.memos.clear();
                self.dialog = Dialog::None;
                self.notice = None;
            }

            ViewerEvent::SetOpacity(opacity) => {
                self.view.opacity = opacity.clamp(0.0, 1.0);
            }
            ViewerEvent::ToggleMemoMode => {
                self.view.memo_mode = !self.view.memo_mode;
            }

            ViewerEvent::Picked(_) if self.is_modal() => {}
            ViewerEvent::Picked(PickHit::Surface(position)) => {
                if self.view.memo_mode && self.mesh.is_some() {
                    self.dialog = Dialog::NewMemo {
                        position,
                        draft: String::new(),
                    };
                }
            }
            ViewerEvent::Picked(PickHit::Marker(id)) | ViewerEvent::OpenMemo(id) => {
                if !self.is_modal() {
                    self = self.open_memo(id);
                }
            }

            ViewerEvent::EditDraft(text) => match &mut self.dialog {
                Dialog::NewMemo { draft, .. } | Dialog::EditMemo { draft, .. } => *draft = text,
                Dialog::ConfirmDelete { .. } | Dialog::None => {}
            },
            ViewerEvent::SaveDialog => self = self.save_dialog(),
            ViewerEvent::RequestDelete => {
                if let Dialog::EditMemo { id, draft } = std::mem::replace(&mut self.dialog, Dialog::None) {
                    self.dialog = Dialog::ConfirmDelete { id, draft };
                }
            }
            ViewerEvent::ConfirmDelete(confirmed) => {
                if let Dialog::ConfirmDelete { id, draft } =
                    std::mem::replace(&mut self.dialog, Dialog::None)
                {
                    if confirmed {
                        match self.memos.delete(id) {
                            Ok(memo) => log::info!("deleted memo {:?} at {}", memo.id, memo.position),
                            Err(e) => log::warn!("delete {id:?}: {e}"),
                        }
                    } else {
                        self.dialog = Dialog::EditMemo { id, draft };
                    }
                }
            }
            ViewerEvent::CancelDialog => {
                self.dialog = Dialog::None;
            }
            ViewerEvent::AcknowledgeNotice => {
                self.notice = None;
            }

            ViewerEvent::ToggleSculptMode => {
                self.sculpt.enabled = !self.sculpt.enabled;
            }
            ViewerEvent::SetSculptParams(params) => {
                self.sculpt.params = params.clamped();
            }
            ViewerEvent::ApplySculpt => self = self.apply_sculpt(),
            ViewerEvent::CancelSculpt => {
                if self.sculpt.enabled {
                    self.brush.cancel();
                }
            }
        }
        self
    }

    fn open_memo(mut self, id: MemoId) -> Self {
        match self.memos.get(id) {
            Some(memo) => {
                self.dialog = Dialog::EditMemo {
                    id,
                    draft: memo.text.clone(),
                };
            }
            None => log::debug!("memo {id:?} no longer exists"),
        }
        self
    }

    fn save_dialog(mut self) -> Self {
        match std::mem::replace(&mut self.dialog, Dialog::None) {
            Dialog::NewMemo { position, draft } => match self.memos.create(position, &draft) {
                Ok(id) => log::info!("created memo {id:?} at {position}"),
                Err(MemoError::EmptyText) => {
                    self.notice = Some(Notice::EmptyMemoText);
                    self.dialog = Dialog::NewMemo { position, draft };
                }
                Err(e) => log::warn!("create memo: {e}"),
            },
            Dialog::EditMemo { id, draft } => match self.memos.update(id, &draft) {
                Ok(()) => log::info!("updated memo {id:?}"),
                Err(e) => log::warn!("update {id:?}: {e}"),
            },
            other => self.dialog = other,
        }
        self
    }

    fn apply_sculpt(mut self) -> Self {
        if !self.sculpt.enabled {
            return self;
        }
        let Some(mesh) = self.mesh.clone() else {
            log::debug!("sculpt requested without a mesh");
            return self;
        };

        match self.brush.apply(&mesh, &self.sculpt.params) {
            SculptOutcome::Unchanged => {}
            SculptOutcome::Deformed(deformed) => self.replace_mesh(deformed),
        }
        self
    }

    fn replace_mesh(&mut self, mesh: Mesh) {
        self.mesh = Some(Arc::new(mesh));
        self.mesh_revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TriangleMesh;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quad() -> Mesh {
        let a = Vec3::new(-1.0, -1.0, 0.0);
        let b = Vec3::new(1.0, -1.0, 0.0);
        let c = Vec3::new(1.0, 1.0, 0.0);
        let d = Vec3::new(-1.0, 1.0, 0.0);
        Mesh::normalized(TriangleMesh::from_triangles(&[[a, b, c], [a, c, d]])).unwrap()
    }

    fn run(state: ViewerState, events: impl IntoIterator<Item = ViewerEvent>) -> ViewerState {
        events.into_iter().fold(state, ViewerState::apply)
    }

    fn loaded() -> ViewerState {
        ViewerState::default().apply(ViewerEvent::MeshLoaded {
            name: "part.stl".into(),
            mesh: quad(),
        })
    }

    fn with_memo(text: &str) -> (ViewerState, MemoId) {
        let state = run(
            loaded(),
            [
                ViewerEvent::ToggleMemoMode,
                ViewerEvent::Picked(PickHit::Surface(Vec3::new(0.1, 0.2, 0.0))),
                ViewerEvent::EditDraft(text.into()),
                ViewerEvent::SaveDialog,
            ],
        );
        let id = state.memos.read(0).unwrap().id;
        (state, id)
    }

    #[test]
    fn annotate_then_edit_scenario() {
        let p = Vec3::new(0.3, 0.1, 0.2);
        let state = run(loaded(), [ViewerEvent::ToggleMemoMode, ViewerEvent::Picked(PickHit::Surface(p))]);
        assert_eq!(
            state.dialog,
            Dialog::NewMemo {
                position: p,
                draft: String::new()
            }
        );

        let state = run(
            state,
            [ViewerEvent::EditDraft("crack here".into()), ViewerEvent::SaveDialog],
        );
        assert_eq!(state.dialog, Dialog::None);
        assert_eq!(state.memos.len(), 1);
        let memo = state.memos.read(0).unwrap().clone();
        assert_eq!(memo.position, p);
        assert_eq!(memo.text, "crack here");

        let state = state.apply(ViewerEvent::Picked(PickHit::Marker(memo.id)));
        assert_eq!(
            state.dialog,
            Dialog::EditMemo {
                id: memo.id,
                draft: "crack here".into()
            }
        );

        let state = run(
            state,
            [
                ViewerEvent::EditDraft("crack here, verify".into()),
                ViewerEvent::SaveDialog,
            ],
        );
        assert_eq!(state.memos.len(), 1);
        assert_eq!(state.memos.read(0).unwrap().text, "crack here, verify");
        assert_eq!(state.memos.read(0).unwrap().position, p);
        assert_eq!(state.dialog, Dialog::None);
    }

    #[test]
    fn surface_pick_without_memo_mode_is_ignored() {
        let state = loaded().apply(ViewerEvent::Picked(PickHit::Surface(Vec3::ZERO)));
        assert_eq!(state.dialog, Dialog::None);
    }

    #[test]
    fn marker_pick_works_outside_memo_mode() {
        let (state, id) = with_memo("note");
        let state = state.apply(ViewerEvent::ToggleMemoMode);
        assert!(!state.view.memo_mode);

        let state = state.apply(ViewerEvent::Picked(PickHit::Marker(id)));
        assert!(matches!(state.dialog, Dialog::EditMemo { id: open, .. } if open == id));
    }

    #[test]
    fn blank_memo_raises_notice_and_keeps_dialog() {
        let state = run(
            loaded(),
            [
                ViewerEvent::ToggleMemoMode,
                ViewerEvent::Picked(PickHit::Surface(Vec3::ZERO)),
                ViewerEvent::EditDraft("   ".into()),
                ViewerEvent::SaveDialog,
            ],
        );
        assert!(state.memos.is_empty());
        assert_eq!(state.notice, Some(Notice::EmptyMemoText));
        assert!(matches!(state.dialog, Dialog::NewMemo { .. }));

        let state = state.apply(ViewerEvent::AcknowledgeNotice);
        assert_eq!(state.notice, None);
        assert!(matches!(state.dialog, Dialog::NewMemo { .. }));
    }

    #[test]
    fn picks_are_ignored_while_a_dialog_is_open() {
        let (state, id) = with_memo("first");
        let state = run(
            state,
            [
                ViewerEvent::Picked(PickHit::Surface(Vec3::ONE)),
                ViewerEvent::Picked(PickHit::Marker(id)),
            ],
        );
        match state.dialog {
            Dialog::NewMemo { position, .. } => assert_eq!(position, Vec3::ONE),
            other => panic!("unexpected dialog {other:?}"),
        }
    }

    #[test]
    fn delete_requires_confirmation() {
        let (state, id) = with_memo("doomed");
        let state = run(
            state,
            [
                ViewerEvent::Picked(PickHit::Marker(id)),
                ViewerEvent::RequestDelete,
                ViewerEvent::ConfirmDelete(false),
            ],
        );
        assert_eq!(state.memos.len(), 1);
        assert!(matches!(state.dialog, Dialog::EditMemo { .. }));

        let state = run(state, [ViewerEvent::RequestDelete, ViewerEvent::ConfirmDelete(true)]);
        assert!(state.memos.is_empty());
        assert_eq!(state.dialog, Dialog::None);
    }

    #[test]
    fn loading_a_mesh_clears_memos_and_dialogs() {
        let (state, id) = with_memo("old");
        let state = state.apply(ViewerEvent::Picked(PickHit::Marker(id)));
        let revision = state.mesh_revision;

        let state = state.apply(ViewerEvent::MeshLoaded {
            name: "other.stl".into(),
            mesh: quad(),
        });
        assert!(state.memos.is_empty());
        assert_eq!(state.dialog, Dialog::None);
        assert_eq!(state.mesh_revision, revision + 1);
        assert_eq!(state.mesh_name.as_deref(), Some("other.stl"));

        let state = state.apply(ViewerEvent::OpenMemo(id));
        assert_eq!(state.dialog, Dialog::None);
    }

    #[test]
    fn opacity_is_clamped() {
        let state = ViewerState::default().apply(ViewerEvent::SetOpacity(1.7));
        assert_eq!(state.view.opacity, 1.0);
        let state = state.apply(ViewerEvent::SetOpacity(-0.2));
        assert_eq!(state.view.opacity, 0.0);
    }

    struct CountingBrush {
        applied: AtomicUsize,
        deform: bool,
    }

    impl SculptBrush for CountingBrush {
        fn apply(&self, mesh: &Mesh, _params: &SculptParams) -> SculptOutcome {
            self.applied.fetch_add(1, Ordering::SeqCst);
            if self.deform {
                SculptOutcome::Deformed(mesh.clone())
            } else {
                SculptOutcome::Unchanged
            }
        }
    }

    #[test]
    fn sculpt_apply_only_runs_in_sculpt_mode_and_keeps_memos() {
        let brush = Arc::new(CountingBrush {
            applied: AtomicUsize::new(0),
            deform: true,
        });
        let state = run(
            ViewerState::with_brush(brush.clone()),
            [
                ViewerEvent::MeshLoaded {
                    name: "part.stl".into(),
                    mesh: quad(),
                },
                ViewerEvent::ToggleMemoMode,
                ViewerEvent::Picked(PickHit::Surface(Vec3::ZERO)),
                ViewerEvent::EditDraft("keep".into()),
                ViewerEvent::SaveDialog,
                ViewerEvent::ApplySculpt,
            ],
        );
        assert_eq!(brush.applied.load(Ordering::SeqCst), 0);
        let revision = state.mesh_revision;

        let state = run(state, [ViewerEvent::ToggleSculptMode, ViewerEvent::ApplySculpt]);
        assert_eq!(brush.applied.load(Ordering::SeqCst), 1);
        assert_eq!(state.mesh_revision, revision + 1);
        assert_eq!(state.memos.len(), 1);
    }

    #[test]
    fn placeholder_sculpt_changes_nothing() {
        let state = run(loaded(), [ViewerEvent::ToggleSculptMode]);
        let revision = state.mesh_revision;
        let before = state.mesh.clone();

        let state = run(state, [ViewerEvent::ApplySculpt, ViewerEvent::CancelSculpt]);
        assert_eq!(state.mesh_revision, revision);
        assert!(Arc::ptr_eq(state.mesh.as_ref().unwrap(), before.as_ref().unwrap()));
    }
}
