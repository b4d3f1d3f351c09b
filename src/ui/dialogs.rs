use egui::{Context, RichText, TextEdit};

use crate::ui::theme::*;
use crate::viewer::{Dialog, ViewerEvent, ViewerState};

fn modal_window(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .default_width(320.0)
}

fn draft_editor(ui: &mut egui::Ui, draft: &str, events: &mut Vec<ViewerEvent>) {
    let mut text = draft.to_owned();
    let response = ui.add(
        TextEdit::multiline(&mut text)
            .desired_rows(4)
            .desired_width(f32::INFINITY)
            .hint_text("Memo text"),
    );
    if response.changed() {
        events.push(ViewerEvent::EditDraft(text));
    }
}

fn accent_button(text: &str, fill: egui::Color32) -> egui::Button<'_> {
    egui::Button::new(RichText::new(text).color(TEXT_ON_ACCENT)).fill(fill)
}

/// Draws whichever memo dialog is open plus the notice on top of it.
pub fn draw_dialogs(ctx: &Context, viewer: &ViewerState) -> Vec<ViewerEvent> {
    let mut events = Vec::new();

    match &viewer.dialog {
        Dialog::None => {}
        Dialog::NewMemo { position, draft } => {
            modal_window("New Memo").show(ctx, |ui| {
                ui.label(
                    RichText::new(format!(
                        "at ({:.3}, {:.3}, {:.3})",
                        position.x, position.y, position.z
                    ))
                    .color(TEXT_MUTED)
                    .size(11.0),
                );
                ui.add_enabled_ui(viewer.notice.is_none(), |ui| {
                    draft_editor(ui, draft, &mut events);
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        if ui.add(accent_button("Save", MEMO_OFF_BLUE)).clicked() {
                            events.push(ViewerEvent::SaveDialog);
                        }
                        if ui.button("Cancel").clicked() {
                            events.push(ViewerEvent::CancelDialog);
                        }
                    });
                });
            });
        }
        Dialog::EditMemo { draft, .. } => {
            modal_window("Edit Memo").show(ctx, |ui| {
                ui.add_enabled_ui(viewer.notice.is_none(), |ui| {
                    draft_editor(ui, draft, &mut events);
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        if ui.add(accent_button("Save", MEMO_OFF_BLUE)).clicked() {
                            events.push(ViewerEvent::SaveDialog);
                        }
                        if ui.add(accent_button("Delete", MEMO_ON_RED)).clicked() {
                            events.push(ViewerEvent::RequestDelete);
                        }
                        if ui.button("Cancel").clicked() {
                            events.push(ViewerEvent::CancelDialog);
                        }
                    });
                });
            });
        }
        Dialog::ConfirmDelete { .. } => {
            modal_window("Delete Memo").show(ctx, |ui| {
                ui.label("Delete this memo?");
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.add(accent_button("Yes", MEMO_ON_RED)).clicked() {
                        events.push(ViewerEvent::ConfirmDelete(true));
                    }
                    if ui.button("No").clicked() {
                        events.push(ViewerEvent::ConfirmDelete(false));
                    }
                });
            });
        }
    }

    if let Some(notice) = viewer.notice {
        egui::Window::new("Notice")
            .id(egui::Id::new("notice_window"))
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, -80.0))
            .show(ctx, |ui| {
                ui.label(notice.message());
                ui.add_space(6.0);
                if ui.add(accent_button("OK", ACCENT_ORANGE)).clicked() {
                    events.push(ViewerEvent::AcknowledgeNotice);
                }
            });
    }

    events
}
