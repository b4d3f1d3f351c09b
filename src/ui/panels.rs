use egui::{Color32, Context, RichText, ScrollArea, Ui};
use std::path::PathBuf;

use crate::sculpt::{BRUSH_SIZE_RANGE, BrushKind, INTENSITY_RANGE, SculptParams};
use crate::ui::state::UiState;
use crate::ui::theme::*;
use crate::viewer::{ViewerEvent, ViewerState};

/// What the side panel asked for this frame. Applied by the event loop after
/// egui has finished drawing.
#[derive(Default)]
pub struct UiActions {
    pub events: Vec<ViewerEvent>,
    pub open_file: Option<PathBuf>,
}

pub fn draw_side_panel(
    ctx: &Context,
    ui_state: &mut UiState,
    viewer: &ViewerState,
    loading: Option<&str>,
) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(260.0)
        .max_width(360.0)
        .default_width(280.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(14.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("MeshMemo").strong());
                ui.label(RichText::new("STL viewer & annotator").color(TEXT_MUTED).size(11.0));
                ui.add_space(12.0);

                ui.add_enabled_ui(!viewer.is_modal(), |ui| {
                    file_section(ui, viewer, loading, &mut actions);
                    ui.separator();
                    ui.add_space(8.0);

                    view_section(ui, viewer, &mut actions.events);
                    ui.separator();
                    ui.add_space(8.0);

                    memo_list(ui, ui_state, viewer, &mut actions.events);
                    ui.separator();
                    ui.add_space(8.0);

                    sculpt_panel(ui, viewer, &mut actions.events);
                });

                ui.add_space(12.0);
                ui.checkbox(&mut ui_state.show_help, "Show hints");
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn file_section(ui: &mut Ui, viewer: &ViewerState, loading: Option<&str>, actions: &mut UiActions) {
    section_header(ui, "MODEL");

    let open = egui::Button::new("Open STL…").min_size(egui::vec2(ui.available_width(), 28.0));
    if ui.add(open).clicked() {
        actions.open_file = rfd::FileDialog::new()
            .add_filter("STL", &["stl", "STL"])
            .set_title("Open STL")
            .pick_file();
    }

    ui.add_space(4.0);
    match (loading, &viewer.mesh_name, &viewer.mesh) {
        (Some(name), _, _) => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(format!("Loading {name}")).color(TEXT_MUTED));
            });
        }
        (None, Some(name), Some(mesh)) => {
            ui.label(RichText::new(name).color(TEXT_PRIMARY));
            ui.label(
                RichText::new(format!("{} triangles", mesh.mesh.triangle_count()))
                    .color(TEXT_MUTED)
                    .size(11.0),
            );
        }
        _ => {
            ui.label(RichText::new("Drop an .stl file onto the window").color(TEXT_MUTED).italics());
        }
    }
    ui.add_space(8.0);
}

fn view_section(ui: &mut Ui, viewer: &ViewerState, events: &mut Vec<ViewerEvent>) {
    section_header(ui, "VIEW");

    let mut opacity = viewer.view.opacity;
    let slider = egui::Slider::new(&mut opacity, 0.0..=1.0)
        .step_by(0.01)
        .fixed_decimals(2)
        .text("Opacity");
    if ui.add(slider).changed() {
        events.push(ViewerEvent::SetOpacity(opacity));
    }
    ui.add_space(6.0);

    let (label, fill) = if viewer.view.memo_mode {
        ("Stop Memo", MEMO_ON_RED)
    } else {
        ("Start Memo", MEMO_OFF_BLUE)
    };
    let toggle = egui::Button::new(RichText::new(label).color(TEXT_ON_ACCENT))
        .fill(fill)
        .min_size(egui::vec2(ui.available_width(), 30.0));
    if ui.add(toggle).clicked() {
        events.push(ViewerEvent::ToggleMemoMode);
    }
    ui.add_space(8.0);
}

fn memo_list(ui: &mut Ui, ui_state: &mut UiState, viewer: &ViewerState, events: &mut Vec<ViewerEvent>) {
    ui.horizontal(|ui| {
        section_header(ui, &format!("MEMOS ({})", viewer.memos.len()));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let arrow = if ui_state.show_memo_list { "▾" } else { "▸" };
            if ui.small_button(arrow).clicked() {
                ui_state.show_memo_list = !ui_state.show_memo_list;
            }
        });
    });

    if ui_state.show_memo_list {
        if viewer.memos.is_empty() {
            ui.label(RichText::new("No memos yet").color(TEXT_MUTED).size(11.0));
        }
        for (i, memo) in viewer.memos.iter().enumerate() {
            let first_line = memo.text.lines().next().unwrap_or_default();
            let entry = ui.selectable_label(false, format!("{}. {first_line}", i + 1));
            if entry
                .on_hover_text(format!(
                    "({:.2}, {:.2}, {:.2})",
                    memo.position.x, memo.position.y, memo.position.z
                ))
                .clicked()
            {
                events.push(ViewerEvent::OpenMemo(memo.id));
            }
        }
    }
    ui.add_space(8.0);
}

fn sculpt_panel(ui: &mut Ui, viewer: &ViewerState, events: &mut Vec<ViewerEvent>) {
    section_header(ui, "SCULPT");

    let enabled = viewer.sculpt.enabled;
    let (label, fill) = if enabled {
        ("Stop Sculpt", ACCENT_ORANGE)
    } else {
        ("Start Sculpt", BG_WIDGET)
    };
    let toggle = egui::Button::new(RichText::new(label).color(if enabled { TEXT_ON_ACCENT } else { TEXT_PRIMARY }))
        .fill(fill)
        .min_size(egui::vec2(ui.available_width(), 28.0));
    if ui.add(toggle).clicked() {
        events.push(ViewerEvent::ToggleSculptMode);
    }
    ui.add_space(6.0);

    let mut params: SculptParams = viewer.sculpt.params;

    ui.label(format!("Brush Size ({})", params.brush_size));
    ui.add(egui::Slider::new(&mut params.brush_size, BRUSH_SIZE_RANGE).show_value(false));

    ui.label(format!("Intensity ({:.1})", params.intensity));
    ui.add(
        egui::Slider::new(&mut params.intensity, INTENSITY_RANGE)
            .step_by(0.1)
            .show_value(false),
    );
    ui.add_space(4.0);

    egui::Grid::new("brush_kinds").num_columns(2).spacing([6.0, 6.0]).show(ui, |ui| {
        let cell = egui::vec2((ui.available_width() - 6.0).max(0.0) / 2.0, 26.0);
        for (i, kind) in BrushKind::ALL.into_iter().enumerate() {
            let selected = params.kind == kind;
            let button = egui::Button::new(RichText::new(kind.label()).color(if selected {
                TEXT_ON_ACCENT
            } else {
                TEXT_PRIMARY
            }))
            .fill(if selected { ACCENT_ORANGE } else { BG_WIDGET })
            .min_size(cell);
            if ui.add(button).clicked() {
                params.kind = kind;
            }
            if i % 2 == 1 {
                ui.end_row();
            }
        }
    });

    if params != viewer.sculpt.params {
        events.push(ViewerEvent::SetSculptParams(params));
    }
    ui.add_space(6.0);

    ui.horizontal(|ui| {
        if ui.button("Cancel").clicked() {
            events.push(ViewerEvent::CancelSculpt);
        }
        let apply = egui::Button::new(RichText::new("Apply").color(TEXT_ON_ACCENT)).fill(ACCENT_GREEN);
        if ui.add_enabled(enabled && viewer.mesh.is_some(), apply).clicked() {
            events.push(ViewerEvent::ApplySculpt);
        }
    });
}

pub fn draw_help_overlay(ctx: &Context, viewer: &ViewerState) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(BG_OVERLAY)
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id =
                        Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    ui.label(RichText::new("RMB+Drag - Orbit | Scroll - Zoom | R - Reset").color(TEXT_MUTED));
                    let click_hint = if viewer.view.memo_mode {
                        "LMB - Add memo on surface / open marker"
                    } else {
                        "LMB - Open marker"
                    };
                    ui.label(RichText::new(click_hint).color(TEXT_MUTED));

                    let triangles = viewer
                        .mesh
                        .as_ref()
                        .map_or(0, |m| m.mesh.triangle_count());
                    ui.label(
                        RichText::new(format!(
                            "Triangles: {triangles} | Memos: {}",
                            viewer.memos.len()
                        ))
                        .color(if viewer.mesh.is_some() { TEXT_PRIMARY } else { Color32::GRAY }),
                    );
                });
        });
}
