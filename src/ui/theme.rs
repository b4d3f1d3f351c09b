use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

pub const BG_PANEL: Color32 = Color32::from_rgb(18, 18, 20);
pub const BG_WIDGET: Color32 = Color32::from_rgb(32, 32, 36);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(44, 44, 50);
pub const BG_OVERLAY: Color32 = Color32::from_black_alpha(180);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(200, 200, 204);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 126);
pub const TEXT_ON_ACCENT: Color32 = Color32::WHITE;

pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(255, 152, 0);
pub const MEMO_OFF_BLUE: Color32 = Color32::from_rgb(25, 118, 210);
pub const MEMO_ON_RED: Color32 = Color32::from_rgb(211, 47, 47);
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(56, 142, 60);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(60, 60, 68);

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.extreme_bg_color = Color32::from_rgb(10, 10, 12);

    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.inactive.bg_fill = BG_WIDGET;
    visuals.widgets.inactive.weak_bg_fill = BG_WIDGET;
    visuals.widgets.hovered.bg_fill = BG_WIDGET_HOVER;
    visuals.widgets.hovered.weak_bg_fill = BG_WIDGET_HOVER;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT_ORANGE);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, ACCENT_ORANGE);

    visuals.selection.bg_fill = ACCENT_ORANGE.gamma_multiply(0.45);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_ORANGE);
    visuals.slider_trailing_fill = true;

    let mut style = (*ctx.style()).clone();
    style.visuals = visuals;
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.spacing.slider_width = 180.0;
    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
