use eframe::egui;

/// Dark theme shared by every panel of the churn form
pub struct DesignSystem;

impl DesignSystem {
    // --- Colors ---

    pub const BG_WINDOW: egui::Color32 = egui::Color32::from_rgb(10, 12, 16); // #0A0C10
    pub const BG_CARD: egui::Color32 = egui::Color32::from_rgb(22, 27, 34); // #161B22
    pub const BG_CARD_HOVER: egui::Color32 = egui::Color32::from_rgb(28, 33, 40);
    pub const BG_INPUT: egui::Color32 = egui::Color32::from_rgb(15, 18, 24);

    pub const ACCENT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(41, 121, 255); // #2979FF

    // Prediction outcome
    pub const SUCCESS: egui::Color32 = egui::Color32::from_rgb(0, 230, 118); // retained
    pub const DANGER: egui::Color32 = egui::Color32::from_rgb(255, 23, 68); // churn
    pub const WARNING: egui::Color32 = egui::Color32::from_rgb(255, 145, 0); // rejected input

    pub const TEXT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(240, 246, 252);
    pub const TEXT_SECONDARY: egui::Color32 = egui::Color32::from_gray(160);

    pub const BORDER_SUBTLE: egui::Color32 = egui::Color32::from_rgb(48, 54, 61);

    // --- Metrics ---

    pub const ROUNDING_MEDIUM: f32 = 8.0;
    pub const SPACING_SMALL: f32 = 8.0;
    pub const SPACING_MEDIUM: f32 = 16.0;
    pub const SPACING_LARGE: f32 = 24.0;
    pub const LABEL_WIDTH: f32 = 160.0;

    /// Visual style installed once when the window is created
    pub fn theme() -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();

        visuals.window_fill = Self::BG_WINDOW;
        visuals.panel_fill = Self::BG_WINDOW;
        visuals.extreme_bg_color = Self::BG_INPUT;

        visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, Self::BORDER_SUBTLE);
        visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, Self::TEXT_PRIMARY);
        visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, Self::TEXT_SECONDARY);
        visuals.widgets.inactive.weak_bg_fill = Self::BG_CARD;
        visuals.widgets.inactive.bg_fill = Self::BG_CARD;
        visuals.widgets.hovered.bg_fill = Self::BG_CARD_HOVER;

        visuals.selection.bg_fill = Self::ACCENT_PRIMARY.linear_multiply(0.3);
        visuals.selection.stroke = egui::Stroke::new(1.0, Self::ACCENT_PRIMARY);

        visuals
    }

    /// Frame around each group of form fields and around the result
    pub fn card_frame() -> egui::Frame {
        egui::Frame::NONE
            .fill(Self::BG_CARD)
            .corner_radius(Self::ROUNDING_MEDIUM)
            .stroke(egui::Stroke::new(1.0, Self::BORDER_SUBTLE))
            .inner_margin(Self::SPACING_MEDIUM as i8)
    }

    pub fn main_frame() -> egui::Frame {
        egui::Frame::NONE
            .fill(Self::BG_WINDOW)
            .inner_margin(egui::Margin::same(Self::SPACING_LARGE as i8))
    }

    /// Muted heading at the top of a card
    pub fn section_title(ui: &mut egui::Ui, title: &str) {
        ui.label(
            egui::RichText::new(title)
                .size(12.0)
                .color(Self::TEXT_SECONDARY)
                .strong(),
        );
        ui.add_space(Self::SPACING_SMALL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_uses_design_colors() {
        let visuals = DesignSystem::theme();
        assert!(visuals.dark_mode);
        assert_eq!(visuals.panel_fill, DesignSystem::BG_WINDOW);
        assert_eq!(visuals.extreme_bg_color, DesignSystem::BG_INPUT);
        assert_eq!(visuals.selection.stroke.color, DesignSystem::ACCENT_PRIMARY);
    }

    #[test]
    fn test_card_frame_style() {
        let frame = DesignSystem::card_frame();
        assert_eq!(frame.fill, DesignSystem::BG_CARD);
        assert_eq!(frame.stroke.color, DesignSystem::BORDER_SUBTLE);
    }
}
