//! Single-page churn form.
//!
//! Collects a `CustomerProfile`, runs it through the inference context on
//! "Predict Churn" and renders the outcome. When the artifacts failed to load
//! the form shows the load error and stays disabled.

use crate::application::ml::InferenceContext;
use crate::domain::customer::{
    AGE_RANGE, CREDIT_SCORE_RANGE, Country, CustomerProfile, Gender, PRODUCTS_RANGE,
    TENURE_RANGE,
};
use crate::domain::prediction::PredictionResult;
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// What the result card shows after a submit
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Prediction(PredictionResult),
    Rejected(String),
}

pub struct ChurnForm {
    context: Result<InferenceContext, String>,
    pub profile: CustomerProfile,
    outcome: Option<FormOutcome>,
}

impl ChurnForm {
    pub fn new(context: InferenceContext) -> Self {
        Self {
            context: Ok(context),
            profile: CustomerProfile::default(),
            outcome: None,
        }
    }

    /// A form whose artifacts could not be loaded; it only displays `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            context: Err(reason.into()),
            profile: CustomerProfile::default(),
            outcome: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.context.is_ok()
    }

    pub fn outcome(&self) -> Option<&FormOutcome> {
        self.outcome.as_ref()
    }

    /// Scores the current profile. Does nothing while the artifacts are missing.
    pub fn submit(&mut self) -> Option<&FormOutcome> {
        let context = self.context.as_ref().ok()?;
        self.outcome = Some(match context.predict_profile(&self.profile) {
            Ok(result) => FormOutcome::Prediction(result),
            Err(e) => FormOutcome::Rejected(e.to_string()),
        });
        self.outcome.as_ref()
    }

    fn render_fields(&mut self, ui: &mut egui::Ui) {
        let profile = &mut self.profile;

        DesignSystem::card_frame().show(ui, |ui| {
            DesignSystem::section_title(ui, "CUSTOMER");
            egui::Grid::new("customer_fields")
                .num_columns(2)
                .min_col_width(DesignSystem::LABEL_WIDTH)
                .spacing([DesignSystem::SPACING_LARGE, DesignSystem::SPACING_SMALL])
                .show(ui, |ui| {
                    ui.label("Credit Score");
                    ui.add(egui::Slider::new(&mut profile.credit_score, CREDIT_SCORE_RANGE));
                    ui.end_row();

                    ui.label("Gender");
                    ui.horizontal(|ui| {
                        for gender in Gender::ALL {
                            ui.radio_value(&mut profile.gender, gender.to_string(), gender.as_str());
                        }
                    });
                    ui.end_row();

                    ui.label("Age");
                    ui.add(egui::Slider::new(&mut profile.age, AGE_RANGE));
                    ui.end_row();

                    ui.label("Tenure");
                    ui.add(egui::Slider::new(&mut profile.tenure, TENURE_RANGE).suffix(" yrs"));
                    ui.end_row();

                    ui.label("Country");
                    egui::ComboBox::from_id_salt("country")
                        .selected_text(profile.country.as_str())
                        .show_ui(ui, |ui| {
                            for country in Country::ALL {
                                ui.selectable_value(
                                    &mut profile.country,
                                    country.to_string(),
                                    country.as_str(),
                                );
                            }
                        });
                    ui.end_row();
                });
        });

        ui.add_space(DesignSystem::SPACING_MEDIUM);

        DesignSystem::card_frame().show(ui, |ui| {
            DesignSystem::section_title(ui, "ACCOUNT");
            egui::Grid::new("account_fields")
                .num_columns(2)
                .min_col_width(DesignSystem::LABEL_WIDTH)
                .spacing([DesignSystem::SPACING_LARGE, DesignSystem::SPACING_SMALL])
                .show(ui, |ui| {
                    ui.label("Balance");
                    ui.add(
                        egui::DragValue::new(&mut profile.balance)
                            .range(0.0..=f64::MAX)
                            .speed(100.0),
                    );
                    ui.end_row();

                    ui.label("Estimated Salary");
                    ui.add(
                        egui::DragValue::new(&mut profile.estimated_salary)
                            .range(0.0..=f64::MAX)
                            .speed(100.0),
                    );
                    ui.end_row();

                    ui.label("Products Number");
                    egui::ComboBox::from_id_salt("products_number")
                        .selected_text(profile.products_number.to_string())
                        .show_ui(ui, |ui| {
                            for n in PRODUCTS_RANGE {
                                ui.selectable_value(&mut profile.products_number, n, n.to_string());
                            }
                        });
                    ui.end_row();

                    ui.label("Has Credit Card");
                    yes_no_combo(ui, "credit_card", &mut profile.credit_card);
                    ui.end_row();

                    ui.label("Active Member");
                    yes_no_combo(ui, "active_member", &mut profile.active_member);
                    ui.end_row();
                });
        });
    }

    fn render_outcome(&self, ui: &mut egui::Ui) {
        let Some(outcome) = &self.outcome else {
            return;
        };

        DesignSystem::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            match outcome {
                FormOutcome::Prediction(result) => {
                    let color = if result.is_churn() {
                        DesignSystem::DANGER
                    } else {
                        DesignSystem::SUCCESS
                    };
                    ui.label(
                        egui::RichText::new(result.headline())
                            .size(18.0)
                            .strong()
                            .color(color),
                    );
                    ui.label(
                        egui::RichText::new(format!(
                            "Churn Probability: {:.2}%",
                            result.probability * 100.0
                        ))
                        .size(16.0)
                        .color(DesignSystem::TEXT_PRIMARY),
                    );
                }
                FormOutcome::Rejected(reason) => {
                    ui.label(egui::RichText::new(reason).color(DesignSystem::WARNING));
                }
            }
        });
    }
}

fn yes_no_combo(ui: &mut egui::Ui, id: &str, value: &mut i64) {
    let text = if *value == 1 { "Yes" } else { "No" };
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .show_ui(ui, |ui| {
            ui.selectable_value(value, 1, "Yes");
            ui.selectable_value(value, 0, "No");
        });
}

impl eframe::App for ChurnForm {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(DesignSystem::main_frame())
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading(
                        egui::RichText::new("Bank Customer Churn Prediction")
                            .color(DesignSystem::TEXT_PRIMARY),
                    );
                    ui.add_space(DesignSystem::SPACING_MEDIUM);

                    if let Err(reason) = &self.context {
                        DesignSystem::card_frame().show(ui, |ui| {
                            ui.label(
                                egui::RichText::new("Model artifacts could not be loaded")
                                    .strong()
                                    .color(DesignSystem::DANGER),
                            );
                            ui.label(egui::RichText::new(reason).color(DesignSystem::TEXT_SECONDARY));
                        });
                        ui.add_space(DesignSystem::SPACING_MEDIUM);
                    }

                    let ready = self.is_ready();
                    ui.add_enabled_ui(ready, |ui| self.render_fields(ui));
                    ui.add_space(DesignSystem::SPACING_MEDIUM);

                    let button = egui::Button::new(egui::RichText::new("Predict Churn").size(16.0))
                        .fill(DesignSystem::ACCENT_PRIMARY);
                    if ui.add_enabled(ready, button).clicked() {
                        self.submit();
                    }
                    ui.add_space(DesignSystem::SPACING_MEDIUM);

                    self.render_outcome(ui);
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::ChurnLabel;
    use crate::infrastructure::artifacts::{ArtifactPaths, load_artifacts};
    use std::path::Path;

    fn fixture_form() -> ChurnForm {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/model");
        let context = load_artifacts(&ArtifactPaths {
            classifier: dir.join("classifier.json"),
            scaler: dir.join("scaler.json"),
            gender_encoder: dir.join("gender_encoder.json"),
        })
        .unwrap();
        ChurnForm::new(context)
    }

    #[test]
    fn test_form_starts_with_defaults() {
        let form = fixture_form();
        assert!(form.is_ready());
        assert_eq!(form.profile, CustomerProfile::default());
        assert!(form.outcome().is_none());
    }

    #[test]
    fn test_submit_scores_current_profile() {
        let mut form = fixture_form();
        form.profile.age = 60;
        form.profile.active_member = 0;
        form.profile.country = Country::Germany.to_string();

        match form.submit() {
            Some(FormOutcome::Prediction(result)) => {
                assert_eq!(result.label, ChurnLabel::Churned);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_submit_reports_rejected_input() {
        let mut form = fixture_form();
        form.profile.gender = "Other".to_string();

        let outcome = form.submit().cloned();
        assert!(matches!(outcome, Some(FormOutcome::Rejected(ref r)) if r.contains("Other")));
    }

    #[test]
    fn test_unavailable_form_refuses_submit() {
        let mut form = ChurnForm::unavailable("scaler missing");
        assert!(!form.is_ready());
        assert!(form.submit().is_none());
        assert!(form.outcome().is_none());
    }
}
