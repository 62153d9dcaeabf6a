//! Churn Predictor - desktop form
//!
//! Loads the model artifacts once, then serves predictions from an egui form.
//! Configuration comes from `.env`, the environment and `CHURN_CONFIG`.

use churn_predictor::config::Config;
use churn_predictor::infrastructure::load_artifacts;
use churn_predictor::infrastructure::observability::init_tracing;
use churn_predictor::interfaces::churn_form::ChurnForm;
use churn_predictor::interfaces::design_system::DesignSystem;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.logging);

    info!("Churn Predictor {} starting...", env!("CARGO_PKG_VERSION"));

    let paths = config.artifacts.paths();
    let form = match load_artifacts(&paths) {
        Ok(context) => ChurnForm::new(context),
        Err(e) => {
            error!("Failed to load model artifacts: {}", e);
            ChurnForm::unavailable(e.to_string())
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 820.0])
            .with_title("Churn Predictor"),
        ..Default::default()
    };

    eframe::run_native(
        "Churn Predictor",
        native_options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(DesignSystem::theme());
            Ok(Box::new(form))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
