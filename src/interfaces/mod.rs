pub mod churn_form;
pub mod design_system;
