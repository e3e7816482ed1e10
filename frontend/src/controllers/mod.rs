pub mod form_submission;
pub mod theme;
