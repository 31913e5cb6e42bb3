pub mod analysis;
pub mod gemini;
pub mod history;
pub mod rules;
