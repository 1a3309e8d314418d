mod completions;
mod fetch;
mod languages;

pub use completions::run_completions;
pub use fetch::run_fetch;
pub use languages::run_languages;
