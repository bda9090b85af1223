//! File system adapters: project documents in, run results out.

mod project_source;
mod results_dir;

pub use project_source::FileSystemProject;
pub use results_dir::{
    ENVIRONMENT_FILE, ResultsDir, SUMMARY_FILE, render_environment, render_exchange,
};
