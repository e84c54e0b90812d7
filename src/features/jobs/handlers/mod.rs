pub mod job_handler;

pub use job_handler::{__path_run_jobs, run_jobs, JobsState};
