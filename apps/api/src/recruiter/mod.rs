// Recruiter mode: batch scoring against one job description, weighted
// ranking of the resulting board, and CSV export.

pub mod batch;
pub mod export;
pub mod handlers;
pub mod ranking;
