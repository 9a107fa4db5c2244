// Resume upload: turns an uploaded PDF or text file into plain resume text
// that can be sent to the scoring endpoint.

pub mod extract;
pub mod handlers;
