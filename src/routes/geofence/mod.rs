mod handler;

pub use handler::{EvaluateResponse, evaluate};
