mod handler;
mod model;

pub use handler::{check_in, check_out, get_screen, signup};
pub use model::{ScreenResponse, SignupRequest};
