pub mod context;
pub mod error;
pub mod state;

pub use context::AppContext;
pub use error::{NewsroomError, Result};
pub use state::UiState;
