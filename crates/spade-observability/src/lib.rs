mod api;
mod chain;
mod reservation;
mod task;

pub use api::*;
pub use chain::*;
pub use reservation::*;
pub use task::*;
