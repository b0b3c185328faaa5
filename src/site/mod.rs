pub mod forms;
pub mod routes;

pub use forms::*;
pub use routes::*;
