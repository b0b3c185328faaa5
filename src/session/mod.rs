pub mod identity;
pub mod store;


pub use identity::*;
pub use store::*;
