pub mod config;
pub mod error;
pub mod node;
pub mod presence;

pub use config::*;
pub use error::*;
pub use node::*;
pub use presence::*;
