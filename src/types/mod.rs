//! Data types shared between the view engine, the core and the grid widget.

mod config;
mod meta;
mod scalar;
mod schema;
mod window;

pub use config::*;
pub use meta::*;
pub use scalar::*;
pub use schema::*;
pub use window::*;
