mod constants;
mod schema;
mod util;

pub use constants::*;
pub use schema::*;
pub use util::*;
