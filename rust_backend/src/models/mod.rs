pub mod macros;
pub mod record;
pub mod stage;
pub mod time;

pub use record::*;
pub use stage::*;
pub use time::*;
