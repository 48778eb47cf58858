pub mod list_values;
pub mod session;
pub mod suggest;

pub use list_values::*;
pub use session::*;
pub use suggest::*;
