//! DSP primitives shared by the Faderdeck mixer engine.

pub mod gain;
pub mod pan;
pub mod peak;

pub use gain::{db_to_linear, linear_to_db};
pub use pan::balance_gains;
pub use peak::peak_abs;
