pub mod error;

pub use error::{CadenceError, CadenceResult};
