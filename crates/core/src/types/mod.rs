//! Core value types for Briklyst.

pub mod color;
pub mod email;
pub mod id;
pub mod price;

pub use color::{ColorError, ColorToken};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
