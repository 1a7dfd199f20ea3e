//! SVM solver implementations
//!
//! This module implements Platt's Sequential Minimal Optimization (SMO)
//! algorithm together with the simplified textbook variant.

pub mod selection;
pub mod simple;
pub mod smo;
pub mod state;

pub use self::selection::*;
pub use self::simple::*;
pub use self::smo::*;
pub use self::state::*;
