//! Identity types shared across campus services.
//!
//! Authentication happens upstream; services only read the identity the
//! gateway forwards.

pub mod identity;
