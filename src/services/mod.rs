//! Business logic over the persistence gateway, one module per surface.
//!
//! The command layer stays thin; everything that touches more than one
//! table or makes a decision lives here.

pub mod bookings;
pub mod dashboard;
pub mod leads;
pub mod tasks;
