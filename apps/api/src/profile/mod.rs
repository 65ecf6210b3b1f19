//! Profile and study-requirement capture. Both forms are validated before
//! they are stored, so the gate's presence check implies a complete record.

pub mod handlers;
pub mod validation;
