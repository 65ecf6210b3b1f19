pub mod assessment;
pub mod numeric;
pub mod profile;
pub mod target;
