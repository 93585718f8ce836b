pub mod lease;
pub mod projection;
pub mod roi;
