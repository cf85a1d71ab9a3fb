pub mod map;
pub mod smoke;
