pub mod articles;
pub mod categories;
pub mod staff;
pub mod station;
pub mod themes;
