pub mod header;
pub mod jwt;
pub mod permission;
