mod requirement;

pub use requirement::PermissionRequirement;
