pub mod metadata;
pub mod refresh;
pub mod services;
