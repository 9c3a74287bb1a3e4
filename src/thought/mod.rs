pub mod model;
pub mod visual;
