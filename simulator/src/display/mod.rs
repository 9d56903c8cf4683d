pub mod model;
pub mod renderer;
