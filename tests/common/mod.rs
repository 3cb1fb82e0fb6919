pub mod app;
pub mod factory;

pub use app::TestApp;
pub use factory::{Factory, TestAuth};
