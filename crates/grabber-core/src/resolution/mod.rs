pub mod resolver;

pub use resolver::{PATH_SEPARATOR, count_matches, pick, resolve};
