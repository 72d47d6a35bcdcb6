pub mod input;
pub mod output;

pub use input::ImagePair;
