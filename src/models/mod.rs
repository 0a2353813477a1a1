pub mod image;
pub mod result;
pub mod upload;

pub use image::*;
pub use result::*;
pub use upload::*;
