pub mod config;
pub mod environment;
pub mod segments;
pub mod template;
pub mod utils;

pub use config::*;
pub use environment::*;
pub use segments::*;
pub use template::*;
pub use utils::*;
