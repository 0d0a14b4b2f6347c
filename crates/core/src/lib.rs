pub mod config;
pub mod datatype;
pub mod records;

pub use config::Config;
pub use datatype::*;
pub use records::*;
