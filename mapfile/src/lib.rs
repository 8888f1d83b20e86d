pub mod boardcfg;
mod error;
pub mod event;
pub mod mapdoc;

pub use boardcfg::ConfigParser;
pub use error::Error;
pub use mapdoc::MapParser;
