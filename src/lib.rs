pub mod api;
pub mod cms;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod index;
pub mod notify;
pub mod post;
pub mod scope;
pub mod session;

pub use dashboard::BlogDashboard;
pub use error::{BlogError, Result};
pub use index::Index;
