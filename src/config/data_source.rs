use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Where the dashboard reads and publishes posts.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, ValueEnum, PartialEq, Eq, Default)]
pub enum DataSource {
    /// In-memory list seeded with sample posts, nothing leaves the process
    Local,
    /// The remote content API
    #[default]
    Remote,
}

impl DataSource {
    pub fn is_remote(&self) -> bool {
        *self == Self::Remote
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}
