//! API service implementations.

mod actions;
mod git_data;
mod issues;
mod organizations;
mod packages;
mod pull_requests;
mod repositories;
mod search;
mod users;

pub use actions::*;
pub use git_data::*;
pub use issues::*;
pub use organizations::*;
pub use packages::*;
pub use pull_requests::*;
pub use repositories::*;
pub use search::*;
pub use users::*;
