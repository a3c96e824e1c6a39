mod dashboard;
mod delete;
mod update;
mod upload;

pub use dashboard::dashboard;
pub use delete::delete;
pub use update::update;
pub use upload::upload;
