mod login;
mod properties;

pub use login::{login, login_page};
pub use properties::list_properties;
