pub mod auth;

pub use auth::{
    require_api_session, require_page_session, resolve_session, session_id_from_headers,
};
