pub mod error;

pub use error::{
    handle_domain_error, missing_token_response, response_to_actix,
    session_expired_response, status_for,
};
