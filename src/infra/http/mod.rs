mod admin;
mod middleware;
mod public;

pub use admin::{AdminState, build_admin_router};
pub use middleware::{RequestId, log_responses, tag_request};
pub use public::{HttpState, build_router};
