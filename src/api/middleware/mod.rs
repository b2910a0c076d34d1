pub mod auth;
pub mod trace;

pub use auth::{AuthUser, UserAuth};
pub use trace::{RequestId, RequestTrace};
