//! Resource handlers: one per managed Security API entity.
//!
//! Handlers receive the shared [`SecurityClient`](crate::client::SecurityClient)
//! on every call and keep no state of their own.

pub mod api_key;
pub mod role;
pub mod user;

pub use api_key::ApiKeyResource;
pub use role::RoleResource;
pub use user::UserResource;

pub const USER_TYPE: &str = "elasticsearch_user";
pub const ROLE_TYPE: &str = "elasticsearch_role";
pub const API_KEY_TYPE: &str = "elasticsearch_api_key";
