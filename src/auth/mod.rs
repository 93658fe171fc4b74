//! Authentication: password hashing, bearer tokens, the per-request gate
//! and the `/api/auth` handlers.

pub mod handlers;
mod gate;
mod password;
mod service;
mod token;

pub use gate::{bearer_token, CurrentUser};
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use token::{Claims, TokenService};
