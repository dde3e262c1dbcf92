//! User accounts, bearer tokens and the middleware that authenticates requests.

mod current_user;
mod log_in;
mod middleware;
mod password;
mod principal;
mod register_user;
mod token;
mod user;

pub use current_user::get_current_user;
pub use log_in::{LogInForm, TokenResponse, post_log_in};
pub use middleware::{AuthState, auth_gate};
pub use password::PasswordHash;
pub use principal::Principal;
pub use register_user::{RegisterForm, register_user};
pub use token::{DEFAULT_TOKEN_TTL, IssueError, MAX_TOKEN_TTL, TokenCodec, TokenError};
pub use user::{User, UserID, create_user, create_user_table, get_user_by_email};
