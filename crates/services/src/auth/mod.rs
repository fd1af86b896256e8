pub mod ports;

mod github;

pub use github::GithubOAuthClient;
pub use ports::{AuthError, GithubAuth, SessionToken, UserIdentity};
