//! Provider credentials

use std::fmt;

/// Credentials used to authenticate against the email provider
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API key, sent as a bearer token
    ApiKey(String),

    /// Username and password, used for SMTP authentication
    Basic {
        /// The account username
        username: String,

        /// The account password
        password: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"********").finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"********")
                .finish(),
        }
    }
}
