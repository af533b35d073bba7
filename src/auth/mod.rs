pub mod connect;
pub mod provider;
pub mod session;

pub use connect::{connect, disconnect, new_state_token, ConnectError, ConnectOutcome, DisconnectError};
pub use provider::{ClientSecrets, GoogleProvider, IdentityProvider, OAuthError};
pub use session::{SessionData, SessionError, SessionKeys};
