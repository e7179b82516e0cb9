pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{Account, Claims, IssuedToken, NewAccount, TokenKind, TokenPair};
pub use errors::{AccountError, HashError, RepositoryError, TokenError, ValidationError};
pub use services::{AccountService, RegistrationRequest};
pub use value_objects::{AccountId, Email, Password, PasswordHash};
