//! Gudang auth — password verification, JWT issuance/validation,
//! password reset tokens and outgoing mail.

pub mod config;
pub mod error;
pub mod mailer;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use mailer::{ConfiguredMailer, LogMailer, Mailer, OutgoingMail, SmtpConfig, SmtpMailer};
pub use service::{AuthService, LoginInput, LoginOutput, RegisterInput, ResetPasswordInput};
pub use token::{AccessTokenClaims, ValidatedClaims};
