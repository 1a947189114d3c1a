//! Authentication service: login, registration, the password reset flow
//! and the user directory.

use chrono::Utc;
use gudang_core::error::{GudangError, GudangResult};
use gudang_core::models::password_reset::{CreatePasswordReset, Redemption};
use gudang_core::models::user::{CreateUser, Role, User};
use gudang_core::repository::{PasswordResetRepository, UserRepository};
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::mailer::{Mailer, OutgoingMail};
use crate::password;
use crate::token::{self, ValidatedClaims};

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 100;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub user: User,
}

/// Input for registration and admin user creation.
#[derive(Debug)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `admin` or `staff`.
    pub role: String,
}

#[derive(Debug)]
pub struct ResetPasswordInput {
    /// Raw token as received by email.
    pub token: String,
    pub new_password: String,
}

/// Authentication service.
///
/// Generic over repository and mail implementations so that the auth
/// layer has no dependency on the database crate.
pub struct AuthService<U: UserRepository, P: PasswordResetRepository, M: Mailer> {
    user_repo: U,
    reset_repo: P,
    mailer: M,
    config: AuthConfig,
}

impl<U: UserRepository, P: PasswordResetRepository, M: Mailer> AuthService<U, P, M> {
    pub fn new(user_repo: U, reset_repo: P, mailer: M, config: AuthConfig) -> Self {
        Self {
            user_repo,
            reset_repo,
            mailer,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Verify a bearer `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<ValidatedClaims, AuthError> {
        token::validate_bearer(header, &self.config)
    }

    /// Authenticate with email + password and issue an access token.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, input: LoginInput) -> GudangResult<LoginOutput> {
        let email = input.email.trim();
        if email.is_empty() || input.password.is_empty() {
            return Err(GudangError::validation("email and password are required"));
        }

        let user = match self.user_repo.get_by_email(email).await {
            Ok(u) => u,
            Err(GudangError::NotFound { .. }) => {
                warn!(%email, "Login failed: unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = token::issue_access_token(&user, &self.config)?;
        info!(user_id = user.id, role = %user.role, "User logged in");

        Ok(LoginOutput {
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
            user,
        })
    }

    /// Create an account. Duplicate email surfaces as `Conflict`.
    pub async fn register(&self, input: RegisterInput) -> GudangResult<User> {
        let create = self.validate_registration(input)?;
        let user = self.user_repo.create(create).await?;
        info!(user_id = user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Issue a reset token for `email` and mail the link.
    ///
    /// Returns `Ok(())` for unknown addresses too, so callers cannot enumerate
    /// which emails are registered.
    pub async fn forgot_password(&self, email: &str) -> GudangResult<()> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(GudangError::validation("a valid email is required"));
        }

        let user = match self.user_repo.get_by_email(email).await {
            Ok(u) => u,
            Err(GudangError::NotFound { .. }) => {
                info!(%email, "Password reset requested for unknown email");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let raw = token::generate_reset_token();
        let expires_at = Utc::now() + self.config.reset_token_lifetime()?;

        self.reset_repo
            .issue(CreatePasswordReset {
                email: user.email.clone(),
                token_hash: token::hash_reset_token(&raw),
                expires_at,
            })
            .await?;

        let link = format!("{}?token={raw}", self.config.reset_url_base);
        self.mailer
            .send(OutgoingMail {
                to: user.email.clone(),
                subject: "Password Reset Request - Inventory System".into(),
                html_body: reset_email_body(&user.name, &link, self.config.reset_token_lifetime_secs),
            })
            .await?;

        info!(user_id = user.id, "Password reset token issued");
        Ok(())
    }

    /// Redeem a reset token and set the new password.
    ///
    /// The token is burned even when it turns out to be expired, so it
    /// cannot be retried. Any store failure leaves both the token and the
    /// old password untouched.
    pub async fn reset_password(&self, input: ResetPasswordInput) -> GudangResult<()> {
        if input.token.trim().is_empty() {
            return Err(AuthError::ResetTokenInvalid.into());
        }
        self.check_password(&input.new_password)?;

        let redemption = self
            .reset_repo
            .redeem(
                &token::hash_reset_token(input.token.trim()),
                &input.new_password,
                Utc::now(),
            )
            .await;

        match redemption {
            Ok(Redemption::Completed(reset)) => {
                info!(reset_id = reset.id, "Password reset completed");
                Ok(())
            }
            Ok(Redemption::Expired(reset)) => {
                warn!(reset_id = reset.id, "Expired reset token presented");
                Err(AuthError::ResetTokenExpired.into())
            }
            Err(GudangError::NotFound { .. }) => Err(AuthError::ResetTokenInvalid.into()),
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // User directory
    // -----------------------------------------------------------------------

    pub async fn list_users(&self) -> GudangResult<Vec<User>> {
        self.user_repo.list().await
    }

    pub async fn get_user(&self, id: i64) -> GudangResult<User> {
        self.user_repo.get_by_id(id).await
    }

    /// Admin-only account creation; same rules as [`Self::register`].
    pub async fn create_user(
        &self,
        actor: &ValidatedClaims,
        input: RegisterInput,
    ) -> GudangResult<User> {
        ensure_admin(actor)?;
        self.register(input).await
    }

    /// Admin-only account removal.
    pub async fn delete_user(&self, actor: &ValidatedClaims, id: i64) -> GudangResult<()> {
        ensure_admin(actor)?;
        self.user_repo.delete(id).await?;
        info!(user_id = id, actor = actor.user_id, "User deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    fn check_password(&self, password: &str) -> GudangResult<()> {
        if password::meets_policy(password, self.config.min_password_length) {
            Ok(())
        } else {
            Err(GudangError::validation(format!(
                "password must be at least {} characters",
                self.config.min_password_length
            )))
        }
    }

    fn validate_registration(&self, input: RegisterInput) -> GudangResult<CreateUser> {
        let name = input.name.trim();
        let name_len = name.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            return Err(GudangError::validation(format!(
                "name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
            )));
        }

        let email = input.email.trim();
        if !is_valid_email(email) {
            return Err(GudangError::validation("a valid email is required"));
        }

        self.check_password(&input.password)?;

        let role: Role = input.role.trim().parse().map_err(GudangError::validation)?;

        Ok(CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password: input.password,
            role,
        })
    }
}

/// Reject non-admin callers with `AuthorizationDenied`.
pub fn ensure_admin(actor: &ValidatedClaims) -> GudangResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(GudangError::AuthorizationDenied {
            reason: "admin role required".into(),
        })
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain,
/// no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Escape text for an HTML body or a double-quoted attribute.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn reset_email_body(name: &str, link: &str, lifetime_secs: u64) -> String {
    let minutes = lifetime_secs / 60;
    let name = escape_html(name);
    let link = escape_html(link);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <body style=\"font-family: Arial, sans-serif; background-color: #f8fafc; padding: 20px;\">\n\
         <div style=\"max-width: 600px; margin: 0 auto; background-color: white; padding: 40px; border-radius: 10px;\">\n\
         <h1 style=\"color: #1e293b;\">Password Reset Request</h1>\n\
         <p>Hello <strong>{name}</strong>,</p>\n\
         <p>We received a request to reset your password. Click the button below to create a new password:</p>\n\
         <p style=\"text-align: center;\"><a href=\"{link}\" style=\"display: inline-block; padding: 14px 32px; \
         background-color: #2563eb; color: white; text-decoration: none; border-radius: 8px;\">Reset Password</a></p>\n\
         <p>This link expires in {minutes} minutes. If you did not request a reset, ignore this email.</p>\n\
         <p>If the button does not work, paste this link into your browser:</p>\n\
         <p style=\"word-break: break-all; color: #2563eb; font-size: 12px;\">{link}</p>\n\
         </div>\n\
         </body>\n\
         </html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("admin@inventory.com"));
        assert!(is_valid_email("a.b+c@sub.example.co.id"));
        assert!(!is_valid_email("admin"));
        assert!(!is_valid_email("@inventory.com"));
        assert!(!is_valid_email("admin@localhost"));
        assert!(!is_valid_email("admin@@inventory.com"));
        assert!(!is_valid_email("ad min@inventory.com"));
        assert!(!is_valid_email("admin@inventory."));
    }

    #[test]
    fn reset_email_contains_link_and_name() {
        let body = reset_email_body("Budi", "http://x/reset?token=abc", 3600);
        assert!(body.contains("Budi"));
        assert_eq!(body.matches("http://x/reset?token=abc").count(), 2);
        assert!(body.contains("60 minutes"));
    }

    #[test]
    fn reset_email_escapes_name_and_link() {
        let body = reset_email_body(
            "<script>alert(\"x\")</script> & co",
            "http://x/reset?a=1&token=\"><b>",
            3600,
        );
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; co"));
        assert!(body.contains("href=\"http://x/reset?a=1&amp;token=&quot;&gt;&lt;b&gt;\""));
        assert!(!body.contains("<b>"));
    }
}
