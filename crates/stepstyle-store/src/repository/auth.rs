//! # Auth Store
//!
//! Mock sign-in. Credentials are format-checked and never verified: any
//! well-formed identifier with a 6+ character password, or any 6-digit OTP,
//! signs the shopper in. Registration and password reset both finish with an
//! OTP step, checked the same way.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Key               │ Value                                              │
//! │  ──────────────────┼─────────────────────────────────────────────────── │
//! │  isAuthenticated   │ "true" while signed in, absent otherwise           │
//! │  authUser          │ {"email","loginMethod","loginTime"}                │
//! │  registeredUsers   │ [{"name","email","phone","registrationDate"}, ...] │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use stepstyle_core::validation::{
    validate_identifier, validate_new_password, validate_otp, validate_password, validate_signup,
    IdentifierKind,
};
use stepstyle_core::{AuthUser, LoginMethod, RegisteredUser};
use tracing::{debug, info};

use super::{load_json, save_json};
use crate::error::StoreResult;
use crate::events::{EventBus, StoreEvent};
use crate::kv::{keys, KvStore};

#[derive(Debug, Clone)]
pub struct AuthStore {
    kv: Arc<dyn KvStore>,
    bus: EventBus,
}

impl AuthStore {
    pub fn new(kv: Arc<dyn KvStore>, bus: EventBus) -> Self {
        AuthStore { kv, bus }
    }

    pub async fn login_with_password(&self, identifier: &str, password: &str) -> StoreResult<AuthUser> {
        validate_identifier(identifier)?;
        validate_password(password)?;
        self.sign_in(identifier, LoginMethod::Password).await
    }

    /// Accepts any 6-digit code for a well-formed identifier.
    pub async fn login_with_otp(&self, identifier: &str, otp: &str) -> StoreResult<AuthUser> {
        validate_identifier(identifier)?;
        validate_otp(otp)?;
        self.sign_in(identifier, LoginMethod::Otp).await
    }

    /// Generates a one-time code for `identifier`.
    ///
    /// Nothing is delivered anywhere; the code is only logged.
    pub fn issue_otp(&self, identifier: &str) -> StoreResult<String> {
        validate_identifier(identifier)?;
        let code: u32 = rand::rng().random_range(100_000..1_000_000);
        debug!(identifier = %identifier, otp = code, "Generated OTP");
        Ok(code.to_string())
    }

    /// Appends a new account to `registeredUsers` once the verification code
    /// checks out. Does not sign in.
    pub async fn register(
        &self,
        name: &str,
        identifier: &str,
        password: &str,
        confirm: &str,
        otp: &str,
    ) -> StoreResult<RegisteredUser> {
        let kind = validate_signup(name, identifier, password, confirm)?;
        validate_otp(otp)?;

        let (email, phone) = match kind {
            IdentifierKind::Email => (identifier.to_string(), String::new()),
            IdentifierKind::Phone => (String::new(), identifier.to_string()),
        };
        let user = RegisteredUser {
            name: name.trim().to_string(),
            email,
            phone,
            registration_date: Utc::now(),
        };

        let mut users: Vec<RegisteredUser> =
            load_json(self.kv.as_ref(), keys::REGISTERED_USERS).await?;
        users.push(user.clone());
        save_json(self.kv.as_ref(), keys::REGISTERED_USERS, &users).await?;

        info!(name = %user.name, accounts = users.len(), "Registered account");
        Ok(user)
    }

    /// Sets a new password after an OTP check. Passwords are never stored,
    /// so a well-formed request always succeeds.
    pub async fn reset_password(
        &self,
        identifier: &str,
        otp: &str,
        password: &str,
        confirm: &str,
    ) -> StoreResult<()> {
        validate_identifier(identifier)?;
        validate_otp(otp)?;
        validate_new_password(password, confirm)?;

        let known = self
            .registered_users()
            .await?
            .iter()
            .any(|u| u.email == identifier || u.phone == identifier);
        info!(identifier = %identifier, known, "Password reset");
        Ok(())
    }

    pub async fn registered_users(&self) -> StoreResult<Vec<RegisteredUser>> {
        load_json(self.kv.as_ref(), keys::REGISTERED_USERS).await
    }

    pub async fn logout(&self) -> StoreResult<()> {
        self.kv.remove(keys::IS_AUTHENTICATED).await?;
        self.kv.remove(keys::AUTH_USER).await?;
        self.bus.publish(StoreEvent::AuthChanged);

        info!("Signed out");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> StoreResult<bool> {
        Ok(self.kv.read(keys::IS_AUTHENTICATED).await?.as_deref() == Some("true"))
    }

    /// The signed-in shopper, if any.
    pub async fn current_user(&self) -> StoreResult<Option<AuthUser>> {
        if !self.is_authenticated().await? {
            return Ok(None);
        }
        load_json(self.kv.as_ref(), keys::AUTH_USER).await
    }

    async fn sign_in(&self, identifier: &str, method: LoginMethod) -> StoreResult<AuthUser> {
        let user = AuthUser {
            email: identifier.to_string(),
            login_method: method,
            login_time: Utc::now(),
        };

        self.kv.write(keys::IS_AUTHENTICATED, "true").await?;
        save_json(self.kv.as_ref(), keys::AUTH_USER, &user).await?;
        self.bus.publish(StoreEvent::AuthChanged);

        info!(identifier = %identifier, method = %method, "Signed in");
        Ok(user)
    }
}
