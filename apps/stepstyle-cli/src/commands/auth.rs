//! Mock sign-in commands.

use crate::error::CliResult;
use crate::state::AppState;

pub async fn login(state: &AppState, identifier: &str, password: &str) -> CliResult<String> {
    let user = state.store.auth().login_with_password(identifier, password).await?;
    Ok(format!("Signed in as {}", user.email))
}

/// Without a code, issues one; with a code, signs in.
///
/// Nothing is actually sent, so the issued code is part of the output.
pub async fn otp(state: &AppState, identifier: &str, code: Option<&str>) -> CliResult<String> {
    let auth = state.store.auth();
    match code {
        None => {
            let code = auth.issue_otp(identifier)?;
            Ok(format!("OTP sent to {identifier}\nCode: {code}"))
        }
        Some(code) => {
            let user = auth.login_with_otp(identifier, code).await?;
            Ok(format!("Signed in as {}", user.email))
        }
    }
}

pub async fn register(
    state: &AppState,
    name: &str,
    identifier: &str,
    password: &str,
    confirm: &str,
    otp: &str,
) -> CliResult<String> {
    let user = state
        .store
        .auth()
        .register(name, identifier, password, confirm, otp)
        .await?;
    Ok(format!("Account created for {}. You can now sign in.", user.name))
}

pub async fn reset_password(
    state: &AppState,
    identifier: &str,
    otp: &str,
    password: &str,
    confirm: &str,
) -> CliResult<String> {
    state
        .store
        .auth()
        .reset_password(identifier, otp, password, confirm)
        .await?;
    Ok("Password updated. You can now sign in.".to_string())
}

pub async fn logout(state: &AppState) -> CliResult<String> {
    state.store.auth().logout().await?;
    Ok("Signed out".to_string())
}

pub async fn whoami(state: &AppState) -> CliResult<String> {
    Ok(match state.store.auth().current_user().await? {
        Some(user) => format!(
            "{} (signed in with {} at {})",
            user.email,
            user.login_method,
            user.login_time.format("%Y-%m-%d %H:%M UTC")
        ),
        None => "Not signed in".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_password_session() {
        let state = fixtures::state();
        assert_eq!(whoami(&state).await.unwrap(), "Not signed in");

        let out = login(&state, "asha@example.com", "secret1").await.unwrap();
        assert_eq!(out, "Signed in as asha@example.com");
        assert!(whoami(&state)
            .await
            .unwrap()
            .starts_with("asha@example.com (signed in with password"));

        assert_eq!(logout(&state).await.unwrap(), "Signed out");
        assert_eq!(whoami(&state).await.unwrap(), "Not signed in");
    }

    #[tokio::test]
    async fn test_otp_flow() {
        let state = fixtures::state();
        let out = otp(&state, "9876543210", None).await.unwrap();
        let (sent, code) = out.split_once("\nCode: ").unwrap();
        assert_eq!(sent, "OTP sent to 9876543210");
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));

        let err = otp(&state, "98765", None).await.unwrap_err();
        assert_eq!(err.message, "Please enter a valid email or phone number");

        otp(&state, "9876543210", Some("424242")).await.unwrap();
        assert!(whoami(&state).await.unwrap().contains("signed in with otp"));
    }

    #[tokio::test]
    async fn test_register() {
        let state = fixtures::state();
        let out = register(&state, "Asha", "asha@example.com", "secret1", "secret1", "123456")
            .await
            .unwrap();
        assert_eq!(out, "Account created for Asha. You can now sign in.");

        let err = register(&state, "Asha", "asha@example.com", "secret1", "nope123", "123456")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, "Passwords do not match");

        let err = register(&state, "Asha", "asha@example.com", "secret1", "secret1", "12")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Please enter a valid 6-digit OTP");
    }

    #[tokio::test]
    async fn test_reset_password() {
        let state = fixtures::state();
        let out = reset_password(&state, "asha@example.com", "123456", "newpass", "newpass")
            .await
            .unwrap();
        assert_eq!(out, "Password updated. You can now sign in.");

        let err = reset_password(&state, "asha@example.com", "abcdef", "newpass", "newpass")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, "Please enter a valid 6-digit OTP");

        let err = reset_password(&state, "asha@example.com", "123456", "newpass", "newpas")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Passwords do not match");
    }
}
