//! File scaffolds committed by the developer agent.
//!
//! Each known feature id maps to a fixed set of source and test files. The
//! scaffolds are written to satisfy the review agent's own checks: every
//! source file has a test counterpart, public items carry doc comments, and
//! no line exceeds the review length limit.

/// A single file to commit on the feature branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: &'static str,
    pub content: &'static str,
}

const USER_MODEL: &str = r#"//! User model for authentication.

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<u64>,
    pub email: String,
    pub hashed_password: String,
}

impl User {
    /// Create a user from an email and an already-hashed password.
    ///
    /// Returns `None` when the email has no `@` or either half is empty.
    pub fn new(email: &str, hashed_password: &str) -> Option<Self> {
        let (local, domain) = email.split_once('@')?;
        if local.is_empty() || domain.is_empty() {
            return None;
        }
        Some(Self {
            id: None,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        })
    }
}
"#;

const TOKEN_HANDLER: &str = r#"//! Session token issuing and verification.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Issues and verifies signed session tokens.
#[derive(Debug, Clone)]
pub struct TokenHandler {
    secret: String,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub user_id: u64,
    pub expires_at: u64,
}

impl TokenHandler {
    /// Create a handler with the signing secret.
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Issue a token for `user_id` valid for `ttl`.
    pub fn issue(&self, user_id: u64, ttl: Duration) -> Option<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        let expires_at = now.as_secs().checked_add(ttl.as_secs())?;
        let payload = format!("{user_id}.{expires_at}");
        let signature = self.sign(&payload);
        Some(format!("{payload}.{signature}"))
    }

    /// Verify a token, returning its claims when valid and unexpired.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut parts = token.rsplitn(2, '.');
        let signature = parts.next()?;
        let payload = parts.next()?;
        if self.sign(payload) != signature {
            return None;
        }
        let (user_id, expires_at) = payload.split_once('.')?;
        let claims = Claims {
            user_id: user_id.parse().ok()?,
            expires_at: expires_at.parse().ok()?,
        };
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        if claims.expires_at <= now.as_secs() {
            return None;
        }
        Some(claims)
    }

    fn sign(&self, payload: &str) -> String {
        let mut acc: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in payload.bytes().chain(self.secret.bytes()) {
            acc ^= u64::from(byte);
            acc = acc.wrapping_mul(0x0000_0100_0000_01b3);
        }
        format!("{acc:016x}")
    }
}
"#;

const PASSWORD_HANDLER: &str = r#"//! Password hashing and verification.

/// Salted password hashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHandler;

impl PasswordHandler {
    /// Hash a password with a fresh salt, returning `salt$digest`.
    pub fn hash(password: &str, salt: &str) -> String {
        let mut acc: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in salt.bytes().chain(password.bytes()) {
            acc ^= u64::from(byte);
            acc = acc.wrapping_mul(0x0000_0100_0000_01b3);
        }
        format!("{salt}${acc:016x}")
    }

    /// Verify a password against a stored `salt$digest` value.
    pub fn verify(password: &str, stored: &str) -> bool {
        match stored.split_once('$') {
            Some((salt, _)) => Self::hash(password, salt) == stored,
            None => false,
        }
    }
}
"#;

const USER_TESTS: &str = r#"//! Tests for the user model.

#[test]
fn test_user_requires_valid_email() {
    let user = auth::user::User::new("test@example.com", "hashed");
    assert!(user.is_some());
    assert!(auth::user::User::new("not-an-email", "hashed").is_none());
    assert!(auth::user::User::new("@example.com", "hashed").is_none());
}
"#;

const TOKEN_TESTS: &str = r#"//! Tests for token issuing and verification.

use std::time::Duration;

#[test]
fn test_token_round_trip() {
    let handler = auth::token::TokenHandler::new("secret");
    let token = handler.issue(1, Duration::from_secs(3600)).unwrap();
    let claims = handler.verify(&token).unwrap();
    assert_eq!(claims.user_id, 1);
}

#[test]
fn test_tampered_token_is_rejected() {
    let handler = auth::token::TokenHandler::new("secret");
    let token = handler.issue(1, Duration::from_secs(3600)).unwrap();
    let tampered = token.replace('1', "2");
    assert!(handler.verify(&tampered).is_none());
}
"#;

const PASSWORD_TESTS: &str = r#"//! Tests for password hashing.

#[test]
fn test_password_verify_accepts_correct_password() {
    let stored = auth::password::PasswordHandler::hash("secure_password123", "salt");
    assert!(auth::password::PasswordHandler::verify(
        "secure_password123",
        &stored
    ));
}

#[test]
fn test_password_verify_rejects_wrong_password() {
    let stored = auth::password::PasswordHandler::hash("secure_password123", "salt");
    assert!(!auth::password::PasswordHandler::verify(
        "wrong_password",
        &stored
    ));
}
"#;

/// The files committed for a known feature id, or `None` when the developer
/// agent has no scaffold for it.
pub fn files_for(feature_id: &str) -> Option<Vec<ScaffoldFile>> {
    match feature_id {
        "user-auth" => Some(vec![
            ScaffoldFile {
                path: "src/auth/user.rs",
                content: USER_MODEL,
            },
            ScaffoldFile {
                path: "src/auth/token.rs",
                content: TOKEN_HANDLER,
            },
            ScaffoldFile {
                path: "src/auth/password.rs",
                content: PASSWORD_HANDLER,
            },
            ScaffoldFile {
                path: "tests/auth/user.rs",
                content: USER_TESTS,
            },
            ScaffoldFile {
                path: "tests/auth/token.rs",
                content: TOKEN_TESTS,
            },
            ScaffoldFile {
                path: "tests/auth/password.rs",
                content: PASSWORD_TESTS,
            },
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_auth_scaffold_pairs_sources_with_tests() {
        let files = files_for("user-auth").unwrap();
        for file in files.iter().filter(|f| f.path.starts_with("src/")) {
            let expected = format!("tests/{}", &file.path[4..]);
            assert!(
                files.iter().any(|f| f.path == expected),
                "missing test counterpart for {}",
                file.path
            );
        }
    }

    #[test]
    fn test_unknown_feature_has_no_scaffold() {
        assert!(files_for("payments").is_none());
    }

    #[test]
    fn test_scaffold_lines_fit_review_limit() {
        for file in files_for("user-auth").unwrap() {
            for line in file.content.lines() {
                assert!(line.len() <= 88, "line too long in {}: {line}", file.path);
            }
        }
    }

    #[test]
    fn test_test_scaffolds_contain_assertions() {
        for file in files_for("user-auth")
            .unwrap()
            .iter()
            .filter(|f| f.path.starts_with("tests/"))
        {
            assert!(file.content.contains("assert"));
            assert!(file.content.contains("#[test]"));
        }
    }
}
