use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::AdminConfig;

/// Single-account credential check for the admin panel.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    username: String,
    password: String,
    secret: String,
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl AdminAuth {
    pub fn new(config: &AdminConfig) -> Self {
        if !config.password.is_empty() && config.token_secret.is_empty() {
            warn!("ADMIN_PASSWORD is set without ADMIN_TOKEN_SECRET; admin login stays disabled");
        }
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            secret: config.token_secret.clone(),
        }
    }

    /// Both a password and a token secret are required.
    pub fn is_enabled(&self) -> bool {
        !self.password.is_empty() && !self.secret.is_empty()
    }

    fn token(&self) -> String {
        let digest = Sha256::digest(format!("{}:{}", self.secret, self.username).as_bytes());
        format!("{:x}", digest)
    }

    /// Session token on a credential match, `None` otherwise.
    pub fn login(&self, username: &str, password: &str) -> Option<String> {
        if !self.is_enabled() {
            warn!("Admin login attempted while admin credentials are not configured");
            return None;
        }
        let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let pass_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        if user_ok && pass_ok {
            info!("Admin login for {}", username);
            Some(self.token())
        } else {
            warn!("Rejected admin login for {}", username);
            None
        }
    }

    /// Checks an `Authorization` header value of the form `Bearer <token>`.
    pub fn verify_bearer(&self, header: &str) -> bool {
        header
            .strip_prefix("Bearer ")
            .is_some_and(|token| self.verify(token.trim()))
    }

    pub fn verify(&self, token: &str) -> bool {
        self.is_enabled() && constant_time_eq(token.as_bytes(), self.token().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_with(password: &str, secret: &str) -> AdminAuth {
        AdminAuth::new(&AdminConfig {
            username: "editor".to_string(),
            password: password.to_string(),
            token_secret: secret.to_string(),
        })
    }

    fn auth(password: &str) -> AdminAuth {
        auth_with(password, "pepper")
    }

    #[test]
    fn test_login_and_verify() {
        let auth = auth("hunter2");
        let token = auth.login("editor", "hunter2").unwrap();
        assert_eq!(token.len(), 64);
        assert!(auth.verify(&token));
        assert!(!auth.verify("not-a-token"));
    }

    #[test]
    fn test_rejects_bad_credentials() {
        let auth = auth("hunter2");
        assert_eq!(auth.login("editor", "hunter3"), None);
        assert_eq!(auth.login("admin", "hunter2"), None);
    }

    #[test]
    fn test_empty_password_disables_login() {
        let auth = auth("");
        assert_eq!(auth.login("editor", ""), None);
        assert!(!auth.verify(&auth.token()));
    }

    #[test]
    fn test_empty_secret_disables_login() {
        let auth = AdminAuth::new(&AdminConfig {
            username: "admin".to_string(),
            password: "s3cret".to_string(),
            token_secret: String::new(),
        });
        assert!(!auth.is_enabled());
        assert_eq!(auth.login("admin", "s3cret"), None);

        let guessed = format!("{:x}", Sha256::digest(b":admin"));
        assert!(!auth.verify(&guessed));
    }

    #[test]
    fn test_verify_bearer() {
        let auth = auth_with("hunter2", "pepper");
        let token = auth.login("editor", "hunter2").unwrap();
        assert!(auth.verify_bearer(&format!("Bearer {}", token)));
        assert!(!auth.verify_bearer(&token));
        assert!(!auth.verify_bearer("Bearer "));
        assert!(!auth_with("hunter2", "salt").verify_bearer(&format!("Bearer {}", token)));
    }
}
