use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Vendor,
    Client,
    Admin,
}

/// Identity handed to the flows explicitly; nothing reads ambient storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub vendor_id: Option<u64>,
    pub client_id: Option<u64>,
}

const VENDOR_ID_PATHS: [&[&str]; 6] = [
    &["vendorId"],
    &["vendor_id"],
    &["user", "vendorId"],
    &["user", "vendor_id"],
    &["vendor", "vendorId"],
    &["vendor", "vendor_id"],
];

const CLIENT_ID_PATHS: [&[&str]; 6] = [
    &["clientId"],
    &["client_id"],
    &["user", "clientId"],
    &["user", "client_id"],
    &["client", "clientId"],
    &["client", "client_id"],
];

const TOKEN_KEYS: [&str; 3] = ["token", "authToken", "access_token"];

fn lookup<'a>(profile: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(profile, |node, key| node.get(key))
}

/// Positive integers, as numbers or numeric strings.
fn as_id(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    id.filter(|id| *id > 0)
}

fn first_id(profile: &Value, paths: &[&[&str]]) -> Option<u64> {
    paths
        .iter()
        .find_map(|path| lookup(profile, path).and_then(as_id))
}

impl Session {
    pub fn new(token: Option<String>, vendor_id: Option<u64>, client_id: Option<u64>) -> Self {
        Self {
            token,
            role: None,
            vendor_id,
            client_id,
        }
    }

    /// Resolves identity from a stored login profile, trying the known
    /// locations of each id in order.
    pub fn from_profile(profile: &Value) -> Self {
        let token = TOKEN_KEYS
            .iter()
            .find_map(|key| profile.get(*key).and_then(Value::as_str))
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let role = ["role", "rol"]
            .iter()
            .find_map(|key| lookup(profile, &[*key]).or_else(|| lookup(profile, &["user", *key])))
            .and_then(|v| serde_json::from_value::<Role>(v.clone()).ok());

        let session = Self {
            token,
            role,
            vendor_id: first_id(profile, &VENDOR_ID_PATHS),
            client_id: first_id(profile, &CLIENT_ID_PATHS),
        };
        tracing::debug!(
            "Session resolved: role={:?} vendor_id={:?} client_id={:?} token={}",
            session.role,
            session.vendor_id,
            session.client_id,
            session.token.is_some()
        );
        session
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session profile: {}", path.display()))?;
        let profile: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session profile: {}", path.display()))?;
        Ok(Self::from_profile(&profile))
    }

    /// Explicit values win over whatever the profile held.
    pub fn with_overrides(mut self, token: Option<String>, vendor_id: Option<u64>, client_id: Option<u64>) -> Self {
        if token.is_some() {
            self.token = token;
        }
        if vendor_id.is_some() {
            self.vendor_id = vendor_id;
        }
        if client_id.is_some() {
            self.client_id = client_id;
        }
        self
    }

    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_vendor_id_fallback_chain() {
        assert_eq!(Session::from_profile(&json!({"vendorId": 3})).vendor_id, Some(3));
        assert_eq!(Session::from_profile(&json!({"vendor_id": "12"})).vendor_id, Some(12));
        assert_eq!(
            Session::from_profile(&json!({"user": {"vendor_id": 5}})).vendor_id,
            Some(5)
        );
        assert_eq!(
            Session::from_profile(&json!({"vendor": {"vendorId": 9}})).vendor_id,
            Some(9)
        );
        // earlier locations win
        assert_eq!(
            Session::from_profile(&json!({"vendorId": 1, "user": {"vendorId": 2}})).vendor_id,
            Some(1)
        );
    }

    #[test]
    fn test_missing_or_bad_ids() {
        let session = Session::from_profile(&json!({"user": {"vendorId": "abc"}, "vendor_id": 0}));
        assert_eq!(session.vendor_id, None);
        assert_eq!(session.client_id, None);
        assert_eq!(session.bearer(), None);
    }

    #[test]
    fn test_token_and_role() {
        let session = Session::from_profile(&json!({
            "authToken": "abc123",
            "user": {"role": "client", "clientId": 44}
        }));
        assert_eq!(session.bearer(), Some("abc123"));
        assert_eq!(session.role, Some(Role::Client));
        assert_eq!(session.client_id, Some(44));
    }

    #[test]
    fn test_overrides() {
        let session = Session::from_profile(&json!({"vendorId": 3, "token": "t"}))
            .with_overrides(None, Some(8), None);
        assert_eq!(session.vendor_id, Some(8));
        assert_eq!(session.bearer(), Some("t"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"token": "xyz", "user": {{"vendor_id": 21}}}}"#).unwrap();
        let session = Session::load(file.path()).unwrap();
        assert_eq!(session.vendor_id, Some(21));
        assert_eq!(session.bearer(), Some("xyz"));
    }
}
