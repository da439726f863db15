use serde::Deserialize;

use crate::id::UserId;

/// The caller's identity, as reported by the authenticated-user endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_from_wire() {
        let body = r#"{"id": 1, "name": "Roblox", "displayName": "Roblox"}"#;
        let user = serde_json::from_str::<AuthenticatedUser>(body).unwrap();
        assert_eq!(user.id, UserId(1));
        assert_eq!(user.name, "Roblox");
    }
}
