use std::fmt::{Display, Formatter, Result as FmtResult};

pub enum Route {
    /// Create a new asset.
    CreateAsset,
    /// Overwrite the content of an existing asset.
    UpdateAsset { asset_id: u64 },
    /// Identity of the session's user.
    AuthenticatedUser,
    /// Challenge endpoint used to obtain a fresh csrf token.
    CsrfToken,
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Route::CreateAsset => write!(f, "https://apis.roblox.com/assets/user-auth/v1/assets"),
            Route::UpdateAsset { asset_id } => write!(
                f,
                "https://apis.roblox.com/assets/user-auth/v1/assets/{asset_id}"
            ),
            Route::AuthenticatedUser => {
                write!(f, "https://users.roblox.com/v1/users/authenticated")
            }
            Route::CsrfToken => write!(f, "https://auth.roblox.com/v2/logout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_route_is_suffixed_with_the_asset_id() {
        let route = Route::UpdateAsset { asset_id: 123 };
        assert_eq!(
            route.to_string(),
            "https://apis.roblox.com/assets/user-auth/v1/assets/123"
        );
    }
}
