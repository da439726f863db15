use serde::{Deserialize, Serialize};

use crate::id::{AssetId, GroupId, UserId};

/// Asset types accepted by the user-auth assets endpoint.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AssetType {
    Animation,
    Audio,
    Decal,
    Model,
    Video,
}

/// The owner of a newly created asset.
///
/// The API expects the id as a decimal string in both forms.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Creator {
    User {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Group {
        #[serde(rename = "groupId")]
        group_id: String,
    },
}

impl Creator {
    #[must_use]
    pub fn user(user_id: UserId) -> Self {
        Self::User {
            user_id: user_id.to_string(),
        }
    }

    #[must_use]
    pub fn group(group_id: GroupId) -> Self {
        Self::Group {
            group_id: group_id.to_string(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CreationContext {
    pub creator: Creator,
}

/// The JSON metadata part of an asset upload request.
///
/// Overwrites and creates are structurally distinct: an overwrite names the
/// existing asset and carries no creation context (the server infers
/// ownership from the asset), a create carries the creation context and no
/// asset id.
#[derive(Clone, Debug, Serialize)]
pub struct AssetMetadata {
    #[serde(rename = "assetId", skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(rename = "assetType")]
    pub asset_type: AssetType,
    #[serde(rename = "creationContext", skip_serializing_if = "Option::is_none")]
    pub creation_context: Option<CreationContext>,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AssetMetadata {
    /// Metadata for overwriting an existing asset.
    #[must_use]
    pub fn overwrite(asset_id: AssetId, asset_type: AssetType) -> Self {
        Self {
            asset_id: Some(asset_id.to_string()),
            asset_type,
            creation_context: None,
            display_name: None,
            description: None,
        }
    }

    /// Metadata for creating a new asset under the given creator.
    #[must_use]
    pub fn create(asset_type: AssetType, creator: Creator) -> Self {
        Self {
            asset_id: None,
            asset_type,
            creation_context: Some(CreationContext { creator }),
            display_name: None,
            description: None,
        }
    }

    #[must_use]
    pub fn display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}
