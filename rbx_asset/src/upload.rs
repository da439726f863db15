use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    header::{HeaderName, HeaderValue, COOKIE},
    Method, Request as HyperRequest,
};
use rbx_asset_models::{
    asset::{AssetMetadata, AssetType},
    id::{AssetId, GroupId},
};
use std::path::PathBuf;

use crate::{
    error::{ErrorKind, RobloxError},
    multipart::MultipartForm,
    request::Request,
};

/// The content of an upload, either on disk or already in memory.
///
/// Both variants resolve to a single in-memory form before the request is
/// built; the file name is kept for content-type inference.
#[derive(Clone, Debug)]
pub enum UploadData {
    Path(PathBuf),
    Bytes { file_name: String, contents: Bytes },
}

#[derive(Clone, Debug)]
pub struct UploadFile {
    pub file_name: String,
    pub contents: Bytes,
}

impl UploadData {
    /// Resolve the variant into file-name + contents form.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::ReadingFile`] error if the path variant
    /// cannot be read.
    pub async fn resolve(self) -> Result<UploadFile, RobloxError> {
        match self {
            Self::Path(path) => {
                let contents = tokio::fs::read(&path).await.map_err(|source| RobloxError {
                    source: Some(Box::new(source)),
                    kind: ErrorKind::ReadingFile,
                })?;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(UploadFile {
                    file_name,
                    contents: Bytes::from(contents),
                })
            }
            Self::Bytes {
                file_name,
                contents,
            } => Ok(UploadFile {
                file_name,
                contents,
            }),
        }
    }
}

/// Every option the generic upload recognizes.
#[derive(Debug)]
pub struct UploadArgs {
    pub asset_type: AssetType,
    /// An existing asset to overwrite. When set, the request becomes a PATCH
    /// and no creation context is sent.
    pub asset_id: Option<AssetId>,
    /// The group to create the asset under. Ignored on overwrites.
    pub group_id: Option<GroupId>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub file: Option<UploadData>,
}

/// How the owner of the upload target is determined.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Ownership {
    /// Overwrite: the server infers ownership from the existing asset.
    Inherited { asset_id: AssetId },
    Group(GroupId),
    /// Create under the session's user. Costs one identity call.
    AuthenticatedUser,
}

pub(crate) fn resolve_ownership(
    asset_id: Option<AssetId>,
    group_id: Option<GroupId>,
) -> Ownership {
    match (asset_id, group_id) {
        (Some(asset_id), _) => Ownership::Inherited { asset_id },
        (None, Some(group_id)) => Ownership::Group(group_id),
        (None, None) => Ownership::AuthenticatedUser,
    }
}

/// Content types the multipart encoder cannot derive on its own.
pub(crate) fn infer_content_type(file_name: &str) -> Option<&'static str> {
    if file_name.ends_with(".rbxm") {
        Some("model/x-rbmx")
    } else if file_name.ends_with(".fbx") {
        Some("model/fbx")
    } else {
        None
    }
}

/// Assemble the full create-or-overwrite request: JSON metadata part plus,
/// when content is supplied, a binary content part.
pub(crate) fn build_upload_request(
    uri: &str,
    method: Method,
    token: &str,
    cookie: HeaderValue,
    metadata: &AssetMetadata,
    file: Option<&UploadFile>,
) -> Result<HyperRequest<Full<Bytes>>, RobloxError> {
    let metadata_bytes = serde_json::to_vec(metadata).map_err(|source| RobloxError {
        source: Some(Box::new(source)),
        kind: ErrorKind::BuildingRequest,
    })?;

    let mut form = MultipartForm::new().json_part("request", &metadata_bytes);
    if let Some(file) = file {
        let content_type = infer_content_type(&file.file_name);
        form = form.file_part("fileContent", &file.file_name, &file.contents, content_type);
    }

    let token = HeaderValue::from_str(token).map_err(|source| RobloxError {
        source: Some(Box::new(source)),
        kind: ErrorKind::BuildingRequest,
    })?;

    Request::new()
        .uri(uri)
        .method(method)
        .header(HeaderName::from_static("x-csrf-token"), token)
        .header(COOKIE, cookie)
        .multipart_body(form)
        .build()
        .map_err(|source| RobloxError {
            source: Some(Box::new(source)),
            kind: ErrorKind::BuildingRequest,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbx_asset_models::asset::Creator;

    #[test]
    fn rbxm_extension_maps_to_the_model_binary_type() {
        assert_eq!(infer_content_type("walk.rbxm"), Some("model/x-rbmx"));
    }

    #[test]
    fn fbx_extension_maps_to_the_fbx_type() {
        assert_eq!(infer_content_type("rig.fbx"), Some("model/fbx"));
    }

    #[test]
    fn unknown_extensions_leave_the_content_type_unset() {
        assert_eq!(infer_content_type("mesh.obj"), None);
        assert_eq!(infer_content_type("no_extension"), None);
    }

    #[test]
    fn overwrite_wins_over_group_ownership() {
        let ownership = resolve_ownership(Some(AssetId(123)), Some(GroupId(42)));
        assert_eq!(
            ownership,
            Ownership::Inherited {
                asset_id: AssetId(123)
            }
        );
    }

    #[test]
    fn group_ownership_needs_no_identity_call() {
        assert_eq!(
            resolve_ownership(None, Some(GroupId(42))),
            Ownership::Group(GroupId(42))
        );
    }

    #[test]
    fn bare_create_resolves_the_authenticated_user() {
        assert_eq!(resolve_ownership(None, None), Ownership::AuthenticatedUser);
    }

    #[test]
    fn overwrite_request_is_a_patch_on_the_asset_url() {
        let metadata = AssetMetadata::overwrite(AssetId(123), AssetType::Model);
        let request = build_upload_request(
            "https://apis.roblox.com/assets/user-auth/v1/assets/123",
            Method::PATCH,
            "token",
            HeaderValue::from_static(".ROBLOSECURITY=cookie"),
            &metadata,
            None,
        )
        .unwrap();

        assert_eq!(request.method(), Method::PATCH);
        assert!(request.uri().to_string().ends_with("/123"));
        assert_eq!(request.headers().get("x-csrf-token").unwrap(), "token");
        let content_type = request
            .headers()
            .get(hyper::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn create_request_is_a_post_with_a_content_part() {
        let metadata = AssetMetadata::create(AssetType::Animation, Creator::group(GroupId(42)));
        let file = UploadFile {
            file_name: "walk.rbxm".into(),
            contents: Bytes::from_static(b"keyframes"),
        };
        let request = build_upload_request(
            "https://apis.roblox.com/assets/user-auth/v1/assets",
            Method::POST,
            "token",
            HeaderValue::from_static(".ROBLOSECURITY=cookie"),
            &metadata,
            Some(&file),
        )
        .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert!(request
            .headers()
            .contains_key(hyper::header::CONTENT_LENGTH));
    }

    #[tokio::test]
    async fn path_data_resolves_to_its_contents_and_file_name() {
        let path = std::env::temp_dir().join("rbx_asset_resolve_test.rbxm");
        tokio::fs::write(&path, b"model bytes").await.unwrap();

        let file = UploadData::Path(path.clone()).resolve().await.unwrap();
        assert_eq!(file.file_name, "rbx_asset_resolve_test.rbxm");
        assert_eq!(&file.contents[..], b"model bytes");

        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn missing_path_is_a_reading_file_error() {
        let path = std::env::temp_dir().join("rbx_asset_does_not_exist.rbxm");
        let error = UploadData::Path(path).resolve().await.unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::ReadingFile));
    }

    #[tokio::test]
    async fn bytes_data_resolves_as_is() {
        let data = UploadData::Bytes {
            file_name: "cube.rbxm".into(),
            contents: Bytes::from_static(b"rbxm"),
        };
        let file = data.resolve().await.unwrap();
        assert_eq!(file.file_name, "cube.rbxm");
        assert_eq!(&file.contents[..], b"rbxm");
    }
}
