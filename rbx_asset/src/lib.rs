#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_panics_doc)]

pub mod error;
pub mod multipart;
mod poll;
pub mod request;
mod route;
pub mod upload;

use http_body_util::{BodyExt, Full};
use hyper::{
    body::Bytes,
    header::{HeaderValue, CONTENT_LENGTH, COOKIE},
    http::response::Parts,
    Method, Request as HyperRequest, StatusCode,
};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client as HyperClient},
    rt::TokioExecutor,
};
use rbx_asset_models::{
    asset::{AssetMetadata, AssetType, Creator},
    id::{AssetId, GroupId},
    operation::OperationResponse,
    user::AuthenticatedUser,
};

use crate::{
    error::{DeserializeBodyError, ErrorKind, RobloxError},
    request::Request,
    route::Route,
    upload::{Ownership, UploadArgs, UploadData},
};

/// Client for the user-auth assets API.
///
/// Each call carries its own session cookie and a freshly fetched csrf
/// token; nothing is shared or cached between concurrent calls.
#[derive(Clone)]
pub struct AssetClient {
    client: HyperClient<HttpsConnector<HttpConnector>, Full<Bytes>>,
    cookie: String,
}

/// Options common to the per-asset-type upload facades.
#[derive(Debug, Default)]
pub struct ItemOptions {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Upload under a group instead of the session's user. Ignored when
    /// overwriting an existing asset.
    pub group_id: Option<GroupId>,
}

#[derive(Clone, Copy, Debug)]
pub struct ModelUploadResponse {
    pub asset_id: AssetId,
    pub asset_version_id: Option<u64>,
}

impl AssetClient {
    /// Create a client from a `.ROBLOSECURITY` session cookie value.
    #[must_use]
    pub fn new(security_cookie: &str) -> Self {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = HyperClient::builder(TokioExecutor::new()).build(connector);
        Self {
            client,
            cookie: format!(".ROBLOSECURITY={security_cookie}"),
        }
    }

    fn cookie_header(&self) -> HeaderValue {
        let mut value = HeaderValue::from_str(&self.cookie).unwrap();
        value.set_sensitive(true);
        value
    }

    /// Get the identity of the session's user.
    ///
    /// # Errors
    ///
    /// See [`RobloxError`] for details.
    pub async fn get_authenticated_user(&self) -> Result<AuthenticatedUser, RobloxError> {
        let route = Route::AuthenticatedUser;

        let request = Request::new()
            .uri(route.to_string())
            .method(Method::GET)
            .header(COOKIE, self.cookie_header())
            .body(Full::default())
            .build()
            .map_err(|source| RobloxError {
                source: Some(Box::new(source)),
                kind: ErrorKind::BuildingRequest,
            })?;

        let (parts, bytes) = self.request(request).await?;

        if parts.status != StatusCode::OK {
            return Err(RobloxError {
                source: None,
                kind: ErrorKind::Response {
                    route: route.to_string(),
                    status: parts.status,
                    bytes,
                },
            });
        }

        let json =
            serde_json::from_slice::<AuthenticatedUser>(&bytes).map_err(|source| RobloxError {
                source: Some(Box::new(DeserializeBodyError {
                    source: Some(Box::new(source)),
                    bytes,
                })),
                kind: ErrorKind::Deserialize,
            })?;

        Ok(json)
    }

    /// Fetch a fresh anti-forgery token.
    ///
    /// The token is short-lived and mandatory on every mutating call, so it
    /// is fetched per call and never cached. The challenge endpoint answers
    /// the unauthenticated POST with a 403 but still sets the header, so the
    /// status is not checked here.
    ///
    /// # Errors
    ///
    /// See [`RobloxError`] for details.
    pub async fn csrf_token(&self) -> Result<String, RobloxError> {
        let route = Route::CsrfToken;

        let request = Request::new()
            .uri(route.to_string())
            .method(Method::POST)
            .header(COOKIE, self.cookie_header())
            .header(CONTENT_LENGTH, 0)
            .body(Full::default())
            .build()
            .map_err(|source| RobloxError {
                source: Some(Box::new(source)),
                kind: ErrorKind::BuildingRequest,
            })?;

        let (parts, _bytes) = self.request(request).await?;

        let token = parts
            .headers
            .get("x-csrf-token")
            .and_then(|value| value.to_str().ok())
            .ok_or(RobloxError {
                source: None,
                kind: ErrorKind::MissingCsrfToken,
            })?;

        Ok(token.to_string())
    }

    /// Create or overwrite an asset.
    ///
    /// Returns the immediate operation body; when `done` is false the caller
    /// follows up with [`Self::poll_operation`] on the operation's url.
    ///
    /// # Errors
    ///
    /// See [`RobloxError`] for details. Any non-200 status is terminal; this
    /// layer never retries.
    pub async fn upload(&self, args: UploadArgs) -> Result<OperationResponse, RobloxError> {
        let token = self.csrf_token().await?;

        let UploadArgs {
            asset_type,
            asset_id,
            group_id,
            display_name,
            description,
            file,
        } = args;

        let metadata = match upload::resolve_ownership(asset_id, group_id) {
            Ownership::Inherited { asset_id } => AssetMetadata::overwrite(asset_id, asset_type),
            Ownership::Group(group_id) => {
                AssetMetadata::create(asset_type, Creator::group(group_id))
            }
            Ownership::AuthenticatedUser => {
                let user = self.get_authenticated_user().await?;
                AssetMetadata::create(asset_type, Creator::user(user.id))
            }
        }
        .display_name(display_name)
        .description(description);

        let (route, method) = match asset_id {
            Some(asset_id) => (Route::UpdateAsset { asset_id: asset_id.0 }, Method::PATCH),
            None => (Route::CreateAsset, Method::POST),
        };
        let route = route.to_string();

        let file = match file {
            Some(data) => Some(data.resolve().await?),
            None => None,
        };

        tracing::debug!(%route, ?asset_type, "uploading asset");

        let request = upload::build_upload_request(
            &route,
            method,
            &token,
            self.cookie_header(),
            &metadata,
            file.as_ref(),
        )?;

        let (parts, bytes) = self.request(request).await?;

        if parts.status != StatusCode::OK {
            return Err(RobloxError {
                source: None,
                kind: ErrorKind::Response {
                    route,
                    status: parts.status,
                    bytes,
                },
            });
        }

        let json =
            serde_json::from_slice::<OperationResponse>(&bytes).map_err(|source| RobloxError {
                source: Some(Box::new(DeserializeBodyError {
                    source: Some(Box::new(source)),
                    bytes,
                })),
                kind: ErrorKind::Deserialize,
            })?;

        Ok(json)
    }

    /// Poll a long-running operation until it completes or the attempt
    /// budget runs out.
    ///
    /// Up to five fetches, backing off 2^n seconds after attempt n. The
    /// fifth body is returned even if still incomplete, so callers must
    /// inspect `done` on a non-error return. The wait suspends only this
    /// task.
    ///
    /// # Errors
    ///
    /// A non-200 status on any attempt fails immediately with
    /// [`ErrorKind::Response`]; see [`RobloxError`] for details.
    pub async fn poll_operation(
        &self,
        operation_url: &str,
    ) -> Result<OperationResponse, RobloxError> {
        poll::drive(operation_url, move || async move {
            let request = Request::new()
                .uri(operation_url)
                .method(Method::GET)
                .header(COOKIE, self.cookie_header())
                .body(Full::default())
                .build()
                .map_err(|source| RobloxError {
                    source: Some(Box::new(source)),
                    kind: ErrorKind::BuildingRequest,
                })?;

            let (parts, bytes) = self.request(request).await?;
            Ok((parts.status, bytes))
        })
        .await
    }

    /// Upload a model, either as a new asset or overwriting `asset_id`.
    ///
    /// Maps the immediate response only; an async operation still needs
    /// [`Self::poll_operation`].
    ///
    /// # Errors
    ///
    /// See [`RobloxError`] for details.
    pub async fn upload_model(
        &self,
        data: UploadData,
        options: ItemOptions,
        asset_id: Option<AssetId>,
    ) -> Result<ModelUploadResponse, RobloxError> {
        let operation = self
            .upload(UploadArgs {
                asset_type: AssetType::Model,
                asset_id,
                group_id: options.group_id,
                display_name: options.name,
                description: options.description,
                file: Some(data),
            })
            .await?;

        let result = operation.response.ok_or(RobloxError {
            source: None,
            kind: ErrorKind::Deserialize,
        })?;

        let asset_version_id = match result.revision_id.as_deref() {
            Some(revision) => Some(revision.parse().map_err(|source| RobloxError {
                source: Some(Box::new(source)),
                kind: ErrorKind::Deserialize,
            })?),
            None => None,
        };

        Ok(ModelUploadResponse {
            asset_id: result.asset_id,
            asset_version_id,
        })
    }

    /// Upload an animation, either as a new asset or overwriting `asset_id`.
    ///
    /// # Errors
    ///
    /// See [`RobloxError`] for details.
    pub async fn upload_animation(
        &self,
        data: UploadData,
        options: ItemOptions,
        asset_id: Option<AssetId>,
    ) -> Result<AssetId, RobloxError> {
        let operation = self
            .upload(UploadArgs {
                asset_type: AssetType::Animation,
                asset_id,
                group_id: options.group_id,
                display_name: options.name,
                description: options.description,
                file: Some(data),
            })
            .await?;

        let result = operation.response.ok_or(RobloxError {
            source: None,
            kind: ErrorKind::Deserialize,
        })?;

        Ok(result.asset_id)
    }

    /// Make a request to the Roblox API.
    ///
    /// # Errors
    ///
    /// See [`RobloxError`] for details.
    pub async fn request(
        &self,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<(Parts, Vec<u8>), RobloxError> {
        let res = self
            .client
            .request(request)
            .await
            .map_err(|source| RobloxError {
                source: Some(Box::new(source)),
                kind: ErrorKind::Sending,
            })?;

        let (parts, body) = res.into_parts();
        let bytes = body
            .collect()
            .await
            .map_err(|source| RobloxError {
                source: Some(Box::new(source)),
                kind: ErrorKind::ChunkingResponse,
            })?
            .to_bytes();

        Ok((parts, bytes.into()))
    }
}
