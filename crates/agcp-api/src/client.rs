//! Bearer-authenticated calls to the publishing endpoints.
//!
//! Every call attaches `client_id`, `Authorization: Bearer` and a JSON
//! content type. A non-200 status ends the call with `ApiError::Status`;
//! nothing is retried.

use std::path::Path;

use serde::de::DeserializeOwned;
use ureq::http::{Response, StatusCode};
use ureq::{Agent, Body, RequestBuilder};

use agcp_config::AppIdentity;
use agcp_util::fs::{file_name, read_bytes};
use agcp_util::hash::sha256_bytes;
use agcp_variants::ArtifactType;

use crate::auth::{AccessToken, AuthClient};
use crate::endpoint::Endpoints;
use crate::error::ApiError;
use crate::model::{
    AppIdListResponse, AppInfoResponse, AppInfoUpdate, FileEntry, FileInfoRequest,
    FileInfoResponse, PublishReceipt, ReleaseType, Ret, UploadUrlResponse, FILE_TYPE_PACKAGE,
};
use crate::transport::reason_phrase;

/// Issues API calls with a previously obtained token.
pub struct PublishingClient {
    agent: Agent,
    endpoints: Endpoints,
    token: AccessToken,
}

impl PublishingClient {
    /// Reuse the auth client's pooled transport with `token`.
    pub fn new(auth: &AuthClient, token: AccessToken) -> Self {
        Self {
            agent: auth.agent().clone(),
            endpoints: auth.settings().endpoints.clone(),
            token,
        }
    }

    /// Query the app record.
    ///
    /// # Errors
    /// Returns an error on a non-200 status, a vendor error code, or an
    /// unparseable body.
    pub fn get_app_info(&self, app_id: i64) -> Result<AppInfoResponse, ApiError> {
        let result = self
            .authorized(self.agent.get(self.endpoints.app_info()))
            .query("appId", app_id.to_string())
            .call();
        read_json(result)
    }

    /// Look up the app id registered for a package name.
    ///
    /// # Errors
    /// Returns `ApiError::UnknownPackage` if the console lists no app for the
    /// package, or an error if the request fails.
    pub fn get_app_id(&self, package_name: &str) -> Result<i64, ApiError> {
        let result = self
            .authorized(self.agent.get(self.endpoints.app_id_list()))
            .query("packageName", package_name)
            .call();
        let response: AppIdListResponse = read_json(result)?;

        let entry = response
            .appids
            .first()
            .ok_or_else(|| ApiError::UnknownPackage {
                package_name: package_name.to_owned(),
            })?;
        log::debug!("app id for {} ({}): {}", package_name, entry.key, entry.value);
        entry
            .value
            .trim()
            .parse()
            .map_err(|e| ApiError::MalformedResponse {
                message: format!("app id \"{}\": {e}", entry.value),
            })
    }

    /// Look up the app id for the package named in an app metadata file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the lookup fails.
    pub fn get_app_id_for_config(&self, app_config_path: &Path) -> Result<i64, ApiError> {
        let identity =
            AppIdentity::from_path(app_config_path).map_err(|e| ApiError::MalformedResponse {
                message: e.to_string(),
            })?;
        self.get_app_id(&identity.package_name)
    }

    /// Upload an artifact and attach it to the app's draft version.
    ///
    /// Three calls: obtain an upload URL, upload the bytes to it, then
    /// register the uploaded object as the app package.
    ///
    /// # Errors
    /// Returns an error if the artifact cannot be read or any of the calls fails.
    pub fn publish(
        &self,
        app_id: i64,
        artifact_type: ArtifactType,
        artifact_path: &Path,
        release_type: ReleaseType,
    ) -> Result<PublishReceipt, ApiError> {
        let name = file_name(artifact_path);
        let bytes = read_bytes(artifact_path).map_err(|source| ApiError::Artifact {
            path: artifact_path.display().to_string(),
            source,
        })?;
        let size = bytes.len() as u64;
        let sha256 = sha256_bytes(&bytes);

        // 1. Upload URL.
        let result = self
            .authorized(self.agent.get(self.endpoints.upload_url()))
            .query("appId", app_id.to_string())
            .query("fileName", &name)
            .query("contentLength", size.to_string())
            .query("suffix", artifact_type.suffix())
            .call();
        let url_info = read_json::<UploadUrlResponse>(result)?.url_info;

        // 2. Upload the bytes with the headers the console handed out.
        let result = if url_info.method.eq_ignore_ascii_case("POST") {
            let builder = url_info
                .headers
                .iter()
                .fold(self.agent.post(&url_info.url), |b, (k, v)| b.header(k, v));
            builder.send(bytes.as_slice())
        } else {
            let builder = url_info
                .headers
                .iter()
                .fold(self.agent.put(&url_info.url), |b, (k, v)| b.header(k, v));
            builder.send(bytes.as_slice())
        };
        expect_ok(result)?;

        // 3. Register the uploaded file.
        let payload = to_json(&FileInfoRequest {
            file_type: FILE_TYPE_PACKAGE,
            files: vec![FileEntry {
                file_name: name.clone(),
                file_dest_url: url_info.object_id.clone(),
                sha256: sha256.clone(),
            }],
        })?;
        let result = self
            .authorized(self.agent.put(self.endpoints.app_file_info()))
            .query("appId", app_id.to_string())
            .query("releaseType", release_type.to_string())
            .send(payload);
        let response: FileInfoResponse = read_json(result)?;

        Ok(PublishReceipt {
            file_name: name,
            object_id: url_info.object_id,
            sha256,
            size,
            pkg_versions: response.pkg_version,
        })
    }

    /// Update the app's basic information.
    ///
    /// # Errors
    /// Returns an error on a non-200 status or a vendor error code.
    pub fn update_app_info_basic(
        &self,
        app_id: i64,
        release_type: ReleaseType,
        update: &AppInfoUpdate,
    ) -> Result<(), ApiError> {
        let payload = to_json(update)?;
        let result = self
            .authorized(self.agent.put(self.endpoints.app_info()))
            .query("appId", app_id.to_string())
            .query("releaseType", release_type.to_string())
            .send(payload);
        read_json::<RetOnly>(result).map(drop)
    }

    fn authorized<B>(&self, builder: RequestBuilder<B>) -> RequestBuilder<B> {
        builder
            .header("client_id", self.token.client_id())
            .header("Authorization", format!("Bearer {}", self.token.value()))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
    }
}

#[derive(serde::Deserialize)]
struct RetOnly {
    #[serde(default)]
    ret: Option<Ret>,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::MalformedResponse {
        message: e.to_string(),
    })
}

/// Require a 200 status and hand back the response.
fn expect_ok(
    result: Result<Response<Body>, ureq::Error>,
) -> Result<Response<Body>, ApiError> {
    let response = result.map_err(|e| ApiError::Transport {
        message: e.to_string(),
    })?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(ApiError::Status {
            status: status.as_u16(),
            reason: reason_phrase(status),
        });
    }
    Ok(response)
}

/// Require a 200 status and a zero `ret.code`, then parse the body as `T`.
///
/// A rejection carries only `ret`, so it is checked before the payload.
fn read_json<T: DeserializeOwned>(
    result: Result<Response<Body>, ureq::Error>,
) -> Result<T, ApiError> {
    let mut response = expect_ok(result)?;
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::MalformedResponse {
            message: e.to_string(),
        })?;
    parse_checked(&body)
}

fn parse_checked<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let malformed = |e: serde_json::Error| ApiError::MalformedResponse {
        message: e.to_string(),
    };
    let envelope: RetOnly = serde_json::from_str(body).map_err(malformed)?;
    check_ret(envelope.ret.as_ref())?;
    serde_json::from_str(body).map_err(malformed)
}

/// A 200 answer can still carry a vendor error in `ret.code`.
fn check_ret(ret: Option<&Ret>) -> Result<(), ApiError> {
    match ret {
        Some(ret) if ret.code != 0 => Err(ApiError::Rejected {
            code: ret.code,
            message: ret.msg.clone(),
        }),
        _ => Ok(()),
    }
}
