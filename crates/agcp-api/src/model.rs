//! Request and response bodies of the publishing API.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a new version is rolled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseType {
    /// Released to all users at once.
    #[default]
    Network,
    /// Released by phase, see [`PhasedReleaseInfo`].
    Phased,
}

impl ReleaseType {
    /// The numeric `releaseType` query value.
    pub fn code(self) -> u8 {
        match self {
            ReleaseType::Network => 1,
            ReleaseType::Phased => 3,
        }
    }

    /// Map a numeric `releaseType` back to a variant.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ReleaseType::Network),
            3 => Some(ReleaseType::Phased),
            _ => None,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Vendor result envelope present on most responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ret {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

#[derive(Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppIdListResponse {
    #[serde(default)]
    pub ret: Option<Ret>,
    #[serde(default)]
    pub appids: Vec<AppIdEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppIdEntry {
    #[serde(default)]
    pub key: String,
    pub value: String,
}

/// Response of the app-info query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoResponse {
    #[serde(default)]
    pub ret: Option<Ret>,
    pub app_info: AppInfo,
    #[serde(default)]
    pub languages: Vec<LanguageInfo>,
}

/// Selected fields of an app record; the rest are kept in `extra`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    #[serde(default)]
    pub release_state: Option<i64>,
    #[serde(default)]
    pub version_number: Option<String>,
    #[serde(default)]
    pub default_lang: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub phased_release_info: Option<PhasedReleaseInfo>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub lang: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub brief_info: Option<String>,
}

/// Staged rollout settings. Reported as data; rollout is not orchestrated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasedReleaseInfo {
    /// `SUSPEND`, `RELEASE`, `CANCEL` or `DRAFT`.
    #[serde(default)]
    pub state: Option<String>,
    /// `yyyy-MM-dd'T'HH:mm:ssZZ`, e.g. `2015-01-01T01:01:01+0800`.
    #[serde(default)]
    pub phased_release_start_time: Option<String>,
    #[serde(default)]
    pub phased_release_end_time: Option<String>,
    /// `0.00` to `100.00`, without a percent sign.
    #[serde(default)]
    pub phased_release_percent: Option<String>,
    #[serde(default)]
    pub phased_release_description: Option<String>,
}

/// Fields accepted by the basic app-info update. Empty serializes as `{}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_policy: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadUrlResponse {
    #[serde(default)]
    pub ret: Option<Ret>,
    pub url_info: UrlInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UrlInfo {
    pub object_id: String,
    pub url: String,
    #[serde(default = "default_upload_method")]
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_upload_method() -> String {
    "PUT".to_owned()
}

/// `fileType` of an APK/AAB package in the app-file-info request.
pub(crate) const FILE_TYPE_PACKAGE: u8 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileInfoRequest {
    pub file_type: u8,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileEntry {
    pub file_name: String,
    pub file_dest_url: String,
    pub sha256: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileInfoResponse {
    #[serde(default)]
    pub ret: Option<Ret>,
    #[serde(default)]
    pub pkg_version: Vec<String>,
}

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub file_name: String,
    pub object_id: String,
    pub sha256: String,
    pub size: u64,
    /// Package version ids assigned by the console.
    pub pkg_versions: Vec<String>,
}
