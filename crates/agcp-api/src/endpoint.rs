//! Vendor REST endpoint locations.

/// Production base URL of the AppGallery Connect API.
pub const DEFAULT_BASE_URL: &str = "https://connect-api.cloud.huawei.com/api";

/// Console page for an app, `{appId}` substituted.
pub const CONSOLE_APP_INFO: &str =
    "https://developer.huawei.com/consumer/en/service/josp/agc/index.html#/myApp/{appId}";

/// Endpoint URLs under one API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> String {
        self.join("/oauth2/v1/token")
    }

    pub fn app_info(&self) -> String {
        self.join("/publish/v2/app-info")
    }

    pub fn app_id_list(&self) -> String {
        self.join("/publish/v2/appid-list")
    }

    pub fn upload_url(&self) -> String {
        self.join("/publish/v2/upload-url/for-obs")
    }

    pub fn app_file_info(&self) -> String {
        self.join("/publish/v2/app-file-info")
    }

    fn join(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Console URL of the "App information" page.
pub fn console_app_info_url(app_id: i64) -> String {
    CONSOLE_APP_INFO.replace("{appId}", &app_id.to_string())
}
