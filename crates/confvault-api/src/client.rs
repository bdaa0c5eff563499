//! HTTP implementation of [`DeviceApi`] over reqwest's blocking client

use std::fmt;

use reqwest::blocking::Client;

use crate::{ClientOptions, ConfigSnapshot, DeviceApi, DeviceTarget, Error, Result};

pub const LOGIN_PATH: &str = "/logincheck";
pub const LOGOUT_PATH: &str = "/logout";
pub const CONFIG_BACKUP_PATH: &str = "/api/v2/monitor/system/config/backup?scope=global";

/// Cookie carrying the anti-forgery token after login.
pub const CSRF_COOKIE: &str = "ccsrftoken";

/// Header the token is echoed back in.
pub const CSRF_HEADER: &str = "X-CSRFTOKEN";

/// An authenticated session with one device.
///
/// Owns its own HTTP client and cookie jar, so nothing is shared between
/// devices or captures.
pub struct Session {
    client: Client,
    base_url: String,
    csrf_token: String,
}

impl Session {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("csrf_token", &"<redacted>")
            .finish()
    }
}

/// Talks to devices over their HTTPS management API.
#[derive(Debug, Clone, Default)]
pub struct HttpDeviceApi {
    options: ClientOptions,
}

impl HttpDeviceApi {
    pub fn new(options: ClientOptions) -> Self {
        if !options.verify_tls && options.use_tls {
            tracing::warn!("TLS certificate verification is disabled");
        }
        Self { options }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn base_url(&self, target: &DeviceTarget) -> String {
        format!("{}://{}", self.options.scheme(), target.authority())
    }

    fn build_client(&self) -> Result<Client> {
        Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(!self.options.verify_tls)
            .timeout(self.options.timeout)
            .connect_timeout(self.options.connect_timeout)
            .build()
            .map_err(|source| Error::ClientBuild { source })
    }
}

impl DeviceApi for HttpDeviceApi {
    type Session = Session;

    fn authenticate(&self, target: &DeviceTarget) -> Result<Session> {
        let client = self.build_client()?;
        let base_url = self.base_url(target);

        tracing::debug!(
            address = %target.address,
            port = target.port,
            username = %target.credentials.username(),
            "Logging in"
        );

        let response = client
            .post(format!("{base_url}{LOGIN_PATH}"))
            .form(&[
                ("username", target.credentials.username()),
                ("secretkey", target.credentials.secret()),
            ])
            .send()
            .map_err(|source| Error::LoginTransport { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::LoginRejected {
                status: status.as_u16(),
            });
        }

        // The device quotes the cookie value; the header wants it bare.
        let csrf_token = response
            .cookies()
            .find(|cookie| cookie.name() == CSRF_COOKIE)
            .map(|cookie| cookie.value().trim_matches('"').to_string())
            .filter(|token| !token.is_empty())
            .ok_or(Error::MissingToken {
                cookie: CSRF_COOKIE,
            })?;

        tracing::debug!(address = %target.address, "Session established");

        Ok(Session {
            client,
            base_url,
            csrf_token,
        })
    }

    fn fetch_config(&self, session: &Session, target: &DeviceTarget) -> Result<ConfigSnapshot> {
        let response = session
            .client
            .get(session.url(CONFIG_BACKUP_PATH))
            .header(CSRF_HEADER, &session.csrf_token)
            .send()
            .map_err(|source| Error::FetchTransport { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|source| Error::FetchTransport { source })?;

        tracing::debug!(address = %target.address, bytes = body.len(), "Downloaded configuration");

        Ok(ConfigSnapshot::from(body.to_vec()))
    }

    fn logout(&self, session: Session, target: &DeviceTarget) -> Result<()> {
        let response = session
            .client
            .post(session.url(LOGOUT_PATH))
            .header(CSRF_HEADER, &session.csrf_token)
            .send()
            .map_err(|source| Error::LogoutTransport { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::LogoutStatus {
                status: status.as_u16(),
            });
        }

        tracing::debug!(address = %target.address, "Logged out");
        Ok(())
    }
}
