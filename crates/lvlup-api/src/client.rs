//! Asynchronous lvlup client implementation.

use crate::models::{
    CreatePaymentRequest, FilteringStatus, FilteringSwitchRequest, NewPromoCode, Page,
    PaymentInfo, PaymentLink, PerformanceReport, PromoCodes, ProxmoxAccount, SandboxAccount,
    ServiceList, UserInfo, VpsState, WalletBalance, WhitelistRuleRequest,
};
use crate::Result;
use lvlup_core::client::ClientConfig;
use lvlup_core::validation::{validate_amount, validate_description, validate_string, validate_url};
use lvlup_core::{
    ApiResponse, Envelope, Environment, Error, LvlupConfig, Pagination, PortRange, Protocol,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

const SANDBOX_ONLY: &str = "This method works only on sandbox API";
const DONE: &str = "Done!";

/// Whether a request carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Bearer,
    Anonymous,
}

/// Builder for [`LvlupClient`].
#[derive(Debug, Clone)]
pub struct LvlupClientBuilder {
    config: LvlupConfig,
    http_config: ClientConfig,
}

impl LvlupClientBuilder {
    /// Create a builder from a [`LvlupConfig`].
    #[must_use]
    pub fn new(config: LvlupConfig) -> Self {
        Self {
            config,
            http_config: ClientConfig::new(),
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<LvlupClient> {
        let base_url = self.config.parse_base_url()?;
        let environment = self.config.environment();

        let mut builder = ClientBuilder::new()
            .user_agent(self.http_config.user_agent.as_str())
            .connect_timeout(self.http_config.connect_timeout);

        if let Some(timeout) = self.config.timeout().or(self.http_config.timeout) {
            builder = builder.timeout(timeout);
        }
        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build lvlup HTTP client: {err}"))
        })?;

        if environment.is_sandbox() {
            warn!(base_url = %base_url, "lvlup client running in sandbox environment");
        }

        Ok(LvlupClient {
            http,
            base_url,
            api_key: self.config.api_key().clone(),
            environment,
        })
    }
}

/// Asynchronous client for the lvlup.pro API.
///
/// Every method validates its arguments locally and issues at most one
/// request. Only status 200 counts as success.
#[derive(Clone)]
pub struct LvlupClient {
    http: Client,
    base_url: Url,
    api_key: SecretString,
    environment: Environment,
}

impl LvlupClient {
    /// Create a client for the given API key and environment.
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Result<Self> {
        Self::from_config(&LvlupConfig::new(api_key, environment)?)
    }

    /// Construct a client directly from the configuration.
    pub fn from_config(config: &LvlupConfig) -> Result<Self> {
        LvlupClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: LvlupConfig) -> LvlupClientBuilder {
        LvlupClientBuilder::new(config)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the environment the client was built for.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    // Account

    /// Show the currently logged in user.
    pub async fn user(&self) -> Result<ApiResponse<UserInfo>> {
        self.get_json(&["v4", "me"], Access::Bearer, None).await
    }

    /// Show the wallet balance used to buy or extend services.
    pub async fn user_wallet_balance(&self) -> Result<ApiResponse<WalletBalance>> {
        self.get_json(&["v4", "wallet"], Access::Bearer, None).await
    }

    /// Important account actions: logins, logouts and failed attempts.
    pub async fn user_audit_logs(&self) -> Result<ApiResponse<Page>> {
        self.get_json(&["v4", "me", "log"], Access::Bearer, None).await
    }

    /// Promo codes of the user, with payout estimates.
    pub async fn user_promo_codes(&self) -> Result<ApiResponse<PromoCodes>> {
        self.get_json(&["v4", "me", "referral"], Access::Bearer, None).await
    }

    /// Create a new generic, random promo code.
    ///
    /// A 403 means the user already owns a promo code.
    pub async fn user_create_promo_code(&self) -> Result<ApiResponse<NewPromoCode>> {
        let response: ApiResponse<NewPromoCode> = self
            .send_json::<(), _>(
                Method::POST,
                &["v4", "me", "referral", "generic"],
                Access::Bearer,
                None,
            )
            .await
            .map_err(|err| {
                err.with_status_hint(
                    StatusCode::FORBIDDEN,
                    "You have at least one promo code already!",
                )
            })?;

        match response.data.code.clone() {
            Some(code) => Ok(response.with_info(format!("New promo code generated: {code}"))),
            None => Ok(response),
        }
    }

    /// Paginated order list.
    pub async fn orders(&self, pagination: Option<Pagination>) -> Result<ApiResponse<Page>> {
        self.get_json(&["v4", "orders"], Access::Bearer, pagination)
            .await
    }

    /// Paginated payments and fees list.
    pub async fn payments(&self, pagination: Option<Pagination>) -> Result<ApiResponse<Page>> {
        self.get_json(&["v4", "payments"], Access::Bearer, pagination)
            .await
    }

    /// VPS and domains of the user.
    pub async fn services(&self) -> Result<ApiResponse<ServiceList>> {
        self.get_json(&["v4", "services"], Access::Bearer, None).await
    }

    /// Check whether an IPv4 address is hosted by lvlup.pro (partners only).
    pub async fn partner_ip(&self, ip: &str) -> Result<ApiResponse<Value>> {
        let ip = validate_string("ip", ip)?;
        self.get_json(&["v4", "partner", "ip", ip.as_str()], Access::Bearer, None)
            .await
    }

    // Payments

    /// Create a wallet top-up link valid for up to 7 days.
    ///
    /// `amount` needs two decimal places (`"13.37"`). Empty or absent URLs
    /// disable the redirect or webhook.
    pub async fn create_payment(
        &self,
        amount: &str,
        redirect_url: Option<&str>,
        webhook_url: Option<&str>,
    ) -> Result<ApiResponse<PaymentLink>> {
        let body = CreatePaymentRequest {
            amount: validate_amount(amount)?,
            redirect_url: optional_url("redirectUrl", redirect_url)?,
            webhook_url: optional_url("webhookUrl", webhook_url)?,
        };

        self.send_json(Method::POST, &["v4", "wallet", "up"], Access::Bearer, Some(&body))
            .await
    }

    /// Check whether a payment is done. Verify here even after a webhook.
    pub async fn payment_info(&self, payment_id: &str) -> Result<ApiResponse<PaymentInfo>> {
        let payment_id = validate_string("paymentId", payment_id)?;
        self.get_json(&["v4", "wallet", "up", payment_id.as_str()], Access::Bearer, None)
            .await
    }

    // VPS

    /// Paginated list of DDoS attacks on a VPS.
    pub async fn vps_attacks(
        &self,
        vps_id: &str,
        pagination: Option<Pagination>,
    ) -> Result<ApiResponse<Page>> {
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["attacks"]);
        self.get_json(&route, Access::Bearer, pagination).await
    }

    /// UDP filtering status of a VPS.
    pub async fn vps_udp_filter(&self, vps_id: &str) -> Result<ApiResponse<FilteringStatus>> {
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["filtering"]);
        self.get_json(&route, Access::Bearer, None).await
    }

    /// Switch UDP filtering on or off.
    ///
    /// A 400 usually means filtering is already in the requested state.
    pub async fn vps_udp_filter_switch(
        &self,
        vps_id: &str,
        enabled: bool,
    ) -> Result<ApiResponse<()>> {
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["filtering"]);
        let body = FilteringSwitchRequest {
            filtering_enabled: enabled,
        };
        let state = if enabled { "on" } else { "off" };

        let response = self
            .send_empty(Method::PUT, &route, Access::Bearer, Some(&body))
            .await
            .map_err(|err| {
                err.with_status_hint(
                    StatusCode::BAD_REQUEST,
                    format!("It's probably already turned {state}!"),
                )
            })?;
        Ok(response.with_info(DONE))
    }

    /// Rules (exceptions) of the UDP filtering whitelist.
    pub async fn vps_udp_filter_whitelist(&self, vps_id: &str) -> Result<ApiResponse<Vec<Value>>> {
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["filtering", "whitelist"]);
        self.get_json(&route, Access::Bearer, None).await
    }

    /// Add a rule to the UDP filtering whitelist.
    pub async fn vps_udp_filter_whitelist_add(
        &self,
        vps_id: &str,
        ports: PortRange,
        protocol: Protocol,
    ) -> Result<ApiResponse<Value>> {
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["filtering", "whitelist"]);
        let body = WhitelistRuleRequest {
            ports: PortRange::new(ports.from, ports.to)?,
            protocol,
        };
        self.send_json(Method::POST, &route, Access::Bearer, Some(&body))
            .await
    }

    /// Remove a rule from the UDP filtering whitelist.
    pub async fn vps_udp_filter_whitelist_delete(
        &self,
        vps_id: &str,
        rule_id: &str,
    ) -> Result<ApiResponse<Value>> {
        let rule_id = validate_string("whitelistId", rule_id)?;
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["filtering", "whitelist", rule_id.as_str()]);

        let response = self
            .send_lenient::<()>(Method::DELETE, &route, Access::Bearer, None)
            .await?;
        Ok(response.with_info(DONE))
    }

    /// Generate Proxmox panel credentials for a VPS.
    pub async fn vps_generate_proxmox_account(
        &self,
        vps_id: &str,
    ) -> Result<ApiResponse<ProxmoxAccount>> {
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["proxmox"]);
        self.send_json::<(), _>(Method::POST, &route, Access::Bearer, None)
            .await
    }

    /// Current VPS state with uptime split into days, hours, minutes and seconds.
    pub async fn vps_state(&self, vps_id: &str) -> Result<ApiResponse<VpsState>> {
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["stats"]);
        let response: ApiResponse<VpsState> = self.get_json(&route, Access::Bearer, None).await?;
        Ok(response.map(VpsState::with_decomposed_uptime))
    }

    /// Start a VPS via Proxmox.
    pub async fn vps_start(&self, vps_id: &str) -> Result<ApiResponse<()>> {
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["start"]);
        self.send_empty::<()>(Method::POST, &route, Access::Bearer, None)
            .await
    }

    /// Stop a VPS via Proxmox.
    pub async fn vps_stop(&self, vps_id: &str) -> Result<ApiResponse<()>> {
        let vps_id = validate_string("vpsId", vps_id)?;
        let route = vps_route(&vps_id, &["stop"]);
        self.send_empty::<()>(Method::POST, &route, Access::Bearer, None)
            .await
    }

    // Unauthenticated

    /// Report bad performance of a game server.
    ///
    /// Needs no key but must be called from an IP of an lvlup.pro VPS.
    pub async fn report_performance(&self, description: &str) -> Result<ApiResponse<Value>> {
        let body = PerformanceReport {
            description: validate_description(description)?,
        };

        self.send_json(
            Method::POST,
            &["v4", "report", "performance"],
            Access::Anonymous,
            Some(&body),
        )
        .await
        .map_err(|err| {
            err.with_status_hint(
                StatusCode::UNAUTHORIZED,
                "This endpoint doesn't need auth but must be called from IP which belongs to VPS in lvlup.pro!",
            )
        })
    }

    /// Grafana data source health check.
    pub async fn grafana_ping(&self) -> Result<ApiResponse<Value>> {
        self.send_lenient::<()>(Method::GET, &["grafana"], Access::Anonymous, None)
            .await
    }

    /// Fetch metrics data for Grafana (table or time series).
    ///
    /// The body is passed through unchecked apart from rejecting `null`.
    pub async fn grafana_query(&self, body: &Value) -> Result<ApiResponse<Value>> {
        let body = non_null_body(body)?;
        self.send_json(Method::POST, &["grafana", "query"], Access::Anonymous, Some(body))
            .await
    }

    /// List available Grafana metrics. The `target` field is currently ignored by the API.
    pub async fn grafana_search(&self, body: &Value) -> Result<ApiResponse<Value>> {
        let body = non_null_body(body)?;
        self.send_json(Method::POST, &["grafana", "search"], Access::Anonymous, Some(body))
            .await
    }

    // Sandbox

    /// Create a temporary sandbox account, removed automatically after 30 days.
    pub async fn sandbox_create_account(&self) -> Result<ApiResponse<SandboxAccount>> {
        self.require_sandbox()?;
        self.send_json::<(), _>(
            Method::POST,
            &["v4", "sandbox", "account", "new"],
            Access::Anonymous,
            None,
        )
        .await
    }

    /// Emulate a successful wallet payment, e.g. to test webhooks.
    pub async fn sandbox_accept_payment(&self, payment_id: &str) -> Result<ApiResponse<Value>> {
        self.require_sandbox()?;
        let payment_id = validate_string("paymentId", payment_id)?;
        let route = ["v4", "sandbox", "wallet", "up", payment_id.as_str(), "ok"];
        self.send_json::<(), _>(Method::POST, &route, Access::Bearer, None)
            .await
    }

    fn require_sandbox(&self) -> Result<()> {
        if self.environment.is_sandbox() {
            Ok(())
        } else {
            debug!(environment = %self.environment, "sandbox-only method called");
            Err(Error::SandboxOnly(SANDBOX_ONLY.to_string()))
        }
    }

    /// Append `route` to the base URL, percent-encoding each segment.
    fn build_url(&self, route: &[&str], pagination: Option<Pagination>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidEndpoint(format!("Base URL `{}` cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(route);

        if let Some(pagination) = pagination {
            let (key, value) = pagination.to_pair();
            url.query_pairs_mut().append_pair(key, &value);
        }
        Ok(url)
    }

    /// Send one request; any status other than 200 becomes [`Error::Status`].
    async fn dispatch<B>(
        &self,
        method: Method,
        route: &[&str],
        access: Access,
        pagination: Option<Pagination>,
        body: Option<&B>,
    ) -> Result<(Envelope, Response)>
    where
        B: Serialize + ?Sized,
    {
        let url = self.build_url(route, pagination)?;
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json");

        if access == Access::Bearer {
            request = request.bearer_auth(self.api_key.expose_secret());
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }

        info!(%method, path = url.path(), ?access, "Sending lvlup request");

        let response = request.send().await?;
        let envelope = Envelope::new(response.status(), url.as_str());
        debug!(status = envelope.status_code, path = url.path(), "lvlup response");

        if !envelope.is_ok() {
            return Err(Error::Status {
                envelope,
                info: None,
            });
        }
        Ok((envelope, response))
    }

    async fn get_json<R>(
        &self,
        route: &[&str],
        access: Access,
        pagination: Option<Pagination>,
    ) -> Result<ApiResponse<R>>
    where
        R: DeserializeOwned,
    {
        let (envelope, response) = self
            .dispatch::<()>(Method::GET, route, access, pagination, None)
            .await?;
        decode(envelope, response).await
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        route: &[&str],
        access: Access,
        body: Option<&B>,
    ) -> Result<ApiResponse<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let (envelope, response) = self.dispatch(method, route, access, None, body).await?;
        decode(envelope, response).await
    }

    /// Like [`Self::send_json`] but never reads the body.
    async fn send_empty<B>(
        &self,
        method: Method,
        route: &[&str],
        access: Access,
        body: Option<&B>,
    ) -> Result<ApiResponse<()>>
    where
        B: Serialize + ?Sized,
    {
        let (envelope, _) = self.dispatch(method, route, access, None, body).await?;
        Ok(ApiResponse::new((), envelope))
    }

    /// Like [`Self::send_json`] but accepts an empty (`null`) or plain-text body.
    async fn send_lenient<B>(
        &self,
        method: Method,
        route: &[&str],
        access: Access,
        body: Option<&B>,
    ) -> Result<ApiResponse<Value>>
    where
        B: Serialize + ?Sized,
    {
        let (envelope, response) = self.dispatch(method, route, access, None, body).await?;
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return Err(invalid_body(envelope, &err)),
        };

        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(ApiResponse::new(value, envelope))
    }
}

async fn decode<R>(envelope: Envelope, response: Response) -> Result<ApiResponse<R>>
where
    R: DeserializeOwned,
{
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => return Err(invalid_body(envelope, &err)),
    };

    match serde_json::from_slice::<R>(&bytes) {
        Ok(data) => Ok(ApiResponse::new(data, envelope)),
        Err(err) => Err(invalid_body(envelope, &err)),
    }
}

fn invalid_body(envelope: Envelope, err: &dyn std::fmt::Display) -> Error {
    debug!(source = %envelope.source, %err, "undecodable lvlup response body");
    Error::InvalidBody {
        envelope,
        message: err.to_string(),
    }
}

fn vps_route<'a>(vps_id: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
    let mut route = vec!["v4", "services", "vps", vps_id];
    route.extend_from_slice(rest);
    route
}

fn optional_url(field: &str, value: Option<&str>) -> Result<String> {
    match value {
        None | Some("") => Ok(String::new()),
        Some(url) => validate_url(field, url),
    }
}

fn non_null_body(body: &Value) -> Result<&Value> {
    if body.is_null() {
        debug!("rejected empty grafana body");
        return Err(Error::InvalidArgument("No body!".to_string()));
    }
    Ok(body)
}
