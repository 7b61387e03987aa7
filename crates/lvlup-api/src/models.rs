//! Request and response bodies of the lvlup API.
//!
//! Only the shapes documented by lvlup are typed. Items of lists whose
//! structure is owned by the remote service stay [`serde_json::Value`].

use lvlup_core::{PortRange, Protocol, UpTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Currently logged in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u64>,
    /// Email address assigned to the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wallet balance used to buy or extend services.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    /// Balance in grosze.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_pln_int: Option<i64>,
    /// Formatted balance, e.g. `13.37`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_pln_formatted: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a paginated list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T = Value> {
    /// Total number of items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Items of this page.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<T>>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Services (VPS, domains) of the logged in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceList {
    /// Service entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Value>>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Promo codes assigned to the logged in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PromoCodes {
    /// Promo code entries, including payout estimates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codes: Option<Vec<Value>>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Freshly generated promo code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPromoCode {
    /// The code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a wallet top-up link request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Amount such as `13.37`.
    pub amount: String,
    /// Redirect after payment; empty disables it.
    pub redirect_url: String,
    /// Webhook receiving a POST when the payment is done; empty disables it.
    pub webhook_url: String,
}

/// Wallet top-up link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentLink {
    /// Link to the payment page, valid for up to 7 days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Payment ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Status of a wallet top-up.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    /// Whether the payment is done and credited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payed: Option<bool>,
    /// Amount as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_str: Option<String>,
    /// Amount in grosze.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_int: Option<i64>,
    /// Amount paid including channel fees, as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_with_fee_str: Option<String>,
    /// Amount paid including channel fees, in grosze.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_with_fee_int: Option<i64>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// UDP filtering status of a VPS.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilteringStatus {
    /// Whether filtering is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtering_enabled: Option<bool>,
    /// Provider-side state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body toggling UDP filtering.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilteringSwitchRequest {
    /// Desired filtering state.
    pub filtering_enabled: bool,
}

/// Body adding a UDP whitelist rule.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WhitelistRuleRequest {
    /// Port range let through.
    pub ports: PortRange,
    /// Protocol of the traffic.
    pub protocol: Protocol,
}

/// Generated Proxmox panel credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProxmoxAccount {
    /// Panel URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// VPS state as reported by Proxmox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VpsState {
    /// VM state, e.g. `running`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Uptime in seconds.
    #[serde(default)]
    pub vm_uptime_s: u64,
    /// Uptime split into days, hours, minutes and seconds.
    #[serde(default)]
    pub up_time: UpTime,
    /// Remaining statistics fields.
    #[serde(flatten)]
    pub stats: Map<String, Value>,
}

impl VpsState {
    /// Recompute [`VpsState::up_time`] from [`VpsState::vm_uptime_s`].
    #[must_use]
    pub fn with_decomposed_uptime(mut self) -> Self {
        self.up_time = UpTime::from_seconds(self.vm_uptime_s);
        self
    }
}

/// Body of a performance report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PerformanceReport {
    /// Short description, e.g. `23% drop (37/164)`.
    pub description: String,
}

/// Temporary sandbox account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SandboxAccount {
    /// Account ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Generated email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// API key of the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payment_request_uses_camel_case() {
        let body = CreatePaymentRequest {
            amount: "13.37".into(),
            redirect_url: String::new(),
            webhook_url: "https://shop.example/hook".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "amount": "13.37",
                "redirectUrl": "",
                "webhookUrl": "https://shop.example/hook"
            })
        );
    }

    #[test]
    fn whitelist_request_serializes_ports_and_protocol() {
        let body = WhitelistRuleRequest {
            ports: PortRange::new(27015, 27020).unwrap(),
            protocol: Protocol::Hl2Source,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"ports": {"from": 27015, "to": 27020}, "protocol": "hl2Source"})
        );
    }

    #[test]
    fn vps_state_keeps_unknown_stats() {
        let state: VpsState = serde_json::from_value(json!({
            "status": "running",
            "vmUptimeS": 3_661,
            "cpuUsage": 0.12
        }))
        .unwrap();
        let state = state.with_decomposed_uptime();

        assert_eq!(state.up_time.hours, 1);
        assert_eq!(state.up_time.minutes, 1);
        assert_eq!(state.up_time.seconds, 1);
        assert_eq!(state.stats.get("cpuUsage"), Some(&json!(0.12)));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["upTime"]["days"], 0);
        assert_eq!(json["cpuUsage"], 0.12);
    }

    #[test]
    fn filtering_switch_body() {
        let body = FilteringSwitchRequest {
            filtering_enabled: false,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"filteringEnabled": false})
        );
    }
}
