//! Asynchronous client for the lvlup.pro API.
//!
//! Covers the account, wallet, VPS management, Grafana metrics and sandbox
//! endpoints. Every call returns the decoded body together with its status
//! envelope, or an [`lvlup_core::Error`] that carries the envelope of a
//! failed request.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{LvlupClient, LvlupClientBuilder};
pub use lvlup_core::{
    ApiResponse, Envelope, Environment, Error, LvlupConfig, Pagination, PortRange, Protocol,
    UpTime,
};
pub use models::{
    CreatePaymentRequest, FilteringStatus, NewPromoCode, Page, PaymentInfo, PaymentLink,
    PromoCodes, ProxmoxAccount, SandboxAccount, ServiceList, UserInfo, VpsState, WalletBalance,
};

/// Convenient result alias that reuses the shared lvlup error type.
pub type Result<T> = lvlup_core::Result<T>;
