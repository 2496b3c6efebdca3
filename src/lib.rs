//! OpenID Connect provider client factory: discovery, TLS-aware transports with round-trip
//! logging, PKCE capability negotiation, and OAuth 2.0 configuration in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod clock;
pub mod config;
pub mod discovery;
pub mod error;
pub mod factory;
pub mod http;
pub mod logger;
pub mod oauth;
pub mod obs;
pub mod pkce;
pub mod tls;
pub mod transport;

pub use client::Client;
pub use config::{ProviderConfig, ProviderConfigBuilder};
pub use error::{Error, Result};
pub use factory::{ClientFactory, Factory};

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::Result;
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
