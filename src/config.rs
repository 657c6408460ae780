//! Startup configuration read from the hosting page.
//!
//! The page renders one container element and tags it with the playground id
//! (`<div id="container" data-playgroundid="...">`). Everything else has a
//! default and can be overridden with further `data-*` attributes on the same
//! element. The attributes are read once, at startup.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use layers::consts::RESIZE_DEBOUNCE_MS;

/// Id of the element that holds every layer canvas.
pub const DEFAULT_CONTAINER_ID: &str = "container";
/// Attribute carrying the playground (session) id. Required.
pub const PLAYGROUND_ID_ATTR: &str = "data-playgroundid";
/// Optional override of the resize quiet period, in milliseconds.
pub const RESIZE_DEBOUNCE_ATTR: &str = "data-resize-debounce-ms";
/// Optional `log` level filter (`error`, `warn`, `info`, `debug`, `trace`).
pub const LOG_LEVEL_ATTR: &str = "data-log-level";

/// Startup configuration failures. All of them mean the page is broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no browser window or document available")]
    NoDocument,
    #[error("no #{0} element in page")]
    MissingContainer(String),
    #[error("missing or empty data-playgroundid attribute on the container")]
    MissingPlaygroundId,
    #[error("invalid {attr} value {value:?}")]
    InvalidValue { attr: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub container_id: String,
    pub playground_id: String,
    pub resize_debounce_ms: u32,
    pub log_level: log::Level,
}

impl RendererConfig {
    /// Build a config from the container's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingPlaygroundId`] when the id is absent or
    /// blank, and [`ConfigError::InvalidValue`] for unparseable overrides.
    pub fn from_attributes(
        container_id: &str,
        attribute: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let playground_id = attribute(PLAYGROUND_ID_ATTR)
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingPlaygroundId)?;

        Ok(Self {
            container_id: container_id.to_owned(),
            playground_id,
            resize_debounce_ms: parse_or(&attribute, RESIZE_DEBOUNCE_ATTR, RESIZE_DEBOUNCE_MS)?,
            log_level: parse_or(&attribute, LOG_LEVEL_ATTR, log::Level::Info)?,
        })
    }

    /// Read the config from the live page.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingContainer`] when the container element is
    /// not in the document, plus everything [`Self::from_attributes`] returns.
    pub fn from_page(container_id: &str) -> Result<Self, ConfigError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(ConfigError::NoDocument)?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| ConfigError::MissingContainer(container_id.to_owned()))?;
        Self::from_attributes(container_id, |name| container.get_attribute(name))
    }
}

fn parse_or<T: FromStr>(
    attribute: &impl Fn(&str) -> Option<String>,
    attr: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match attribute(attr) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { attr, value: raw }),
    }
}
