//! Eureka wire types.
//!
//! Eureka's JSON codec renders XML-ish attribute names (`$`, `@enabled`,
//! `@class`) and collapses single-element lists into a bare object, so both
//! shapes are accepted on the way in.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::RegistryConfig;

/// Data center class expected by Eureka for instances outside AWS
pub const DEFAULT_DATA_CENTER_CLASS: &str =
    "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo";

/// Data center name for self-hosted instances
pub const DEFAULT_DATA_CENTER_NAME: &str = "MyOwn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    #[serde(rename = "$")]
    pub port: u16,

    #[serde(rename = "@enabled", deserialize_with = "flexible_bool", default = "enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCenterInfo {
    #[serde(rename = "@class")]
    pub class: String,
    pub name: String,
}

impl Default for DataCenterInfo {
    fn default() -> Self {
        Self {
            class: DEFAULT_DATA_CENTER_CLASS.to_string(),
            name: DEFAULT_DATA_CENTER_NAME.to_string(),
        }
    }
}

/// One registered service instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub instance_id: String,
    pub host_name: String,
    pub app: String,
    pub ip_addr: String,
    #[serde(default = "status_up")]
    pub status: String,
    pub port: PortInfo,
    #[serde(default)]
    pub vip_address: String,
    #[serde(default)]
    pub home_page_url: String,
    #[serde(default)]
    pub status_page_url: String,
    #[serde(default)]
    pub health_check_url: String,
    #[serde(default)]
    pub data_center_info: DataCenterInfo,
}

impl InstanceInfo {
    /// Describe this process from its registry settings
    pub fn from_config(config: &RegistryConfig) -> Self {
        let app = config.app_name.to_uppercase();
        let app_lower = config.app_name.to_lowercase();
        let home_page_url = format!("http://{}:{}", config.host_name, config.host_port);
        let health_url = format!("{}{}", home_page_url, config.health_path);

        Self {
            instance_id: format!("{}:{}:{}", config.host_name, app_lower, config.host_port),
            host_name: config.host_name.clone(),
            vip_address: app.clone(),
            app,
            ip_addr: config.ip_addr.clone(),
            status: status_up(),
            port: PortInfo { port: config.host_port, enabled: true },
            home_page_url,
            status_page_url: health_url.clone(),
            health_check_url: health_url,
            data_center_info: DataCenterInfo::default(),
        }
    }
}

/// Registration body: `{ "instance": { ... } }`
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRequest<'a> {
    pub instance: &'a InstanceInfo,
}

/// `GET /apps` response
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationsResponse {
    pub applications: Applications,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Applications {
    #[serde(default, deserialize_with = "one_or_many")]
    pub application: Vec<Application>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    pub name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub instance: Vec<InstanceInfo>,
}

fn status_up() -> String {
    "UP".to_string()
}

fn enabled() -> bool {
    true
}

fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        Bool(bool),
        Text(String),
    }

    match Flexible::deserialize(deserializer)? {
        Flexible::Bool(value) => Ok(value),
        Flexible::Text(text) => Ok(text.eq_ignore_ascii_case("true")),
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}
