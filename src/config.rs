//! Typed configuration surface (spec.md §6's file formats, SPEC_FULL.md §6's config file
//! shape), deserialized from YAML behind the `ser` feature. `Config::from_reader`/
//! `from_path` are pure loaders; no CLI parsing lives here — the CLI is a documented
//! contract the (out-of-scope) host binary owns.

use std::io::Read;
use std::path::Path;

use crate::dmr::site_data::SiteModel;
use crate::error::{Error, Result};

/// Per-standard site identity, grouping the three protocol families' `SiteData`
/// constructor parameters the way the teacher's config examples group related settings
/// under one top-level key per subsystem.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct SiteConfig {
    pub dmr: DmrSiteConfig,
    pub p25: P25SiteConfig,
    pub nxdn: NxdnSiteConfig,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct DmrSiteConfig {
    pub site_model: DmrSiteModel,
    pub net_id: u16,
    pub site_id: u16,
    pub par_id: u8,
    pub require_reg: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
#[cfg_attr(feature = "ser", serde(rename_all = "lowercase"))]
pub enum DmrSiteModel {
    Tiny,
    Small,
    Large,
    Huge,
}

impl From<DmrSiteModel> for SiteModel {
    fn from(m: DmrSiteModel) -> SiteModel {
        match m {
            DmrSiteModel::Tiny => SiteModel::Tiny,
            DmrSiteModel::Small => SiteModel::Small,
            DmrSiteModel::Large => SiteModel::Large,
            DmrSiteModel::Huge => SiteModel::Huge,
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct P25SiteConfig {
    pub net_id: u32,
    pub sys_id: u32,
    pub rfss_id: u8,
    pub site_id: u8,
    pub require_reg: bool,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct NxdnSiteConfig {
    pub loc_id: u32,
    pub channel_id: u8,
    pub channel_no: u32,
    pub require_reg: bool,
}

/// File path and reload cadence for one reloadable lookup table.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct LookupPathConfig {
    pub path: String,
    pub reload_minutes: u32,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct LookupsConfig {
    pub rid_acl: LookupPathConfig,
    pub tg_acl: LookupPathConfig,
    pub iden_table: LookupPathConfig,
    pub rssi: LookupPathConfig,
}

/// One FNE peer's login credentials.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct PeerConfig {
    pub id: u32,
    pub address: String,
    pub password: String,
}

/// TLS material for a secure peer connection; only meaningful with the `tls` feature.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct TlsConfig {
    pub ca_cert_path: String,
    pub client_cert_path: Option<String>,
    pub client_key_path: Option<String>,
    pub server_name: String,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct NetworkConfig {
    pub bind_addr: String,
    pub peers: Vec<PeerConfig>,
    pub tls: Option<TlsConfig>,
}

/// `None` selects [`crate::modem::NullModem`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
#[cfg_attr(feature = "ser", serde(default))]
pub struct ModemConfig {
    pub port: Option<String>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
pub struct Config {
    pub site: SiteConfig,
    pub lookups: LookupsConfig,
    pub network: NetworkConfig,
    #[cfg_attr(feature = "ser", serde(default))]
    pub modem: ModemConfig,
}

impl Config {
    #[cfg(feature = "ser")]
    pub fn from_reader<R: Read>(reader: R) -> Result<Config> {
        serde_yaml::from_reader(reader).map_err(|e| Error::ConfigInvalid(format!("failed to parse config: {e}")))
    }

    #[cfg(not(feature = "ser"))]
    pub fn from_reader<R: Read>(_reader: R) -> Result<Config> {
        Err(Error::ConfigInvalid("config parsing requires the `ser` feature".into()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Config> {
        let file = std::fs::File::open(path)?;
        Config::from_reader(file)
    }
}

#[cfg(all(test, feature = "ser"))]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
site:
  dmr:
    site_model: large
    net_id: 1
    site_id: 2
    par_id: 1
    require_reg: false
  p25:
    net_id: 1
    sys_id: 1
    rfss_id: 1
    site_id: 1
    require_reg: false
  nxdn:
    loc_id: 1
    channel_id: 1
    channel_no: 1
    require_reg: false
lookups:
  rid_acl: {path: rid_acl.dat, reload_minutes: 30}
  tg_acl: {path: tg_acl.yml, reload_minutes: 30}
  iden_table: {path: iden_table.dat, reload_minutes: 0}
  rssi: {path: rssi.dat, reload_minutes: 0}
network:
  bind_addr: "0.0.0.0:62031"
  peers:
    - id: 1
      address: "127.0.0.1:62032"
      password: "secret"
"#;

    #[test]
    fn parses_full_config() {
        let config = Config::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(config.site.dmr.net_id, 1);
        assert_eq!(config.network.peers.len(), 1);
        assert!(config.network.tls.is_none());
        assert!(config.modem.port.is_none());
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(Config::from_reader("not: [valid".as_bytes()).is_err());
    }
}
