use serde::Serialize;

use crate::error::{EnvSyncError, Result};

/// Chain a test run targets. Resolved once from runner labels, immutable for
/// the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Gnosis,
    Prater,
    /// No label matched. Not an error: network-scoped steps become no-ops.
    #[default]
    Undefined,
}

impl Network {
    /// Precedence order for label resolution. When labels name several
    /// networks, the earliest entry here wins.
    const MATCH_ORDER: [Network; 3] = [Network::Mainnet, Network::Gnosis, Network::Prater];

    /// Derive the target network from runner labels.
    ///
    /// `None` means the label source itself is absent, which is a
    /// configuration error. An empty or non-matching label set resolves to
    /// `Undefined`.
    pub fn resolve(labels: Option<&[String]>) -> Result<Network> {
        let labels = labels.ok_or_else(|| {
            EnvSyncError::Config(
                "runner labels not provided, cannot derive target network".to_string(),
            )
        })?;

        for candidate in Self::MATCH_ORDER {
            if labels
                .iter()
                .any(|label| label.trim().eq_ignore_ascii_case(candidate.as_str()))
            {
                tracing::info!("[NetworkResolver] Resolved network: {}", candidate);
                return Ok(candidate);
            }
        }

        tracing::info!("[NetworkResolver] No network label matched, network is undefined");
        Ok(Network::Undefined)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Gnosis => "gnosis",
            Network::Prater => "prater",
            Network::Undefined => "undefined",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "gnosis" => Ok(Network::Gnosis),
            "prater" => Ok(Network::Prater),
            "undefined" => Ok(Network::Undefined),
            _ => Err(format!(
                "unknown network `{}`, expected one of `mainnet`, `gnosis`, `prater`, `undefined`",
                s
            )),
        }
    }
}
