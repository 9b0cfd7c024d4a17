use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Social network a scrape job or stored post belongs to.
/// The wire and storage form is the lowercase short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ig,
    Tk,
    X,
}

/// What a credential is used for. Only tk and x keep separate pools per purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Search,
    Posts,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Ig, Platform::Tk, Platform::X];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ig => "ig",
            Platform::Tk => "tk",
            Platform::X => "x",
        }
    }
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Search => "search",
            Purpose::Posts => "posts",
        }
    }
}

impl FromStr for Platform {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ig" => Ok(Platform::Ig),
            "tk" => Ok(Platform::Tk),
            "x" => Ok(Platform::X),
            other => Err(UnknownCode {
                kind: "platform",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for Purpose {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "search" => Ok(Purpose::Search),
            "posts" => Ok(Purpose::Posts),
            other => Err(UnknownCode {
                kind: "purpose",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
