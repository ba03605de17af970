//! Text payloads for the supported QR code kinds.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Contact card fields; empty strings are written as empty vCard lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub org: String,
    pub address: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WifiSecurity {
    #[default]
    Wpa,
    Wep,
    NoPass,
}

impl fmt::Display for WifiSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::NoPass => "nopass",
        })
    }
}

impl FromStr for WifiSecurity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wpa" | "wpa2" => Ok(WifiSecurity::Wpa),
            "wep" => Ok(WifiSecurity::Wep),
            "nopass" | "none" | "open" => Ok(WifiSecurity::NoPass),
            _ => Err(Error::UnknownOption {
                kind: "WiFi security type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WifiNetwork {
    pub ssid: String,
    pub password: String,
    pub security: WifiSecurity,
    pub hidden: bool,
}

/// What a single QR code encodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QrPayload {
    Url(String),
    Text(String),
    Contact(Contact),
    Wifi(WifiNetwork),
}

impl QrPayload {
    /// The text handed to the QR encoder.
    pub fn to_text(&self) -> Result<String> {
        match self {
            QrPayload::Url(url) => {
                if url.trim().is_empty() {
                    return Err(Error::EmptyPayload("please enter a URL"));
                }
                Ok(url.clone())
            }
            QrPayload::Text(text) => {
                if text.trim().is_empty() {
                    return Err(Error::EmptyPayload("please enter text"));
                }
                Ok(text.clone())
            }
            QrPayload::Contact(c) => {
                if c.name.is_empty() && c.phone.is_empty() && c.email.is_empty() {
                    return Err(Error::EmptyPayload(
                        "please enter at least contact name, phone, or email",
                    ));
                }
                Ok(format!(
                    "BEGIN:VCARD\nVERSION:3.0\nFN:{}\nORG:{}\nTEL:{}\nEMAIL:{}\nADR:{}\nEND:VCARD",
                    c.name, c.org, c.phone, c.email, c.address
                ))
            }
            QrPayload::Wifi(w) => {
                if w.ssid.is_empty() {
                    return Err(Error::EmptyPayload("please enter WiFi network name"));
                }
                Ok(format!(
                    "WIFI:T:{};S:{};P:{};H:{};;",
                    w.security, w.ssid, w.password, w.hidden
                ))
            }
        }
    }
}
