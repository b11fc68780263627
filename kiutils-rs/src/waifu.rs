//! Random images from the waifu.pics API.

use crate::error::{KiutilsError, Result};
use crate::REQWEST_CLIENT;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_WAIFU_API: &str = "https://api.waifu.pics";

macro_rules! category_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = KiutilsError;

            fn from_str(s: &str) -> Result<Self> {
                let lower = s.to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|c| c.as_str() == lower)
                    .ok_or_else(|| {
                        KiutilsError::InvalidArgument(format!(
                            "unknown {} category: {s}",
                            stringify!($name)
                        ))
                    })
            }
        }
    };
}

category_enum! {
    /// Safe-for-work categories.
    SfwCategory {
        Waifu => "waifu",
        Neko => "neko",
        Shinobu => "shinobu",
        Megumin => "megumin",
        Bully => "bully",
        Cuddle => "cuddle",
        Cry => "cry",
        Hug => "hug",
        Awoo => "awoo",
        Kiss => "kiss",
        Lick => "lick",
        Pat => "pat",
        Smug => "smug",
        Bonk => "bonk",
        Yeet => "yeet",
        Blush => "blush",
        Smile => "smile",
        Wave => "wave",
        Highfive => "highfive",
        Handhold => "handhold",
        Nom => "nom",
        Bite => "bite",
        Glomp => "glomp",
        Slap => "slap",
        Kill => "kill",
        Kick => "kick",
        Happy => "happy",
        Wink => "wink",
        Poke => "poke",
        Dance => "dance",
        Cringe => "cringe",
    }
}

category_enum! {
    /// Not-safe-for-work categories.
    NsfwCategory {
        Waifu => "waifu",
        Neko => "neko",
        Trap => "trap",
        Blowjob => "blowjob",
    }
}

/// Content rating used by [`WaifuClient::random`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaifuKind {
    #[default]
    Sfw,
    Nsfw,
}

impl WaifuKind {
    fn as_str(self) -> &'static str {
        match self {
            WaifuKind::Sfw => "sfw",
            WaifuKind::Nsfw => "nsfw",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageReply {
    url: String,
}

/// Client for the waifu.pics API.
#[derive(Debug, Clone)]
pub struct WaifuClient {
    client: Client,
    base_url: String,
}

impl Default for WaifuClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WaifuClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_WAIFU_API)
    }

    /// Client talking to another deployment of the API.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: REQWEST_CLIENT.clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of a random image from a safe-for-work category.
    pub async fn sfw(&self, category: SfwCategory) -> Result<String> {
        self.fetch_url(&format!("sfw/{category}")).await
    }

    /// URL of a random image from a not-safe-for-work category.
    pub async fn nsfw(&self, category: NsfwCategory) -> Result<String> {
        self.fetch_url(&format!("nsfw/{category}")).await
    }

    /// URL of a random image from the `waifu` category.
    pub async fn random(&self, kind: WaifuKind) -> Result<String> {
        self.fetch_url(&format!("{}/waifu", kind.as_str())).await
    }

    async fn fetch_url(&self, path: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {url}");
        let reply: ImageReply = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!("waifu.pics returned {}", reply.url);
        Ok(reply.url)
    }
}
