use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};

use crate::config::Config;
use crate::error::RankError;
use crate::models::{PlayerIdentifier, PlayerRank, RankInfo, Segment, TrackerResponse};

const PRODUCT: &str = "rocket-league";
const MODE: &str = "standard";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Playlist {
    Duel1v1,
    Doubles2v2,
    Standard3v3,
    Tournament,
}

impl Playlist {
    fn from_segment_name(name: &str) -> Option<Self> {
        match name {
            "Ranked Duel 1v1" => Some(Playlist::Duel1v1),
            "Ranked Doubles 2v2" => Some(Playlist::Doubles2v2),
            "Ranked Standard 3v3" => Some(Playlist::Standard3v3),
            "Tournament Matches" => Some(Playlist::Tournament),
            _ => None,
        }
    }

    fn slot<'a>(&self, rank: &'a mut PlayerRank) -> &'a mut Option<RankInfo> {
        match self {
            Playlist::Duel1v1 => &mut rank.duel_1v1,
            Playlist::Doubles2v2 => &mut rank.doubles_2v2,
            Playlist::Standard3v3 => &mut rank.standard_3v3,
            Playlist::Tournament => &mut rank.tournament,
        }
    }
}

/// Fetches Rocket League profiles from Tracker.gg and reduces them to
/// competitive ranks.
#[derive(Clone)]
pub struct RankService {
    client: Client,
    base_url: String,
}

impl RankService {
    pub fn new(config: &Config) -> Result<Self, RankError> {
        Self::with_base_url(&config.tracker_base_url, config.request_timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, RankError> {
        let client = Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()?;

        tracing::info!(base_url, "Using public Tracker.gg API (no API key)");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn profile_url(&self, identifier: &PlayerIdentifier) -> String {
        format!(
            "{}/{}/{}/profile/{}/{}",
            self.base_url, PRODUCT, MODE, identifier.platform, identifier.username
        )
    }

    pub async fn get_player_rank(&self, player_id: &str) -> Result<PlayerRank, RankError> {
        let identifier: PlayerIdentifier = player_id.parse()?;
        tracing::info!(
            username = %identifier.username,
            platform = %identifier.platform,
            "Looking up rank"
        );

        let profile = self.fetch_profile(&identifier).await?;
        tracing::debug!(
            handle = ?profile.data.platform_info.platform_user_handle,
            season = ?profile.data.metadata.current_season,
            segments = profile.data.segments.len(),
            "Profile received"
        );

        extract_rank(&profile, &identifier)
    }

    async fn fetch_profile(&self, identifier: &PlayerIdentifier) -> Result<TrackerResponse, RankError> {
        let url = self.profile_url(identifier);
        tracing::debug!(%url, "Sending request to Tracker.gg");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Tracker.gg responded");

        match status {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(RankError::PlayerNotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), %body, "Tracker.gg refused the request");
                return Err(RankError::Unauthorized);
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(RankError::RateLimited),
            _ => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), %body, "Unexpected Tracker.gg response");
                return Err(RankError::UpstreamError {
                    status: status.as_u16(),
                    body,
                });
            }
        }

        let body = response.text().await?;
        serde_json::from_str::<TrackerResponse>(&body).map_err(|e| log_parse_failure(&body, e))
    }
}

fn log_parse_failure(body: &str, error: serde_json::Error) -> RankError {
    tracing::warn!(%error, "Failed to parse Tracker.gg profile");
    let preview: String = body.chars().take(200).collect();
    tracing::debug!(%preview, "Unparsable Tracker.gg body");
    RankError::ParseError(error)
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(header::REFERER, HeaderValue::from_static("https://tracker.gg/"));
    headers.insert(header::ORIGIN, HeaderValue::from_static("https://tracker.gg"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-site"));
    headers
}

pub fn extract_rank(profile: &TrackerResponse, identifier: &PlayerIdentifier) -> Result<PlayerRank, RankError> {
    let mut rank = PlayerRank::new(identifier);

    for segment in profile.data.segments.iter().filter(|s| s.kind == "playlist") {
        match Playlist::from_segment_name(&segment.metadata.name) {
            Some(playlist) => {
                tracing::debug!(playlist = %segment.metadata.name, "Found competitive rank");
                *playlist.slot(&mut rank) = Some(rank_info_from_segment(segment));
            }
            None => tracing::debug!(playlist = %segment.metadata.name, "Ignoring playlist"),
        }
    }

    if !rank.has_any_rank() {
        let available: Vec<&str> = profile
            .data
            .segments
            .iter()
            .filter(|s| s.kind == "playlist")
            .map(|s| s.metadata.name.as_str())
            .collect();
        tracing::info!(?available, "No competitive playlist in profile");
        return Err(RankError::NoRankedData);
    }

    Ok(rank)
}

fn rank_info_from_segment(segment: &Segment) -> RankInfo {
    let mut info = RankInfo::default();

    if let Some(tier) = segment.stats.get("tier") {
        info.tier = tier.as_i32();
        let metadata = tier.metadata.as_ref();
        info.rank = metadata
            .and_then(|m| m.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| tier_name(info.tier).to_string());
        info.icon_url = metadata
            .and_then(|m| m.icon_url.clone())
            .filter(|url| !url.is_empty());
    }

    if let Some(division) = segment.stats.get("division") {
        info.division = division.as_i32();
    }

    if let Some(rating) = segment.stats.get("rating") {
        info.mmr = rating.as_i32();
    }

    info
}

/// Rocket League rank name for a Tracker tier number.
pub fn tier_name(tier: i32) -> &'static str {
    match tier {
        0 => "Unranked",
        1 => "Bronze I",
        2 => "Bronze II",
        3 => "Bronze III",
        4 => "Silver I",
        5 => "Silver II",
        6 => "Silver III",
        7 => "Gold I",
        8 => "Gold II",
        9 => "Gold III",
        10 => "Platinum I",
        11 => "Platinum II",
        12 => "Platinum III",
        13 => "Diamond I",
        14 => "Diamond II",
        15 => "Diamond III",
        16 => "Champion I",
        17 => "Champion II",
        18 => "Champion III",
        19 => "Grand Champion I",
        20 => "Grand Champion II",
        21 => "Grand Champion III",
        22 => "Supersonic Legend",
        _ => "Unknown",
    }
}
