//! Game profile queries and account summary.

use chrono::{DateTime, Utc};
use locker_core::{Category, Inventory, ItemId, classify};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

use crate::auth::EpicSession;
use crate::error::FetchError;
use crate::http::{HttpClient, bearer};

// ============================================================================
// Constants
// ============================================================================

const PROFILE_BASE_URL: &str =
    "https://fortnite-public-service-prod11.ol.epicgames.com/fortnite/api/game/v2/profile";

const ACCOUNT_BASE_URL: &str =
    "https://account-public-service-prod03.ol.epicgames.com/account/api/public/account";

/// Template ids whose quantities add up to the V-Bucks balance.
pub const VBUCKS_TEMPLATES: [&str; 4] = [
    "Currency:MtxPurchased",
    "Currency:MtxEarned",
    "Currency:MtxGiveaway",
    "Currency:MtxPurchaseBonus",
];

/// Loading screens that share the outfit naming scheme but are not outfits.
const LINEUP_MARKER: &str = "loadingscreen_character_lineup";

static COSMETIC_TEMPLATE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^athena.*?:.*?_").ok());

/// Placeholder for values the services did not return.
const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// Profiles
// ============================================================================

/// Game profiles the bot reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileId {
    /// Cosmetics, levels and match history.
    Athena,
    /// Currency and banners.
    CommonCore,
}

impl ProfileId {
    /// Query-string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Athena => "athena",
            Self::CommonCore => "common_core",
        }
    }
}

/// Iterates the item records of a `QueryProfile` response.
pub fn profile_items(profile: &Value) -> impl Iterator<Item = &Value> {
    profile
        .pointer("/profileChanges/0/profile/items")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|items| items.values())
}

fn template_id(item: &Value) -> &str {
    item.get("templateId").and_then(Value::as_str).unwrap_or("")
}

/// Buckets the cosmetics of an athena profile by category.
///
/// Only `athena…:…_…` templates count; the bucket comes from the full template
/// id and the item id is the part after the colon.
pub fn parse_inventory(profile: &Value) -> Inventory {
    let mut inventory = Inventory::new();
    let Some(pattern) = COSMETIC_TEMPLATE.as_ref() else {
        return inventory;
    };

    for item in profile_items(profile) {
        let template = template_id(item).to_lowercase();
        if template.contains(LINEUP_MARKER) || !pattern.is_match(&template) {
            continue;
        }
        let Some((_, raw_id)) = template.split_once(':') else {
            continue;
        };
        match ItemId::new(raw_id) {
            Ok(id) => inventory.push(classify(&template), id),
            Err(_) => debug!(template = %template, "Skipping template with an unusable id"),
        }
    }
    inventory
}

/// Banner ids listed in a common_core profile.
pub fn parse_banner_ids(profile: &Value) -> Vec<String> {
    profile_items(profile)
        .filter_map(|item| {
            let template = template_id(item).to_lowercase();
            let (kind, id) = template.split_once(':')?;
            let is_banner = kind == "homebasebanner" || kind == "homebasebannericon";
            (is_banner && !id.is_empty() && !id.contains(':')).then(|| id.to_string())
        })
        .collect()
}

/// Total V-Bucks held in a common_core profile.
pub fn parse_vbucks(profile: &Value) -> u64 {
    profile_items(profile)
        .filter(|item| VBUCKS_TEMPLATES.contains(&template_id(item)))
        .filter_map(|item| item.get("quantity").and_then(Value::as_u64))
        .sum()
}

/// Lifetime statistics from an athena profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    /// Account level.
    pub account_level: u64,
    /// Wins summed over past seasons.
    pub total_wins: u64,
    /// Matches summed over past seasons.
    pub total_matches: u64,
    /// `dd/mm/yy (N days ago)` or `N/A`.
    pub last_match: String,
}

/// Reads lifetime statistics, relative to `now`.
pub fn parse_stats(profile: &Value, now: DateTime<Utc>) -> AccountStats {
    let Some(attributes) = profile.pointer("/profileChanges/0/profile/stats/attributes") else {
        return AccountStats {
            last_match: NOT_AVAILABLE.to_string(),
            ..AccountStats::default()
        };
    };

    let field = |season: &Value, key: &str| season.get(key).and_then(Value::as_u64).unwrap_or(0);
    let seasons = attributes
        .get("past_seasons")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let last_match = attributes
        .get("last_match_end_datetime")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .map_or_else(
            || NOT_AVAILABLE.to_string(),
            |played| {
                format!(
                    "{} ({} days ago)",
                    played.format("%d/%m/%y"),
                    (now - played).num_days()
                )
            },
        );

    AccountStats {
        account_level: field(attributes, "accountLevel"),
        total_wins: seasons.iter().map(|s| field(s, "numWins")).sum(),
        total_matches: seasons
            .iter()
            .map(|s| field(s, "numHighBracket") + field(s, "numLowBracket"))
            .sum(),
        last_match,
    }
}

/// Parses a service timestamp such as `2019-03-12T10:20:30.123Z`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Formats a service timestamp as `dd/mm/yyyy`, or `Unknown`.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map_or_else(|| "Unknown".to_string(), |dt| dt.format("%d/%m/%Y").to_string())
}

// ============================================================================
// Masking
// ============================================================================

/// Masks the local part of an address, keeping its first and last characters.
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    let chars: Vec<char> = local.chars().collect();
    let masked: String = match chars.len() {
        0 | 1 => local.to_string(),
        2 => format!("{}*", chars[0]),
        n => format!("{}{}{}", chars[0], "*".repeat(n - 2), chars[n - 1]),
    };
    format!("{masked}@{domain}")
}

/// Masks an account id, keeping two characters at each end.
pub fn mask_account_id(account_id: &str) -> String {
    let chars: Vec<char> = account_id.chars().collect();
    let n = chars.len();
    if n <= 4 {
        return account_id.to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[n - 2..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(n - 4))
}

/// Converts a two-letter country code to its flag emoji.
///
/// Anything else is returned unchanged.
pub fn country_flag(code: &str) -> String {
    const REGIONAL_INDICATOR_OFFSET: u32 = 127_397;
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return code.to_string();
    }
    code.chars()
        .filter_map(|c| char::from_u32(u32::from(c.to_ascii_uppercase()) + REGIONAL_INDICATOR_OFFSET))
        .collect()
}

// ============================================================================
// Account Info
// ============================================================================

/// Public account record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountInfo {
    /// Email address.
    pub email: String,
    /// Whether the email is verified.
    pub email_verified: bool,
    /// Whether two-factor auth is on.
    pub tfa_enabled: bool,
    /// Whether parental controls apply.
    pub minor_verified: bool,
    /// Real name.
    pub name: String,
    /// Two-letter country code.
    pub country: String,
    /// Creation timestamp.
    pub created: Option<String>,
}

/// A linked console account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalAuth {
    /// Platform type (`psn`, `xbl`, …).
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name on that platform.
    pub external_display_name: Option<String>,
    /// Link timestamp.
    pub date_added: Option<String>,
}

impl ExternalAuth {
    fn describe(&self) -> String {
        format!(
            "{} ({})",
            self.external_display_name.as_deref().unwrap_or("Unknown"),
            format_date(self.date_added.as_deref())
        )
    }
}

fn linked(auths: &[ExternalAuth], kind: &str) -> String {
    auths
        .iter()
        .rev()
        .find(|a| a.kind.eq_ignore_ascii_case(kind))
        .map_or_else(|| NOT_AVAILABLE.to_string(), ExternalAuth::describe)
}

/// Everything shown on the account overview, with private fields masked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Masked account id.
    pub account_id: String,
    /// Masked email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Whether the email is verified.
    pub email_verified: bool,
    /// Whether two-factor auth is on.
    pub tfa_enabled: bool,
    /// Whether parental controls apply.
    pub parental_control: bool,
    /// Real name.
    pub name: String,
    /// Country code followed by its flag.
    pub country: String,
    /// V-Bucks balance.
    pub vbucks: u64,
    /// Account creation date.
    pub creation_date: String,
    /// Linked PlayStation account.
    pub playstation: String,
    /// Linked Xbox account.
    pub xbox: String,
    /// Lifetime statistics.
    pub stats: AccountStats,
}

// ============================================================================
// Profile Client
// ============================================================================

/// Client for profile and account queries of one session.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    http: HttpClient,
    session: EpicSession,
}

impl ProfileClient {
    /// Creates a client bound to a logged-in session.
    pub fn new(http: HttpClient, session: EpicSession) -> Self {
        Self { http, session }
    }

    /// The session this client queries for.
    pub fn session(&self) -> &EpicSession {
        &self.session
    }

    fn auth(&self) -> String {
        bearer(&self.session.access_token)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Runs `QueryProfile` for one profile.
    #[instrument(skip(self), fields(profile = profile.as_str()))]
    pub async fn query_profile(&self, profile: ProfileId) -> Result<Value, FetchError> {
        let url = format!(
            "{PROFILE_BASE_URL}/{}/client/QueryProfile?profileId={}&rvn=-1",
            self.session.account_id,
            profile.as_str()
        );
        let response = self
            .http
            .post_json(&url, &self.auth(), &serde_json::json!({}))
            .await?;
        Self::read_json(response).await
    }

    /// Fetches the public account record.
    #[instrument(skip(self))]
    pub async fn account_info(&self) -> Result<AccountInfo, FetchError> {
        let url = format!("{ACCOUNT_BASE_URL}/{}", self.session.account_id);
        let response = self.http.get_with_auth(&url, &self.auth()).await?;
        Ok(serde_json::from_value(Self::read_json(response).await?)?)
    }

    /// Fetches linked console accounts; failures yield an empty list.
    #[instrument(skip(self))]
    pub async fn external_auths(&self) -> Vec<ExternalAuth> {
        let url = format!("{ACCOUNT_BASE_URL}/{}/externalAuths", self.session.account_id);
        let result = async {
            let response = self.http.get_with_auth(&url, &self.auth()).await?;
            let value = Self::read_json(response).await?;
            Ok::<_, FetchError>(serde_json::from_value(value)?)
        }
        .await;

        result.unwrap_or_else(|e| {
            warn!(error = %e, "Could not read linked accounts");
            Vec::new()
        })
    }

    /// Reads the owned cosmetics, bucketed by category.
    pub async fn inventory(&self) -> Result<Inventory, FetchError> {
        let athena = self.query_profile(ProfileId::Athena).await?;
        let inventory = parse_inventory(&athena);
        debug!(items = inventory.len(), "Parsed inventory");
        Ok(inventory)
    }

    /// Builds the account overview.
    ///
    /// Only the account record is required; profile failures degrade to defaults.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<AccountSummary, FetchError> {
        let info = self.account_info().await?;
        let (auths, common_core, athena) = futures::join!(
            self.external_auths(),
            self.query_profile(ProfileId::CommonCore),
            self.query_profile(ProfileId::Athena),
        );

        let common_core = common_core.unwrap_or_else(|e| {
            warn!(error = %e, "common_core profile unavailable");
            Value::Null
        });
        let stats = match athena {
            Ok(athena) => parse_stats(&athena, Utc::now()),
            Err(e) => {
                warn!(error = %e, "athena profile unavailable");
                parse_stats(&Value::Null, Utc::now())
            }
        };

        let profile_created = common_core
            .pointer("/profileChanges/0/profile/created")
            .and_then(Value::as_str);

        Ok(AccountSummary {
            account_id: mask_account_id(&self.session.account_id),
            email: mask_email(&info.email),
            display_name: self.session.display_name.clone(),
            email_verified: info.email_verified,
            tfa_enabled: info.tfa_enabled,
            parental_control: info.minor_verified,
            name: info.name.clone(),
            country: format!("{} {}", info.country, country_flag(&info.country))
                .trim()
                .to_string(),
            vbucks: parse_vbucks(&common_core),
            creation_date: format_date(profile_created.or(info.created.as_deref())),
            playstation: linked(&auths, "psn"),
            xbox: linked(&auths, "xbl"),
            stats,
        })
    }
}

/// Category labels paired with their item counts, for display.
pub fn bucket_counts(inventory: &Inventory) -> Vec<(Category, usize)> {
    inventory.iter().map(|(c, ids)| (c, ids.len())).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn profile(items: Value) -> Value {
        json!({ "profileChanges": [{ "profile": { "items": items } }] })
    }

    #[test]
    fn test_parse_inventory_buckets_by_template() {
        let athena = profile(json!({
            "a": { "templateId": "AthenaCharacter:CID_017_Athena_Commando_M" },
            "b": { "templateId": "AthenaDance:EID_Floss" },
            "c": { "templateId": "AthenaLoadingScreen:LoadingScreen_Character_LineUp" },
            "d": { "templateId": "AthenaPickaxe:DefaultPickaxe" },
            "e": { "templateId": "CosmeticVariantToken:abc_def" },
            "f": { "templateId": "AthenaGlider:Solo_Umbrella" }
        }));

        let inventory = parse_inventory(&athena);
        assert_eq!(
            inventory.bucket(Category::Skins),
            &[ItemId::new("cid_017_athena_commando_m").unwrap()]
        );
        assert_eq!(inventory.bucket(Category::Emotes), &[ItemId::new("eid_floss").unwrap()]);
        assert_eq!(inventory.bucket(Category::Gliders), &[ItemId::new("solo_umbrella").unwrap()]);
        // "defaultpickaxe" has no underscore after the colon.
        assert!(inventory.bucket(Category::Pickaxes).is_empty());
        assert_eq!(inventory.len(), 3);
    }

    #[test]
    fn test_parse_banner_ids() {
        let common_core = profile(json!({
            "a": { "templateId": "HomebaseBannerIcon:OT1Banner" },
            "b": { "templateId": "HomebaseBanner:StandardBanner7" },
            "c": { "templateId": "Currency:MtxPurchased", "quantity": 5 }
        }));
        let mut ids = parse_banner_ids(&common_core);
        ids.sort();
        assert_eq!(ids, vec!["ot1banner", "standardbanner7"]);
    }

    #[test]
    fn test_parse_vbucks() {
        let common_core = profile(json!({
            "a": { "templateId": "Currency:MtxPurchased", "quantity": 1000 },
            "b": { "templateId": "Currency:MtxGiveaway", "quantity": 200 },
            "c": { "templateId": "Currency:MtxComplimentary", "quantity": 9999 },
            "d": { "templateId": "Currency:MtxPurchaseBonus", "quantity": 50 }
        }));
        assert_eq!(parse_vbucks(&common_core), 1250);
        assert_eq!(parse_vbucks(&Value::Null), 0);
    }

    #[test]
    fn test_parse_stats() {
        let athena = json!({ "profileChanges": [{ "profile": { "stats": { "attributes": {
            "accountLevel": 420,
            "last_match_end_datetime": "2024-01-01T12:00:00.000Z",
            "past_seasons": [
                { "numWins": 3, "numHighBracket": 10, "numLowBracket": 5 },
                { "numWins": 1, "numHighBracket": 2 }
            ]
        }}}}]});
        let now = Utc.with_ymd_and_hms(2024, 1, 11, 13, 0, 0).unwrap();

        let stats = parse_stats(&athena, now);
        assert_eq!(stats.account_level, 420);
        assert_eq!(stats.total_wins, 4);
        assert_eq!(stats.total_matches, 17);
        assert_eq!(stats.last_match, "01/01/24 (10 days ago)");

        assert_eq!(parse_stats(&Value::Null, now).last_match, "N/A");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jonesy@example.com"), "j****y@example.com");
        assert_eq!(mask_email("ab@example.com"), "a*@example.com");
        assert_eq!(mask_email("a@example.com"), "a@example.com");
        assert_eq!(mask_email("not-an-email"), "not-an-email");
    }

    #[test]
    fn test_mask_account_id() {
        assert_eq!(mask_account_id("0123456789"), "01******89");
        assert_eq!(mask_account_id("abcd"), "abcd");
    }

    #[test]
    fn test_country_flag() {
        assert_eq!(country_flag("br"), "\u{1F1E7}\u{1F1F7}");
        assert_eq!(country_flag("USA"), "USA");
        assert_eq!(country_flag(""), "");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2018-07-25T14:10:22.123Z")), "25/07/2018");
        assert_eq!(format_date(Some("garbage")), "Unknown");
        assert_eq!(format_date(None), "Unknown");
    }

    #[test]
    fn test_linked_accounts() {
        let auths: Vec<ExternalAuth> = serde_json::from_value(json!([
            { "type": "psn", "externalDisplayName": "PlayerOne", "dateAdded": "2020-02-03T00:00:00.000Z" },
            { "type": "github", "externalDisplayName": "x" }
        ]))
        .unwrap();
        assert_eq!(linked(&auths, "psn"), "PlayerOne (03/02/2020)");
        assert_eq!(linked(&auths, "xbl"), "N/A");
    }
}
