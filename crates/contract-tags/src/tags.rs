//! Turns subgraph pools into contract tags for the address registry.

use {
    crate::sushi::PoolData,
    serde::{Deserialize, Serialize},
    std::collections::HashSet,
};

pub const PROJECT_NAME: &str = "Sushi";
pub const WEBSITE: &str = "https://www.sushi.com/";

/// Registry limit for the public name tag.
const MAX_NAME_TAG_CHARS: usize = 45;
const ELLIPSIS: &str = "...";

/// A labeled LP token address, serialized with the registry's column names.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractTag {
    #[serde(rename = "Contract Address")]
    pub contract_address: String,
    #[serde(rename = "Public Name Tag")]
    pub public_name_tag: String,
    #[serde(rename = "Project Name")]
    pub project_name: String,
    #[serde(rename = "UI/Website Link")]
    pub ui_website_link: String,
    #[serde(rename = "Public Note")]
    pub public_note: String,
}

/// Builds one tag per LP token found in `pools`, in pool order.
///
/// Pools without an LP token or with a blank LP token symbol are skipped. An
/// LP token that shows up more than once is only tagged for its first pool.
pub fn contract_tags(chain_id: &str, pools: &[PoolData]) -> Vec<ContractTag> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for pool in pools {
        let Some(token) = &pool.output_token else {
            continue;
        };
        if !seen.insert(token.id.as_str()) {
            continue;
        }

        let symbol = token.symbol.as_deref().unwrap_or_default().trim();
        if symbol.is_empty() {
            tracing::debug!(pool = %pool.id, token = %token.id, "skipping LP token without symbol");
            continue;
        }
        let name = token.name.as_deref().unwrap_or_default().trim();

        tags.push(ContractTag {
            contract_address: format!("eip155:{chain_id}:{}", token.id),
            public_name_tag: truncate(&format!("{symbol} Pool"), MAX_NAME_TAG_CHARS),
            project_name: PROJECT_NAME.to_string(),
            ui_website_link: WEBSITE.to_string(),
            public_note: format!("Sushi's {symbol} ({name}) pool contract."),
        });
    }

    tags
}

/// Cuts `text` down to `max_chars` characters, marking the cut with a
/// trailing ellipsis that counts towards the limit.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    text.chars().take(keep).chain(ELLIPSIS.chars()).collect()
}
