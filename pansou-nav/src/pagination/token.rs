//! Navigation token codec for callback buttons.
//!
//! A token encodes "where in the navigation graph am I and what next"
//! plus enough session identity to resolve it, inside the transport's
//! 64-byte callback-data budget. Category-page tokens that would
//! overflow fall back to a reduced form without the session key; the
//! decoder then resolves the key from the pressing user's own identity.

use pansou_search::CloudType;

use crate::cache::SessionKey;

/// Transport limit for encoded callback data, in bytes.
pub const MAX_TOKEN_LEN: usize = 64;

const ACTION_OVERVIEW: &str = "overview";
const ACTION_CATEGORY: &str = "type";
const ACTION_ALL: &str = "all";
const ACTION_REFRESH: &str = "refresh";
const ACTION_BACK: &str = "back";
const ACTION_NOOP: &str = "noop";

/// Decoded user action carried through a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    Overview,
    CategoryPage { category: CloudType, page: usize },
    AllResults,
    Refresh,
    Back,
    Noop,
}

/// Result of decoding a raw callback payload.
///
/// `Malformed` covers unknown actions, unknown category tags,
/// non-numeric fields, and field counts matching neither form. It is
/// acknowledged silently, never surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedToken {
    Nav { key: SessionKey, intent: NavIntent },
    Malformed,
}

/// Encode an intent for `key` within the token budget.
pub fn encode(key: SessionKey, intent: NavIntent) -> String {
    let full = match intent {
        NavIntent::Overview => join_key(ACTION_OVERVIEW, key),
        NavIntent::AllResults => join_key(ACTION_ALL, key),
        NavIntent::Refresh => join_key(ACTION_REFRESH, key),
        NavIntent::Back => join_key(ACTION_BACK, key),
        NavIntent::Noop => join_key(ACTION_NOOP, key),
        NavIntent::CategoryPage { category, page } => format!(
            "{ACTION_CATEGORY}:{}:{}:{}:{page}",
            key.chat_id,
            key.user_id,
            category.tag()
        ),
    };
    if full.len() <= MAX_TOKEN_LEN {
        return full;
    }

    // Only the five-field category form can overflow; the reduced form
    // drops the session key and relies on the caller's own identity.
    match intent {
        NavIntent::CategoryPage { category, page } => {
            format!("{ACTION_CATEGORY}:{}:{page}", category.tag())
        }
        _ => full,
    }
}

fn join_key(action: &str, key: SessionKey) -> String {
    format!("{action}:{}:{}", key.chat_id, key.user_id)
}

/// Decode a raw callback payload.
///
/// `caller` is the (chat, user) identity of the event itself, used to
/// resolve reduced-form tokens; full-form tokens carry their own key.
pub fn decode(raw: &str, caller: SessionKey) -> DecodedToken {
    let parts: Vec<&str> = raw.split(':').collect();
    match parts.as_slice() {
        [ACTION_CATEGORY, category, page] => match parse_category_page(category, page) {
            Some((category, page)) => DecodedToken::Nav {
                key: caller,
                intent: NavIntent::CategoryPage { category, page },
            },
            None => DecodedToken::Malformed,
        },
        [ACTION_CATEGORY, chat_id, user_id, category, page] => {
            match (parse_key(chat_id, user_id), parse_category_page(category, page)) {
                (Some(key), Some((category, page))) => DecodedToken::Nav {
                    key,
                    intent: NavIntent::CategoryPage { category, page },
                },
                _ => DecodedToken::Malformed,
            }
        }
        [action, chat_id, user_id] => {
            let intent = match *action {
                ACTION_OVERVIEW => NavIntent::Overview,
                ACTION_ALL => NavIntent::AllResults,
                ACTION_REFRESH => NavIntent::Refresh,
                ACTION_BACK => NavIntent::Back,
                ACTION_NOOP => NavIntent::Noop,
                _ => return DecodedToken::Malformed,
            };
            match parse_key(chat_id, user_id) {
                Some(key) => DecodedToken::Nav { key, intent },
                None => DecodedToken::Malformed,
            }
        }
        _ => DecodedToken::Malformed,
    }
}

fn parse_key(chat_id: &str, user_id: &str) -> Option<SessionKey> {
    let chat_id = chat_id.parse::<i64>().ok()?;
    let user_id = user_id.parse::<u64>().ok()?;
    Some(SessionKey::new(chat_id, user_id))
}

fn parse_category_page(category: &str, page: &str) -> Option<(CloudType, usize)> {
    let category = CloudType::from_tag(category)?;
    let page = page.parse::<usize>().ok()?;
    Some((category, page))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: SessionKey = SessionKey {
        chat_id: -1001234567890,
        user_id: 987654321,
    };

    #[test]
    fn round_trip_for_every_intent() {
        let intents = [
            NavIntent::Overview,
            NavIntent::AllResults,
            NavIntent::Refresh,
            NavIntent::Back,
            NavIntent::Noop,
            NavIntent::CategoryPage {
                category: CloudType::Baidu,
                page: 3,
            },
        ];
        let other_caller = SessionKey::new(1, 2);
        for intent in intents {
            let token = encode(KEY, intent);
            assert!(token.len() <= MAX_TOKEN_LEN, "{token}");
            assert_eq!(
                decode(&token, other_caller),
                DecodedToken::Nav { key: KEY, intent },
                "{token}"
            );
        }
    }

    #[test]
    fn overflowing_category_token_falls_back_to_reduced_form() {
        let wide_key = SessionKey::new(i64::MIN, u64::MAX);
        let intent = NavIntent::CategoryPage {
            category: CloudType::Magnet,
            page: 99_999_999_999,
        };
        let token = encode(wide_key, intent);
        assert_eq!(token, "type:magnet:99999999999");
        assert!(token.len() <= MAX_TOKEN_LEN);

        // The reduced form resolves against the pressing user's identity.
        assert_eq!(
            decode(&token, wide_key),
            DecodedToken::Nav {
                key: wide_key,
                intent
            }
        );
    }

    #[test]
    fn key_bearing_forms_always_fit_the_budget() {
        let wide_key = SessionKey::new(i64::MIN, u64::MAX);
        for intent in [
            NavIntent::Overview,
            NavIntent::AllResults,
            NavIntent::Refresh,
            NavIntent::Back,
            NavIntent::Noop,
        ] {
            assert!(encode(wide_key, intent).len() <= MAX_TOKEN_LEN);
        }
    }

    #[test]
    fn malformed_inputs_never_decode_to_an_action() {
        let caller = SessionKey::new(1, 2);
        for raw in [
            "",
            "noop",
            "jump:1:2",
            "type:baidu",
            "type:baidu:one",
            "type:x:2",
            "type:1:2:baidu",
            "back:abc:2",
            "back:1:-2",
            "overview:1:2:3:4",
            "type:1:2:baidu:3:extra",
        ] {
            assert_eq!(decode(raw, caller), DecodedToken::Malformed, "{raw}");
        }
    }

    #[test]
    fn full_category_form_ignores_the_caller_identity() {
        let token = encode(KEY, NavIntent::CategoryPage {
            category: CloudType::Quark,
            page: 2,
        });
        let stranger = SessionKey::new(42, 43);
        let DecodedToken::Nav { key, .. } = decode(&token, stranger) else {
            panic!("expected a decoded intent");
        };
        assert_eq!(key, KEY);
    }
}
