//! Navigation state machine.
//!
//! Resolves a decoded intent against the cached session for its key and
//! produces the next view. The caller owns the side effects: editing
//! the message, re-running the provider on refresh, and re-arming the
//! deletion timer for every rendered view.

use crate::cache::{SearchCache, SearchSession, SessionKey};
use crate::keyboard::{
    Keyboard, back_refresh_keyboard, category_keyboard, pagination_keyboard,
};
use crate::pagination::paginate;
use crate::pagination::token::NavIntent;
use crate::render;
use pansou_search::CloudType;

/// Content + keyboard descriptor for one rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewUpdate {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

/// Result of resolving one navigation intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Edit the message to this view and re-arm its deletion timer.
    Render(ViewUpdate),
    /// The session is gone; show the expiry notice and re-arm.
    Expired(ViewUpdate),
    /// Re-run the provider search for this keyword, then re-render.
    Refresh { keyword: String },
    /// The selected category has no items in the current session;
    /// acknowledge transiently without touching the view.
    EmptyCategory,
    /// Acknowledge silently; the view stays as it is.
    Ack,
}

/// Resolve an intent against the current session for `key`.
///
/// Page numbers are clamped against the session live in the cache right
/// now; a page carried by a button rendered from an earlier session is
/// reclamped, never trusted.
pub fn resolve(
    cache: &SearchCache,
    key: SessionKey,
    intent: NavIntent,
    page_size: usize,
) -> NavOutcome {
    if intent == NavIntent::Noop {
        return NavOutcome::Ack;
    }

    let Some(session) = cache.get(key) else {
        return NavOutcome::Expired(expired_view());
    };

    match intent {
        NavIntent::Noop => NavOutcome::Ack,
        NavIntent::Refresh => NavOutcome::Refresh {
            keyword: session.keyword.clone(),
        },
        NavIntent::Overview | NavIntent::Back => NavOutcome::Render(overview_view(key, &session)),
        NavIntent::AllResults => NavOutcome::Render(all_results_view(key, &session)),
        NavIntent::CategoryPage { category, page } => {
            match category_view(key, &session, category, page, page_size) {
                Some(view) => NavOutcome::Render(view),
                None => NavOutcome::EmptyCategory,
            }
        }
    }
}

/// Overview view for a session; also the initial view after a search.
pub fn overview_view(key: SessionKey, session: &SearchSession) -> ViewUpdate {
    ViewUpdate {
        text: render::overview(&session.keyword, session.results.total),
        keyboard: Some(category_keyboard(key, &session.results)),
    }
}

/// Terminal view for a navigation intent whose session is gone.
pub fn expired_view() -> ViewUpdate {
    ViewUpdate {
        text: render::expired(),
        keyboard: None,
    }
}

fn all_results_view(key: SessionKey, session: &SearchSession) -> ViewUpdate {
    ViewUpdate {
        text: render::all_results(&session.keyword, &session.results),
        keyboard: Some(back_refresh_keyboard(key)),
    }
}

fn category_view(
    key: SessionKey,
    session: &SearchSession,
    category: CloudType,
    requested_page: usize,
    page_size: usize,
) -> Option<ViewUpdate> {
    let links = session
        .results
        .category(category)
        .filter(|links| !links.is_empty())?;

    let page = paginate(links, page_size, requested_page);
    let text = render::category_page(&session.keyword, category, links.len(), &page, page_size);
    let keyboard = pagination_keyboard(key, category, page.page, page.total_pages);
    Some(ViewUpdate {
        text,
        keyboard: Some(keyboard),
    })
}
