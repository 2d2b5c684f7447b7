// src/flash/reconcile.rs
use serde::de::DeserializeOwned;

use crate::flash::store::SignalStore;
use crate::models::{ErrorSignal, Message, MessageKind, MessageSource, ERROR_KEY, MESSAGE_KEY};

/// Signals carried in a page URL's query string, percent-decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySignals {
    pub message: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub locale: Option<String>,
    pub username: Option<String>,
    pub test_message: Option<String>,
}

/// Parses the raw query string. Decoding happens here so the
/// reconciler owns the full untrusted-input boundary; for repeated
/// keys the first occurrence wins.
pub fn parse_query(raw: Option<&str>) -> QuerySignals {
    let mut signals = QuerySignals::default();
    let Some(raw) = raw else {
        return signals;
    };
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        let slot = match key.as_ref() {
            "message" => &mut signals.message,
            "success" => &mut signals.success,
            "error" => &mut signals.error,
            "kc_locale" => &mut signals.locale,
            "username" => &mut signals.username,
            "test_message" => &mut signals.test_message,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }
    signals
}

/// The single display-ready pair produced per page render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    pub message: Option<Message>,
    pub message_source: Option<MessageSource>,
    pub error: Option<ErrorSignal>,
    pub error_source: Option<MessageSource>,
}

/// Merges the three signal sources into one `(message?, error?)` pair.
///
/// Precedence: render context, then query parameters, then the flash
/// store. Both flash keys are drained unconditionally — a stored
/// signal is one-shot even when a higher-precedence source wins, so a
/// back-navigation never redisplays it. Parse failures are logged and
/// treated as an absent signal.
pub fn reconcile(
    context_message: Option<Message>,
    context_error: Option<ErrorSignal>,
    query: &QuerySignals,
    store: &mut impl SignalStore,
) -> Reconciled {
    let stored_message: Option<Message> = drain_json(store, MESSAGE_KEY);
    let stored_error: Option<ErrorSignal> = drain_json(store, ERROR_KEY);

    // `success` outranks `message` when both query parameters are set.
    let query_message = query
        .success
        .as_deref()
        .map(|text| Message::new(MessageKind::Success, text))
        .or_else(|| {
            query
                .message
                .as_deref()
                .map(|text| Message::new(MessageKind::Info, text))
        });
    let query_error = query.error.as_deref().map(ErrorSignal::new);

    let (message, message_source) = pick(context_message, query_message, stored_message);
    let (error, error_source) = pick(context_error, query_error, stored_error);

    if let Some(source) = message_source {
        tracing::debug!(?source, "banner message selected");
    }
    if let Some(source) = error_source {
        tracing::debug!(?source, "banner error selected");
    }

    Reconciled {
        message,
        message_source,
        error,
        error_source,
    }
}

fn pick<T>(
    context: Option<T>,
    query: Option<T>,
    stored: Option<T>,
) -> (Option<T>, Option<MessageSource>) {
    if context.is_some() {
        return (context, Some(MessageSource::RenderContext));
    }
    if query.is_some() {
        return (query, Some(MessageSource::QueryParameter));
    }
    if stored.is_some() {
        return (stored, Some(MessageSource::SessionStore));
    }
    (None, None)
}

fn drain_json<T: DeserializeOwned>(store: &mut impl SignalStore, key: &str) -> Option<T> {
    let raw = store.remove(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("Failed to parse flash entry {}: {}", key, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::store::FlashBag;

    fn stored_message_bag() -> FlashBag {
        let mut bag = FlashBag::new();
        bag.set(
            MESSAGE_KEY,
            serde_json::to_string(&Message::new(MessageKind::Success, "stored")).unwrap(),
        );
        bag
    }

    #[test]
    fn test_stored_message_is_returned_and_consumed() {
        let mut bag = stored_message_bag();

        let result = reconcile(None, None, &QuerySignals::default(), &mut bag);

        let message = result.message.unwrap();
        assert_eq!(message.kind, MessageKind::Success);
        assert_eq!(message.text, "stored");
        assert_eq!(result.message_source, Some(MessageSource::SessionStore));
        assert!(bag.get(MESSAGE_KEY).is_none());
    }

    #[test]
    fn test_second_reconciliation_yields_nothing() {
        let mut bag = stored_message_bag();

        let first = reconcile(None, None, &QuerySignals::default(), &mut bag);
        assert!(first.message.is_some());

        let second = reconcile(None, None, &QuerySignals::default(), &mut bag);
        assert!(second.message.is_none());
        assert!(second.error.is_none());
    }

    #[test]
    fn test_context_wins_and_store_is_drained_anyway() {
        let mut bag = stored_message_bag();
        let context = Message::new(MessageKind::Info, "from context");

        let result = reconcile(Some(context), None, &QuerySignals::default(), &mut bag);

        assert_eq!(result.message.unwrap().text, "from context");
        assert_eq!(result.message_source, Some(MessageSource::RenderContext));
        // One-shot even when outranked.
        assert!(bag.get(MESSAGE_KEY).is_none());
    }

    #[test]
    fn test_query_outranks_store() {
        let mut bag = stored_message_bag();
        let query = parse_query(Some("message=from%20query"));

        let result = reconcile(None, None, &query, &mut bag);

        let message = result.message.unwrap();
        assert_eq!(message.text, "from query");
        assert_eq!(message.kind, MessageKind::Info);
        assert_eq!(result.message_source, Some(MessageSource::QueryParameter));
    }

    #[test]
    fn test_success_param_outranks_message_param() {
        let query = parse_query(Some("message=plain&success=done"));
        let mut bag = FlashBag::new();

        let result = reconcile(None, None, &query, &mut bag);

        let message = result.message.unwrap();
        assert_eq!(message.kind, MessageKind::Success);
        assert_eq!(message.text, "done");
    }

    #[test]
    fn test_query_error_is_percent_decoded() {
        let query = parse_query(Some("error=Invalid%20credentials"));
        let mut bag = FlashBag::new();

        let result = reconcile(None, None, &query, &mut bag);

        assert_eq!(result.error.unwrap().text, "Invalid credentials");
        assert_eq!(result.error_source, Some(MessageSource::QueryParameter));
    }

    #[test]
    fn test_malformed_stored_error_is_swallowed() {
        let mut bag = FlashBag::new();
        bag.set(ERROR_KEY, "{not json".to_string());

        let result = reconcile(None, None, &QuerySignals::default(), &mut bag);

        assert!(result.error.is_none());
        assert!(result.error_source.is_none());
        // Still drained: a broken entry must not resurface.
        assert!(bag.get(ERROR_KEY).is_none());
    }

    #[test]
    fn test_stored_error_signal() {
        let mut bag = FlashBag::new();
        bag.set(
            ERROR_KEY,
            serde_json::to_string(&ErrorSignal::tagged("bad creds", "username")).unwrap(),
        );

        let result = reconcile(None, None, &QuerySignals::default(), &mut bag);

        let error = result.error.unwrap();
        assert_eq!(error.text, "bad creds");
        assert_eq!(error.tag.as_deref(), Some("username"));
        assert_eq!(result.error_source, Some(MessageSource::SessionStore));
    }

    #[test]
    fn test_message_and_error_are_independent() {
        let mut bag = stored_message_bag();
        let query = parse_query(Some("error=oops"));

        let result = reconcile(None, None, &query, &mut bag);

        assert_eq!(result.message_source, Some(MessageSource::SessionStore));
        assert_eq!(result.error_source, Some(MessageSource::QueryParameter));
    }

    #[test]
    fn test_parse_query_first_occurrence_wins() {
        let query = parse_query(Some("message=first&message=second"));
        assert_eq!(query.message.as_deref(), Some("first"));
    }

    #[test]
    fn test_parse_query_collects_auxiliary_params() {
        let query = parse_query(Some("kc_locale=en&username=yamada%40example.com&test_message=hi"));
        assert_eq!(query.locale.as_deref(), Some("en"));
        assert_eq!(query.username.as_deref(), Some("yamada@example.com"));
        assert_eq!(query.test_message.as_deref(), Some("hi"));
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(parse_query(None), QuerySignals::default());
        assert_eq!(parse_query(Some("")), QuerySignals::default());
    }
}
