use serde::Serialize;

/// Emits `value` as pretty JSON at DEBUG level under `label`.
/// Serialization is skipped entirely when DEBUG is off.
pub(crate) fn debug_pretty_json<T>(label: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    match serde_json::to_string_pretty(value) {
        Ok(payload) => tracing::debug!(payload = %payload, "{label}"),
        Err(error) => tracing::debug!(%error, "{label}: payload not serializable"),
    }
}
