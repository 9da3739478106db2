use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("geminichat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("geminichat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("geminichat.client.request_duration_seconds");

pub(crate) static STREAM_CHUNKS: Counter = Counter::new("geminichat.stream.chunks");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("geminichat.stream.errors");
pub(crate) static STREAM_BYTES: Counter = Counter::new("geminichat.stream.bytes");

pub(crate) static CHAT_TURNS: Counter = Counter::new("geminichat.chat.turns");
pub(crate) static CHAT_TURN_ERRORS: Counter = Counter::new("geminichat.chat.turn_errors");
pub(crate) static CHAT_FRAGMENTS: Counter = Counter::new("geminichat.chat.fragments");
pub(crate) static CHAT_TURN_DURATION: Moments =
    Moments::new("geminichat.chat.turn_duration_seconds");

pub(crate) static WEB_SESSIONS_OPENED: Counter = Counter::new("geminichat.web.sessions_opened");
pub(crate) static WEB_SESSIONS_CLOSED: Counter = Counter::new("geminichat.web.sessions_closed");
pub(crate) static WEB_SESSIONS_EVICTED: Counter = Counter::new("geminichat.web.sessions_evicted");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_BYTES);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_TURN_ERRORS);
    collector.register_counter(&CHAT_FRAGMENTS);
    collector.register_moments(&CHAT_TURN_DURATION);

    collector.register_counter(&WEB_SESSIONS_OPENED);
    collector.register_counter(&WEB_SESSIONS_CLOSED);
    collector.register_counter(&WEB_SESSIONS_EVICTED);
}
