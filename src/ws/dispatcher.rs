//! Frame dispatch — the adapter between raw stream frames and typed handlers.
//!
//! One [`Dispatcher`] per connection. The transport calls the lifecycle
//! hooks; the dispatcher classifies each text frame by its `"e"` tag,
//! builds the matching typed event, and hands it to the application's
//! [`UserStreamHandler`]. Nothing a frame contains — invalid JSON, an
//! unknown tag, a missing field, a failing handler — crosses back into
//! the transport: every failure is logged and the frame dropped, so the
//! next frame on the same connection is processed as if nothing
//! happened.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::account::AccountSnapshot;
use crate::domain::execution::ExecutionReport;
use crate::error::{ClassificationError, DispatchError, HandlerError};
use crate::shared::ListenKey;
use crate::ws::{EventKind, UserStreamEvent};

// ─── Handler contract ────────────────────────────────────────────────────────

/// Application-side event sink: one method per event variant.
///
/// Handlers run synchronously on the frame-delivery path, so events for
/// one connection are strictly ordered and never overlap. A returned
/// error is absorbed and logged by the dispatcher; it does not stop the
/// stream. The flip side: a slow handler delays subsequent frames on
/// the same connection.
pub trait UserStreamHandler {
    fn handle_account_snapshot(&mut self, event: AccountSnapshot) -> Result<(), HandlerError>;

    fn handle_execution_report(&mut self, event: ExecutionReport) -> Result<(), HandlerError>;
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

/// Connection lifecycle, as the dispatcher observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Open,
    Closed,
}

/// Routes frames from one user-data stream connection to a handler.
///
/// Connection-scoped: holds no cross-connection state. Independent
/// connections each get their own instance.
pub struct Dispatcher<H> {
    handler: H,
    stream: ListenKey,
    state: StreamState,
}

impl<H: UserStreamHandler> Dispatcher<H> {
    /// `stream` identifies the connection in log output only; the
    /// dispatcher never interprets it.
    pub fn new(stream: ListenKey, handler: H) -> Self {
        Self {
            handler,
            stream,
            state: StreamState::Open,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    pub fn is_open(&self) -> bool {
        self.state == StreamState::Open
    }

    /// Transport established the connection.
    pub fn on_connected(&mut self) {
        self.state = StreamState::Open;
        info!(stream = %self.stream, "user-data stream connected");
    }

    /// Transport-level failure. Logged only — whether to tear down or
    /// reconnect is the transport's call, not the dispatcher's.
    pub fn on_transport_error(&self, error: &dyn std::fmt::Display) {
        error!(stream = %self.stream, %error, "transport error on user-data stream");
    }

    /// Transport tore the connection down. Terminal: frames delivered
    /// after this are dropped.
    pub fn on_closed(&mut self) {
        self.state = StreamState::Closed;
        info!(stream = %self.stream, "user-data stream closed");
    }

    /// Hot path: one text frame, in arrival order.
    ///
    /// Absorbs every per-frame failure; see the error taxonomy on
    /// [`DispatchError`]. Never panics, never closes the connection.
    pub fn on_text_frame(&mut self, text: &str) {
        if self.state == StreamState::Closed {
            warn!(stream = %self.stream, "frame delivered on closed stream, dropping");
            return;
        }
        match self.process_frame(text) {
            Ok(kind) => {
                debug!(stream = %self.stream, event = %kind, "event dispatched");
            }
            Err(DispatchError::Decode(e)) => {
                error!(stream = %self.stream, %e, frame = text, "frame is not valid JSON, dropping");
            }
            Err(DispatchError::Classification(ClassificationError::UnknownEventType(tag))) => {
                // Forward compatibility: the feed may introduce event
                // kinds this adapter predates.
                warn!(stream = %self.stream, %tag, "unknown event type, dropping frame");
            }
            Err(DispatchError::Classification(e)) => {
                error!(stream = %self.stream, %e, "frame has no usable discriminator, dropping");
            }
            Err(DispatchError::MalformedEvent(e)) => {
                error!(stream = %self.stream, %e, "malformed event payload, dropping frame");
            }
            Err(DispatchError::Handler { event, source }) => {
                error!(stream = %self.stream, %event, %source, "handler failed, continuing");
            }
        }
    }

    /// Decode → classify → construct → invoke. Split from
    /// [`on_text_frame`] so the per-frame outcome stays observable in
    /// tests; the public hook only adds logging.
    fn process_frame(&mut self, text: &str) -> Result<EventKind, DispatchError> {
        let message: Value = serde_json::from_str(text)?;
        let kind = classify(&message)?;
        let event = UserStreamEvent::from_message(kind, &message)?;
        self.invoke(event)?;
        Ok(kind)
    }

    fn invoke(&mut self, event: UserStreamEvent) -> Result<(), DispatchError> {
        let kind = event.kind();
        let result = match event {
            UserStreamEvent::AccountSnapshot(ev) => self.handler.handle_account_snapshot(ev),
            UserStreamEvent::ExecutionReport(ev) => self.handler.handle_execution_report(ev),
        };
        result.map_err(|source| DispatchError::Handler {
            event: kind.tag(),
            source,
        })
    }
}

// ─── Classification ──────────────────────────────────────────────────────────

/// Read the `"e"` discriminator and look it up in the variant table.
fn classify(message: &Value) -> Result<EventKind, ClassificationError> {
    let tag = match message.get("e") {
        None => return Err(ClassificationError::MissingDiscriminator),
        Some(Value::String(tag)) => tag,
        Some(other) => {
            return Err(ClassificationError::NonStringDiscriminator {
                found: json_type_name(other),
            })
        }
    };
    EventKind::from_tag(tag).ok_or_else(|| ClassificationError::UnknownEventType(tag.clone()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedEventError;
    use crate::shared::Side;
    use rust_decimal::Decimal;

    const ACCOUNT_FRAME: &str = r#"{
        "e": "outboundAccountInfo",
        "m": 10, "t": 10, "b": 0, "s": 0,
        "T": true, "W": true, "D": true,
        "u": 1499405658848,
        "B": [{ "a": "BTC", "f": "0.5", "l": "0.1" }]
    }"#;

    const EXECUTION_FRAME: &str = r#"{
        "e": "executionReport",
        "s": "BTCUSDT", "S": "BUY", "o": "LIMIT", "X": "FILLED",
        "q": "1.0", "z": "1.0"
    }"#;

    /// Records every handler call, optionally failing specific ones.
    #[derive(Default)]
    struct Recording {
        snapshots: Vec<AccountSnapshot>,
        reports: Vec<ExecutionReport>,
        calls: Vec<&'static str>,
        fail_snapshots: bool,
        fail_reports: bool,
    }

    impl UserStreamHandler for Recording {
        fn handle_account_snapshot(
            &mut self,
            event: AccountSnapshot,
        ) -> Result<(), HandlerError> {
            self.calls.push("account");
            self.snapshots.push(event);
            if self.fail_snapshots {
                return Err(HandlerError::new("snapshot rejected downstream"));
            }
            Ok(())
        }

        fn handle_execution_report(
            &mut self,
            event: ExecutionReport,
        ) -> Result<(), HandlerError> {
            self.calls.push("execution");
            self.reports.push(event);
            if self.fail_reports {
                return Err(HandlerError::new("report rejected downstream"));
            }
            Ok(())
        }
    }

    fn dispatcher() -> Dispatcher<Recording> {
        Dispatcher::new(ListenKey::new("test-listen-key"), Recording::default())
    }

    #[test]
    fn test_account_frame_invokes_snapshot_handler_once() {
        let mut d = dispatcher();
        d.on_text_frame(ACCOUNT_FRAME);

        let h = d.handler();
        assert_eq!(h.snapshots.len(), 1);
        assert!(h.reports.is_empty());

        let snap = &h.snapshots[0];
        assert_eq!(snap.maker_commission, 10);
        assert!(snap.can_trade);
        assert_eq!(snap.balances.len(), 1);
        assert_eq!(snap.balances[0].asset, "BTC");
        assert_eq!(snap.balances[0].free, "0.5".parse().unwrap());
    }

    #[test]
    fn test_execution_frame_invokes_report_handler_once() {
        let mut d = dispatcher();
        d.on_text_frame(EXECUTION_FRAME);

        let h = d.handler();
        assert_eq!(h.reports.len(), 1);
        assert!(h.snapshots.is_empty());

        let report = &h.reports[0];
        assert_eq!(report.symbol, "BTCUSDT");
        assert_eq!(report.side, Side::Buy);
        assert_eq!(report.status, crate::domain::execution::OrderStatus::Filled);
        assert_eq!(report.executed_qty, Decimal::ONE);
    }

    #[test]
    fn test_unknown_event_type_invokes_no_handler() {
        let mut d = dispatcher();
        let outcome = d.process_frame(r#"{"e":"unknownEventXYZ"}"#);

        match outcome {
            Err(DispatchError::Classification(ClassificationError::UnknownEventType(tag))) => {
                assert_eq!(tag, "unknownEventXYZ");
            }
            other => panic!("expected UnknownEventType, got: {other:?}"),
        }
        assert!(d.handler().calls.is_empty());
        // The dispatcher never closes the connection over a frame.
        assert!(d.is_open());
    }

    #[test]
    fn test_missing_discriminator_invokes_no_handler() {
        let mut d = dispatcher();
        let outcome = d.process_frame(r#"{"s":"BTCUSDT"}"#);

        assert!(matches!(
            outcome,
            Err(DispatchError::Classification(
                ClassificationError::MissingDiscriminator
            ))
        ));
        assert!(d.handler().calls.is_empty());
    }

    #[test]
    fn test_non_string_discriminator_invokes_no_handler() {
        let mut d = dispatcher();
        let outcome = d.process_frame(r#"{"e":42}"#);

        assert!(matches!(
            outcome,
            Err(DispatchError::Classification(
                ClassificationError::NonStringDiscriminator { found: "number" }
            ))
        ));
        assert!(d.handler().calls.is_empty());
    }

    #[test]
    fn test_invalid_json_does_not_latch() {
        let mut d = dispatcher();
        d.on_text_frame("{not json");
        assert!(d.handler().calls.is_empty());

        // A well-formed frame right after still dispatches.
        d.on_text_frame(EXECUTION_FRAME);
        assert_eq!(d.handler().reports.len(), 1);
        assert!(d.is_open());
    }

    #[test]
    fn test_malformed_event_hands_nothing_to_handler() {
        let mut d = dispatcher();
        // Recognized tag, required "q" missing.
        let outcome = d.process_frame(
            r#"{"e":"executionReport","s":"BTCUSDT","S":"BUY","o":"LIMIT","X":"NEW","z":"0.0"}"#,
        );

        assert!(matches!(
            outcome,
            Err(DispatchError::MalformedEvent(MalformedEventError::Shape { .. }))
        ));
        assert!(d.handler().calls.is_empty());
    }

    #[test]
    fn test_handler_failure_does_not_stop_subsequent_frames() {
        let mut d = Dispatcher::new(
            ListenKey::new("test-listen-key"),
            Recording {
                fail_snapshots: true,
                ..Recording::default()
            },
        );

        d.on_text_frame(ACCOUNT_FRAME);
        d.on_text_frame(EXECUTION_FRAME);

        let h = d.handler();
        assert_eq!(h.calls, vec!["account", "execution"]);
        assert_eq!(h.reports.len(), 1);
    }

    #[test]
    fn test_handler_error_carries_event_and_message() {
        let mut d = Dispatcher::new(
            ListenKey::new("test-listen-key"),
            Recording {
                fail_reports: true,
                ..Recording::default()
            },
        );
        let outcome = d.process_frame(EXECUTION_FRAME);

        match outcome {
            Err(DispatchError::Handler { event, source }) => {
                assert_eq!(event, "executionReport");
                assert_eq!(source.message(), "report rejected downstream");
            }
            other => panic!("expected Handler error, got: {other:?}"),
        }
    }

    #[test]
    fn test_frames_processed_in_arrival_order() {
        let mut d = dispatcher();
        d.on_text_frame(ACCOUNT_FRAME);
        d.on_text_frame(EXECUTION_FRAME);

        assert_eq!(d.handler().calls, vec!["account", "execution"]);
    }

    #[test]
    fn test_closed_stream_drops_frames() {
        let mut d = dispatcher();
        d.on_closed();
        assert!(!d.is_open());

        d.on_text_frame(EXECUTION_FRAME);
        assert!(d.handler().calls.is_empty());
    }

    #[test]
    fn test_reconnect_reopens_after_close() {
        let mut d = dispatcher();
        d.on_closed();
        d.on_connected();
        assert!(d.is_open());

        d.on_text_frame(EXECUTION_FRAME);
        assert_eq!(d.handler().reports.len(), 1);
    }

    #[test]
    fn test_transport_error_leaves_stream_open() {
        let mut d = dispatcher();
        d.on_transport_error(&"connection reset by peer");
        assert!(d.is_open());

        d.on_text_frame(EXECUTION_FRAME);
        assert_eq!(d.handler().reports.len(), 1);
    }
}
