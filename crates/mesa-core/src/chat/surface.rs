//! The chat conversation surface.
//!
//! `ChatSurface` owns one chat thread bound to a restaurant context: the
//! bounded history, the session id, and the send gate. It renders into
//! optional UI targets and talks to the backend through the collaborator
//! traits in [`super::provider`].
//!
//! States are `Idle` and `Sending`. Only one send is in flight at a time;
//! extra calls are rejected, never queued. `reset()` returns to `Idle` with
//! an empty history and advances the surface epoch, so a send that started
//! before the reset cannot write into the new conversation.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use mesa_types::chat::{ChatContext, ChatRole, ConversationEntry, SendState};
use mesa_types::config::{ClientConfig, SurfaceMessages};
use mesa_types::error::{ChatError, RejectReason};
use mesa_types::wire::ChatRequest;

use super::exchange::{ExchangeOptions, exchange};
use super::format::RenderedMessage;
use super::history::ConversationHistory;
use super::provider::{AuthTokenProvider, ChatTransport, ContextProvider};
use super::reveal::{RevealTiming, stream_formatted_content};
use super::session_id::SessionIdSource;
use super::template::Template;
use super::view::SurfaceTargets;

/// Behaviour and text of a surface.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Past entries forwarded per request; the history keeps twice as many.
    pub history_limit: usize,
    pub request_path: String,
    pub require_auth: bool,
    /// Reveal replies progressively instead of rendering them at once.
    pub stream_replies: bool,
    pub initial_history: Vec<ConversationEntry>,
    /// Input placeholder.
    pub placeholder: Template,
    /// Text of the empty-state element.
    pub empty_message: Template,
    pub messages: SurfaceMessages,
    pub session_ids: SessionIdSource,
    pub reveal: RevealTiming,
}

impl SurfaceConfig {
    pub fn from_client_config(config: &ClientConfig) -> Self {
        let messages = config.messages.clone();
        let no_context = messages.no_context.clone();
        Self {
            history_limit: config.history_limit,
            request_path: config.request_path.clone(),
            require_auth: config.require_auth,
            stream_replies: config.stream_replies,
            initial_history: Vec::new(),
            placeholder: Template::dynamic(move |ctx: &ChatContext| {
                if ctx.has_identity() {
                    format!("Ask {} a question…", ctx.display_name())
                } else {
                    no_context.clone()
                }
            }),
            empty_message: Template::Interpolated(
                "Start a conversation with {restaurant_name}.".to_string(),
            ),
            messages,
            session_ids: SessionIdSource::default(),
            reveal: RevealTiming::default(),
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::from_client_config(&ClientConfig::default())
    }
}

/// What happened to one `send()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Refused before any side effect on history or transport.
    Rejected(RejectReason),
    /// Reply rendered and stored.
    Replied(String),
    /// Request failed; the status view shows a user-facing message.
    Failed(ChatError),
    /// The surface was reset while the request was in flight.
    Discarded,
}

/// UI events delivered to a bound surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Form submission. `None` reads the message from the input target.
    Submit(Option<String>),
    Reset,
    /// The context provider now returns a different restaurant.
    ContextChanged,
    Refresh,
    /// Stop the listener task.
    Close,
}

type StateHook = Box<dyn Fn(SendState) + Send + Sync>;

struct SurfaceState {
    history: ConversationHistory,
    session_id: Option<String>,
    send: SendState,
    epoch: u64,
    reveal_cancel: CancellationToken,
    /// Restaurant id the current conversation belongs to.
    bound_context: Option<String>,
}

/// Work accepted by `admit`, carried through the rest of `send`.
struct Admitted {
    epoch: u64,
    request: ChatRequest,
    cancel: CancellationToken,
}

pub struct ChatSurface<C, A, T> {
    config: SurfaceConfig,
    targets: SurfaceTargets,
    context: C,
    auth: A,
    transport: T,
    on_state_change: Option<StateHook>,
    state: Mutex<SurfaceState>,
}

impl<C, A, T> ChatSurface<C, A, T>
where
    C: ContextProvider,
    A: AuthTokenProvider,
    T: ChatTransport,
{
    pub fn new(config: SurfaceConfig, targets: SurfaceTargets, context: C, auth: A, transport: T) -> Self {
        let history =
            ConversationHistory::with_entries(config.history_limit, config.initial_history.clone());
        let bound_context = context.context().identity().map(str::to_string);
        Self {
            config,
            targets,
            context,
            auth,
            transport,
            on_state_change: None,
            state: Mutex::new(SurfaceState {
                history,
                session_id: None,
                send: SendState::default(),
                epoch: 0,
                reveal_cancel: CancellationToken::new(),
                bound_context,
            }),
        }
    }

    /// Register a hook called after every change of [`SendState`].
    pub fn with_state_hook(mut self, hook: impl Fn(SendState) + Send + Sync + 'static) -> Self {
        self.on_state_change = Some(Box::new(hook));
        self
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn send_state(&self) -> SendState {
        self.lock_state().send
    }

    pub fn is_sending(&self) -> bool {
        self.send_state().is_sending
    }

    pub fn history(&self) -> Vec<ConversationEntry> {
        self.lock_state().history.entries().to_vec()
    }

    pub fn session_id(&self) -> Option<String> {
        self.lock_state().session_id.clone()
    }

    /// Render the current history into the thread and apply the view rules.
    pub fn mount(&self) {
        if let Some(thread) = &self.targets.thread {
            thread.clear();
            for entry in self.history() {
                thread
                    .append(entry.role)
                    .set_formatted(&RenderedMessage::from_raw(entry.content));
            }
        }
        self.refresh();
    }

    /// Send a message and render the reply.
    ///
    /// `message` overrides the input target's value. Never returns an error:
    /// failures end in a status message and `SendOutcome::Failed`, and the
    /// send gate is always released.
    pub async fn send(&self, message: Option<String>) -> SendOutcome {
        let context = self.context.context();
        let raw = match message {
            Some(message) => message,
            None => self
                .targets
                .input
                .as_ref()
                .map(|input| input.value())
                .unwrap_or_default(),
        };
        let text = raw.trim().to_string();

        let admitted = {
            let mut state = self.lock_state();
            self.admit(&mut state, &context, &text)
        };
        let Admitted {
            epoch,
            request,
            cancel,
        } = match admitted {
            Ok(admitted) => admitted,
            Err(reason) => {
                debug!(?reason, "Chat send rejected");
                self.set_status(self.reject_message(reason));
                return SendOutcome::Rejected(reason);
            }
        };

        self.render(ChatRole::User, &text);
        if let Some(input) = &self.targets.input {
            input.clear();
        }
        self.notify();
        self.apply_availability(&context);
        self.apply_empty_state(&context);
        self.set_status(&self.config.messages.sending);
        self.set_typing(true);

        let span = info_span!(
            "chat_send",
            restaurant_id = %request.restaurant_id,
            session_id = %request.session_id,
            history_len = request.history.len(),
        );
        let outcome = self.complete(epoch, request, cancel).instrument(span).await;
        self.finalize(epoch);
        outcome
    }

    /// Clear the conversation and return to `Idle`.
    pub fn reset(&self) {
        let context = self.context.context();
        {
            let mut state = self.lock_state();
            state.history.clear();
            state.send = SendState::default();
            state.session_id = None;
            state.epoch += 1;
            state.reveal_cancel.cancel();
            state.reveal_cancel = CancellationToken::new();
            state.bound_context = context.identity().map(str::to_string);
        }

        if let Some(thread) = &self.targets.thread {
            thread.clear();
        }
        self.set_typing(false);
        self.apply_availability(&context);
        self.apply_empty_state(&context);
        self.set_status("");
        self.notify();
        info!(restaurant_id = ?context.identity(), "Chat surface reset");
    }

    /// Re-apply control availability and empty-state rules.
    ///
    /// Touches neither history nor session.
    pub fn refresh(&self) {
        let context = self.context.context();
        self.apply_availability(&context);
        self.apply_empty_state(&context);
    }

    /// React to a context update: reset when the restaurant id changed,
    /// refresh otherwise.
    pub fn context_changed(&self) {
        let context = self.context.context();
        let changed = {
            let state = self.lock_state();
            state.bound_context.as_deref() != context.identity()
        };
        if changed {
            self.reset();
        } else {
            self.refresh();
        }
    }

    fn admit(
        &self,
        state: &mut SurfaceState,
        context: &ChatContext,
        text: &str,
    ) -> Result<Admitted, RejectReason> {
        if state.send.is_sending {
            return Err(RejectReason::Busy);
        }
        let restaurant_id = context.identity().ok_or(RejectReason::NoContext)?;
        let entry = ConversationEntry::user(text).ok_or(RejectReason::EmptyMessage)?;

        let history = state.history.recent(state.history.history_limit());
        state.history.push(entry);
        state.send = SendState {
            is_sending: true,
            has_interacted: true,
        };
        let session_id = state
            .session_id
            .get_or_insert_with(|| self.config.session_ids.generate())
            .clone();

        Ok(Admitted {
            epoch: state.epoch,
            request: ChatRequest {
                restaurant_id: restaurant_id.to_string(),
                message: text.to_string(),
                history,
                session_id,
            },
            cancel: state.reveal_cancel.clone(),
        })
    }

    async fn complete(&self, epoch: u64, request: ChatRequest, cancel: CancellationToken) -> SendOutcome {
        let options = ExchangeOptions {
            request_path: &self.config.request_path,
            require_auth: self.config.require_auth,
            reply_fallback: &self.config.messages.reply_fallback,
        };
        let result = exchange(&self.auth, &self.transport, &request, options).await;

        if !self.is_current(epoch) {
            info!("Surface reset during send, discarding response");
            return SendOutcome::Discarded;
        }

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "Chat send failed");
                self.set_typing(false);
                let status = if err.is_auth_required() {
                    &self.config.messages.auth_required
                } else {
                    &self.config.messages.generic_failure
                };
                let state = self.lock_state();
                if state.epoch != epoch {
                    return SendOutcome::Discarded;
                }
                self.set_status(status);
                return SendOutcome::Failed(err);
            }
        };

        self.set_typing(false);

        // From here on every write into the thread is decided under the state
        // lock, so a reset either lands before it (and the reply is dropped)
        // or after it (and clears what was written).
        if self.config.stream_replies {
            let node = {
                let state = self.lock_state();
                if state.epoch != epoch {
                    return SendOutcome::Discarded;
                }
                self.targets
                    .thread
                    .as_ref()
                    .map(|thread| thread.append(ChatRole::Assistant))
            };
            let finished =
                stream_formatted_content(node.as_ref(), &reply, &self.config.reveal, &cancel).await;
            if !finished {
                return SendOutcome::Discarded;
            }
        }

        {
            let mut state = self.lock_state();
            if state.epoch != epoch {
                return SendOutcome::Discarded;
            }
            if !self.config.stream_replies {
                self.render(ChatRole::Assistant, &reply);
            }
            if let Some(entry) = ConversationEntry::assistant(reply.clone()) {
                state.history.push(entry);
            }
            self.set_status(&self.config.messages.success);
        }
        debug!(reply_chars = reply.chars().count(), "Chat reply rendered");
        SendOutcome::Replied(reply)
    }

    /// Release the send gate, unless a reset already did.
    fn finalize(&self, epoch: u64) {
        {
            let mut state = self.lock_state();
            if state.epoch != epoch {
                return;
            }
            state.send.is_sending = false;
        }
        self.notify();

        let context = self.context.context();
        self.apply_availability(&context);
        self.apply_empty_state(&context);
        if let Some(input) = &self.targets.input {
            input.focus();
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.lock_state().epoch == epoch
    }

    fn lock_state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self) {
        if let Some(hook) = &self.on_state_change {
            hook(self.send_state());
        }
    }

    fn render(&self, role: ChatRole, content: &str) {
        if let Some(thread) = &self.targets.thread {
            thread
                .append(role)
                .set_formatted(&RenderedMessage::from_raw(content));
        }
    }

    fn apply_availability(&self, context: &ChatContext) {
        let enabled = context.has_identity() && !self.is_sending();
        if let Some(input) = &self.targets.input {
            input.set_enabled(enabled);
            input.set_placeholder(&self.config.placeholder.render(context));
        }
        if let Some(control) = &self.targets.send_control {
            control.set_enabled(enabled);
        }
    }

    fn apply_empty_state(&self, context: &ChatContext) {
        if let Some(empty_state) = &self.targets.empty_state {
            let empty = self.lock_state().history.is_empty();
            empty_state.set_text(&self.config.empty_message.render(context));
            empty_state.set_visible(empty);
        }
    }

    /// Show or hide the typing indicator. Never shown before the first send.
    fn set_typing(&self, visible: bool) {
        if visible && !self.send_state().has_interacted {
            return;
        }
        if let Some(typing) = &self.targets.typing {
            typing.set_visible(visible);
        }
    }

    fn set_status(&self, status: &str) {
        if let Some(view) = &self.targets.status {
            view.set_status(status);
        }
    }

    fn reject_message(&self, reason: RejectReason) -> &str {
        let messages = &self.config.messages;
        match reason {
            RejectReason::Busy => &messages.busy,
            RejectReason::NoContext => &messages.no_context,
            RejectReason::EmptyMessage => &messages.empty_message,
        }
    }
}

impl<C, A, T> ChatSurface<C, A, T>
where
    C: ContextProvider + 'static,
    A: AuthTokenProvider + 'static,
    T: ChatTransport + 'static,
{
    /// Attach the surface to a stream of UI events.
    ///
    /// Each `Submit` runs in its own task so that `Reset` and context
    /// changes are handled while a send is in flight. The listener stops on
    /// `Close` or when every sender is dropped.
    pub fn bind(self: &Arc<Self>, mut events: mpsc::Receiver<SurfaceEvent>) -> JoinHandle<()> {
        let surface = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    SurfaceEvent::Submit(message) => {
                        let surface = Arc::clone(&surface);
                        tokio::spawn(async move {
                            surface.send(message).await;
                        });
                    }
                    SurfaceEvent::Reset => surface.reset(),
                    SurfaceEvent::ContextChanged => surface.context_changed(),
                    SurfaceEvent::Refresh => surface.refresh(),
                    SurfaceEvent::Close => break,
                }
            }
            debug!("Chat surface listener stopped");
        })
    }
}
