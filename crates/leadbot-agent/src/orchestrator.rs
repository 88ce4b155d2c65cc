// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dialogue orchestrator.
//!
//! For every inbound message the orchestrator takes the conversation lock,
//! loads the session, and either advances the capture flow
//! (name → phone → service → date) or answers a free-form query through the
//! intent router and the reasoning service. The session is written back with
//! a conditional save before the lock is released.
//!
//! Every turn yields at least one reply. Business-rule failures become
//! corrective prompts, external-service failures become fallback text, and
//! storage failures become a generic apology.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use leadbot_config::model::LeadbotConfig;
use leadbot_core::{
    Affordance, AfterHoursContact, CatalogReader, CompletionProvider, CompletionRequest,
    ConversationId, DialogueSession, DialogueState, ImageSearch, InboundContent, InboundMessage,
    InsertOutcome, LeadStore, LeadbotError, NewLead, Reply, START_REQUEST_ACTION, Service,
    SessionStore,
};
use leadbot_router::{
    Intent, IntentRouter, RoutingDecision, build_system_prompt, extract_image_markers,
    has_visual_request,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, OfficeHours};
use crate::dates::{DateResolution, DateResolver};
use crate::locks::SessionLocks;
use crate::replies;
use crate::validation::{
    CheckError, PersistenceConflict, ValidationError, check_duplicate_booking,
    check_phone_ownership, validate_date_range, validate_name, validate_phone,
    validate_service_selection,
};

const START_COMMAND: &str = "/solicitar";
const CANCEL_COMMAND: &str = "/cancelar";
const CANCEL_WORD: &str = "cancelar";

/// External collaborators injected at construction.
#[derive(Clone)]
pub struct Collaborators {
    pub sessions: Arc<dyn SessionStore>,
    pub leads: Arc<dyn LeadStore>,
    pub catalog: Arc<dyn CatalogReader>,
    pub provider: Arc<dyn CompletionProvider>,
    /// `None` when image search is disabled.
    pub images: Option<Arc<dyn ImageSearch>>,
    pub clock: Arc<dyn Clock>,
}

/// Why a capture step did not advance.
#[derive(Debug, Error)]
enum StepError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Conflict(#[from] PersistenceConflict),
    #[error("date could not be resolved")]
    DateUnresolved,
    #[error(transparent)]
    Store(#[from] LeadbotError),
}

impl From<CheckError> for StepError {
    fn from(e: CheckError) -> Self {
        match e {
            CheckError::Conflict(c) => StepError::Conflict(c),
            CheckError::Store(e) => StepError::Store(e),
        }
    }
}

/// Replies produced by one turn.
#[derive(Debug)]
struct Turn {
    replies: Vec<Reply>,
    /// A lead row was inserted during this turn.
    lead_committed: bool,
}

impl Turn {
    fn committed(text: String) -> Self {
        Self {
            replies: vec![Reply::text(text)],
            lead_committed: true,
        }
    }
}

impl From<Vec<Reply>> for Turn {
    fn from(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            lead_committed: false,
        }
    }
}

impl From<String> for Turn {
    fn from(text: String) -> Self {
        vec![Reply::text(text)].into()
    }
}

/// What the user asked the flow to do, before field capture.
#[derive(Debug, PartialEq, Eq)]
enum FlowCommand {
    Start,
    Cancel,
}

pub struct Orchestrator {
    sessions: Arc<dyn SessionStore>,
    leads: Arc<dyn LeadStore>,
    catalog: Arc<dyn CatalogReader>,
    provider: Arc<dyn CompletionProvider>,
    images: Option<Arc<dyn ImageSearch>>,
    clock: Arc<dyn Clock>,
    router: IntentRouter,
    dates: DateResolver,
    locks: SessionLocks,
    office_hours: OfficeHours,
    closed_message: String,
    max_tokens: u32,
    temperature: f32,
    provider_timeout: Duration,
    image_timeout: Duration,
}

impl Orchestrator {
    pub fn new(deps: Collaborators, config: &LeadbotConfig) -> Self {
        let provider_timeout = Duration::from_secs(config.openai.timeout_secs);
        let router = IntentRouter::new(config.routing.clone())
            .with_provider(deps.provider.clone(), provider_timeout);
        let dates = DateResolver::new(deps.provider.clone(), provider_timeout);

        Self {
            sessions: deps.sessions,
            leads: deps.leads,
            catalog: deps.catalog,
            provider: deps.provider,
            images: deps.images,
            clock: deps.clock,
            router,
            dates,
            locks: SessionLocks::new(),
            office_hours: OfficeHours::from(&config.office_hours),
            closed_message: config.office_hours.closed_message.clone(),
            max_tokens: config.openai.max_tokens,
            temperature: config.openai.temperature,
            provider_timeout,
            image_timeout: Duration::from_secs(config.images.timeout_secs),
        }
    }

    /// Process one inbound message and return the replies to send, in order.
    pub async fn handle(&self, msg: &InboundMessage) -> Vec<Reply> {
        let conversation_id = &msg.conversation_id;
        let _guard = self.locks.acquire(conversation_id).await;

        let mut session = match self.sessions.load(conversation_id).await {
            Ok(session) => session,
            Err(e) => {
                error!(%conversation_id, error = %e, "failed to load dialogue session");
                return vec![Reply::text(replies::ERROR_APOLOGY)];
            }
        };
        let before = session.clone();

        let turn = match self.dispatch(msg, &mut session).await {
            Ok(turn) => turn,
            Err(e) => {
                error!(
                    %conversation_id,
                    state = %before.state,
                    field = before.state.field().unwrap_or("-"),
                    error = %e,
                    "turn failed"
                );
                return vec![Reply::text(replies::ERROR_APOLOGY)];
            }
        };

        // Free-form turns outside the flow leave nothing to persist.
        if session == before && !before.is_active() {
            return turn.replies;
        }

        match self.sessions.save(conversation_id, &session).await {
            Ok(version) => {
                debug!(%conversation_id, state = %session.state, version, "session saved");
                turn.replies
            }
            // The lead is already stored; a resend would only hit the duplicate check.
            Err(LeadbotError::SessionConflict { .. }) if turn.lead_committed => {
                warn!(
                    %conversation_id,
                    state = %before.state,
                    "session modified concurrently after the lead was stored, confirming anyway"
                );
                turn.replies
            }
            Err(LeadbotError::SessionConflict { .. }) => {
                warn!(
                    %conversation_id,
                    state = %session.state,
                    "session modified concurrently, asking user to resend"
                );
                vec![Reply::text(replies::SESSION_CONFLICT)]
            }
            Err(e) if turn.lead_committed => {
                error!(%conversation_id, error = %e, "failed to save dialogue session after the lead was stored");
                turn.replies
            }
            Err(e) => {
                error!(%conversation_id, state = %session.state, error = %e, "failed to save dialogue session");
                vec![Reply::text(replies::ERROR_APOLOGY)]
            }
        }
    }

    async fn dispatch(
        &self,
        msg: &InboundMessage,
        session: &mut DialogueSession,
    ) -> Result<Turn, LeadbotError> {
        let text = match &msg.content {
            InboundContent::Action(action) if action == START_REQUEST_ACTION => {
                return self.start_flow(&msg.conversation_id, session).await.map(Turn::from);
            }
            InboundContent::Action(action) => {
                debug!(conversation_id = %msg.conversation_id, action, "ignoring unknown action");
                return Ok(vec![Reply::text(replies::UNKNOWN_ACTION)].into());
            }
            InboundContent::Text(text) => text.as_str(),
        };

        match flow_command(text, session.is_active()) {
            Some(FlowCommand::Start) => {
                self.start_flow(&msg.conversation_id, session).await.map(Turn::from)
            }
            Some(FlowCommand::Cancel) => Ok(vec![cancel_flow(&msg.conversation_id, session)].into()),
            None if session.is_active() => self.capture(&msg.conversation_id, session, text).await,
            None => self.free_form(msg, text).await.map(Turn::from),
        }
    }

    async fn start_flow(
        &self,
        conversation_id: &ConversationId,
        session: &mut DialogueSession,
    ) -> Result<Vec<Reply>, LeadbotError> {
        if self.catalog.services().await?.is_empty() {
            info!(%conversation_id, "request flow not started: catalog is empty");
            return Ok(vec![Reply::text(replies::NO_SERVICES)]);
        }
        if session.is_active() {
            debug!(%conversation_id, state = %session.state, "restarting request flow");
        }
        session.begin();
        info!(%conversation_id, "request flow started");
        Ok(vec![Reply::text(replies::ASK_NAME)])
    }

    /// Feed `text` to the field the session is waiting on.
    async fn capture(
        &self,
        conversation_id: &ConversationId,
        session: &mut DialogueSession,
        text: &str,
    ) -> Result<Turn, LeadbotError> {
        let state = session.state;
        let services = self.catalog.services().await?;

        let outcome = match state {
            DialogueState::CollectingName => capture_name(session, text).map(Turn::from),
            DialogueState::CollectingPhone => {
                self.capture_phone(session, text, &services).await.map(Turn::from)
            }
            DialogueState::CollectingService => {
                capture_service(session, text, &services).map(Turn::from)
            }
            DialogueState::CollectingDate => self.capture_date(conversation_id, session, text).await,
            DialogueState::None => return Err(LeadbotError::Internal("capture outside flow".into())),
        };

        match outcome {
            Ok(turn) => {
                debug!(%conversation_id, from = %state, to = %session.state, "flow advanced");
                Ok(turn)
            }
            Err(StepError::Store(e)) => return Err(e),
            Err(rejection) => {
                info!(
                    %conversation_id,
                    state = %state,
                    field = state.field().unwrap_or("-"),
                    reason = %rejection,
                    "field rejected"
                );
                Ok(corrective_prompt(rejection, &services).into())
            }
        }
    }

    async fn capture_phone(
        &self,
        session: &mut DialogueSession,
        text: &str,
        services: &[Service],
    ) -> Result<String, StepError> {
        let phone = validate_phone(text)?;
        let name = session.name.clone().unwrap_or_default();
        check_phone_ownership(self.leads.as_ref(), &phone, &name).await?;
        session.phone = Some(phone);
        session.state = DialogueState::CollectingService;
        Ok(replies::ask_service(services))
    }

    async fn capture_date(
        &self,
        conversation_id: &ConversationId,
        session: &mut DialogueSession,
        text: &str,
    ) -> Result<Turn, StepError> {
        let (Some(name), Some(phone), Some(service)) =
            (session.name.clone(), session.phone.clone(), session.service.clone())
        else {
            warn!(%conversation_id, "date step reached with missing scratch, resetting flow");
            session.reset();
            return Ok(replies::FLOW_RESTART.to_string().into());
        };

        let today = self.clock.today();
        let date = match self.dates.resolve(text, today).await {
            DateResolution::Resolved { date, source } => {
                debug!(%conversation_id, %date, ?source, "appointment date resolved");
                date
            }
            DateResolution::Failed => return Err(StepError::DateUnresolved),
        };

        validate_date_range(date, today)?;
        check_duplicate_booking(self.leads.as_ref(), &name, &phone, service.id, date).await?;
        self.insert_lead(conversation_id, &name, &phone, &service, date)
            .await?;

        session.reset();
        Ok(Turn::committed(replies::confirmation(
            &name,
            &phone,
            &service.name,
            date,
        )))
    }

    async fn insert_lead(
        &self,
        conversation_id: &ConversationId,
        name: &str,
        phone: &str,
        service: &Service,
        date: NaiveDate,
    ) -> Result<(), StepError> {
        let lead = NewLead {
            conversation_id: conversation_id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            service_id: service.id,
            service_name: service.name.clone(),
            appointment_date: date,
        };
        match self.leads.insert_lead_if_absent(&lead).await? {
            InsertOutcome::Inserted(lead) => {
                info!(
                    %conversation_id,
                    lead_id = lead.id,
                    service = %lead.service_name,
                    date = %lead.appointment_date,
                    "lead persisted"
                );
                Ok(())
            }
            InsertOutcome::Duplicate => Err(PersistenceConflict::DuplicateBooking.into()),
        }
    }

    /// Answer a message from a conversation that is not in the flow.
    async fn free_form(&self, msg: &InboundMessage, text: &str) -> Result<Vec<Reply>, LeadbotError> {
        let conversation_id = &msg.conversation_id;

        if !self.office_hours.is_open(self.clock.now()) {
            let contact = AfterHoursContact {
                conversation_id: conversation_id.to_string(),
                username: msg.sender.username.clone(),
                display_name: msg.sender.display_name.clone(),
                message: text.to_string(),
            };
            if let Err(e) = self.leads.record_after_hours_contact(&contact).await {
                warn!(%conversation_id, error = %e, "failed to record after-hours contact");
            }
            info!(%conversation_id, "message received outside office hours");
            return Ok(vec![Reply::text(self.closed_message.clone())]);
        }

        let persona = self.catalog.persona().await?;
        let services = self.catalog.services().await?;
        let decision = self.router.route(text, &services, &persona.topic).await;
        debug!(
            %conversation_id,
            intent = %decision.intent,
            source = ?decision.source,
            reason = %decision.reason,
            "message routed"
        );

        if decision.intent == Intent::Greeting {
            return Ok(vec![Reply::text(replies::greeting(&persona, &services))]);
        }

        let request = CompletionRequest {
            system: build_system_prompt(&persona, &services),
            user: text.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let answer = match self.complete(request).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(%conversation_id, intent = %decision.intent, error = %e, "reasoning service unavailable, sending fallback");
                return Ok(vec![text_reply(replies::PROVIDER_FALLBACK, &decision)]);
            }
        };

        let markers = extract_image_markers(&answer);
        let mut out = Vec::with_capacity(2);
        if !markers.text.is_empty() {
            out.push(text_reply(&markers.text, &decision));
        }

        if let Some(phrase) = markers.first_phrase() {
            if has_visual_request(text) {
                out.push(self.image_reply(conversation_id, phrase).await);
            } else {
                debug!(%conversation_id, phrase, "dropping image marker without visual request");
            }
        }

        if out.is_empty() {
            out.push(text_reply(replies::PROVIDER_FALLBACK, &decision));
        }
        Ok(out)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LeadbotError> {
        match tokio::time::timeout(self.provider_timeout, self.provider.complete(request)).await {
            Ok(result) => result.map(|r| r.text),
            Err(_) => Err(LeadbotError::Timeout {
                duration: self.provider_timeout,
            }),
        }
    }

    async fn image_reply(&self, conversation_id: &ConversationId, phrase: &str) -> Reply {
        let Some(images) = self.images.as_ref() else {
            debug!(%conversation_id, "image search disabled");
            return Reply::text(replies::NO_IMAGE);
        };

        match tokio::time::timeout(self.image_timeout, images.search(phrase)).await {
            Ok(Ok(Some(url))) => {
                debug!(%conversation_id, phrase, %url, "image found");
                Reply::Image { url, caption: None }
            }
            Ok(Ok(None)) => {
                debug!(%conversation_id, phrase, "image search returned nothing");
                Reply::text(replies::NO_IMAGE)
            }
            Ok(Err(e)) => {
                warn!(%conversation_id, phrase, error = %e, "image search failed");
                Reply::text(replies::NO_IMAGE)
            }
            Err(_) => {
                warn!(%conversation_id, phrase, timeout = ?self.image_timeout, "image search timed out");
                Reply::text(replies::NO_IMAGE)
            }
        }
    }
}

fn capture_name(session: &mut DialogueSession, text: &str) -> Result<String, StepError> {
    let name = validate_name(text)?;
    let reply = replies::ask_phone(&name);
    session.name = Some(name);
    session.state = DialogueState::CollectingPhone;
    Ok(reply)
}

fn capture_service(
    session: &mut DialogueSession,
    text: &str,
    services: &[Service],
) -> Result<String, StepError> {
    let service = validate_service_selection(text, services)?;
    let reply = replies::ask_date(&service);
    session.service = Some(service);
    session.state = DialogueState::CollectingDate;
    Ok(reply)
}

fn corrective_prompt(rejection: StepError, services: &[Service]) -> String {
    match rejection {
        StepError::Invalid(v) => replies::invalid_field(v, services),
        StepError::Conflict(c) => replies::conflict(c),
        StepError::DateUnresolved => replies::DATE_UNRESOLVED.to_string(),
        StepError::Store(_) => replies::ERROR_APOLOGY.to_string(),
    }
}

fn cancel_flow(conversation_id: &ConversationId, session: &mut DialogueSession) -> Reply {
    if !session.is_active() {
        return Reply::text(replies::NOTHING_TO_CANCEL);
    }
    info!(%conversation_id, state = %session.state, "request flow cancelled");
    session.reset();
    Reply::text(replies::CANCELLED)
}

fn text_reply(text: &str, decision: &RoutingDecision) -> Reply {
    if decision.offers_request() {
        Reply::text_with(text, Affordance::StartRequest)
    } else {
        Reply::text(text)
    }
}

/// Recognizes `/solicitar`, `/cancelar` (with an optional `@botname`
/// suffix) and, mid-flow, the bare word "cancelar".
fn flow_command(text: &str, in_flow: bool) -> Option<FlowCommand> {
    let trimmed = text.trim();
    let first = trimmed.split_whitespace().next().unwrap_or_default();
    let command = first.split('@').next().unwrap_or_default().to_lowercase();

    if command == START_COMMAND {
        return Some(FlowCommand::Start);
    }
    if command == CANCEL_COMMAND || (in_flow && trimmed.to_lowercase() == CANCEL_WORD) {
        return Some(FlowCommand::Cancel);
    }
    None
}
