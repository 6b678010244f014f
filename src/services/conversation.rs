use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::AgentError;
use crate::models::{ClinicFunction, Conversation, Reply, Role};
use crate::services::ai::functions::clinic_functions;
use crate::services::ai::{FunctionSpec, LlmProvider};
use crate::services::scheduling::SlotRegistry;

pub const CONFIRMATION_PHRASE: &str = "appointment has been successfully booked";
pub const BOOKED_REPLY: &str = "Your appointment has been successfully booked.";

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt + 1`: doubles from `base_delay`,
    /// never exceeding `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reply: String,
    pub finished: bool,
}

/// One caller's booking session: the transcript, the slots booked so far and
/// the model that drives the dialogue.
pub struct Session {
    llm: Box<dyn LlmProvider>,
    functions: Vec<FunctionSpec>,
    conversation: Conversation,
    registry: SlotRegistry,
    retry: RetryPolicy,
    clinic_name: String,
}

impl Session {
    pub fn new(
        llm: Box<dyn LlmProvider>,
        system_prompt: impl Into<String>,
        clinic_name: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            functions: clinic_functions(),
            conversation: Conversation::new(system_prompt),
            registry: SlotRegistry::new(),
            retry: RetryPolicy::default(),
            clinic_name: clinic_name.into(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SlotRegistry {
        &mut self.registry
    }

    /// Runs one caller utterance through the model and returns what the
    /// agent says back.
    pub async fn handle_turn(&mut self, input: &str) -> Result<TurnOutcome, AgentError> {
        self.conversation.append(Role::User, input);

        let reply = match self.request_completion().await? {
            Reply::Text(text) => text,
            Reply::Invocation(invocation) => {
                let function = ClinicFunction::try_from(&invocation)?;
                self.execute(function)
            }
        };

        self.conversation.append(Role::Assistant, reply.clone());
        let finished = is_confirmation(&reply);

        Ok(TurnOutcome { reply, finished })
    }

    /// Drives the console dialogue until a booking is confirmed or input ends.
    pub async fn run<R, W>(&mut self, mut input: R, mut output: W) -> Result<(), AgentError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let greeting = format!("Agent: Hello and welcome to {}!\n", self.clinic_name);
        output.write_all(greeting.as_bytes()).await?;

        let mut buf = Vec::new();
        loop {
            output.write_all(b"Caller: ").await?;
            output.flush().await?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                tracing::info!("input closed, ending session");
                return Ok(());
            }
            // Stray non-UTF-8 bytes from the terminal become U+FFFD.
            let line = String::from_utf8_lossy(&buf);

            let outcome = self.handle_turn(line.trim()).await?;
            output
                .write_all(format!("Agent: {}\n", outcome.reply).as_bytes())
                .await?;
            output.flush().await?;

            if outcome.finished {
                for booking in self.registry.bookings() {
                    tracing::info!(
                        id = %booking.id,
                        doctor = %booking.slot.doctor_name,
                        date = %booking.slot.date,
                        time = %booking.slot.time,
                        "booked this session"
                    );
                }
                tracing::info!(bookings = self.registry.len(), "booking confirmed, ending session");
                return Ok(());
            }
        }
    }

    async fn request_completion(&self) -> Result<Reply, AgentError> {
        let mut attempt = 0;
        loop {
            match self
                .llm
                .complete(self.conversation.snapshot(), &self.functions)
                .await
            {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, ?delay, "completion failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn execute(&mut self, function: ClinicFunction) -> String {
        tracing::info!(function = function.name(), "executing function call");

        match function {
            ClinicFunction::CheckAvailability(slot) => {
                if self.registry.is_available(&slot) {
                    format!(
                        "The doctor is available on {} at {}. Would you like to book this slot?",
                        slot.date, slot.time
                    )
                } else {
                    format!(
                        "Sorry, the doctor is not available on {} at {}.",
                        slot.date, slot.time
                    )
                }
            }
            ClinicFunction::StoreAppointment(slot) => {
                let booking = self.registry.book(slot);
                tracing::info!(
                    id = %booking.id,
                    doctor = %booking.slot.doctor_name,
                    date = %booking.slot.date,
                    time = %booking.slot.time,
                    "appointment stored"
                );
                BOOKED_REPLY.to_string()
            }
        }
    }
}

pub fn is_confirmation(text: &str) -> bool {
    text.to_lowercase().contains(CONFIRMATION_PHRASE)
}
