use super::*;

/// The cancelable `submit` event handed to each guard.
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    pub(crate) form: NodeId,
    pub(crate) submitter: Option<NodeId>,
    pub(crate) default_prevented: bool,
}

impl SubmitEvent {
    pub(crate) fn new(form: NodeId, submitter: Option<NodeId>) -> Self {
        Self {
            form,
            submitter,
            default_prevented: false,
        }
    }

    /// The form being submitted.
    pub fn form(&self) -> NodeId {
        self.form
    }

    /// The button that triggered the submission, if it came from a click.
    pub fn submitter(&self) -> Option<NodeId> {
        self.submitter
    }

    /// Suppresses the browser's native submission for this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Navigation recorded when a submission was not suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: String,
    pub method: String,
    pub entries: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn entry(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No listener suppressed the event and the form was sent.
    Submitted(FormSubmission),
    /// A listener called [`SubmitEvent::prevent_default`].
    Blocked,
    /// Native constraint validation failed before `submit` was dispatched.
    Invalid { control: NodeId },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
}

#[derive(Debug, Default)]
pub(crate) struct PlatformMockState {
    pub(crate) alert_messages: Vec<String>,
    pub(crate) console_messages: Vec<String>,
    pub(crate) submissions: Vec<FormSubmission>,
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

impl TraceState {
    pub(crate) fn push(&mut self, line: String) {
        tracing::debug!(target: "bus_pass_guard::trace", "{line}");
        if !self.enabled {
            return;
        }
        self.logs.push_back(line);
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
    }
}

pub(crate) type LoadListener = Box<dyn FnOnce(&mut Page) -> Result<()>>;

#[derive(Clone)]
pub(crate) struct SubmitListener {
    pub(crate) form: NodeId,
    pub(crate) guard: Rc<dyn SubmitGuard>,
}

impl fmt::Debug for SubmitListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitListener")
            .field("form", &self.form)
            .field("guard", &self.guard.name())
            .finish()
    }
}
