use super::*;

/// A parsed document plus the listener, mock and trace state that a browser
/// tab would carry.
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) document_url: String,
    pub(crate) ready_state: ReadyState,
    pub(crate) load_listeners: Vec<LoadListener>,
    pub(crate) submit_listeners: Vec<SubmitListener>,
    pub(crate) platform_mocks: PlatformMockState,
    pub(crate) trace_state: TraceState,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("document_url", &self.document_url)
            .field("ready_state", &self.ready_state)
            .field("load_listeners", &self.load_listeners.len())
            .field("submit_listeners", &self.submit_listeners)
            .finish_non_exhaustive()
    }
}

const DEFAULT_DOCUMENT_URL: &str = "about:blank";

impl Page {
    /// Parses `html` and leaves the page in [`ReadyState::Loading`] so load
    /// listeners can still be registered.
    pub fn parse(html: &str) -> Result<Self> {
        Self::parse_with_url(DEFAULT_DOCUMENT_URL, html)
    }

    pub fn parse_with_url(url: &str, html: &str) -> Result<Self> {
        let dom = parse_html(html)?;
        Ok(Self {
            dom,
            document_url: url.to_string(),
            ready_state: ReadyState::Loading,
            load_listeners: Vec::new(),
            submit_listeners: Vec::new(),
            platform_mocks: PlatformMockState::default(),
            trace_state: TraceState::default(),
        })
    }

    /// Parses `html` and fires DOMContentLoaded immediately.
    pub fn from_html(html: &str) -> Result<Self> {
        let mut page = Self::parse(html)?;
        page.finish_loading()?;
        Ok(page)
    }

    pub fn url(&self) -> &str {
        &self.document_url
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Registers a DOMContentLoaded listener. On a page that already
    /// finished loading the listener runs right away.
    pub fn add_load_listener(
        &mut self,
        listener: impl FnOnce(&mut Page) -> Result<()> + 'static,
    ) -> Result<()> {
        match self.ready_state {
            ReadyState::Loading => {
                self.load_listeners.push(Box::new(listener));
                Ok(())
            }
            ReadyState::Interactive => listener(self),
        }
    }

    /// Fires DOMContentLoaded. Subsequent calls are no-ops.
    pub fn finish_loading(&mut self) -> Result<()> {
        if self.ready_state == ReadyState::Interactive {
            return Ok(());
        }
        self.ready_state = ReadyState::Interactive;
        let listeners = std::mem::take(&mut self.load_listeners);
        self.trace(format!(
            "[event] DOMContentLoaded listeners={}",
            listeners.len()
        ));
        for listener in listeners {
            listener(self)?;
        }
        Ok(())
    }

    pub fn add_submit_listener(&mut self, form: NodeId, guard: Rc<dyn SubmitGuard>) -> Result<()> {
        if !self.dom.has_tag(form, "form") {
            return Err(Error::TypeMismatch {
                selector: self.dom.node_label(form),
                expected: "form".into(),
                actual: self.dom.tag_name(form).unwrap_or("node").to_string(),
            });
        }
        self.trace(format!(
            "[listener] add submit {} on {}",
            guard.name(),
            self.dom.node_label(form)
        ));
        self.submit_listeners.push(SubmitListener { form, guard });
        Ok(())
    }

    pub fn submit_listener_count(&self) -> usize {
        self.submit_listeners.len()
    }
}

// Lookups used by guards. Absent elements come back as `None`.
impl Page {
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.dom.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    /// First element inside `scope` (excluding `scope` itself) matching
    /// `selector`.
    pub fn query_selector_within(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        self.dom.query_selector_from(scope, selector)
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.by_id(id)
    }

    /// Current value of the form control with the given id. Elements that
    /// are not form controls have no value.
    pub fn control_value_by_id(&self, id: &str) -> Option<String> {
        let node = self.dom.by_id(id)?;
        self.node_value(node)
    }

    /// Current value of the first `<select name=...>` in the document.
    pub fn select_value_by_name(&self, name: &str) -> Result<Option<String>> {
        let selector = format!("select[name={}]", css_string_literal(name));
        Ok(self
            .dom
            .query_selector(&selector)?
            .and_then(|node| self.node_value(node)))
    }

    pub fn node_value(&self, node: NodeId) -> Option<String> {
        if !is_form_control(&self.dom, node) && !self.dom.has_tag(node, "option") {
            return None;
        }
        self.dom.value(node).ok()
    }

    pub fn node_text(&self, node: NodeId) -> String {
        self.dom.text_content(node)
    }

    pub fn set_node_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.dom.set_text_content(node, text)
    }

    pub fn node_disabled(&self, node: NodeId) -> bool {
        self.dom.disabled(node)
    }

    pub fn set_node_disabled(&mut self, node: NodeId, disabled: bool) -> Result<()> {
        self.dom.set_disabled(node, disabled)
    }

    /// Shows a blocking alert. The page model records the message instead
    /// of waiting for a user.
    pub fn alert(&mut self, message: &str) {
        tracing::info!(target: "bus_pass_guard::alert", text = message, "alert");
        self.trace(format!("[alert] {message}"));
        self.platform_mocks.alert_messages.push(message.to_string());
    }

    pub fn console_log(&mut self, message: &str) {
        tracing::info!(target: "bus_pass_guard::console", text = message, "console.log");
        self.trace(format!("[console] {message}"));
        self.platform_mocks
            .console_messages
            .push(message.to_string());
    }

    pub(crate) fn trace(&mut self, line: String) {
        self.trace_state.push(line);
    }
}

// User actions.
impl Page {
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let is_text_control = self.dom.has_tag(target, "textarea")
            || (self.dom.has_tag(target, "input")
                && !matches!(
                    input_type(&self.dom, target).as_str(),
                    "checkbox" | "radio" | "submit" | "button" | "reset" | "image" | "file"
                ));
        if !is_text_control {
            return Err(self.type_mismatch(selector, target, "text input"));
        }
        if self.dom.disabled(target) || self.dom.attr(target, "readonly").is_some() {
            return Ok(());
        }
        self.dom.set_value(target, text)
    }

    /// Selects the first option whose value equals `value`. An unknown value
    /// leaves the select with no selected option and an empty value.
    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !self.dom.has_tag(target, "select") {
            return Err(self.type_mismatch(selector, target, "select"));
        }
        if self.dom.disabled(target) {
            return Ok(());
        }
        self.dom.set_select_value(target, value)
    }

    /// Clicks an element. Clicking an enabled submit control submits its
    /// form owner and returns the outcome.
    pub fn click(&mut self, selector: &str) -> Result<Option<SubmitOutcome>> {
        let target = self.select_one(selector)?;
        self.trace(format!("[event] click target={}", self.dom.node_label(target)));
        if self.dom.disabled(target) || !is_submit_control(&self.dom, target) {
            return Ok(None);
        }
        let Some(form) = self.resolve_form_owner(target) else {
            return Ok(None);
        };
        self.request_form_submit(form, Some(target)).map(Some)
    }

    /// Requests submission of the form addressed by `selector`, or of the
    /// form owning the addressed control.
    pub fn submit(&mut self, selector: &str) -> Result<SubmitOutcome> {
        let target = self.select_one(selector)?;
        let form = self.resolve_form_owner(target).ok_or_else(|| {
            Error::DomRuntime(format!("{selector} is not associated with a form"))
        })?;
        self.request_form_submit(form, None)
    }

    pub(crate) fn request_form_submit(
        &mut self,
        form: NodeId,
        submitter: Option<NodeId>,
    ) -> Result<SubmitOutcome> {
        let skip_validation = self.dom.attr(form, "novalidate").is_some()
            || submitter.is_some_and(|node| self.dom.attr(node, "formnovalidate").is_some());
        if !skip_validation {
            if let Some(control) = self.first_invalid_control(form)? {
                self.trace(format!(
                    "[event] invalid target={} control={}",
                    self.dom.node_label(form),
                    self.dom.node_label(control)
                ));
                return Ok(SubmitOutcome::Invalid { control });
            }
        }

        let mut event = SubmitEvent::new(form, submitter);
        let label = self.dom.node_label(form);
        self.trace(format!("[event] submit target={label}"));

        let listeners = self
            .submit_listeners
            .iter()
            .filter(|listener| listener.form == form)
            .cloned()
            .collect::<Vec<_>>();
        for listener in listeners {
            listener.guard.on_submit(self, &mut event)?;
        }

        self.trace(format!(
            "[event] done submit target={label} default_prevented={}",
            event.default_prevented
        ));
        tracing::debug!(
            form = %label,
            default_prevented = event.default_prevented,
            "submit dispatched"
        );

        if event.default_prevented {
            return Ok(SubmitOutcome::Blocked);
        }

        let submission = FormSubmission {
            action: self
                .dom
                .attr(form, "action")
                .filter(|action| !action.is_empty())
                .unwrap_or_else(|| self.document_url.clone()),
            method: self
                .dom
                .attr(form, "method")
                .map(|method| method.to_ascii_lowercase())
                .filter(|method| method == "post" || method == "dialog")
                .unwrap_or_else(|| "get".into()),
            entries: self.form_data_entries(form, submitter)?,
        };
        self.platform_mocks.submissions.push(submission.clone());
        Ok(SubmitOutcome::Submitted(submission))
    }

    fn resolve_form_owner(&self, target: NodeId) -> Option<NodeId> {
        if self.dom.has_tag(target, "form") {
            return Some(target);
        }
        if let Some(form_id) = self.dom.attr(target, "form") {
            return self
                .dom
                .by_id(&form_id)
                .filter(|owner| self.dom.has_tag(*owner, "form"));
        }
        self.dom.find_ancestor_by_tag(target, "form")
    }

    fn form_elements(&self, form: NodeId) -> Vec<NodeId> {
        self.dom
            .all_element_nodes()
            .into_iter()
            .filter(|node| is_form_control(&self.dom, *node))
            .filter(|node| self.resolve_form_owner(*node) == Some(form))
            .collect()
    }

    fn first_invalid_control(&self, form: NodeId) -> Result<Option<NodeId>> {
        for control in self.form_elements(form) {
            if self.dom.disabled(control) || !self.dom.required(control) {
                continue;
            }
            if self.dom.has_tag(control, "input") {
                let kind = input_type(&self.dom, control);
                if matches!(
                    kind.as_str(),
                    "hidden" | "range" | "color" | "button" | "submit" | "reset" | "image"
                ) {
                    continue;
                }
                if kind == "checkbox" || kind == "radio" {
                    if self.dom.attr(control, "checked").is_none() {
                        return Ok(Some(control));
                    }
                    continue;
                }
            }
            if self.dom.has_tag(control, "button") {
                continue;
            }
            if self.dom.value(control)?.is_empty() {
                return Ok(Some(control));
            }
        }
        Ok(None)
    }

    fn form_data_entries(
        &self,
        form: NodeId,
        submitter: Option<NodeId>,
    ) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for control in self.form_elements(form) {
            let name = self.dom.attr(control, "name").unwrap_or_default();
            if name.is_empty() || self.dom.disabled(control) {
                continue;
            }
            if is_submit_control(&self.dom, control) || self.dom.has_tag(control, "button") {
                if Some(control) == submitter {
                    out.push((name, self.dom.value(control)?));
                }
                continue;
            }
            if self.dom.has_tag(control, "input") {
                match input_type(&self.dom, control).as_str() {
                    "reset" | "file" => continue,
                    "checkbox" | "radio" => {
                        if self.dom.attr(control, "checked").is_some() {
                            let value = self
                                .dom
                                .attr(control, "value")
                                .unwrap_or_else(|| "on".into());
                            out.push((name, value));
                        }
                        continue;
                    }
                    _ => {}
                }
            }
            if self.dom.has_tag(control, "select") {
                let mut options = Vec::new();
                self.dom.collect_select_options(control, &mut options);
                if !options
                    .iter()
                    .any(|option| self.dom.element(*option).is_some_and(|e| e.selected))
                {
                    continue;
                }
            }
            out.push((name, self.dom.value(control)?));
        }
        Ok(out)
    }
}

// Inspection and assertions.
impl Page {
    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn is_disabled(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.disabled(target))
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(self.assertion_failed(selector, target, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual != expected {
            return Err(self.assertion_failed(selector, target, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_disabled(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.disabled(target);
        if actual != expected {
            return Err(self.assertion_failed(
                selector,
                target,
                &expected.to_string(),
                &actual.to_string(),
            ));
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    pub fn take_alert_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.platform_mocks.alert_messages)
    }

    pub fn take_console_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.platform_mocks.console_messages)
    }

    pub fn take_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.platform_mocks.submissions)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Config(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > max_entries {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn assertion_failed(&self, selector: &str, target: NodeId, expected: &str, actual: &str) -> Error {
        Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            dom_snippet: self.node_snippet(target),
        }
    }

    fn type_mismatch(&self, selector: &str, target: NodeId, expected: &str) -> Error {
        Error::TypeMismatch {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual: self.dom.tag_name(target).unwrap_or("node").to_string(),
        }
    }
}
