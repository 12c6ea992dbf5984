use super::*;

/// Console line written once the guards are wired up.
pub const BOOT_MESSAGE: &str = "Bus Pass System Frontend Initialized.";

/// Which guards found their form during installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstalledGuards {
    pub registration: bool,
    pub payment: bool,
    pub route_selection: bool,
}

impl InstalledGuards {
    pub fn count(&self) -> usize {
        [self.registration, self.payment, self.route_selection]
            .into_iter()
            .filter(|installed| *installed)
            .count()
    }
}

/// Page-load bootstrap that finds the bus pass forms and attaches a guard
/// to each one present. Forms that are absent are skipped silently.
#[derive(Debug, Clone)]
pub struct FormGuard {
    config: GuardConfig,
    policy: RegistrationPolicy,
}

impl FormGuard {
    pub fn new(config: GuardConfig) -> Result<Self> {
        config.validate()?;
        let policy = RegistrationPolicy::new(&config.registration)?;
        Ok(Self { config, policy })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(GuardConfig::default())
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Defers [`FormGuard::install`] to the page's DOMContentLoaded, or runs
    /// it now if the page already loaded.
    pub fn attach(&self, page: &mut Page) -> Result<()> {
        let guard = self.clone();
        page.add_load_listener(move |page| guard.install(page).map(|_| ()))
    }

    /// Parses `html`, attaches the guards and finishes loading.
    pub fn load_page(&self, html: &str) -> Result<Page> {
        let mut page = Page::parse(html)?;
        self.attach(&mut page)?;
        page.finish_loading()?;
        Ok(page)
    }

    pub fn install(&self, page: &mut Page) -> Result<InstalledGuards> {
        page.console_log(BOOT_MESSAGE);

        let mut installed = InstalledGuards::default();

        if let Some(form) = find_form(page, &self.config.registration.action_fragment)? {
            let guard = RegistrationGuard::with_policy(
                self.config.registration.clone(),
                self.policy.clone(),
            );
            page.add_submit_listener(form, Rc::new(guard))?;
            installed.registration = true;
        }

        if let Some(form) = find_form(page, &self.config.payment.action_fragment)? {
            let guard = PaymentGuard::new(self.config.payment.clone());
            page.add_submit_listener(form, Rc::new(guard))?;
            installed.payment = true;
        }

        if let Some(form) = find_form(page, &self.config.route.action_fragment)? {
            let guard = RouteSelectionGuard::new(self.config.route.clone());
            page.add_submit_listener(form, Rc::new(guard))?;
            installed.route_selection = true;
        }

        tracing::info!(
            registration = installed.registration,
            payment = installed.payment,
            route_selection = installed.route_selection,
            "form guards installed"
        );
        Ok(installed)
    }
}

/// First form whose `action` contains `fragment`.
fn find_form(page: &Page, fragment: &str) -> Result<Option<NodeId>> {
    page.query_selector(&format!("form[action*={}]", css_string_literal(fragment)))
}
