//! An in-memory [`Driver`] for exercising page adapters without a browser.
//!
//! A [`FakeDriver`] holds a single [`FakePage`]: a URL plus a set of elements keyed by
//! [`Locator`]. Elements can be given a render delay, measured on tokio's clock, so tests running
//! under `#[tokio::test(start_paused = true)]` can place an element exactly where they want it
//! relative to a wait's deadline. Clicking an element runs whatever handler was registered for
//! its locator, and navigating to a URL renders whatever route was registered for it.

use crate::config::Config;
use crate::driver::Driver;
use crate::error::DriverError;
use crate::pages::{DashboardLayout, LoginLayout};
use crate::session::Closeable;
use crate::wd::Locator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

type Handler = Arc<dyn Fn(&mut FakePage) + Send + Sync>;

/// One element of a [`FakePage`].
#[derive(Clone, Debug)]
pub struct FakeElement {
    delay: Duration,
    displayed: bool,
    enabled: bool,
    value: String,
    placed: Option<Instant>,
}

impl Default for FakeElement {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeElement {
    /// A displayed, enabled element that can be found as soon as it is placed.
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            displayed: true,
            enabled: true,
            value: String::new(),
            placed: None,
        }
    }

    /// Only render the element `delay` after it is placed on the page.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Render the element, but never display it.
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Render the element disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn rendered(&self, now: Instant) -> bool {
        self.placed.map_or(true, |at| now >= at + self.delay)
    }
}

/// The state of the page loaded in a [`FakeDriver`].
pub struct FakePage {
    url: Url,
    generation: u64,
    elements: HashMap<Locator, FakeElement>,
    routes: Arc<HashMap<String, Handler>>,
}

impl std::fmt::Debug for FakePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakePage")
            .field("url", &self.url.as_str())
            .field("generation", &self.generation)
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

impl FakePage {
    /// The URL currently loaded.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Load `url`, dropping every element of the current page.
    ///
    /// If a route was registered for `url` it renders the new page.
    pub fn navigate(&mut self, url: &str) {
        self.url = Url::parse(url).expect("fake navigation needs an absolute url");
        self.generation += 1;
        self.elements.clear();
        if let Some(render) = self.routes.get(self.url.as_str()).cloned() {
            render(self);
        }
    }

    /// Place an element on the page, starting its render delay now.
    pub fn insert(&mut self, locator: Locator, mut element: FakeElement) {
        element.placed = Some(Instant::now());
        self.elements.insert(locator, element);
    }

    /// Remove an element from the page.
    pub fn remove(&mut self, locator: &Locator) {
        self.elements.remove(locator);
    }

    /// The text typed into an element so far.
    pub fn value(&self, locator: &Locator) -> Option<&str> {
        self.elements.get(locator).map(|e| e.value.as_str())
    }
}

/// A handle to an element found by a [`FakeDriver`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FakeHandle {
    locator: Locator,
    generation: u64,
}

/// A scriptable [`Driver`] backed by a [`FakePage`].
pub struct FakeDriver {
    page: Mutex<FakePage>,
    clicks: HashMap<Locator, Handler>,
    routes: HashMap<String, Handler>,
    commands: Mutex<Vec<String>>,
    alive: std::sync::atomic::AtomicBool,
}

impl std::fmt::Debug for FakeDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeDriver")
            .field("url", &self.page().url.as_str())
            .finish_non_exhaustive()
    }
}

impl FakeDriver {
    /// A driver showing an empty page at `url`.
    pub fn new(url: &str) -> Self {
        Self {
            page: Mutex::new(FakePage {
                url: Url::parse(url).expect("fake driver needs an absolute url"),
                generation: 0,
                elements: HashMap::new(),
                routes: Arc::default(),
            }),
            clicks: HashMap::new(),
            routes: HashMap::new(),
            commands: Mutex::default(),
            alive: std::sync::atomic::AtomicBool::new(true),
        }
    }

    /// Place `element` on the current page.
    pub fn with_element(self, locator: Locator, element: FakeElement) -> Self {
        self.page().insert(locator, element);
        self
    }

    /// Run `handler` against the page whenever the element at `locator` is clicked.
    pub fn on_click<F>(mut self, locator: Locator, handler: F) -> Self
    where
        F: Fn(&mut FakePage) + Send + Sync + 'static,
    {
        self.clicks.insert(locator, Arc::new(handler));
        self
    }

    /// Run `render` against the page whenever `url` is loaded.
    pub fn route<F>(mut self, url: &str, render: F) -> Self
    where
        F: Fn(&mut FakePage) + Send + Sync + 'static,
    {
        let url = Url::parse(url).expect("fake routes need an absolute url");
        self.routes.insert(url.into(), Arc::new(render));
        self.page().routes = Arc::new(self.routes.clone());
        self
    }

    /// Make every subsequent command fail as if the browser had gone away.
    pub fn kill(&self) {
        self.alive.store(false, std::sync::atomic::Ordering::SeqCst);
    }

    /// Every command issued so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The text typed into the element at `locator`, if it is on the page.
    pub fn value(&self, locator: &Locator) -> Option<String> {
        self.page().value(locator).map(str::to_owned)
    }

    /// The URL currently loaded.
    pub fn url(&self) -> Url {
        self.page().url.clone()
    }

    fn page(&self) -> MutexGuard<'_, FakePage> {
        self.page.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, command: String) -> Result<(), DriverError> {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command);
        if self.alive.load(std::sync::atomic::Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DriverError::Session("fake browser was killed".to_string()))
        }
    }

    fn resolve<'p>(
        page: &'p mut FakePage,
        handle: &FakeHandle,
    ) -> Result<&'p mut FakeElement, DriverError> {
        if handle.generation != page.generation {
            return Err(DriverError::StaleElement(handle.locator.to_string()));
        }
        page.elements
            .get_mut(&handle.locator)
            .ok_or_else(|| DriverError::StaleElement(handle.locator.to_string()))
    }
}

#[async_trait]
impl Driver for FakeDriver {
    type Element = FakeHandle;

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.record(format!("goto {}", url))?;
        Url::parse(url).map_err(|e| DriverError::Other(Box::new(e)))?;
        self.page().navigate(url);
        Ok(())
    }

    async fn current_url(&self) -> Result<Url, DriverError> {
        self.record("current url".to_string())?;
        Ok(self.url())
    }

    async fn find(&self, locator: &Locator) -> Result<FakeHandle, DriverError> {
        self.record(format!("find {}", locator))?;
        let page = self.page();
        match page.elements.get(locator) {
            Some(e) if e.rendered(Instant::now()) => Ok(FakeHandle {
                locator: locator.clone(),
                generation: page.generation,
            }),
            _ => Err(DriverError::NoSuchElement(locator.to_string())),
        }
    }

    async fn is_displayed(&self, element: &FakeHandle) -> Result<bool, DriverError> {
        self.record(format!("is displayed {}", element.locator))?;
        Ok(Self::resolve(&mut self.page(), element)?.displayed)
    }

    async fn is_enabled(&self, element: &FakeHandle) -> Result<bool, DriverError> {
        self.record(format!("is enabled {}", element.locator))?;
        Ok(Self::resolve(&mut self.page(), element)?.enabled)
    }

    async fn click(&self, element: &FakeHandle) -> Result<(), DriverError> {
        self.record(format!("click {}", element.locator))?;
        let mut page = self.page();
        let target = Self::resolve(&mut page, element)?;
        if !target.displayed || !target.enabled {
            return Err(DriverError::NotInteractable(element.locator.to_string()));
        }
        if let Some(handler) = self.clicks.get(&element.locator) {
            handler(&mut *page);
        }
        Ok(())
    }

    async fn clear(&self, element: &FakeHandle) -> Result<(), DriverError> {
        self.record(format!("clear {}", element.locator))?;
        Self::resolve(&mut self.page(), element)?.value.clear();
        Ok(())
    }

    async fn send_keys(&self, element: &FakeHandle, text: &str) -> Result<(), DriverError> {
        self.record(format!("send keys {:?} to {}", text, element.locator))?;
        Self::resolve(&mut self.page(), element)?
            .value
            .push_str(text);
        Ok(())
    }
}

#[async_trait]
impl Closeable for FakeDriver {
    /// Ends the fake session; every later command fails as if the browser were gone.
    async fn close_session(&self) -> Result<(), DriverError> {
        self.record("close session".to_string())?;
        self.kill();
        Ok(())
    }
}

/// How long the fake MyShuttle site takes to render each page after navigation.
pub const SHUTTLE_RENDER_DELAY: Duration = Duration::from_millis(1200);

/// A fake of the MyShuttle site laid out as `config` describes, showing the login page.
///
/// Submitting the login form posts to the login path whatever the outcome: with the configured
/// credentials it renders the dashboard there, otherwise the error banner and the form again.
/// Every page renders [`SHUTTLE_RENDER_DELAY`] after navigation.
pub fn shuttle_site(config: &Config) -> FakeDriver {
    let login = config.pages.login.clone();
    let dashboard = config.pages.dashboard.clone();
    let fares = config.pages.fare_history.clone();
    let credentials = config.credentials.clone();

    let base = config.base_url.to_string();
    let login_url = join(config, &login.submitted_path);
    let fares_url = join(config, &config.paths.fare_history);

    let render_form = {
        let login = login.clone();
        move |page: &mut FakePage| render_login_form(page, &login)
    };
    let render_fares = move |page: &mut FakePage| {
        for l in [&fares.title_logo, &fares.subtitle, &fares.fares_table] {
            page.insert(l.clone(), FakeElement::new().after(SHUTTLE_RENDER_DELAY));
        }
    };
    let submit = {
        let login = login.clone();
        let dashboard = dashboard.clone();
        let login_url = login_url.clone();
        move |page: &mut FakePage| {
            let accepted = page.value(&login.email) == Some(credentials.email.as_str())
                && page.value(&login.password) == Some(credentials.password.as_str());
            page.navigate(&login_url);
            if accepted {
                render_dashboard(page, &dashboard);
            } else {
                page.insert(
                    login.error.clone(),
                    FakeElement::new().after(SHUTTLE_RENDER_DELAY),
                );
                render_login_form(page, &login);
            }
        }
    };
    let open_fares = {
        let fares_url = fares_url.clone();
        move |page: &mut FakePage| page.navigate(&fares_url)
    };
    let sign_out = {
        let login = login.clone();
        let login_url = login_url.clone();
        move |page: &mut FakePage| {
            page.navigate(&login_url);
            render_login_form(page, &login);
        }
    };

    let site = FakeDriver::new(&base)
        .route(&base, render_form)
        .route(&fares_url, render_fares)
        .on_click(login.submit.clone(), submit)
        .on_click(dashboard.fare_history_link.clone(), open_fares)
        .on_click(dashboard.sign_out_link.clone(), sign_out);
    site.page().navigate(&base);
    site
}

fn join(config: &Config, path: &str) -> String {
    config
        .url(path)
        .map(String::from)
        .unwrap_or_else(|_| format!("{}{}", config.base_url, path))
}

fn render_login_form(page: &mut FakePage, login: &LoginLayout) {
    for l in [&login.email, &login.password, &login.submit] {
        page.insert(l.clone(), FakeElement::new().after(SHUTTLE_RENDER_DELAY));
    }
}

fn render_dashboard(page: &mut FakePage, dashboard: &DashboardLayout) {
    for l in [
        &dashboard.header,
        &dashboard.fare_history_link,
        &dashboard.sign_out_link,
    ] {
        page.insert(l.clone(), FakeElement::new().after(SHUTTLE_RENDER_DELAY));
    }
}
