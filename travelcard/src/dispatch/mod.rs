// travelcard/src/dispatch/mod.rs

//! Card recognition.
//!
//! The [`Dispatcher`] owns one driver at a time. When a target appears it
//! starts the preferred family's driver; each failure hands the tag to the
//! next family in the registry until one recognizes the card or every
//! family has been tried.

use std::collections::BTreeMap;
use std::mem;
use std::ops::BitOrAssign;

use log::{debug, warn};

use crate::card::{default_families, CardDriver, CardFamily, DriverOutcome};
use crate::transport::{Transport, TransportEvent};

pub mod builder;

pub use builder::DispatcherBuilder;

/// What the dispatcher currently knows about the target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DispatchState {
    /// No target, or no family recognized it.
    #[default]
    None,
    /// The family at this registry index is reading.
    Reading(usize),
    Recognized {
        card_type: String,
        fields: BTreeMap<String, String>,
    },
}

/// Observable properties touched by a dispatcher call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Changes {
    pub state: bool,
    pub fields: bool,
    pub page_url: bool,
    pub path: bool,
}

impl Changes {
    pub fn any(&self) -> bool {
        self.state || self.fields || self.page_url || self.path
    }
}

impl BitOrAssign for Changes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.state |= rhs.state;
        self.fields |= rhs.fields;
        self.page_url |= rhs.page_url;
        self.path |= rhs.path;
    }
}

struct Snapshot {
    state: mem::Discriminant<DispatchState>,
    fields: Option<BTreeMap<String, String>>,
    page_url: String,
    path: String,
}

/// Runs card drivers against a target until one recognizes it.
pub struct Dispatcher {
    families: Vec<CardFamily>,
    preferred: usize,
    path: String,
    state: DispatchState,
    page_url: String,
    attempts: usize,
    active: Option<Box<dyn CardDriver>>,
    retired: Vec<Box<dyn CardDriver>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::with_registry(default_families(), 0)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("families", &self.families)
            .field("preferred", &self.preferred)
            .field("path", &self.path)
            .field("state", &self.state)
            .field("page_url", &self.page_url)
            .finish()
    }
}

impl Dispatcher {
    /// Dispatcher over the built-in families, HSL first.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub(crate) fn with_registry(families: Vec<CardFamily>, preferred: usize) -> Self {
        Self {
            families,
            preferred,
            path: String::new(),
            state: DispatchState::None,
            page_url: String::new(),
            attempts: 0,
            active: None,
            retired: Vec::new(),
        }
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Field map of the recognized card.
    pub fn fields(&self) -> Option<&BTreeMap<String, String>> {
        match &self.state {
            DispatchState::Recognized { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Presentation hint of the last recognized family. Kept after the card
    /// goes away.
    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn families(&self) -> &[CardFamily] {
        &self.families
    }

    /// Name of the family tried first.
    pub fn preferred_card_type(&self) -> Option<&'static str> {
        self.families.get(self.preferred).map(|f| f.name)
    }

    /// Try `name` first on the next target. Returns whether the preference
    /// changed; unknown names are rejected.
    pub fn set_preferred_card_type(&mut self, name: &str) -> bool {
        match self.families.iter().position(|f| f.name == name) {
            Some(index) => {
                let changed = self.preferred != index;
                self.preferred = index;
                changed
            }
            None => {
                warn!("unknown card type {}", name);
                false
            }
        }
    }

    /// Drivers still holding a session, finished or not.
    pub fn live_drivers(&self) -> usize {
        self.active
            .iter()
            .chain(self.retired.iter())
            .filter(|d| d.has_session())
            .count()
    }

    /// Point the dispatcher at a new tag. An empty path abandons a read in
    /// progress; a recognized card stays on display.
    pub fn set_target(&mut self, path: &str, transport: &mut dyn Transport) -> Changes {
        self.retired.clear();
        if path == self.path {
            return Changes::default();
        }
        let before = self.snapshot();
        debug!("target {:?}", path);
        self.path = path.to_string();
        self.retire_active();
        if path.is_empty() {
            self.attempts = self.families.len();
            if matches!(self.state, DispatchState::Reading(_)) {
                self.state = DispatchState::None;
            }
        } else {
            if let Err(e) = transport.attach(path) {
                warn!("failed to attach {}: {}", path, e);
            }
            self.attempts = 0;
            self.launch(transport);
        }
        self.changes_since(before)
    }

    /// Feed one transport event to the running driver.
    pub fn handle_event(&mut self, event: TransportEvent, transport: &mut dyn Transport) -> Changes {
        self.retired.clear();
        let before = self.snapshot();
        self.dispatch(event, transport);
        self.changes_since(before)
    }

    /// Drain and handle every pending transport event.
    pub fn pump(&mut self, transport: &mut dyn Transport) -> Changes {
        self.retired.clear();
        let before = self.snapshot();
        while let Some(event) = transport.next_event() {
            self.dispatch(event, transport);
        }
        self.changes_since(before)
    }

    fn dispatch(&mut self, event: TransportEvent, transport: &mut dyn Transport) {
        let Some(driver) = self.active.as_mut() else {
            debug!("no reader for {:?}", event);
            return;
        };
        if let Some(outcome) = driver.handle_event(event, transport) {
            self.retire_active();
            if !self.finish(outcome) {
                self.launch(transport);
            }
        }
    }

    /// Start the next untried family, skipping any that fail on the spot.
    fn launch(&mut self, transport: &mut dyn Transport) {
        let count = self.families.len();
        while self.attempts < count {
            let index = (self.preferred + self.attempts) % count;
            self.attempts += 1;
            let family = self.families[index];
            debug!("trying {}", family.name);
            self.state = DispatchState::Reading(index);
            let mut driver = (family.new_driver)();
            match driver.start(transport) {
                None => {
                    self.active = Some(driver);
                    return;
                }
                Some(outcome) => {
                    self.retired.push(driver);
                    if self.finish(outcome) {
                        return;
                    }
                }
            }
        }
        if matches!(self.state, DispatchState::Reading(_)) {
            debug!("no family recognized {}", self.path);
            self.state = DispatchState::None;
        }
    }

    /// Record a finished read. Returns true if the card was recognized.
    fn finish(&mut self, outcome: DriverOutcome) -> bool {
        match outcome {
            DriverOutcome::Succeeded(data) => {
                debug!("recognized {} card", data.card_type);
                self.attempts = self.families.len();
                self.state = DispatchState::Recognized {
                    card_type: data.card_type.to_string(),
                    fields: data.fields(),
                };
                self.page_url = data.page_url.to_string();
                true
            }
            DriverOutcome::Failed(e) => {
                debug!("read failed: {}", e);
                false
            }
        }
    }

    /// Stop the active driver and queue it for disposal. Its session is
    /// released here, before any other driver starts.
    fn retire_active(&mut self) {
        if let Some(mut driver) = self.active.take() {
            if driver.abort().is_some() {
                debug!("abandoned {} read", driver.card_type());
            }
            self.retired.push(driver);
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: mem::discriminant(&self.state),
            fields: self.fields().cloned(),
            page_url: self.page_url.clone(),
            path: self.path.clone(),
        }
    }

    fn changes_since(&self, before: Snapshot) -> Changes {
        Changes {
            state: before.state != mem::discriminant(&self.state),
            fields: before.fields.as_ref() != self.fields(),
            page_url: before.page_url != self.page_url,
            path: before.path != self.path,
        }
    }
}
