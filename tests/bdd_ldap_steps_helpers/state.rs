//! Scenario state for LDAP step behavioural tests.

use ldapbdd::scenario::{ScenarioConfig, ScenarioContext};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

use super::StepResult;
use super::directory::InMemoryDirectory;

/// Root DN used when a scenario does not name one.
pub(crate) const DEFAULT_ROOT_DN: &str = "dc=example,dc=com";

/// Outcome of a step whose failure is part of the expectation.
#[derive(Debug, Clone)]
pub(crate) enum CheckOutcome {
    Passed,
    Failed(String),
}

impl<T> From<ldapbdd::error::Result<T>> for CheckOutcome {
    fn from(result: ldapbdd::error::Result<T>) -> Self {
        match result {
            Ok(_) => Self::Passed,
            Err(error) => Self::Failed(error.to_string()),
        }
    }
}

#[derive(Default, ScenarioState)]
pub(crate) struct LdapStepsState {
    /// Directory contents before the scenario context is created.
    pub(crate) directory: Slot<InMemoryDirectory>,
    /// Settings for the scenario context.
    pub(crate) config: Slot<ScenarioConfig>,
    /// The running scenario; created lazily by the first directory step.
    pub(crate) context: Slot<ScenarioContext<InMemoryDirectory>>,
    /// Outcome of the most recent checked step.
    pub(crate) outcome: Slot<CheckOutcome>,
}

impl LdapStepsState {
    /// Runs `operation` against the scenario context, starting the scenario
    /// (configure plus setup hook) on first use.
    pub(crate) fn with_context<R>(
        &self,
        operation: impl FnOnce(&mut ScenarioContext<InMemoryDirectory>) -> R,
    ) -> StepResult<R> {
        let mut context = self
            .context
            .take()
            .map_or_else(|| self.start_scenario(), Ok)?;
        let result = operation(&mut context);
        self.context.set(context);
        Ok(result)
    }

    /// Configures a fresh context and runs its setup hook.
    pub(crate) fn start_scenario(&self) -> StepResult<ScenarioContext<InMemoryDirectory>> {
        let directory = self
            .directory
            .take()
            .ok_or_else(|| String::from("directory should be configured"))?;
        let config = self
            .config
            .get()
            .ok_or_else(|| String::from("scenario config should be set"))?;
        let mut context = ScenarioContext::configure(directory, config);
        context.before_scenario().map_err(|e| e.to_string())?;
        Ok(context)
    }

    /// Records the outcome of a step that is allowed to fail.
    pub(crate) fn record<T>(&self, result: ldapbdd::error::Result<T>) {
        self.outcome.set(CheckOutcome::from(result));
    }
}

#[fixture]
pub(crate) fn ldap_steps_state() -> LdapStepsState {
    let state = LdapStepsState::default();
    state
        .directory
        .set(InMemoryDirectory::rooted_at(DEFAULT_ROOT_DN));
    state.config.set(ScenarioConfig::new(DEFAULT_ROOT_DN));
    state
}
