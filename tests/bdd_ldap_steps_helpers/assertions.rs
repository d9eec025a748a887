//! Then steps for LDAP scenarios.

use ldapbdd::scenario::ScenarioPhase;
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{CheckOutcome, LdapStepsState};

#[then("Ldap request \"{filter}\" should return {count} results")]
fn ldap_request_should_return(
    ldap_steps_state: &LdapStepsState,
    filter: String,
    count: usize,
) -> StepResult<()> {
    ldap_steps_state
        .with_context(|context| context.assert_request_returns_count(&filter, count))?
        .map_err(|e| e.to_string())
}

#[then("The \"{object_class}\" with cn \"{cn}\" should exist in Ldap")]
fn objectclass_with_cn_should_exist(
    ldap_steps_state: &LdapStepsState,
    object_class: String,
    cn: String,
) -> StepResult<()> {
    ldap_steps_state
        .with_context(|context| context.assert_objectclass_with_cn_exists(&object_class, &cn))?
        .map_err(|e| e.to_string())
}

#[then("I should get {count} entries")]
fn should_get_entries(ldap_steps_state: &LdapStepsState, count: usize) -> StepResult<()> {
    ldap_steps_state
        .with_context(|context| context.assert_result_count(count))?
        .map_err(|e| e.to_string())
}

#[then("The entries should all have attribute \"{attribute}\" with value \"{value}\"")]
fn entries_should_have_attribute_value(
    ldap_steps_state: &LdapStepsState,
    attribute: String,
    value: String,
) -> StepResult<()> {
    ldap_steps_state
        .with_context(|context| context.assert_all_have_attribute_value(&attribute, &value))?
        .map_err(|e| e.to_string())
}

#[then("The entries should all have attribute \"{attribute}\" defined")]
fn entries_should_have_attribute_defined(
    ldap_steps_state: &LdapStepsState,
    attribute: String,
) -> StepResult<()> {
    ldap_steps_state
        .with_context(|context| context.assert_all_have_attribute_defined(&attribute))?
        .map_err(|e| e.to_string())
}

#[then("the check passes")]
fn check_passes(ldap_steps_state: &LdapStepsState) -> StepResult<()> {
    match ldap_steps_state.outcome.get() {
        Some(CheckOutcome::Passed) => Ok(()),
        Some(CheckOutcome::Failed(message)) => Err(format!("expected success, got: {message}")),
        None => Err(String::from("no checked step has run")),
    }
}

#[then("the check fails with \"{expected}\"")]
fn check_fails_with(ldap_steps_state: &LdapStepsState, expected: String) -> StepResult<()> {
    match ldap_steps_state.outcome.get() {
        Some(CheckOutcome::Failed(message)) if message.contains(&expected) => Ok(()),
        Some(CheckOutcome::Failed(message)) => {
            Err(format!("expected failure mentioning '{expected}', got: {message}"))
        }
        Some(CheckOutcome::Passed) => Err(format!(
            "expected failure mentioning '{expected}', but the check passed"
        )),
        None => Err(String::from("no checked step has run")),
    }
}

#[then("the scenario is bound")]
fn scenario_is_bound(ldap_steps_state: &LdapStepsState) -> StepResult<()> {
    let phase = ldap_steps_state.with_context(|context| context.phase())?;
    if phase == ScenarioPhase::Bound {
        Ok(())
    } else {
        Err(format!("expected the scenario to be bound, phase is {phase:?}"))
    }
}

#[then("the scenario is unbound")]
fn scenario_is_unbound(ldap_steps_state: &LdapStepsState) -> StepResult<()> {
    let phase = ldap_steps_state.with_context(|context| context.phase())?;
    if phase == ScenarioPhase::Unbound {
        Ok(())
    } else {
        Err(format!("expected the scenario to be unbound, phase is {phase:?}"))
    }
}
