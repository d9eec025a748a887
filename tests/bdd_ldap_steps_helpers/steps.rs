//! Given/when steps for LDAP scenarios.
//!
//! The step phrases match the ones scenario authors write against a real
//! directory; the extra setup steps only shape the in-memory directory.

use ldapbdd::directory::DirectoryEntry;
use ldapbdd::scenario::{Credentials, ScenarioConfig, ScenarioContext};
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::directory::InMemoryDirectory;
use super::state::LdapStepsState;

#[given("an empty directory rooted at \"{root_dn}\"")]
fn given_empty_directory(ldap_steps_state: &LdapStepsState, root_dn: String) {
    ldap_steps_state
        .directory
        .set(InMemoryDirectory::rooted_at(&root_dn));
    ldap_steps_state.config.set(ScenarioConfig::new(root_dn));
}

#[given("the scenario runs under \"{root_dn}\"")]
fn given_scenario_root(ldap_steps_state: &LdapStepsState, root_dn: String) -> StepResult<()> {
    let mut config = ldap_steps_state
        .config
        .get()
        .ok_or_else(|| String::from("scenario config should be set"))?;
    config.root_dn = root_dn;
    ldap_steps_state.config.set(config);
    Ok(())
}

#[given("the directory accepts \"{principal}\" with password \"{password}\"")]
fn given_directory_accepts(
    ldap_steps_state: &LdapStepsState,
    principal: String,
    password: String,
) -> StepResult<()> {
    let mut directory = ldap_steps_state
        .directory
        .take()
        .ok_or_else(|| String::from("directory should be configured"))?;
    directory.accept(&principal, &password);
    ldap_steps_state.directory.set(directory);
    Ok(())
}

#[given("the directory holds \"{dn}\" with objectClass \"{object_class}\"")]
fn given_directory_holds(
    ldap_steps_state: &LdapStepsState,
    dn: String,
    object_class: String,
) -> StepResult<()> {
    let mut directory = ldap_steps_state
        .directory
        .take()
        .ok_or_else(|| String::from("directory should be configured"))?;
    let cn = dn
        .split(',')
        .next()
        .and_then(|rdn| rdn.strip_prefix("cn="))
        .map(str::to_owned);
    let mut entry = DirectoryEntry::new(dn).with_attribute("objectClass", [object_class]);
    if let Some(value) = cn {
        entry.push_value("cn", value);
    }
    directory.seed(entry);
    ldap_steps_state.directory.set(directory);
    Ok(())
}

#[given("the scenario binds as \"{principal}\" with password \"{password}\"")]
fn given_scenario_binds(
    ldap_steps_state: &LdapStepsState,
    principal: String,
    password: String,
) -> StepResult<()> {
    let config = ldap_steps_state
        .config
        .get()
        .ok_or_else(|| String::from("scenario config should be set"))?;
    ldap_steps_state
        .config
        .set(config.with_bind(Credentials::new(principal, password)));
    Ok(())
}

#[given("the scenario binds without credentials")]
fn given_scenario_binds_without_credentials(ldap_steps_state: &LdapStepsState) -> StepResult<()> {
    let mut config = ldap_steps_state
        .config
        .get()
        .ok_or_else(|| String::from("scenario config should be set"))?;
    config.bind_before_scenario = true;
    config.credentials = None;
    ldap_steps_state.config.set(config);
    Ok(())
}

#[given("the scenario purges the root before running")]
fn given_scenario_purges(ldap_steps_state: &LdapStepsState) -> StepResult<()> {
    let config = ldap_steps_state
        .config
        .get()
        .ok_or_else(|| String::from("scenario config should be set"))?;
    ldap_steps_state.config.set(config.with_purge());
    Ok(())
}

#[when("the scenario starts")]
fn when_scenario_starts(ldap_steps_state: &LdapStepsState) -> StepResult<()> {
    let directory = ldap_steps_state
        .directory
        .take()
        .ok_or_else(|| String::from("directory should be configured"))?;
    let config = ldap_steps_state
        .config
        .get()
        .ok_or_else(|| String::from("scenario config should be set"))?;
    let mut context = ScenarioContext::configure(directory, config);
    ldap_steps_state.record(context.before_scenario());
    ldap_steps_state.context.set(context);
    Ok(())
}

#[given("Ldap entries:")]
fn given_ldap_entries(
    ldap_steps_state: &LdapStepsState,
    datatable: Vec<Vec<String>>,
) -> StepResult<()> {
    ldap_steps_state
        .with_context(|context| context.create_entries(&datatable))?
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[when("I search Ldap for \"{filter}\"")]
fn when_search_ldap(ldap_steps_state: &LdapStepsState, filter: String) -> StepResult<()> {
    ldap_steps_state
        .with_context(|context| context.search(&filter).map(|_| ()))?
        .map_err(|e| e.to_string())
}

#[when("I try to create Ldap entries:")]
fn when_try_create_entries(
    ldap_steps_state: &LdapStepsState,
    datatable: Vec<Vec<String>>,
) -> StepResult<()> {
    let result = ldap_steps_state.with_context(|context| context.create_entries(&datatable))?;
    ldap_steps_state.record(result);
    Ok(())
}

#[when("I try to search Ldap for \"{filter}\"")]
fn when_try_search(ldap_steps_state: &LdapStepsState, filter: String) -> StepResult<()> {
    let result = ldap_steps_state.with_context(|context| context.search(&filter).map(|_| ()))?;
    ldap_steps_state.record(result);
    Ok(())
}

#[when("I check that Ldap request \"{filter}\" returns {count} results")]
fn when_check_request_count(
    ldap_steps_state: &LdapStepsState,
    filter: String,
    count: usize,
) -> StepResult<()> {
    let result = ldap_steps_state
        .with_context(|context| context.assert_request_returns_count(&filter, count))?;
    ldap_steps_state.record(result);
    Ok(())
}

#[when("I check that the \"{object_class}\" with cn \"{cn}\" exists")]
fn when_check_objectclass(
    ldap_steps_state: &LdapStepsState,
    object_class: String,
    cn: String,
) -> StepResult<()> {
    let result = ldap_steps_state
        .with_context(|context| context.assert_objectclass_with_cn_exists(&object_class, &cn))?;
    ldap_steps_state.record(result);
    Ok(())
}

#[when("I check that I got {count} entries")]
fn when_check_result_count(ldap_steps_state: &LdapStepsState, count: usize) -> StepResult<()> {
    let result = ldap_steps_state.with_context(|context| context.assert_result_count(count))?;
    ldap_steps_state.record(result);
    Ok(())
}

#[when("I check that the entries all have attribute \"{attribute}\" with value \"{value}\"")]
fn when_check_attribute_value(
    ldap_steps_state: &LdapStepsState,
    attribute: String,
    value: String,
) -> StepResult<()> {
    let result = ldap_steps_state
        .with_context(|context| context.assert_all_have_attribute_value(&attribute, &value))?;
    ldap_steps_state.record(result);
    Ok(())
}

#[when("I check that the entries all have attribute \"{attribute}\" defined")]
fn when_check_attribute_defined(
    ldap_steps_state: &LdapStepsState,
    attribute: String,
) -> StepResult<()> {
    let result = ldap_steps_state
        .with_context(|context| context.assert_all_have_attribute_defined(&attribute))?;
    ldap_steps_state.record(result);
    Ok(())
}
