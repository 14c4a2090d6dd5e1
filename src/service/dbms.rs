use crate::models::Configuration;

/// Capability interface of the database system being tuned.
///
/// The live configuration is global mutable state. Every call may be slow
/// and may fail; failures surface as `false` rather than as errors.
pub trait Dbms {
    /// Reset all parameters to their default values.
    fn reset_to_defaults(&mut self);

    /// Set a parameter to the given value, returns whether it was accepted.
    fn apply(&mut self, parameter: &str, value: &str) -> bool;

    /// Make pending changes take effect (may restart the service).
    fn commit_changes(&mut self) -> bool;

    /// Current value of a parameter, `None` if it is unknown.
    fn current_value(&self, parameter: &str) -> Option<String>;

    /// Names of all configurable parameters.
    fn list_parameters(&self) -> Vec<String>;

    /// Parameters changed since the last reset.
    fn changed_parameters(&self) -> Configuration;

    fn is_parameter(&self, name: &str) -> bool {
        self.list_parameters().iter().any(|p| p == name)
    }

    /// Set a parameter, retrying with a quoted value if the plain one is refused.
    fn set_param_smart(&mut self, parameter: &str, value: &str) -> bool {
        if self.apply(parameter, value) {
            return true;
        }
        let quoted = format!("'{}'", value.trim_matches('\''));
        quoted != value && self.apply(parameter, &quoted)
    }

    /// Check whether a value would be accepted, leaving the current value in place.
    fn can_set(&mut self, parameter: &str, value: &str) -> bool {
        let Some(previous) = self.current_value(parameter) else {
            return false;
        };
        let accepted = self.set_param_smart(parameter, value);
        if accepted {
            self.apply(parameter, &previous);
        }
        accepted
    }
}
