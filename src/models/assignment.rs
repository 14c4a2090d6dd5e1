use std::collections::BTreeMap;

/// One full candidate setting: parameter name -> value text.
pub type Configuration = BTreeMap<String, String>;

/// A (parameter, value) pair suggested by a hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment {
    pub parameter: String,
    pub value: String,
}

impl Assignment {
    pub fn new(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

/// Accumulated importance weights for assignments, in first-insertion order.
///
/// Selection breaks ties by this order, so it must stay deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedAssignments {
    entries: Vec<(Assignment, f64)>,
}

impl WeightedAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add weight to an assignment, accumulating if it was seen before.
    pub fn add(&mut self, parameter: &str, value: &str, weight: f64) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(a, _)| a.parameter == parameter && a.value == value)
        {
            entry.1 += weight;
        } else {
            self.entries.push((Assignment::new(parameter, value), weight));
        }
    }

    pub fn weight(&self, parameter: &str, value: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(a, _)| a.parameter == parameter && a.value == value)
            .map(|(_, w)| *w)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Assignment, f64)> {
        self.entries.iter().map(|(a, w)| (a, *w))
    }

    /// Candidate values per parameter, both in order of first appearance.
    pub fn by_parameter(&self) -> Vec<(String, Vec<(String, f64)>)> {
        let mut grouped: Vec<(String, Vec<(String, f64)>)> = Vec::new();
        for (assignment, weight) in &self.entries {
            match grouped.iter_mut().find(|(p, _)| *p == assignment.parameter) {
                Some((_, values)) => values.push((assignment.value.clone(), *weight)),
                None => grouped.push((
                    assignment.parameter.clone(),
                    vec![(assignment.value.clone(), *weight)],
                )),
            }
        }
        grouped
    }
}

impl FromIterator<(Assignment, f64)> for WeightedAssignments {
    fn from_iter<I: IntoIterator<Item = (Assignment, f64)>>(iter: I) -> Self {
        let mut weighted = Self::new();
        for (assignment, weight) in iter {
            weighted.add(&assignment.parameter, &assignment.value, weight);
        }
        weighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates() {
        let mut weighted = WeightedAssignments::new();
        weighted.add("work_mem", "64MB", 2.0);
        weighted.add("work_mem", "64MB", 4.0);
        weighted.add("work_mem", "128MB", 1.0);

        assert_eq!(weighted.len(), 2);
        assert_eq!(weighted.weight("work_mem", "64MB"), Some(6.0));
        assert_eq!(weighted.weight("work_mem", "1GB"), None);
    }

    #[test]
    fn test_by_parameter_keeps_first_appearance_order() {
        let weighted: WeightedAssignments = [
            (Assignment::new("b", "1"), 1.0),
            (Assignment::new("a", "2"), 1.0),
            (Assignment::new("b", "3"), 2.0),
        ]
        .into_iter()
        .collect();

        let grouped = weighted.by_parameter();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "b");
        assert_eq!(
            grouped[0].1,
            vec![("1".to_string(), 1.0), ("3".to_string(), 2.0)]
        );
        assert_eq!(grouped[1].0, "a");
    }

    #[test]
    fn test_clear_resets() {
        let mut weighted = WeightedAssignments::new();
        weighted.add("x", "1", 1.0);
        weighted.clear();
        assert!(weighted.is_empty());
    }
}
