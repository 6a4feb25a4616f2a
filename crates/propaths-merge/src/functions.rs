//! Function record de-duplication

use propaths_domain::FunctionRecord;
use std::collections::HashSet;

/// Identity of a function record for de-duplication
///
/// Two records with the same function name, arrow and cellular process are
/// the same finding, whatever else they carry. Comparison ignores case and
/// surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionKey {
    function: String,
    arrow: String,
    cellular_process: String,
}

impl FunctionKey {
    /// Key for a record
    pub fn of(record: &FunctionRecord) -> Self {
        fn part(value: &Option<String>) -> String {
            value.as_deref().map(|v| v.trim().to_lowercase()).unwrap_or_default()
        }
        Self {
            function: part(&record.function),
            arrow: part(&record.arrow),
            cellular_process: part(&record.cellular_process),
        }
    }
}

/// Remove repeated records in place, keeping the first occurrence
///
/// Returns the number of records removed.
pub fn dedup_functions(functions: &mut Vec<FunctionRecord>) -> usize {
    let before = functions.len();
    let mut seen = HashSet::new();
    functions.retain(|record| seen.insert(FunctionKey::of(record)));
    before - functions.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first() {
        let mut functions = vec![
            FunctionRecord::named("Autophagy").with_arrow("activates"),
            FunctionRecord::named("ERAD").with_arrow("binds"),
            FunctionRecord::named(" autophagy ").with_arrow("Activates").with_direction("primary_to_main"),
        ];
        assert_eq!(dedup_functions(&mut functions), 1);
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].function.as_deref(), Some("Autophagy"));
        assert!(functions[0].direction.is_none());
    }

    #[test]
    fn test_cellular_process_distinguishes() {
        let mut a = FunctionRecord::named("Autophagy").with_arrow("activates");
        a.cellular_process = Some("mitophagy".into());
        let b = FunctionRecord::named("Autophagy").with_arrow("activates");
        let mut functions = vec![a, b];
        assert_eq!(dedup_functions(&mut functions), 0);
    }

    #[test]
    fn test_empty_list() {
        let mut functions = Vec::new();
        assert_eq!(dedup_functions(&mut functions), 0);
    }
}
