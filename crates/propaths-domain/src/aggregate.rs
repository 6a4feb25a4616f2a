//! Aggregation of function-level arrows into interactor-level fields

use crate::arrow::{ArrowKind, Classify};
use crate::direction::QueryDirection;
use crate::interactor::{ArrowBuckets, Interactor};

/// Interactor-level values derived from function records
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Dominant arrow kind
    pub arrow: ArrowKind,

    /// Direction implied by the functions, `None` when no function has one
    pub direction: Option<QueryDirection>,

    /// Classified arrows per function direction
    pub arrows: ArrowBuckets,
}

/// Derive the interactor arrow, direction and arrow buckets from its functions
///
/// - each function arrow is classified and bucketed by the function's
///   direction (unknown directions go to `main_to_primary`)
/// - the arrow is the most frequent kind; ties go to the kind seen first
/// - functions pointing both ways, or any bidirectional function, make the
///   interactor bidirectional
///
/// An interactor without functions is classified from its own arrow and intent.
pub fn aggregate_function_arrows<C: Classify + ?Sized>(
    interactor: &Interactor,
    classifier: &C,
) -> Aggregation {
    let functions = interactor.functions();
    if functions.is_empty() {
        return Aggregation {
            arrow: classifier.classify(
                interactor.arrow.as_deref(),
                interactor.intent.as_deref(),
                interactor.direction.as_deref(),
            ),
            direction: None,
            arrows: ArrowBuckets::new(),
        };
    }

    let mut arrows = ArrowBuckets::new();
    let mut tally: Vec<(ArrowKind, usize)> = Vec::new();
    let mut saw_forward = false;
    let mut saw_reverse = false;
    let mut saw_both = false;

    for function in functions {
        let direction = function.direction.as_deref().and_then(QueryDirection::parse);
        match direction {
            Some(QueryDirection::MainToPrimary) => saw_forward = true,
            Some(QueryDirection::PrimaryToMain) => saw_reverse = true,
            Some(QueryDirection::Bidirectional) => saw_both = true,
            None => {}
        }

        let kind = classifier.classify(
            function.arrow.as_deref(),
            interactor.intent.as_deref(),
            function.direction.as_deref(),
        );
        let bucket = direction.unwrap_or(QueryDirection::MainToPrimary);
        arrows.insert(bucket.as_str(), kind.as_str());

        match tally.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, count)) => *count += 1,
            None => tally.push((kind, 1)),
        }
    }

    // First maximum wins, so ties resolve to the kind seen first.
    let arrow = tally
        .iter()
        .fold(None::<(ArrowKind, usize)>, |best, &(kind, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((kind, count)),
        })
        .map(|(kind, _)| kind)
        .unwrap_or_default();

    let direction = match (saw_forward, saw_reverse, saw_both) {
        (_, _, true) | (true, true, _) => Some(QueryDirection::Bidirectional),
        (true, false, false) => Some(QueryDirection::MainToPrimary),
        (false, true, false) => Some(QueryDirection::PrimaryToMain),
        (false, false, false) => None,
    };

    Aggregation {
        arrow,
        direction,
        arrows,
    }
}
