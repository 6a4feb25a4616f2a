//! Mediator inference for indirect interactors

use propaths_domain::Interactor;

/// Result of a successful chain inference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInference {
    /// Chosen upstream (first candidate)
    pub upstream: String,

    /// Every candidate found, in document order
    pub candidates: Vec<String>,
}

/// True when `text` mentions `symbol` as a whole token
///
/// Symbol characters are alphanumerics, `-` and `_`, so `VCP` does not match
/// inside `VCPIP1`.
pub fn mentions_symbol(text: &str, symbol: &str) -> bool {
    if symbol.is_empty() {
        return false;
    }
    let is_symbol_char = |c: char| c.is_alphanumeric() || c == '-' || c == '_';

    text.match_indices(symbol).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + symbol.len()..].chars().next();
        !before.is_some_and(is_symbol_char) && !after.is_some_and(is_symbol_char)
    })
}

fn text_mentions(interactor: &Interactor, symbol: &str) -> bool {
    interactor
        .functions()
        .iter()
        .flat_map(|f| f.mention_text())
        .any(|text| mentions_symbol(&text, symbol))
}

/// Find the probable upstream of an indirect interactor
///
/// Candidates are the document's direct interactors other than the target.
/// A candidate matches when the target's own function text mentions it;
/// failing that, when the candidate's function text mentions the target.
/// Returns `None` when nothing in the text links them.
pub fn infer_chain(target: &Interactor, interactors: &[Interactor]) -> Option<ChainInference> {
    let direct: Vec<&Interactor> = interactors
        .iter()
        .filter(|i| !i.is_indirect() && i.primary != target.primary && !i.primary.is_empty())
        .collect();

    let mut candidates: Vec<String> = direct
        .iter()
        .filter(|candidate| text_mentions(target, &candidate.primary))
        .map(|candidate| candidate.primary.clone())
        .collect();

    if candidates.is_empty() {
        candidates = direct
            .iter()
            .filter(|candidate| text_mentions(candidate, &target.primary))
            .map(|candidate| candidate.primary.clone())
            .collect();
    }

    let upstream = candidates.first()?.clone();
    Some(ChainInference {
        upstream,
        candidates,
    })
}
