//! Display metadata added after fact checking

use propaths_domain::{arrow_notation, ArrowKind, PayloadDocument, QueryDirection};

/// Add `arrow_notation` to every interactor and resync the snapshot
///
/// Direct interactors are drawn from the query protein; indirect interactors
/// with an upstream are drawn from that upstream. A missing arrow renders as
/// `binds` and a missing direction as `main_to_primary`.
///
/// Returns the number of notations written.
///
/// ```
/// use propaths_domain::{Interactor, PayloadDocument};
/// use propaths_validator::finalize;
///
/// let mut vcp = Interactor::new("VCP");
/// vcp.arrow = Some("inhibits".into());
/// vcp.direction = Some("primary_to_main".into());
/// let mut document = PayloadDocument::with_interactors("ATXN3", vec![vcp]);
///
/// assert_eq!(finalize(&mut document, true), 1);
/// assert_eq!(
///     document.interactor("VCP").unwrap().arrow_notation.as_deref(),
///     Some("ATXN3 <--inhibits-- VCP:")
/// );
/// ```
pub fn finalize(document: &mut PayloadDocument, add_notation: bool) -> usize {
    let main = document.main().to_string();
    let mut written = 0;

    if add_notation {
        for interactor in document.ctx_json.interactors.iter_mut() {
            let arrow = interactor
                .arrow
                .clone()
                .unwrap_or_else(|| ArrowKind::Binds.as_str().to_string());
            let direction = interactor
                .direction
                .as_deref()
                .unwrap_or(QueryDirection::MainToPrimary.as_str());
            let notation = arrow_notation(
                interactor.display_anchor(&main),
                &arrow,
                Some(direction),
                &interactor.primary,
            );
            interactor.arrow_notation = Some(notation);
            written += 1;
        }
    }

    document.sync_snapshot();
    tracing::info!(
        "Finalized {}: {} arrow notation(s), snapshot synced ({} interactors)",
        main,
        written,
        document.interactors().len()
    );
    written
}
