//! Read stored pairs back as a payload document for one protein
//!
//! Rows keep their direction pair-absolute; on the way out each one is turned
//! back into the query-relative form seen from the requested protein. Legacy
//! rows that still hold a query-relative label are first resolved against the
//! query they were discovered in.

use propaths_domain::traits::InteractionStore;
use propaths_domain::{
    DirectionNormalizer, InteractionRow, Interactor, Normalize, PayloadDocument,
};
use serde_json::Value;

/// Build the document a query for `symbol` would see from the store
///
/// Returns `None` when the protein is unknown. Interactors follow row order.
pub fn export_document<S>(store: &S, symbol: &str) -> Result<Option<PayloadDocument>, S::Error>
where
    S: InteractionStore + ?Sized,
{
    let Some(protein) = store.find_protein(symbol)? else {
        return Ok(None);
    };

    let interactors: Vec<Interactor> = store
        .list_interactions()?
        .iter()
        .filter_map(|row| interactor_from_row(row, &protein.symbol, &DirectionNormalizer))
        .collect();

    tracing::debug!("Exported {} interactor(s) for {}", interactors.len(), protein.symbol);
    Ok(Some(PayloadDocument::with_interactors(protein.symbol, interactors)))
}

/// One row as an interactor of `query`; `None` when `query` is not in the pair
pub fn interactor_from_row<N: Normalize + ?Sized>(
    row: &InteractionRow,
    query: &str,
    normalizer: &N,
) -> Option<Interactor> {
    let partner = row.partner_of(query)?.to_string();
    if partner == query {
        return None;
    }

    let mut interactor = match serde_json::from_value::<Interactor>(Value::Object(row.data.clone())) {
        Ok(interactor) => interactor,
        Err(e) => {
            tracing::warn!("{}: unreadable payload, using columns only: {}", row.label(), e);
            Interactor::default()
        }
    };

    let a = row.protein_a_symbol.as_str();
    let b = row.protein_b_symbol.as_str();
    let discovered_in = row.discovered_in_query.as_deref().unwrap_or(a);
    let absolute = normalizer.to_absolute(row.direction.as_deref(), a, b, discovered_in).direction;

    interactor.primary = partner;
    interactor.direction = Some(normalizer.to_query_relative(absolute, a, b, query).as_str().to_string());
    replace_if_some(&mut interactor.arrow, &row.arrow);
    replace_if_some(&mut interactor.arrows, &row.arrows);
    replace_if_some(&mut interactor.interaction_type, &row.interaction_type);
    replace_if_some(&mut interactor.upstream_interactor, &row.upstream_interactor);
    replace_if_some(&mut interactor.mediator_chain, &row.mediator_chain);
    if let Some(depth) = row.depth.and_then(|d| u32::try_from(d).ok()) {
        interactor.depth = Some(depth);
    }
    Some(interactor)
}

fn replace_if_some<T: Clone>(slot: &mut Option<T>, column: &Option<T>) {
    if column.is_some() {
        *slot = column.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sync_document, SqliteStore};
    use propaths_domain::{FunctionRecord, PairDirection};
    use serde_json::Map;

    fn row(direction: &str, discovered_in: Option<&str>) -> InteractionRow {
        InteractionRow {
            id: 1,
            protein_a_id: 1,
            protein_b_id: 2,
            protein_a_symbol: "ATXN3".into(),
            protein_b_symbol: "VCP".into(),
            direction: Some(direction.into()),
            arrow: Some("inhibits".into()),
            arrows: None,
            interaction_type: Some("direct".into()),
            upstream_interactor: None,
            mediator_chain: None,
            chain_context: None,
            chain_with_arrows: None,
            depth: Some(1),
            function_context: Some("direct".into()),
            data: Map::new(),
            discovered_in_query: discovered_in.map(str::to_string),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_absolute_direction_read_from_each_side() {
        let row = row(PairDirection::BToA.as_str(), Some("ATXN3"));

        let vcp = interactor_from_row(&row, "ATXN3", &DirectionNormalizer).unwrap();
        assert_eq!(vcp.primary, "VCP");
        assert_eq!(vcp.direction.as_deref(), Some("primary_to_main"));
        assert_eq!(vcp.arrow.as_deref(), Some("inhibits"));

        let atxn3 = interactor_from_row(&row, "VCP", &DirectionNormalizer).unwrap();
        assert_eq!(atxn3.primary, "ATXN3");
        assert_eq!(atxn3.direction.as_deref(), Some("main_to_primary"));

        assert!(interactor_from_row(&row, "HTT", &DirectionNormalizer).is_none());
    }

    #[test]
    fn test_legacy_relative_direction_resolved() {
        // Stored as seen from VCP, read back from ATXN3
        let row = row("main_to_primary", Some("VCP"));
        let vcp = interactor_from_row(&row, "ATXN3", &DirectionNormalizer).unwrap();
        assert_eq!(vcp.direction.as_deref(), Some("primary_to_main"));
    }

    #[test]
    fn test_sync_then_export_from_partner() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut vcp = Interactor::new("VCP");
        vcp.arrow = Some("activates".into());
        vcp.direction = Some("main_to_primary".into());
        vcp.functions = Some(vec![FunctionRecord::named("ERAD")]);
        let document = PayloadDocument::with_interactors("ATXN3", vec![vcp]);
        sync_document(&mut store, "ATXN3", &document).unwrap();

        let forward = export_document(&store, "ATXN3").unwrap().unwrap();
        let vcp = forward.interactor("VCP").unwrap();
        assert_eq!(vcp.direction.as_deref(), Some("main_to_primary"));
        assert_eq!(vcp.functions().len(), 1);

        let reverse = export_document(&store, "VCP").unwrap().unwrap();
        assert_eq!(reverse.main(), "VCP");
        let atxn3 = reverse.interactor("ATXN3").unwrap();
        assert_eq!(atxn3.direction.as_deref(), Some("primary_to_main"));
        assert_eq!(atxn3.arrow.as_deref(), Some("activates"));
        assert!(reverse.snapshot_in_sync());

        assert!(export_document(&store, "HTT").unwrap().is_none());
    }
}
