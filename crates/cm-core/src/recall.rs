//! Similarity recall over memory records.

use crate::record::MemoryRecord;
use crate::vector::ThoughtVector;

/// Rank records against a query vector: keep those at or above
/// `threshold`, order by similarity descending, truncate to `top_k`.
pub fn rank(
    records: Vec<MemoryRecord>,
    query: &ThoughtVector,
    top_k: usize,
    threshold: f32,
) -> Vec<(MemoryRecord, f32)> {
    let mut scored: Vec<(MemoryRecord, f32)> = records
        .into_iter()
        .map(|r| {
            let similarity = query.cosine(&r.vector);
            (r, similarity)
        })
        .filter(|(_, s)| *s >= threshold)
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::ThoughtProjector;
    use crate::record::MemoryRecord;

    fn memory(projector: &ThoughtProjector, text: &str) -> MemoryRecord {
        MemoryRecord::new(projector.project_text(text), text, "", 0.5)
    }

    #[test]
    fn test_best_match_comes_first() {
        let p = ThoughtProjector::default();
        let records = vec![
            memory(&p, "the dragon sleeps in the east tower"),
            memory(&p, "market prices for salted fish"),
            memory(&p, "the dragon hoards gold in the tower"),
        ];
        let query = p.project_text("dragon tower");
        let hits = rank(records, &query, 3, 0.0);
        assert!(!hits.is_empty());
        for pair in hits.windows(2) {
            assert!(pair[0].1 >= pair[1].1, "similarity must be descending");
        }
        assert!(hits[0].0.user_input.contains("dragon"));
    }

    #[test]
    fn test_threshold_filters_weak_matches() {
        let p = ThoughtProjector::default();
        let records = vec![memory(&p, "completely unrelated laundry schedule")];
        let query = p.project_text("volcanic eruption warning");
        // Random bipolar vectors sit near zero similarity at this width.
        assert!(rank(records, &query, 3, 0.3).is_empty());
    }

    #[test]
    fn test_top_k_truncates() {
        let p = ThoughtProjector::default();
        let records: Vec<MemoryRecord> = (0..5)
            .map(|i| memory(&p, &format!("note number {i} about the harvest")))
            .collect();
        let query = p.project_text("note about the harvest");
        let hits = rank(records, &query, 2, 0.0);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_exact_memory_recalls_itself() {
        let p = ThoughtProjector::default();
        let records = vec![
            memory(&p, "the password is swordfish"),
            memory(&p, "tuesday is recycling day"),
        ];
        let query = p.project_text("the password is swordfish");
        let hits = rank(records, &query, 1, 0.3);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.user_input, "the password is swordfish");
        assert!(hits[0].1 > 0.99);
    }

    #[test]
    fn test_empty_store_recalls_nothing() {
        let p = ThoughtProjector::default();
        let query = p.project_text("anything");
        assert!(rank(Vec::new(), &query, 3, 0.3).is_empty());
    }
}
