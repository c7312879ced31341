use uuid::Uuid;

/// Returns the opaque token that joins one logical sample across stores.
///
/// Collision-resistant in practice, nothing stronger. A colliding id would
/// make two unrelated samples merge into one at read time, which is a cost
/// this service accepts rather than pay for coordinated id allocation.
pub fn next() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_nonempty_and_distinct() {
        let a = next();
        let b = next();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn ids_are_hyphenated_uuids() {
        let id = next();
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
    }
}
