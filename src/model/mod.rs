//! Entity model: descriptors for every table the API exposes.

pub mod descriptor;
pub mod entities;
pub mod enums;

pub use descriptor::*;
pub use entities::*;
pub use enums::*;

/// One row or request body as a JSON object keyed by column name.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub fn entities() -> &'static [&'static EntityDef] {
    ENTITIES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn paths_and_tables_are_unique() {
        let paths: HashSet<_> = entities().iter().map(|e| e.path).collect();
        let tables: HashSet<_> = entities().iter().map(|e| e.table).collect();
        assert_eq!(paths.len(), entities().len());
        assert_eq!(tables.len(), entities().len());
    }

    #[test]
    fn foreign_keys_point_at_earlier_tables() {
        let mut seen = HashSet::new();
        for entity in entities() {
            seen.insert(entity.table);
            for col in entity.columns() {
                if let Some(fk) = col.references {
                    assert!(seen.contains(fk.table), "{}.{} -> {}", entity.table, col.name, fk.table);
                }
            }
        }
    }

    #[test]
    fn descriptors_reference_their_own_columns() {
        for entity in entities() {
            assert!(entity.has_column(entity.default_sort), "{}", entity.table);
            for name in entity
                .sort_fields
                .iter()
                .chain(entity.search_columns)
                .chain(entity.slug_source.iter())
                .chain(entity.unique_together.iter().flat_map(|g| g.iter()))
                .chain(entity.indexes.iter().flat_map(|g| g.iter()))
            {
                assert!(entity.has_column(name), "{}.{}", entity.table, name);
            }
            if entity.slug_source.is_some() {
                assert!(entity.has_slug(), "{}", entity.table);
            }
        }
    }
}
