//! Cross-table foreign key resolution

use sqlentity_core::Schema;
use std::collections::HashMap;

/// Resolve every foreign key of the schema by referenced table name.
///
/// Sets `target` to the referenced table's position on a hit; a miss leaves
/// the key unresolved. A key with no referenced column takes the target's
/// first primary key column. Returns the number of resolved keys.
pub fn link(schema: &mut Schema) -> usize {
    let positions: HashMap<String, usize> = schema
        .tables
        .iter()
        .enumerate()
        .map(|(index, table)| (table.name.clone(), index))
        .collect();

    let first_keys: Vec<Option<String>> = schema
        .tables
        .iter()
        .map(|table| table.primary_keys.first().cloned())
        .collect();

    let mut resolved = 0;
    for table in &mut schema.tables {
        for fk in &mut table.foreign_keys {
            fk.target = positions.get(&fk.referenced_table).copied();
            let Some(target) = fk.target else {
                tracing::debug!(
                    table = %table.name,
                    referenced = %fk.referenced_table,
                    "Foreign key target not found"
                );
                continue;
            };

            if fk.referenced_column.is_empty() {
                if let Some(pk) = &first_keys[target] {
                    fk.referenced_column = pk.clone();
                }
            }
            resolved += 1;
        }
    }

    resolved
}
