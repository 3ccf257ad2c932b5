//! Table and column names taken from the `model` entities, so the schema built by the
//! migrations cannot drift from what the entities query.

use model::entities::prelude::*;
use sea_orm::entity::prelude::*;
use sea_orm::Iden;

pub trait EntityIden: EntityTrait {
    /// The entity's `table_name`.
    fn table() -> TableIden {
        TableIden(Self::default().table_name().to_string())
    }

    /// The snake_case name of `column`.
    fn column<C: ColumnTrait + Iden>(column: C) -> ColumnIden {
        let mut s = String::new();
        column.unquoted(&mut s);
        ColumnIden(s)
    }
}

impl EntityIden for User {}
impl EntityIden for Profile {}
impl EntityIden for ProfileFollow {}

#[derive(Debug, Clone)]
pub struct TableIden(String);

impl Iden for TableIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}

#[derive(Debug, Clone)]
pub struct ColumnIden(String);

impl Iden for ColumnIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}
