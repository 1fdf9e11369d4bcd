use crate::{schema::groups, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A thematic group posts can be filed under. Groups are created by
/// administrators only (through the CLI).
#[derive(Queryable, Identifiable, Clone, Debug, PartialEq, Serialize)]
pub struct Group {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Insertable)]
#[table_name = "groups"]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    insert!(groups, NewGroup);
    get!(groups);
    find_by!(groups, find_by_slug, slug as &str);

    pub fn delete(&self, conn: &crate::Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}
