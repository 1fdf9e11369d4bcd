use crate::{follows::Follow, schema::users, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub bio: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Default, Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub bio: String,
}

impl User {
    insert!(users, NewUser);
    get!(users);
    find_by!(users, find_by_name, username as &str);

    pub fn count_posts(&self, conn: &Connection) -> Result<i64> {
        use crate::schema::posts;

        posts::table
            .filter(posts::author_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn is_followed_by(&self, conn: &Connection, other: &User) -> Result<bool> {
        match Follow::find(conn, other.id, self.id) {
            Ok(_) => Ok(true),
            Err(Error::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}
