use crate::{schema::follows, users::User, Connection, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A directed edge meaning "follower receives following's posts in their
/// follow feed".
#[derive(Queryable, Identifiable, Clone, Debug, PartialEq, Serialize)]
pub struct Follow {
    pub id: i32,
    pub follower_id: i32,
    pub following_id: i32,
}

#[derive(Insertable)]
#[table_name = "follows"]
pub struct NewFollow {
    pub follower_id: i32,
    pub following_id: i32,
}

impl Follow {
    insert!(follows, NewFollow);
    get!(follows);

    pub fn find(conn: &Connection, from: i32, to: i32) -> Result<Follow> {
        follows::table
            .filter(follows::follower_id.eq(from))
            .filter(follows::following_id.eq(to))
            .first(conn)
            .map_err(Error::from)
    }

    /// Idempotent: an existing edge is returned as-is, and a self-follow
    /// creates nothing.
    pub fn follow(conn: &Connection, user: &User, author: &User) -> Result<Option<Follow>> {
        if user.id == author.id {
            tracing::debug!(user = %user.username, "ignoring self-follow");
            return Ok(None);
        }
        match Self::find(conn, user.id, author.id) {
            Ok(follow) => Ok(Some(follow)),
            Err(Error::NotFound) => {
                let inserted = Self::insert(
                    conn,
                    NewFollow {
                        follower_id: user.id,
                        following_id: author.id,
                    },
                );
                match inserted {
                    Ok(follow) => Ok(Some(follow)),
                    // Unique (follower, following) index: someone else created
                    // the edge between our check and our insert.
                    Err(Error::Db(diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _,
                    ))) => Self::find(conn, user.id, author.id).map(Some),
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Fails with `Error::NotFound` if no such edge exists.
    pub fn unfollow(conn: &Connection, user: &User, author: &User) -> Result<()> {
        let follow = Self::find(conn, user.id, author.id)?;
        diesel::delete(&follow).execute(conn)?;
        tracing::debug!(user = %user.username, author = %author.username, "unfollowed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema::follows, tests::db, users::tests as user_tests};
    use diesel::Connection;

    fn count_edges(conn: &crate::Connection, from: i32, to: i32) -> i64 {
        follows::table
            .filter(follows::follower_id.eq(from))
            .filter(follows::following_id.eq(to))
            .count()
            .get_result(conn)
            .unwrap()
    }

    #[test]
    fn follow_is_idempotent() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let users = user_tests::fill_database(&conn);
            let first = Follow::follow(&conn, &users[1], &users[2])?;
            let second = Follow::follow(&conn, &users[1], &users[2])?;

            assert_eq!(first.unwrap().id, second.unwrap().id);
            assert_eq!(count_edges(&conn, users[1].id, users[2].id), 1);
            Ok(())
        });
    }

    #[test]
    fn self_follow_is_silently_rejected() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let users = user_tests::fill_database(&conn);
            assert!(Follow::follow(&conn, &users[1], &users[1])?.is_none());
            assert_eq!(count_edges(&conn, users[1].id, users[1].id), 0);
            Ok(())
        });
    }

    #[test]
    fn unfollow_removes_the_edge() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let users = user_tests::fill_database(&conn);
            Follow::follow(&conn, &users[1], &users[2])?;
            Follow::unfollow(&conn, &users[1], &users[2])?;
            assert_eq!(count_edges(&conn, users[1].id, users[2].id), 0);
            Ok(())
        });
    }

    #[test]
    fn unfollow_without_edge_is_not_found() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let users = user_tests::fill_database(&conn);
            assert!(matches!(
                Follow::unfollow(&conn, &users[1], &users[2]),
                Err(Error::NotFound)
            ));
            Ok(())
        });
    }

    #[test]
    fn follows_are_directed() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let users = user_tests::fill_database(&conn);
            Follow::follow(&conn, &users[1], &users[2])?;
            assert!(users[2].is_followed_by(&conn, &users[1])?);
            assert!(!users[1].is_followed_by(&conn, &users[2])?);
            Ok(())
        });
    }
}
