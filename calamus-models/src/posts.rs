use crate::{
    comments::Comment, groups::Group, schema::posts, users::User, Connection, Error, Result,
};
use chrono::{NaiveDateTime, Utc};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Clone, Debug, PartialEq, Serialize, AsChangeset)]
#[changeset_options(treat_none_as_null = "true")]
pub struct Post {
    pub id: i32,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

#[derive(Insertable)]
#[table_name = "posts"]
pub struct NewPost {
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

impl NewPost {
    pub fn new(text: &str, author: &User) -> Self {
        NewPost {
            text: text.to_owned(),
            pub_date: Utc::now().naive_utc(),
            author_id: author.id,
            group_id: None,
            image: None,
        }
    }
}

impl Post {
    insert!(posts, NewPost);
    get!(posts);
    list_by!(posts, list_by_author, author_id as i32);

    pub fn update(&self, conn: &Connection) -> Result<Self> {
        diesel::update(self).set(self).execute(conn)?;
        Self::get(conn, self.id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        posts::table.count().get_result(conn).map_err(Error::from)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_group(&self, conn: &Connection) -> Result<Option<Group>> {
        self.group_id.map(|id| Group::get(conn, id)).transpose()
    }

    pub fn get_comments(&self, conn: &Connection) -> Result<Vec<Comment>> {
        Comment::list_by_post(conn, self.id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        groups::tests as group_tests, tests::db, users::tests as user_tests, Connection as Conn,
    };
    use chrono::Duration;
    use diesel::Connection;

    // Three posts by different authors, with explicit timestamps so that the
    // newest-first ordering is unambiguous.
    pub(crate) fn fill_database(conn: &Conn) -> (Vec<Post>, Vec<User>, Vec<Group>) {
        let users = user_tests::fill_database(conn);
        let groups = group_tests::fill_database(conn);
        let base = Utc::now().naive_utc();

        let oldest = Post::insert(
            conn,
            NewPost {
                text: "The first post ever".to_owned(),
                pub_date: base - Duration::minutes(30),
                author_id: users[0].id,
                group_id: Some(groups[0].id),
                image: None,
            },
        )
        .unwrap();
        let middle = Post::insert(
            conn,
            NewPost {
                text: "An ungrouped post".to_owned(),
                pub_date: base - Duration::minutes(20),
                author_id: users[1].id,
                group_id: None,
                image: None,
            },
        )
        .unwrap();
        let newest = Post::insert(
            conn,
            NewPost {
                text: "Fresh news".to_owned(),
                pub_date: base - Duration::minutes(10),
                author_id: users[2].id,
                group_id: Some(groups[1].id),
                image: Some("posts/picture.png".to_owned()),
            },
        )
        .unwrap();

        (vec![oldest, middle, newest], users, groups)
    }

    #[test]
    fn insert_and_relations() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let (posts, users, groups) = fill_database(&conn);
            assert_eq!(Post::count(&conn)?, 3);

            let post = Post::get(&conn, posts[0].id)?;
            assert_eq!(post.get_author(&conn)?.id, users[0].id);
            assert_eq!(post.get_group(&conn)?.unwrap().id, groups[0].id);
            assert_eq!(posts[1].get_group(&conn)?, None);
            Ok(())
        });
    }

    #[test]
    fn update() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let (posts, _, _) = fill_database(&conn);
            let mut post = posts[0].clone();
            post.text = "Edited text".to_owned();
            post.group_id = None;
            let post = post.update(&conn)?;

            let reloaded = Post::get(&conn, post.id)?;
            assert_eq!(reloaded.text, "Edited text");
            assert_eq!(reloaded.group_id, None);
            Ok(())
        });
    }

    #[test]
    fn delete_cascades_to_comments() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            use crate::comments::{Comment, NewComment};

            let (posts, users, _) = fill_database(&conn);
            Comment::insert(&conn, NewComment::new("Nice post", &posts[0], &users[1]))?;
            assert_eq!(posts[0].get_comments(&conn)?.len(), 1);

            posts[0].delete(&conn)?;
            assert!(matches!(Post::get(&conn, posts[0].id), Err(Error::NotFound)));
            assert_eq!(posts[0].get_comments(&conn)?.len(), 0);
            Ok(())
        });
    }
}
