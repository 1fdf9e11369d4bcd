use crate::{posts::Post, schema::comments, users::User, Connection, Error, Result};
use chrono::{NaiveDateTime, Utc};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Clone, Debug, PartialEq, Serialize)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub text: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "comments"]
pub struct NewComment {
    pub post_id: i32,
    pub author_id: i32,
    pub text: String,
    pub creation_date: NaiveDateTime,
}

impl NewComment {
    pub fn new(text: &str, post: &Post, author: &User) -> Self {
        NewComment {
            post_id: post.id,
            author_id: author.id,
            text: text.to_owned(),
            creation_date: Utc::now().naive_utc(),
        }
    }
}

impl Comment {
    insert!(comments, NewComment);
    get!(comments);

    /// Comments under a post, oldest first.
    pub fn list_by_post(conn: &Connection, post_id: i32) -> Result<Vec<Comment>> {
        comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::creation_date.asc())
            .then_order_by(comments::id.asc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_post(&self, conn: &Connection) -> Result<Post> {
        Post::get(conn, self.post_id)
    }
}
