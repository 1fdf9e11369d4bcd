use crate::{
    groups::Group,
    pagination::{Page, Paginated},
    posts::Post,
    schema::{follows, groups, posts, users},
    users::User,
    Connection, Error, Result,
};
use diesel::{ExpressionMethods, NullableExpressionMethods, QueryDsl, RunQueryDsl};

/// Which posts a feed shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    All,
    Group(i32),
    Author(i32),
    /// Posts by the authors this user follows.
    Followed(i32),
}

/// A post with its author and group resolved in the same query, so that
/// rendering a page does not go back to the database per row.
#[derive(Clone, Debug, Serialize)]
pub struct FeedEntry {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}

impl Scope {
    /// One window of the feed, newest first.
    pub fn page(&self, conn: &Connection, (min, max): (i32, i32)) -> Result<Vec<FeedEntry>> {
        let query = posts::table
            .inner_join(users::table)
            .left_join(groups::table)
            .select((
                posts::all_columns,
                users::all_columns,
                groups::all_columns.nullable(),
            ))
            .order((posts::pub_date.desc(), posts::id.desc()))
            .into_boxed();
        let query = match *self {
            Scope::All => query,
            Scope::Group(group) => query.filter(posts::group_id.eq(group)),
            Scope::Author(author) => query.filter(posts::author_id.eq(author)),
            Scope::Followed(user) => {
                let authors = follows::table
                    .filter(follows::follower_id.eq(user))
                    .select(follows::following_id);
                query.filter(posts::author_id.eq_any(authors))
            }
        };
        query
            .offset(min.into())
            .limit((max - min).into())
            .load::<(Post, User, Option<Group>)>(conn)
            .map(|rows| {
                rows.into_iter()
                    .map(|(post, author, group)| FeedEntry {
                        post,
                        author,
                        group,
                    })
                    .collect()
            })
            .map_err(Error::from)
    }

    pub fn count(&self, conn: &Connection) -> Result<i64> {
        match *self {
            Scope::All => posts::table.count().get_result(conn),
            Scope::Group(group) => posts::table
                .filter(posts::group_id.eq(group))
                .count()
                .get_result(conn),
            Scope::Author(author) => posts::table
                .filter(posts::author_id.eq(author))
                .count()
                .get_result(conn),
            Scope::Followed(user) => {
                let authors = follows::table
                    .filter(follows::follower_id.eq(user))
                    .select(follows::following_id);
                posts::table
                    .filter(posts::author_id.eq_any(authors))
                    .count()
                    .get_result(conn)
            }
        }
        .map_err(Error::from)
    }

    /// The requested page of this feed, with pagination metadata. The page
    /// index clamps into the valid range.
    pub fn paginate(&self, conn: &Connection, page: Page) -> Result<Paginated<FeedEntry>> {
        let total_count = self.count(conn)?;
        let total_pages = Page::total(total_count);
        let page = page.clamp(total_pages);
        let items = self.page(conn, page.limits())?;
        Ok(Paginated {
            items,
            total_count,
            total_pages,
            page: page.number(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        follows::Follow,
        posts::{tests as post_tests, NewPost},
        tests::db,
        ITEMS_PER_PAGE,
    };
    use diesel::Connection;

    #[test]
    fn all_is_newest_first_with_relations_resolved() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let (posts, users, groups) = post_tests::fill_database(&conn);
            let feed = Scope::All.page(&conn, Page::first().limits())?;

            assert_eq!(
                feed.iter().map(|e| e.post.id).collect::<Vec<_>>(),
                vec![posts[2].id, posts[1].id, posts[0].id]
            );
            assert_eq!(feed[0].author.id, users[2].id);
            assert_eq!(feed[0].group.as_ref().unwrap().id, groups[1].id);
            assert!(feed[1].group.is_none());
            Ok(())
        });
    }

    #[test]
    fn group_and_author_scopes_filter() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let (posts, users, groups) = post_tests::fill_database(&conn);

            let in_group = Scope::Group(groups[0].id).page(&conn, Page::first().limits())?;
            assert_eq!(
                in_group.iter().map(|e| e.post.id).collect::<Vec<_>>(),
                vec![posts[0].id]
            );

            let by_author = Scope::Author(users[1].id).page(&conn, Page::first().limits())?;
            assert_eq!(
                by_author.iter().map(|e| e.post.id).collect::<Vec<_>>(),
                vec![posts[1].id]
            );
            assert_eq!(Scope::Author(users[1].id).count(&conn)?, 1);
            Ok(())
        });
    }

    #[test]
    fn followed_scope_only_shows_followed_authors() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let (posts, users, _) = post_tests::fill_database(&conn);
            Follow::follow(&conn, &users[0], &users[2])?;

            let feed = Scope::Followed(users[0].id).page(&conn, Page::first().limits())?;
            assert_eq!(
                feed.iter().map(|e| e.post.id).collect::<Vec<_>>(),
                vec![posts[2].id]
            );
            assert_eq!(Scope::Followed(users[1].id).count(&conn)?, 0);
            Ok(())
        });
    }

    #[test]
    fn paginate_slices_and_clamps() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let (_, users, _) = post_tests::fill_database(&conn);
            for i in 0..ITEMS_PER_PAGE + 2 {
                crate::posts::Post::insert(
                    &conn,
                    NewPost::new(&format!("Filler {}", i), &users[0]),
                )?;
            }

            // 3 fixture posts + ITEMS_PER_PAGE + 2 fillers
            let total = i64::from(ITEMS_PER_PAGE) + 5;
            let first = Scope::All.paginate(&conn, Page::first())?;
            assert_eq!(first.total_count, total);
            assert_eq!(first.total_pages, 2);
            assert_eq!(first.len(), ITEMS_PER_PAGE as usize);

            let second = Scope::All.paginate(&conn, Page::new(2))?;
            assert_eq!(second.len(), 5);

            // Beyond the range clamps to the last page.
            let beyond = Scope::All.paginate(&conn, Page::new(99))?;
            assert_eq!(beyond.page, 2);
            assert_eq!(beyond.len(), 5);
            Ok(())
        });
    }

    #[test]
    fn empty_feed_is_one_empty_page() {
        let conn = db();
        conn.test_transaction::<_, Error, _>(|| {
            let paginated = Scope::All.paginate(&conn, Page::first())?;
            assert!(paginated.is_empty());
            assert_eq!(paginated.total_pages, 1);
            assert_eq!(paginated.page, 1);
            Ok(())
        });
    }
}
