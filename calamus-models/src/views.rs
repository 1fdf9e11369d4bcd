//! The core behind each route of the URL table. Views stay framework-free:
//! they take a connection, the authenticated user if any, and already-parsed
//! input, and answer with what the web layer should do.

use crate::{
    cache::Cache,
    comments::{Comment, NewComment},
    feeds::Scope,
    follows::Follow,
    forms::{CommentForm, PostForm},
    groups::Group,
    pagination::Page,
    posts::{NewPost, Post},
    users::User,
    Connection, Result, CONFIG,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub template: &'static str,
    pub context: serde_json::Value,
}

/// What a view asks the web layer to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Render(Rendered),
    Redirect(String),
}

fn render(template: &'static str, context: serde_json::Value) -> Outcome {
    Outcome::Render(Rendered { template, context })
}

fn login_redirect(next: &str) -> Outcome {
    Outcome::Redirect(format!("{}?next={}", CONFIG.login_path, next))
}

/// `GET /` — the home feed. Rendered once per page, then served from the
/// cache until it is cleared, even if posts changed meanwhile.
pub fn index(conn: &Connection, cache: &Cache, page: Page) -> Result<Outcome> {
    // Clamp before keying, so that every out-of-range number shares the last
    // page's entry instead of piling up entries of its own.
    let page = page.clamp(Page::total(Scope::All.count(conn)?));
    let context = cache.get_or_render(&format!("index:{}", page.number()), || {
        let feed = Scope::All.paginate(conn, page)?;
        Ok(json!({ "page_obj": feed }))
    })?;
    Ok(render("posts/index.html", context))
}

/// `GET /group/{slug}/`
pub fn group_posts(conn: &Connection, slug: &str, page: Page) -> Result<Outcome> {
    let group = Group::find_by_slug(conn, slug)?;
    let feed = Scope::Group(group.id).paginate(conn, page)?;
    Ok(render(
        "posts/group_list.html",
        json!({ "group": group, "page_obj": feed }),
    ))
}

/// `GET /profile/{username}/`
pub fn profile(
    conn: &Connection,
    requester: Option<&User>,
    username: &str,
    page: Page,
) -> Result<Outcome> {
    let author = User::find_by_name(conn, username)?;
    let feed = Scope::Author(author.id).paginate(conn, page)?;
    let following = match requester {
        Some(user) => author.is_followed_by(conn, user)?,
        None => false,
    };
    Ok(render(
        "posts/profile.html",
        json!({
            "author": author,
            "post_count": feed.total_count,
            "page_obj": feed,
            "following": following,
        }),
    ))
}

/// `GET /posts/{id}/`
pub fn post_detail(conn: &Connection, post_id: i32) -> Result<Outcome> {
    let post = Post::get(conn, post_id)?;
    let author = post.get_author(conn)?;
    Ok(render(
        "posts/post_detail.html",
        json!({
            "post": post,
            "comments": post.get_comments(conn)?,
            "post_count": author.count_posts(conn)?,
            "form": CommentForm::default(),
        }),
    ))
}

/// `GET /create/` — a blank form, with no field errors yet.
pub fn post_form(requester: Option<&User>) -> Result<Outcome> {
    if requester.is_none() {
        return Ok(login_redirect("/create/"));
    }
    Ok(render(
        "posts/create_post.html",
        json!({ "form": PostForm::default() }),
    ))
}

/// `POST /create/`
pub fn post_create(conn: &Connection, requester: Option<&User>, form: &PostForm) -> Result<Outcome> {
    let user = match requester {
        Some(user) => user,
        None => return Ok(login_redirect("/create/")),
    };
    if let Err(errors) = form.validate() {
        return Ok(render(
            "posts/create_post.html",
            json!({ "form": form, "errors": errors }),
        ));
    }
    if let Some(group_id) = form.group_id {
        Group::get(conn, group_id)?;
    }
    Post::insert(
        conn,
        NewPost {
            text: form.text.clone(),
            pub_date: Utc::now().naive_utc(),
            author_id: user.id,
            group_id: form.group_id,
            image: form.image.clone(),
        },
    )?;
    Ok(Outcome::Redirect(format!("/profile/{}/", user.username)))
}

/// `GET /posts/{id}/edit/` — the form pre-filled with the post as it stands.
/// Only the author gets it; anyone else is sent back to the detail view.
pub fn edit_form(conn: &Connection, requester: Option<&User>, post_id: i32) -> Result<Outcome> {
    let post = Post::get(conn, post_id)?;
    let user = match requester {
        Some(user) => user,
        None => return Ok(login_redirect(&format!("/posts/{}/edit/", post_id))),
    };
    if post.author_id != user.id {
        return Ok(Outcome::Redirect(format!("/posts/{}/", post_id)));
    }
    let form = PostForm {
        text: post.text.clone(),
        group_id: post.group_id,
        image: post.image.clone(),
    };
    Ok(render(
        "posts/create_post.html",
        json!({ "post": post, "form": form, "is_edit": true }),
    ))
}

/// `POST /posts/{id}/edit/` — only the author may edit; anyone else is sent
/// back to the detail view with the post untouched.
pub fn post_edit(
    conn: &Connection,
    requester: Option<&User>,
    post_id: i32,
    form: &PostForm,
) -> Result<Outcome> {
    let mut post = Post::get(conn, post_id)?;
    let user = match requester {
        Some(user) => user,
        None => return Ok(login_redirect(&format!("/posts/{}/edit/", post_id))),
    };
    if post.author_id != user.id {
        return Ok(Outcome::Redirect(format!("/posts/{}/", post_id)));
    }
    if let Err(errors) = form.validate() {
        return Ok(render(
            "posts/create_post.html",
            json!({ "post": post, "form": form, "errors": errors, "is_edit": true }),
        ));
    }
    if let Some(group_id) = form.group_id {
        Group::get(conn, group_id)?;
    }
    post.text = form.text.clone();
    post.group_id = form.group_id;
    post.image = form.image.clone();
    post.update(conn)?;
    Ok(Outcome::Redirect(format!("/posts/{}/", post_id)))
}

/// `POST /posts/{id}/comment/` — an invalid comment is dropped; either way
/// the caller lands back on the detail view.
pub fn add_comment(
    conn: &Connection,
    requester: Option<&User>,
    post_id: i32,
    form: &CommentForm,
) -> Result<Outcome> {
    let user = match requester {
        Some(user) => user,
        None => return Ok(login_redirect(&format!("/posts/{}/comment/", post_id))),
    };
    let post = Post::get(conn, post_id)?;
    if form.validate().is_ok() {
        Comment::insert(conn, NewComment::new(&form.text, &post, user))?;
    }
    Ok(Outcome::Redirect(format!("/posts/{}/", post_id)))
}

/// `GET /follow/` — the feed restricted to followed authors.
pub fn follow_index(conn: &Connection, requester: Option<&User>, page: Page) -> Result<Outcome> {
    let user = match requester {
        Some(user) => user,
        None => return Ok(login_redirect("/follow/")),
    };
    let feed = Scope::Followed(user.id).paginate(conn, page)?;
    Ok(render("posts/follow.html", json!({ "page_obj": feed })))
}

/// `POST /profile/{username}/follow/`
pub fn profile_follow(
    conn: &Connection,
    requester: Option<&User>,
    username: &str,
) -> Result<Outcome> {
    let user = match requester {
        Some(user) => user,
        None => return Ok(login_redirect(&format!("/profile/{}/follow/", username))),
    };
    let author = User::find_by_name(conn, username)?;
    Follow::follow(conn, user, &author)?;
    Ok(Outcome::Redirect(format!("/profile/{}/", username)))
}

/// `POST /profile/{username}/unfollow/`
pub fn profile_unfollow(
    conn: &Connection,
    requester: Option<&User>,
    username: &str,
) -> Result<Outcome> {
    let user = match requester {
        Some(user) => user,
        None => return Ok(login_redirect(&format!("/profile/{}/unfollow/", username))),
    };
    let author = User::find_by_name(conn, username)?;
    Follow::unfollow(conn, user, &author)?;
    Ok(Outcome::Redirect(format!("/profile/{}/", username)))
}
