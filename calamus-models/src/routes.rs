/// The URL table of the application. The web layer resolves a request path
/// here; unknown paths get no route, which callers report as a 404.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Index,
    GroupPosts(String),
    Profile(String),
    PostDetail(i32),
    PostCreate,
    PostEdit(i32),
    AddComment(i32),
    FollowIndex,
    ProfileFollow(String),
    ProfileUnfollow(String),
}

impl Route {
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim_start_matches('/').trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();
        match segments.as_slice() {
            [""] => Some(Route::Index),
            ["create"] => Some(Route::PostCreate),
            ["follow"] => Some(Route::FollowIndex),
            ["group", slug] if !slug.is_empty() => Some(Route::GroupPosts((*slug).to_owned())),
            ["profile", username] if !username.is_empty() => {
                Some(Route::Profile((*username).to_owned()))
            }
            ["profile", username, "follow"] if !username.is_empty() => {
                Some(Route::ProfileFollow((*username).to_owned()))
            }
            ["profile", username, "unfollow"] if !username.is_empty() => {
                Some(Route::ProfileUnfollow((*username).to_owned()))
            }
            ["posts", id] => id.parse().ok().map(Route::PostDetail),
            ["posts", id, "edit"] => id.parse().ok().map(Route::PostEdit),
            ["posts", id, "comment"] => id.parse().ok().map(Route::AddComment),
            _ => None,
        }
    }
}
