use validator::Validate;

/// Typed form inputs; validation returns a field-error list instead of
/// raising.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, message = "Post text cannot be empty"))]
    pub text: String,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1, message = "Comment text cannot be empty"))]
    pub text: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct GroupForm {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Slug cannot be empty"))]
    pub slug: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_a_field_error() {
        let form = PostForm {
            text: String::new(),
            group_id: None,
            image: None,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("text"));

        let form = PostForm {
            text: "Hello".to_owned(),
            ..PostForm::default()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn comment_form_requires_text() {
        assert!(CommentForm::default().validate().is_err());
        assert!(CommentForm {
            text: "ok".to_owned()
        }
        .validate()
        .is_ok());
    }
}
