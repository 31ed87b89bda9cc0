//! Page templates for Corkboard.
//!
//! Templates are compiled into the binary and rendered with `minijinja`.
//! HTML auto-escaping is on for every template, since they all end in `.html`.
//!
//! Filters available to templates:
//! - `localtime`: format a stored UTC timestamp in the forum's timezone
//! - `naturaltime`: render a timestamp relative to now ("3 minutes ago")
//! - `markdown`: render a post message as sanitized HTML

use chrono::Utc;
use minijinja::{Environment, Value};
use serde::Serialize;

use crate::config::ForumConfig;
use crate::datetime::{format_datetime, naturaltime, DISPLAY_FORMAT};
use crate::web::markdown::render_markdown;
use crate::Result;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("macros.html", include_str!("../../templates/macros.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("topics.html", include_str!("../../templates/topics.html")),
    ("new_topic.html", include_str!("../../templates/new_topic.html")),
    ("topic_posts.html", include_str!("../../templates/topic_posts.html")),
    ("reply_topic.html", include_str!("../../templates/reply_topic.html")),
    ("edit_post.html", include_str!("../../templates/edit_post.html")),
    ("signup.html", include_str!("../../templates/signup.html")),
    ("login.html", include_str!("../../templates/login.html")),
];

/// Compiled template set.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Build the template set for a forum.
    ///
    /// The forum name and description are exposed to every template as
    /// `forum.name` and `forum.description`.
    pub fn new(forum: &ForumConfig) -> Result<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        let timezone = forum.timezone.clone();
        env.add_filter("localtime", move |value: String| {
            format_datetime(&value, &timezone, DISPLAY_FORMAT)
        });
        env.add_filter("naturaltime", |value: String| {
            naturaltime(&value, Utc::now())
        });
        env.add_filter("markdown", |value: String| {
            Value::from_safe_string(render_markdown(&value))
        });
        env.add_global(
            "forum",
            Value::from_serialize(ForumGlobals {
                name: &forum.name,
                description: &forum.description,
            }),
        );

        Ok(Self { env })
    }

    /// Render a template with the given context.
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("templates", &TEMPLATES.len())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ForumGlobals<'a> {
    name: &'a str,
    description: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Page, PageRequest, PageSelector, PostView, Topic, TopicSummary};
    use crate::web::forms::{FormErrors, LoginForm, NewTopicForm};
    use minijinja::context;

    fn engine() -> TemplateEngine {
        TemplateEngine::new(&ForumConfig::default()).unwrap()
    }

    fn board() -> Board {
        Board {
            id: 1,
            name: "Django".to_string(),
            description: "Django board.".to_string(),
        }
    }

    #[test]
    fn test_all_templates_load() {
        let engine = engine();
        for &(name, _) in TEMPLATES {
            assert!(engine.env.get_template(name).is_ok(), "{name}");
        }
        assert!(engine.render("missing.html", context! {}).is_err());
    }

    #[test]
    fn test_post_message_rendered_as_markdown() {
        let posts = vec![PostView {
            id: 1,
            message: "**bold** text <b>raw</b>".to_string(),
            created_by: 1,
            author: "john".to_string(),
            created_at: "2024-01-01 10:00:00".to_string(),
            editor: None,
            updated_at: None,
        }];
        let request = PageRequest::resolve(PageSelector::Number(1), 1, 3).unwrap();
        let topic = Topic {
            id: 7,
            subject: "Hello".to_string(),
            board_id: 1,
            starter_id: 1,
            views: 0,
            created_at: "2024-01-01 10:00:00".to_string(),
        };
        let html = engine()
            .render(
                "topic_posts.html",
                context! { board => board(), topic => topic, posts => Page::new(posts, request, 1) },
            )
            .unwrap();
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("<b>raw</b>"));
    }

    #[test]
    fn test_forms_carry_csrf_field() {
        let html = engine()
            .render(
                "new_topic.html",
                context! {
                    board => board(),
                    form => NewTopicForm::default(),
                    errors => FormErrors::new(),
                    csrf_token => "abc123",
                },
            )
            .unwrap();
        assert!(html.contains(r#"name="csrfmiddlewaretoken" value="abc123""#));
    }

    #[test]
    fn test_index_renders_empty_board_list() {
        let html = engine()
            .render("index.html", context! { boards => Vec::<Board>::new() })
            .unwrap();
        assert!(html.contains("Corkboard"));
    }

    #[test]
    fn test_output_is_escaped() {
        let mut form = NewTopicForm::default();
        form.subject = "<script>alert(1)</script>".to_string();
        let html = engine()
            .render(
                "new_topic.html",
                context! { board => board(), form => form, errors => FormErrors::new() },
            )
            .unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_topics_renders_pagination() {
        let topics = vec![TopicSummary {
            id: 7,
            subject: "Hello".to_string(),
            starter: "john".to_string(),
            replies: 0,
            views: 3,
            created_at: "2024-01-01 10:00:00".to_string(),
            last_updated: "2024-01-01 10:00:00".to_string(),
        }];
        let request = PageRequest::resolve(PageSelector::Number(2), 3, 2).unwrap();
        let page = Page::new(topics, request, 3);
        let html = engine()
            .render("topics.html", context! { board => board(), topics => page })
            .unwrap();

        assert!(html.contains("/boards/1/topics/7/"));
        assert!(html.contains("?page=1"));
        assert!(html.contains("Jan 1, 2024 10:00"));
    }

    #[test]
    fn test_forum_name_from_config() {
        let forum = ForumConfig {
            name: "Tea Room".to_string(),
            ..ForumConfig::default()
        };
        let html = TemplateEngine::new(&forum)
            .unwrap()
            .render("login.html", context! { form => LoginForm::default(), errors => FormErrors::new() })
            .unwrap();
        assert!(html.contains("Tea Room"));
    }
}
