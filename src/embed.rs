//! The `<script>` tag that embeds the comments client in a page.
//!
//! The tag identifies the repository, the discussion category and how the
//! hosting page maps to a discussion. Every interpolated value goes through
//! minijinja's HTML auto-escaping.

use std::fmt;
use std::str::FromStr;

use minijinja::{AutoEscape, Environment, context};
use serde::{Deserialize, Serialize};

use crate::discussion::error::DiscussionError;
use crate::discussion::query::DiscussionQuery;

/// Default location of the client script.
pub const DEFAULT_CLIENT_URL: &str = "https://giscus.app/client.js";

const EMBED_TEMPLATE: &str = r#"<script src="{{ client_url }}"
{%- for attribute in attributes %}
        {{ attribute.name }}="{{ attribute.value }}"
{%- endfor %}
        crossorigin="anonymous"
        async>
</script>"#;

/// How a page is matched to its discussion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mapping {
    /// Page path, e.g. `/posts/hello`.
    #[default]
    #[serde(rename = "pathname")]
    Pathname,
    /// Full page URL.
    #[serde(rename = "url")]
    Url,
    /// Document `<title>`.
    #[serde(rename = "title")]
    Title,
    /// The page's `og:title` meta tag.
    #[serde(rename = "og:title")]
    OgTitle,
    /// A fixed search term supplied with the tag.
    #[serde(rename = "specific")]
    Specific,
    /// A fixed discussion number supplied with the tag.
    #[serde(rename = "number")]
    Number,
}

impl Mapping {
    /// Returns the attribute value for this mapping.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pathname => "pathname",
            Self::Url => "url",
            Self::Title => "title",
            Self::OgTitle => "og:title",
            Self::Specific => "specific",
            Self::Number => "number",
        }
    }

    /// Returns true when the tag itself must carry the term.
    #[must_use]
    pub const fn requires_term(self) -> bool {
        matches!(self, Self::Specific | Self::Number)
    }

    /// Builds the query that resolves `term` under this mapping.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::InvalidQuery`] when the mapping is
    /// [`Mapping::Number`] and `term` is not a discussion number.
    pub fn query_for(self, repo: &str, term: &str) -> Result<DiscussionQuery, DiscussionError> {
        if self != Self::Number {
            return Ok(DiscussionQuery::for_term(repo, term));
        }
        let number = term
            .trim()
            .parse::<u64>()
            .map_err(|_| DiscussionError::InvalidQuery {
                message: format!("discussion number must be a positive integer, got {term:?}"),
            })?;
        Ok(DiscussionQuery::for_number(repo, number))
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mapping {
    type Err = DiscussionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "pathname" => Ok(Self::Pathname),
            "url" => Ok(Self::Url),
            "title" => Ok(Self::Title),
            "og:title" => Ok(Self::OgTitle),
            "specific" => Ok(Self::Specific),
            "number" => Ok(Self::Number),
            other => Err(DiscussionError::Configuration {
                message: format!("unknown mapping {other:?}"),
            }),
        }
    }
}

/// Values rendered into the embed tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedScript {
    /// URL of the client script.
    pub client_url: String,
    /// Repository in `owner/name` form.
    pub repo: String,
    /// Node id of the repository.
    pub repo_id: String,
    /// Discussion category name.
    pub category: Option<String>,
    /// Node id of the discussion category.
    pub category_id: String,
    /// Page-to-discussion mapping.
    pub mapping: Mapping,
    /// Term or number for the `specific` and `number` mappings.
    pub term: Option<String>,
    /// Theme name or stylesheet URL.
    pub theme: String,
}

#[derive(Debug, Serialize)]
struct Attribute {
    name: &'static str,
    value: String,
}

impl EmbedScript {
    fn attributes(&self) -> Result<Vec<Attribute>, DiscussionError> {
        let mut attributes = vec![
            Attribute {
                name: "data-repo",
                value: self.repo.clone(),
            },
            Attribute {
                name: "data-repo-id",
                value: self.repo_id.clone(),
            },
        ];
        if let Some(category) = self.category.as_ref().filter(|name| !name.is_empty()) {
            attributes.push(Attribute {
                name: "data-category",
                value: category.clone(),
            });
        }
        attributes.push(Attribute {
            name: "data-category-id",
            value: self.category_id.clone(),
        });
        attributes.push(Attribute {
            name: "data-mapping",
            value: self.mapping.as_str().to_owned(),
        });
        if self.mapping.requires_term() {
            let term = self
                .term
                .clone()
                .filter(|term| !term.trim().is_empty())
                .ok_or_else(|| DiscussionError::InvalidQuery {
                    message: format!("the {} mapping requires a term", self.mapping),
                })?;
            attributes.push(Attribute {
                name: "data-term",
                value: term,
            });
        }
        attributes.push(Attribute {
            name: "data-theme",
            value: self.theme.clone(),
        });
        Ok(attributes)
    }

    /// Renders the `<script>` tag.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::InvalidQuery`] when a `specific` or
    /// `number` mapping has no term, and [`DiscussionError::Configuration`]
    /// when rendering fails.
    pub fn render(&self) -> Result<String, DiscussionError> {
        let attributes = self.attributes()?;

        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template("embed", EMBED_TEMPLATE)
            .map_err(|error| DiscussionError::Configuration {
                message: format!("invalid embed template: {error}"),
            })?;

        let template = env
            .get_template("embed")
            .map_err(|error| DiscussionError::Configuration {
                message: format!("failed to retrieve embed template: {error}"),
            })?;
        template
            .render(context! {
                client_url => &self.client_url,
                attributes => attributes,
            })
            .map_err(|error| DiscussionError::Configuration {
                message: format!("embed rendering failed: {error}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{DEFAULT_CLIENT_URL, EmbedScript, Mapping};
    use crate::discussion::error::DiscussionError;
    use crate::discussion::query::DiscussionQuery;

    #[fixture]
    fn script() -> EmbedScript {
        EmbedScript {
            client_url: DEFAULT_CLIENT_URL.to_owned(),
            repo: "octo/blog".to_owned(),
            repo_id: "R_kgDOAAAAAA".to_owned(),
            category: Some("Announcements".to_owned()),
            category_id: "DIC_kwDOAAAAAA".to_owned(),
            mapping: Mapping::Pathname,
            term: None,
            theme: "preferred_color_scheme".to_owned(),
        }
    }

    #[rstest]
    fn renders_pathname_tag(script: EmbedScript) {
        let rendered = script.render().expect("tag should render");

        insta::assert_snapshot!(rendered, @r#"
        <script src="https:&#x2f;&#x2f;giscus.app&#x2f;client.js"
                data-repo="octo&#x2f;blog"
                data-repo-id="R_kgDOAAAAAA"
                data-category="Announcements"
                data-category-id="DIC_kwDOAAAAAA"
                data-mapping="pathname"
                data-theme="preferred_color_scheme"
                crossorigin="anonymous"
                async>
        </script>
        "#);
    }

    #[rstest]
    fn specific_mapping_carries_escaped_term(mut script: EmbedScript) {
        script.mapping = Mapping::Specific;
        script.term = Some(r#"Tom & Jerry's "<best>" episode"#.to_owned());

        let rendered = script.render().expect("tag should render");

        assert!(
            rendered.contains(
                r#"data-term="Tom &amp; Jerry&#x27;s &quot;&lt;best&gt;&quot; episode""#
            ),
            "unexpected tag:\n{rendered}"
        );
        assert!(rendered.contains(r#"data-mapping="specific""#));
    }

    #[rstest]
    #[case::specific(Mapping::Specific)]
    #[case::number(Mapping::Number)]
    fn term_mappings_require_a_term(mut script: EmbedScript, #[case] mapping: Mapping) {
        script.mapping = mapping;

        let result = script.render();

        assert!(
            matches!(result, Err(DiscussionError::InvalidQuery { .. })),
            "expected InvalidQuery, got {result:?}"
        );
    }

    #[rstest]
    fn non_term_mapping_omits_term(mut script: EmbedScript) {
        script.mapping = Mapping::OgTitle;
        script.term = Some("ignored".to_owned());
        script.category = None;

        let rendered = script.render().expect("tag should render");

        assert!(!rendered.contains("data-term"));
        assert!(!rendered.contains("data-category="));
        assert!(rendered.contains(r#"data-mapping="og:title""#));
    }

    #[rstest]
    #[case("pathname", Mapping::Pathname)]
    #[case("url", Mapping::Url)]
    #[case("title", Mapping::Title)]
    #[case("og:title", Mapping::OgTitle)]
    #[case("specific", Mapping::Specific)]
    #[case("number", Mapping::Number)]
    fn mapping_round_trips_through_its_name(#[case] name: &str, #[case] mapping: Mapping) {
        assert_eq!(name.parse::<Mapping>(), Ok(mapping));
        assert_eq!(mapping.to_string(), name);
    }

    #[rstest]
    fn unknown_mapping_is_a_configuration_error() {
        assert!(matches!(
            "slug".parse::<Mapping>(),
            Err(DiscussionError::Configuration { .. })
        ));
    }

    #[rstest]
    fn number_mapping_builds_number_query() {
        let query = Mapping::Number
            .query_for("octo/blog", " 42 ")
            .expect("number should parse");

        assert_eq!(query, DiscussionQuery::for_number("octo/blog", 42));
    }

    #[rstest]
    #[case::pathname(Mapping::Pathname)]
    #[case::title(Mapping::Title)]
    fn term_mappings_build_term_query(#[case] mapping: Mapping) {
        let query = mapping
            .query_for("octo/blog", "posts/hello")
            .expect("term query should build");

        assert_eq!(query, DiscussionQuery::for_term("octo/blog", "posts/hello"));
    }

    #[rstest]
    fn number_mapping_rejects_non_numeric_term() {
        let result = Mapping::Number.query_for("octo/blog", "hello");

        assert!(matches!(result, Err(DiscussionError::InvalidQuery { .. })));
    }
}
