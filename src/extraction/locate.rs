//! Required-element lookup
//!
//! `Locator` describes an element by tag name, attribute filters and an
//! optional text filter. `locate` returns the first match in document order
//! or fails with `ExtractionError::ElementNotFound`; there is no fallback.

use std::fmt;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::error;

use crate::error::ExtractionError;

/// How an attribute value is matched
#[derive(Debug, Clone)]
pub enum AttrFilter {
    /// Exact value. For `class`, a single class token also matches.
    Equals(String),
    /// Regular expression searched anywhere in the value
    Matches(Regex),
}

impl AttrFilter {
    fn accepts(&self, name: &str, value: &str) -> bool {
        match self {
            AttrFilter::Equals(expected) => {
                value == expected
                    || (name == "class" && value.split_whitespace().any(|c| c == expected))
            }
            AttrFilter::Matches(re) => re.is_match(value),
        }
    }
}

/// Element selector: tag, attribute filters, text filter
#[derive(Debug, Clone)]
pub struct Locator {
    tag: String,
    attrs: Vec<(String, AttrFilter)>,
    text: Option<String>,
}

impl Locator {
    /// Match elements named `tag`
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            text: None,
        }
    }

    /// Require `name` to equal `value`
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs
            .push((name.into(), AttrFilter::Equals(value.into())));
        self
    }

    /// Require `name` to match `pattern`
    pub fn attr_regex(mut self, name: impl Into<String>, pattern: Regex) -> Self {
        self.attrs.push((name.into(), AttrFilter::Matches(pattern)));
        self
    }

    /// Require the element's text to contain `needle`
    pub fn text(mut self, needle: impl Into<String>) -> Self {
        self.text = Some(needle.into());
        self
    }

    /// Tag name this locator matches
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether `element` satisfies every filter
    pub fn matches(&self, element: ElementRef<'_>) -> bool {
        let el = element.value();
        if !el.name().eq_ignore_ascii_case(&self.tag) {
            return false;
        }

        let attrs_ok = self.attrs.iter().all(|(name, filter)| {
            el.attr(name)
                .is_some_and(|value| filter.accepts(name, value))
        });
        if !attrs_ok {
            return false;
        }

        match &self.text {
            Some(needle) => text_of(element).contains(needle.as_str()),
            None => true,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, filter) in &self.attrs {
            match filter {
                AttrFilter::Equals(value) => write!(f, " {}=\"{}\"", name, value)?,
                AttrFilter::Matches(re) => write!(f, " {}=/{}/", name, re.as_str())?,
            }
        }
        write!(f, ">")?;
        if let Some(needle) = &self.text {
            write!(f, " containing {:?}", needle)?;
        }
        Ok(())
    }
}

/// First descendant of `scope` matching `locator`
pub fn locate<'a>(
    scope: ElementRef<'a>,
    locator: &Locator,
) -> Result<ElementRef<'a>, ExtractionError> {
    find_first(scope, locator).ok_or_else(|| not_found(locator))
}

/// First element of `document` matching `locator`, root included
pub fn locate_in<'a>(document: &'a Html, locator: &Locator) -> Result<ElementRef<'a>, ExtractionError> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| locator.matches(*el))
        .ok_or_else(|| not_found(locator))
}

/// First descendant of `scope` matching `locator`, without failing
pub fn find_first<'a>(scope: ElementRef<'a>, locator: &Locator) -> Option<ElementRef<'a>> {
    descendants(scope).find(|el| locator.matches(*el))
}

/// Every descendant of `scope` matching `locator`, in document order
pub fn locate_all<'a>(scope: ElementRef<'a>, locator: &Locator) -> Vec<ElementRef<'a>> {
    descendants(scope).filter(|el| locator.matches(*el)).collect()
}

/// Concatenated text of an element and its descendants
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Value of a required attribute
pub fn attr_of<'a>(element: ElementRef<'a>, name: &str) -> Result<&'a str, ExtractionError> {
    element
        .value()
        .attr(name)
        .ok_or_else(|| ExtractionError::MissingAttribute {
            attr: name.to_string(),
            element: format!("<{}>", element.value().name()),
        })
}

fn descendants<'a>(scope: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    scope.descendants().skip(1).filter_map(ElementRef::wrap)
}

fn not_found(locator: &Locator) -> ExtractionError {
    let description = locator.to_string();
    error!(selector = %description, "Required element not found");
    ExtractionError::ElementNotFound(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="toctree-wrapper compound" id="first">
            <a class="reference external" href="pep-0001/">PEP 1</a>
            <a class="reference internal" href="pep-0002/">PEP 2</a>
          </div>
          <div role="main">
            <a href="archive-pdf-letter.zip">letter</a>
            <a href="archive-pdf-a4.zip">a4</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_class_token_matches() {
        let doc = Html::parse_document(PAGE);
        let div = locate_in(&doc, &Locator::new("div").attr("class", "toctree-wrapper")).unwrap();
        assert_eq!(div.value().attr("id"), Some("first"));
    }

    #[test]
    fn test_full_class_value_matches() {
        let doc = Html::parse_document(PAGE);
        let a = locate_in(&doc, &Locator::new("a").attr("class", "reference external")).unwrap();
        assert_eq!(a.value().attr("href"), Some("pep-0001/"));
    }

    #[test]
    fn test_regex_filter() {
        let doc = Html::parse_document(PAGE);
        let main = locate_in(&doc, &Locator::new("div").attr("role", "main")).unwrap();
        let re = Regex::new(r".+pdf-a4\.zip$").unwrap();
        let a = locate(main, &Locator::new("a").attr_regex("href", re)).unwrap();
        assert_eq!(text_of(a), "a4");
    }

    #[test]
    fn test_text_filter() {
        let doc = Html::parse_document(PAGE);
        let a = locate_in(&doc, &Locator::new("a").text("PEP 2")).unwrap();
        assert_eq!(attr_of(a, "href").unwrap(), "pep-0002/");
    }

    #[test]
    fn test_not_found_names_selector() {
        let doc = Html::parse_document(PAGE);
        let err = locate_in(&doc, &Locator::new("section").attr("id", "numerical-index"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("section"));
        assert!(message.contains("id=\"numerical-index\""));
    }

    #[test]
    fn test_locate_skips_scope_itself() {
        let doc = Html::parse_document(PAGE);
        let div = locate_in(&doc, &Locator::new("div")).unwrap();
        assert!(locate(div, &Locator::new("div")).is_err());
    }

    #[test]
    fn test_locate_all_in_document_order() {
        let doc = Html::parse_document(PAGE);
        let links = locate_all(doc.root_element(), &Locator::new("a"));
        let hrefs: Vec<_> = links.iter().filter_map(|a| a.value().attr("href")).collect();
        assert_eq!(
            hrefs,
            ["pep-0001/", "pep-0002/", "archive-pdf-letter.zip", "archive-pdf-a4.zip"]
        );
    }

    #[test]
    fn test_missing_attribute() {
        let doc = Html::parse_document("<p><a>no link</a></p>");
        let a = locate_in(&doc, &Locator::new("a")).unwrap();
        let err = attr_of(a, "href").unwrap_err();
        assert!(err.to_string().contains("href"));
    }
}
