//! Release notes listing
//!
//! Walks the "what's new" index, follows every top-level entry and collects
//! the article heading plus the editor/author block.

use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::locate::{attr_of, locate, locate_in, locate_all, text_of, Locator};
use super::progress::page_bar;
use super::table::ResultSet;
use crate::config::ScraperConfig;
use crate::error::{FetchError, Result};
use crate::fetch::Session;

/// Column names
pub const HEADER: [&str; 3] = ["Link to article", "Title", "Editor, author"];

/// Article links on the index page, resolved against `base`
pub fn article_links(index_html: &str, base: &Url) -> Result<Vec<String>> {
    let document = Html::parse_document(index_html);
    let section = locate_in(
        &document,
        &Locator::new("section").attr("id", "what-s-new-in-python"),
    )?;
    let wrapper = locate(section, &Locator::new("div").attr("class", "toctree-wrapper"))?;

    let mut links = Vec::new();
    for item in locate_all(wrapper, &Locator::new("li").attr("class", "toctree-l1")) {
        let anchor = locate(item, &Locator::new("a"))?;
        let href = attr_of(anchor, "href")?;
        links.push(base.join(href)?.to_string());
    }
    Ok(links)
}

/// Heading and flattened definition-list text of one article
pub fn parse_article(html: &str) -> Result<(String, String)> {
    let document = Html::parse_document(html);
    let title = text_of(locate_in(&document, &Locator::new("h1"))?);
    let editors = text_of(locate_in(&document, &Locator::new("dl"))?).replace('\n', " ");
    Ok((title.trim().to_string(), editors))
}

/// One row per reachable release notes article, in index order
#[instrument(skip_all)]
pub async fn whats_new(session: &Session, config: &ScraperConfig) -> Result<ResultSet> {
    let index = session
        .fetch(&config.whats_new_url)
        .await
        .ok_or_else(|| FetchError::NoResponse(config.whats_new_url.clone()))?;
    let base = Url::parse(&index.url)?;
    let links = article_links(&index.body, &base)?;
    info!(articles = links.len(), "Release notes index parsed");

    let mut results = ResultSet::new(HEADER);
    let bar = page_bar(links.len(), "Articles");
    for link in bar.wrap_iter(links.into_iter()) {
        let Some(article) = session.fetch(&link).await else {
            warn!(%link, "Skipping unreachable article");
            continue;
        };
        let (title, editors) = parse_article(&article.body)?;
        debug!(%link, %title, "Article parsed");
        results.push([link, title, editors])?;
    }
    bar.finish_and_clear();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
        <section id="what-s-new-in-python">
          <div class="toctree-wrapper compound">
            <ul>
              <li class="toctree-l1"><a href="3.12.html">What's New In Python 3.12</a>
                <ul><li class="toctree-l2"><a href="3.12.html#summary">Summary</a></li></ul>
              </li>
              <li class="toctree-l1"><a href="3.11.html">What's New In Python 3.11</a></li>
            </ul>
          </div>
        </section>
    "#;

    #[test]
    fn test_article_links_resolve_top_level_entries() {
        let base = Url::parse("https://docs.python.org/3/whatsnew/").unwrap();
        let links = article_links(INDEX, &base).unwrap();
        assert_eq!(
            links,
            [
                "https://docs.python.org/3/whatsnew/3.12.html",
                "https://docs.python.org/3/whatsnew/3.11.html",
            ]
        );
    }

    #[test]
    fn test_article_links_missing_section() {
        let base = Url::parse("https://docs.python.org/3/whatsnew/").unwrap();
        let err = article_links("<section id=\"other\"></section>", &base).unwrap_err();
        assert!(err.to_string().contains("what-s-new-in-python"));
    }

    #[test]
    fn test_parse_article_flattens_newlines() {
        let html = "<h1>What's New In Python 3.12</h1>\
                    <dl><dt>Editor:</dt>\n<dd>Adam Turner</dd></dl>";
        let (title, editors) = parse_article(html).unwrap();
        assert_eq!(title, "What's New In Python 3.12");
        assert_eq!(editors, "Editor: Adam Turner");
    }
}
