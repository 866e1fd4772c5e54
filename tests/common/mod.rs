//! Shared fixtures: canned upstream pages served through a counting transport

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use pydocs_scraper::config::{CacheBackend, ScraperConfig};
use pydocs_scraper::fetch::{HttpCache, Session, StaticTransport};

pub const MAIN_DOC: &str = r#"
<html><body>
  <div class="sphinxsidebarwrapper">
    <h3>Navigation</h3>
    <ul><li><a href="/3/tutorial/">Tutorial</a></li></ul>
    <ul>
      <li><a href="https://docs.python.org/3.14/">Python 3.14 (in development)</a></li>
      <li><a href="https://docs.python.org/3.13/">Python 3.13 (stable)</a></li>
      <li><a href="https://docs.python.org/3.8/">Python 3.8 (EOL)</a></li>
      <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
    </ul>
  </div>
</body></html>
"#;

pub const WHATS_NEW_INDEX: &str = r#"
<html><body>
  <section id="what-s-new-in-python">
    <h1>What's New in Python</h1>
    <div class="toctree-wrapper compound">
      <ul>
        <li class="toctree-l1"><a class="reference internal" href="3.13.html">What's New In Python 3.13</a>
          <ul><li class="toctree-l2"><a href="3.13.html#summary">Summary</a></li></ul>
        </li>
        <li class="toctree-l1"><a class="reference internal" href="3.12.html">What's New In Python 3.12</a></li>
        <li class="toctree-l1"><a class="reference internal" href="3.11.html">What's New In Python 3.11</a></li>
      </ul>
    </div>
  </section>
</body></html>
"#;

pub const ARTICLE_313: &str = r#"
<html><body>
  <h1>What's New In Python 3.13
</h1>
  <dl class="field-list simple">
    <dt class="field-odd">Editors</dt>
<dd class="field-odd"><p>Adam Turner and Thomas Wouters</p></dd>
  </dl>
</body></html>
"#;

pub const ARTICLE_312: &str = r#"
<html><body>
  <h1>What's New In Python 3.12</h1>
  <dl class="field-list simple"><dt>Editor</dt><dd>Adam Turner</dd></dl>
</body></html>
"#;

pub const DOWNLOADS: &str = r#"
<html><body>
  <div class="body" role="main">
    <table class="docutils align-default">
      <thead><tr><th>Format</th><th>Packed as .zip</th></tr></thead>
      <tbody>
        <tr><td>PDF (US-Letter paper size)</td>
            <td><a class="reference external" href="archives/python-3.13-docs-pdf-letter.zip">Download</a></td></tr>
        <tr><td>PDF (A4 paper size)</td>
            <td><a class="reference external" href="archives/python-3.13-docs-pdf-a4.zip">Download</a></td></tr>
      </tbody>
    </table>
  </div>
</body></html>
"#;

pub const ARCHIVE_URL: &str = "https://docs.python.org/3/archives/python-3.13-docs-pdf-a4.zip";

pub const ARCHIVE_BYTES: &[u8] = b"PK\x03\x04 not really a zip";

pub const PEP_INDEX: &str = r#"
<html><body>
  <section id="numerical-index">
    <table class="pep-zero-table docutils align-default">
      <thead><tr><th>Type/Status</th><th>PEP</th><th>Title</th></tr></thead>
      <tbody>
        <tr><td><abbr title="Process, Active">PA</abbr></td>
            <td><a class="pep reference internal" href="pep-0001/">1</a></td>
            <td><a class="reference external" href="pep-0001/">PEP Purpose and Guidelines</a></td></tr>
        <tr><td><abbr title="Standards Track, Final">SF</abbr></td>
            <td><a class="reference external" href="pep-0008/">8</a></td></tr>
        <tr><td><abbr title="Standards Track, Final">SF</abbr></td>
            <td><a class="reference external" href="pep-0020/">20</a></td></tr>
        <tr><td><abbr title="Standards Track, Deferred">SD</abbr></td>
            <td><a class="reference external" href="pep-0030/">30</a></td></tr>
        <tr><td><abbr title="Standards Track, ???">SX</abbr></td>
            <td><a class="reference external" href="pep-0040/">40</a></td></tr>
        <tr><td>SABC</td>
            <td><a class="reference external" href="pep-0050/">50</a></td></tr>
      </tbody>
    </table>
  </section>
</body></html>
"#;

pub const PEP_PLAIN: &str = r#"
<html><body>
  <table>
    <tr><th>Type/Status</th><th>PEP</th><th>Title</th></tr>
    <tr><td>SF</td><td>8</td><td>Style Guide</td></tr>
    <tr><td>PA</td><td>1</td><td>Purpose</td></tr>
    <tr><td>I</td><td>9</td><td>Draft informational</td></tr>
    <tr><td>SF</td><td>20</td><td>Zen</td></tr>
  </table>
</body></html>
"#;

/// PEP page declaring `status`
pub fn pep_page(status: &str) -> String {
    format!(
        r#"<html><body>
  <dl class="rfc2822 field-list simple">
    <dt class="field-odd">Author<span class="colon">:</span></dt>
    <dd class="field-odd">Someone</dd>
    <dt class="field-even">Status<span class="colon">:</span></dt>
    <dd class="field-even"><abbr>{status}</abbr></dd>
  </dl>
</body></html>"#
    )
}

/// Transport serving every upstream page the four modes need
pub fn upstream() -> StaticTransport {
    StaticTransport::new()
        .with_page("https://docs.python.org/3/", MAIN_DOC)
        .with_page("https://docs.python.org/3/whatsnew/", WHATS_NEW_INDEX)
        .with_page("https://docs.python.org/3/whatsnew/3.13.html", ARTICLE_313)
        .with_page("https://docs.python.org/3/whatsnew/3.12.html", ARTICLE_312)
        .with_page("https://docs.python.org/3/download.html", DOWNLOADS)
        .with_page(ARCHIVE_URL, ARCHIVE_BYTES)
        .with_page("https://peps.python.org/", PEP_INDEX)
        .with_page("https://peps.python.org/pep-0001/", pep_page("Active"))
        .with_page("https://peps.python.org/pep-0008/", pep_page("Final"))
        .with_page("https://peps.python.org/pep-0020/", pep_page("Active"))
        .with_page("https://peps.python.org/pep-0040/", pep_page("Final"))
        .with_page("https://peps.python.org/pep-0050/", pep_page("Final"))
}

/// Default config rooted at `dir`, in-memory cache
pub fn config_in(dir: &Path) -> ScraperConfig {
    let mut config = ScraperConfig::default().with_base_dir(dir);
    config.cache.backend = CacheBackend::Memory;
    config
}

/// Session over `transport`, keeping a handle for call counting
pub fn session_with(transport: StaticTransport) -> (Session, Arc<StaticTransport>) {
    let transport = Arc::new(transport);
    let session = Session::new(Arc::clone(&transport), HttpCache::memory());
    (session, transport)
}
