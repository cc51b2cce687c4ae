use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wikilite_core::config::load_config;
use wikilite_core::fetch::{Fetched, Fetcher, parse_article_url};
use wikilite_core::pipeline::{TransformedArticle, transform_article};

const DEFAULT_CONFIG_PATH: &str = "wikilite.toml";

#[derive(Debug, Parser)]
#[command(
    name = "wikilite",
    version,
    about = "Reformatting proxy that serves simplified pages to low-power clients"
)]
struct Cli {
    #[arg(long, value_name = "ADDR", help = "Listen address, overrides config")]
    bind: Option<String>,
    #[arg(long, value_name = "PATH", help = "Path to the config TOML")]
    config: Option<PathBuf>,
}

struct AppState {
    fetcher: Fetcher,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = load_config(&config_path)?;
    let bind_addr = cli.bind.unwrap_or_else(|| config.bind_addr());
    let state = Arc::new(AppState {
        fetcher: Fetcher::new(&config)?,
    });

    let app = Router::new()
        .route("/", get(home))
        .route("/index.php", get(home))
        .route("/read", get(read))
        .route("/read.php", get(read))
        .fallback(not_found)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "wikilite listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct HomeQuery {
    q: Option<String>,
}

async fn home(Query(query): Query<HomeQuery>) -> Response {
    match query.q {
        Some(q) if !q.is_empty() => page(render_search_redirect(&q)),
        _ => page(render_home()),
    }
}

#[derive(Debug, Deserialize)]
struct ReadQuery {
    a: Option<String>,
}

async fn read(State(state): State<Arc<AppState>>, Query(query): Query<ReadQuery>) -> Response {
    let Some(article_url) = query.a else {
        return (
            StatusCode::BAD_REQUEST,
            "No article URL specified. Please provide a URL using the 'a' parameter.",
        )
            .into_response();
    };
    let url = match parse_article_url(&article_url) {
        Ok(url) => url,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, "That's not a web page :(").into_response();
        }
    };

    info!(%article_url, "proxying");
    match state.fetcher.fetch(&url).await {
        Ok(Fetched::Page { body, final_url }) => match transform_article(&body, &final_url) {
            Ok(article) => page(render_article(&article, &article_url)),
            Err(error) => {
                warn!(%article_url, %error, "transform failed");
                page(render_error(&article_url))
            }
        },
        Ok(Fetched::Download {
            content_type,
            filename,
            bytes,
        }) => (
            [
                (header::CONTENT_TYPE, content_type),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(Fetched::TooLarge { size }) => {
            warn!(%article_url, size, "download over ceiling");
            (
                StatusCode::BAD_REQUEST,
                format!(
                    "Failed to proxy file download, it's too large. :( You can try downloading the file directly: {article_url}"
                ),
            )
                .into_response()
        }
        Err(error) => {
            warn!(%article_url, %error, "fetch failed");
            page(render_error(&article_url))
        }
    }
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn page(body: String) -> Response {
    Html(body).into_response()
}

// Page templates. The retro HTML 2.0 markup is the product: these pages have
// to render on clients that predate CSS.

fn render_home() -> String {
    r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 2.0//EN">
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">

<html>
<head>
  <title>wikilite</title>
</head>
<body>
  <br><br><center><h1><font size=7>wikilite</font></h1></center>
  <center><h2>Wikipedia for low-power clients</h2></center>
  <br><br>
  <center>
  <form action="/" method="get">
  Search Wikipedia: <input type="text" size="30" name="q"><br>
  <input type="submit" value="Search">
  </form>
  </center>
  <br><br><br>
  <small><center>Simplified Wikipedia browsing for low-power clients</center></small>
</body>
</html>"#
        .to_string()
}

fn render_search_redirect(query: &str) -> String {
    let article_url = format!(
        "https://en.wikipedia.org/wiki/{}",
        urlencoding::encode(&query.replace(' ', "_"))
    );
    let proxied = format!("/read?a={}", urlencoding::encode(&article_url));
    format!(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 2.0//EN">
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">
<meta http-equiv="refresh" content="0; url={proxied}">

<html>
<head>
  <title>wikilite</title>
</head>
<body>
  <center>Loading Wikipedia article for "<b>{query}</b>"...</center>
  <br>
  <center><a href="{proxied}">Click here if not redirected</a></center>
</body>
</html>"#
    )
}

fn browse_bar(article_url: &str) -> String {
    format!(
        r#"  <p>
    <form action="/read" method="get">
    <a href="/">Back to <b>wikilite</b></a> | Browsing URL: <input type="text" size="38" name="a" value="{article_url}">
    <input type="submit" value="Go!">
    </form>
  </p>
  <hr>"#
    )
}

fn render_article(article: &TransformedArticle, article_url: &str) -> String {
    format!(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 2.0//EN">
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">

<html>
<head>
  <title>{title}</title>
</head>
<body>
{browse_bar}
  <h1>{title}</h1>
  <p><font size="4">{body}</font></p>
</body>
</html>"#,
        title = article.title,
        browse_bar = browse_bar(article_url),
        body = article.body,
    )
}

fn render_error(article_url: &str) -> String {
    format!(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 2.0//EN">
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">

<html>
<head>
  <title>Error</title>
</head>
<body>
{browse_bar}
  <p><font color="red">Failed to get the article :(</font></p>
</body>
</html>"#,
        browse_bar = browse_bar(article_url),
    )
}

#[cfg(test)]
mod tests {
    use super::{render_article, render_error, render_home, render_search_redirect};
    use wikilite_core::pipeline::TransformedArticle;

    #[test]
    fn home_page_carries_the_search_form() {
        let html = render_home();
        assert!(html.contains("form action=\"/\""));
        assert!(html.contains("name=\"q\""));
    }

    #[test]
    fn search_redirect_targets_the_proxied_article() {
        let html = render_search_redirect("naval history");
        assert!(html.contains(
            "/read?a=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2Fnaval_history"
        ));
        assert!(html.contains("meta http-equiv=\"refresh\""));
        assert!(html.contains("naval history"));
    }

    #[test]
    fn article_page_interpolates_title_and_body() {
        let article = TransformedArticle {
            title: "Cat".to_string(),
            body: "<p>A small animal.</p>".to_string(),
        };
        let html = render_article(&article, "https://en.wikipedia.org/wiki/Cat");
        assert!(html.contains("<h1>Cat</h1>"));
        assert!(html.contains("<p>A small animal.</p>"));
        assert!(html.contains("value=\"https://en.wikipedia.org/wiki/Cat\""));
    }

    #[test]
    fn error_page_keeps_the_browse_form() {
        let html = render_error("https://example.com/x");
        assert!(html.contains("Failed to get the article"));
        assert!(html.contains("value=\"https://example.com/x\""));
    }
}
