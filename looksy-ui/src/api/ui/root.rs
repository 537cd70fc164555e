//! Landing page handler

use axum::response::{Html, IntoResponse};

/// GET /
///
/// Marketing landing page with the demo entry point
pub async fn landing_page() -> impl IntoResponse {
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_profile = env!("BUILD_PROFILE");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Looksy — See the Style Before the Cut</title>
    <link rel="stylesheet" href="/static/looksy-ui.css">
</head>
<body>
    <header>
        <span class="logo">Looksy</span>
        <a href="/dashboard"><button>Try Demo</button></a>
    </header>

    <main class="container">
        <div class="card">
            <h1>See the Style <em>Before</em> the Cut</h1>
            <p>
                Looksy is a demo prototype that uses artificial intelligence to
                preview hairstyles on real photos — helping barbers and customers
                visualize the result before a single cut is made.
            </p>
            <p style="margin-top: 16px;">
                <a href="/dashboard"><button>Try the Demo</button></a>
            </p>
        </div>

        <div class="card">
            <h2>How It Works</h2>
            <ol style="margin: 12px 0 0 20px;">
                <li><b>Upload Photos</b> — capture 6 photos of your customer from different angles</li>
                <li><b>AI Analysis</b> — the AI analyzes hair type, density, and suitability</li>
                <li><b>Choose Style</b> — browse eligible hairstyles matched to the customer</li>
                <li><b>Preview Result</b> — see the hairstyle on the customer before cutting</li>
            </ol>
        </div>
    </main>

    <footer>
        looksy-ui v{version} · {git_hash} · {build_timestamp} · {build_profile}
    </footer>
</body>
</html>
"#
    );

    Html(html)
}
