//! Barber dashboard page handler
//!
//! Static shell; the workflow is driven by /static/dashboard.js against the
//! JSON API and the per-session SSE stream.

use axum::response::{Html, IntoResponse};

/// GET /dashboard
pub async fn dashboard_page() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Looksy — Barber Dashboard</title>
    <link rel="stylesheet" href="/static/looksy-ui.css">
</head>
<body>
    <header>
        <span class="logo">Looksy</span>
        <span>
            <button id="new-session" class="ghost">New Session</button>
            <button id="logout" class="ghost">Logout</button>
        </span>
    </header>

    <main class="container">
        <div class="step-indicator">
            <span class="step">1 · Upload</span>
            <span class="step">2 · Analysis</span>
            <span class="step">3 · Select</span>
            <span class="step">4 · Preview</span>
        </div>

        <div id="error-box" class="error-box hidden"></div>

        <section id="upload-section">
            <div class="card">
                <h2>Customer Photo Upload</h2>
                <p>Capture 6 photos of your customer from different angles for accurate hair analysis.</p>
            </div>
            <div id="photo-grid" class="photo-grid"></div>
            <div class="card" style="margin-top: 24px; display: flex; justify-content: space-between; align-items: center;">
                <span id="upload-count">0/6</span>
                <button id="submit-analysis" disabled>Submit for Analysis</button>
            </div>
        </section>

        <section id="analyzing-section" class="hidden">
            <div class="card">
                <h2>Analyzing Hair</h2>
                <p>Our AI is examining the photos to determine the best hairstyles.</p>
                <div id="analysis-steps" class="progress-steps" style="margin-top: 16px;">
                    <div class="row">Detecting face and hair region</div>
                    <div class="row">Analyzing hair type and texture</div>
                    <div class="row">Measuring hair density</div>
                    <div class="row">Evaluating hairline condition</div>
                    <div class="row">Matching suitable hairstyles</div>
                </div>
                <p id="analysis-current" style="margin-top: 12px;"></p>
                <button id="retry-analysis" style="margin-top: 16px;">Retry Analysis</button>
            </div>
        </section>

        <section id="gallery-section" class="hidden">
            <div class="card">
                <h2>Hair Analysis Results</h2>
                <p id="analysis-summary"></p>
            </div>
            <div class="card">
                <h3>Recommended Styles</h3>
                <div id="eligible-grid" class="style-grid" style="margin-top: 12px;"></div>
            </div>
            <div class="card">
                <h3>Not Recommended</h3>
                <div id="ineligible-grid" class="style-grid" style="margin-top: 12px;"></div>
            </div>
        </section>

        <section id="preview-section" class="hidden">
            <div class="card">
                <h2>Preview: <span id="preview-style-name"></span></h2>
                <p id="preview-busy">Generating preview — the AI is working its magic...</p>
                <div id="preview-result" class="hidden">
                    <img id="preview-image" class="preview-image" alt="Generated Preview">
                    <p>Suitability Score: <span id="preview-score" class="score"></span></p>
                    <p id="preview-explanation"></p>
                </div>
                <p style="margin-top: 16px;">
                    <button id="back-to-gallery" class="ghost">Back to Styles</button>
                    <button id="retry-generation" class="hidden">Try Again</button>
                </p>
            </div>
        </section>
    </main>

    <script src="/static/dashboard.js"></script>
</body>
</html>
"#,
    )
}
