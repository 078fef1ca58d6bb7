use anyhow::Result;
use httpmock::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use taplist::config::SmokeSettings;
use taplist::domain::ports::ToolProbe;
use taplist::{
    BrowserProbe, HeadlessBrowserInspector, HealthCheck, HealthCheckConfig, RendererKind,
    TaplistError,
};

// 需要本機安裝 Chromium/Chrome，找不到時略過
fn installed_browser() -> Option<PathBuf> {
    let binary = BrowserProbe::from_env(None).locate();
    if binary.is_none() {
        eprintln!("no headless browser installed, skipping");
    }
    binary
}

fn check_for(base_url: String, path: &str, binary: PathBuf) -> Result<HealthCheck<HeadlessBrowserInspector>> {
    let config = HealthCheckConfig::from_settings(SmokeSettings {
        base_url: Some(base_url),
        pages: Some(vec![path.to_string()]),
        renderer: Some(RendererKind::Browser),
        timeout_secs: Some(5),
        ..SmokeSettings::default()
    });
    let inspector = HeadlessBrowserInspector::new(binary, Duration::from_secs(5));
    Ok(HealthCheck::new(config, inspector)?)
}

fn serve(server: &MockServer, path: &str, body: &str) {
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(200)
            .header("Content-Type", "text/html")
            .body(body);
    });
}

#[tokio::test]
async fn test_script_mounted_root_passes() -> Result<()> {
    let Some(binary) = installed_browser() else {
        return Ok(());
    };
    let server = MockServer::start();
    serve(
        &server,
        "/",
        r#"<!doctype html><html><body class="dark">
<div id="root"></div>
<script>
  setTimeout(function () {
    document.getElementById("root").innerHTML = "<section><h2>Tap 1</h2></section>";
  }, 200);
</script>
</body></html>"#,
    );

    let report = check_for(server.base_url(), "/", binary)?.run().await?;
    assert_eq!(report.renderer, "browser");
    assert_eq!(report.pages[0].theme_class, "dark");
    Ok(())
}

#[tokio::test]
async fn test_stylesheet_and_ancestor_hiding_fail() -> Result<()> {
    let Some(binary) = installed_browser() else {
        return Ok(());
    };
    let server = MockServer::start();
    serve(
        &server,
        "/stylesheet",
        r#"<html><head><style>.hidden { display: none; }</style></head>
<body class="dark"><div id="root" class="hidden">Taps</div></body></html>"#,
    );
    serve(
        &server,
        "/ancestor",
        r#"<html><body class="dark"><main style="display:none"><div id="root">Taps</div></main></body></html>"#,
    );

    for path in ["/stylesheet", "/ancestor"] {
        let err = check_for(server.base_url(), path, binary.clone())?
            .run()
            .await
            .unwrap_err();
        assert!(
            matches!(err, TaplistError::RootNotVisible { .. }),
            "{} should fail as hidden, got {}",
            path,
            err
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_template_root_is_not_found() -> Result<()> {
    let Some(binary) = installed_browser() else {
        return Ok(());
    };
    let server = MockServer::start();
    serve(
        &server,
        "/",
        r#"<html><body class="dark"><template><div id="root">Taps</div></template></body></html>"#,
    );

    let err = check_for(server.base_url(), "/", binary)?.run().await.unwrap_err();
    assert!(matches!(err, TaplistError::RootNotVisible { ref reason, .. } if reason.contains("not found")));
    Ok(())
}

#[tokio::test]
async fn test_not_found_page_fails_navigation() -> Result<()> {
    let Some(binary) = installed_browser() else {
        return Ok(());
    };
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admin.html");
        then.status(404).body("missing");
    });

    let err = check_for(server.base_url(), "/admin.html", binary)?
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, TaplistError::NavigationFailed { ref message, .. } if message.contains("404")));
    Ok(())
}

#[tokio::test]
async fn test_closed_port_fails_navigation() -> Result<()> {
    let Some(binary) = installed_browser() else {
        return Ok(());
    };
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let base_url = format!("http://127.0.0.1:{}", listener.local_addr()?.port());
    drop(listener);

    let err = check_for(base_url, "/", binary)?.run().await.unwrap_err();
    assert!(matches!(err, TaplistError::NavigationFailed { .. }));
    Ok(())
}
