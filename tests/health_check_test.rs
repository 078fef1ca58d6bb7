use anyhow::Result;
use httpmock::prelude::*;
use taplist::config::SmokeSettings;
use std::time::Duration;
use taplist::{HealthCheck, HealthCheckConfig, RendererKind, StaticInspector, TaplistError};

const DISPLAY_PAGE: &str = r#"<!doctype html>
<html lang="en">
  <head><title>On Tap</title><script type="module" src="/assets/display.js"></script></head>
  <body class="dark bg-neutral-950">
    <div id="root"><section class="taps"><h2>Tap 1</h2></section></div>
  </body>
</html>"#;

fn config_for(base_url: String, pages: &[&str]) -> HealthCheckConfig {
    HealthCheckConfig::from_settings(SmokeSettings {
        base_url: Some(base_url),
        pages: Some(pages.iter().map(|p| p.to_string()).collect()),
        renderer: Some(RendererKind::Static),
        timeout_secs: Some(5),
        ..SmokeSettings::default()
    })
}

fn static_inspector() -> StaticInspector {
    StaticInspector::new(Duration::from_secs(5)).unwrap()
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_served_display_bundle_passes() -> Result<()> {
    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(DISPLAY_PAGE);
    });

    let check = HealthCheck::new(config_for(server.base_url(), &["/"]), static_inspector())?;
    let report = check.run().await?;

    page_mock.assert();
    assert_eq!(report.renderer, "static");
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].theme_class, "dark");
    Ok(())
}

#[tokio::test]
async fn test_display_and_admin_entries_checked_separately() -> Result<()> {
    let server = MockServer::start();
    let display = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(DISPLAY_PAGE);
    });
    let admin = server.mock(|when, then| {
        when.method(GET).path("/admin.html");
        then.status(200)
            .body(r#"<html><body class="bg-white"><div id="root"><form></form></div></body></html>"#);
    });

    let check = HealthCheck::new(
        config_for(server.base_url(), &["/", "/admin.html"]),
        static_inspector(),
    )?;
    let report = check.run().await?;

    display.assert();
    admin.assert();
    assert_eq!(report.pages[1].theme_class, "bg-white");
    assert!(report.pages[1].url.ends_with("/admin.html"));
    Ok(())
}

#[tokio::test]
async fn test_unmounted_root_fails() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .body(r#"<html><body class="dark"><div id="root"></div></body></html>"#);
    });

    let check = HealthCheck::new(config_for(server.base_url(), &["/"]), static_inspector())?;
    let err = check.run().await.unwrap_err();
    assert!(matches!(err, TaplistError::RootNotVisible { .. }));
    assert_eq!(err.severity().exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_hidden_root_markup_fails() -> Result<()> {
    let pages = [
        ("/class", r#"<body class="dark"><div id="root" class="hidden">Taps</div></body>"#),
        ("/ancestor", r#"<body class="dark"><main style="display:none"><div id="root">Taps</div></main></body>"#),
        ("/template", r#"<body class="dark"><template><div id="root">Taps</div></template></body>"#),
    ];
    let server = MockServer::start();
    for (path, body) in pages {
        server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(200).body(body);
        });
    }

    for (path, _) in pages {
        let check = HealthCheck::new(config_for(server.base_url(), &[path]), static_inspector())?;
        let err = check.run().await.unwrap_err();
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
async fn test_unthemed_body_fails() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .body(r#"<html><body class="font-sans"><div id="root">Taps</div></body></html>"#);
    });

    let check = HealthCheck::new(config_for(server.base_url(), &["/"]), static_inspector())?;
    let err = check.run().await.unwrap_err();
    assert!(matches!(err, TaplistError::ThemeMissing { ref classes, .. } if classes == "font-sans"));
    Ok(())
}

#[tokio::test]
async fn test_not_found_is_navigation_failure() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admin.html");
        then.status(404);
    });

    let check = HealthCheck::new(config_for(server.base_url(), &["/admin.html"]), static_inspector())?;
    let err = check.run().await.unwrap_err();
    assert!(matches!(err, TaplistError::NavigationFailed { ref message, .. } if message.contains("404")));
    Ok(())
}

#[tokio::test]
async fn test_non_listening_port_fails_navigation() -> Result<()> {
    let check = HealthCheck::new(config_for(closed_port_url(), &["/"]), static_inspector())?;
    let err = check.run().await.unwrap_err();

    assert!(matches!(err, TaplistError::NavigationFailed { .. }));
    assert_ne!(err.severity().exit_code(), 0);
    Ok(())
}

#[test]
fn test_invalid_config_rejected_before_running() {
    let mut config = config_for("http://localhost:4173".to_string(), &["/"]);
    config.theme_pattern = "([".to_string();
    assert!(HealthCheck::new(config, static_inspector()).is_err());
}
