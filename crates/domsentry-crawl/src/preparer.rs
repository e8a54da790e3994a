//! Page preparer: gets a newly-opened page into a stable, fully-settled
//! state before any detector touches it.
//!
//! Grounded on `riptide-headless/src/pool.rs`'s wait-for-idle-then-settle
//! idiom: a pooled browser page already treats "navigation finished"
//! and "page is actually ready" as two different waits.

use domsentry_driver::{BrowserDriver, ConsoleHandler, PageErrorHandler, PageHandle};
use domsentry_types::{AuditError, Result, Viewport};
use std::time::Duration;
use tracing::debug;

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const SCROLL_STEP_PAUSE: Duration = Duration::from_millis(200);
const POST_IDLE_PAUSE: Duration = Duration::from_millis(500);
const SETTLE_PAUSE: Duration = Duration::from_millis(2000);
const ANIMATION_EXTRA_PAUSE: Duration = Duration::from_millis(1000);
const FINAL_PAUSE: Duration = Duration::from_millis(300);

const ANIMATION_PROBE_SCRIPT: &str = r#"
(() => {
  const els = document.querySelectorAll('*');
  for (const el of els) {
    const style = getComputedStyle(el);
    if (style.animationName && style.animationName !== 'none') return true;
    if (style.transitionProperty && style.transitionProperty !== 'none' && style.transitionDuration !== '0s') return true;
    if (el.className && typeof el.className === 'string' && el.className.includes('animate-')) return true;
    if (el.hasAttribute('data-framer-motion')) return true;
  }
  return false;
})()
"#;

/// Navigate a fresh page, let its content settle, and hand back the
/// stable [`PageHandle`] ready for detectors.
///
/// `console_handler`/`page_error_handler`, when given, are installed
/// before navigation so no early console activity is missed.
pub async fn prepare_page(
    driver: &dyn BrowserDriver,
    url: &str,
    viewport: Viewport,
    console_handler: Option<ConsoleHandler>,
    page_error_handler: Option<PageErrorHandler>,
) -> Result<Box<dyn PageHandle>> {
    let page = driver
        .new_page()
        .await
        .map_err(|e| AuditError::BrowserLaunchFailed(e.to_string()))?;

    if let Some(handler) = console_handler {
        page.on_console(handler);
    }
    if let Some(handler) = page_error_handler {
        page.on_page_error(handler);
    }

    if let Err(err) = run_pipeline(page.as_ref(), url, viewport).await {
        let _ = page.close().await;
        return Err(err);
    }

    Ok(page)
}

async fn run_pipeline(page: &dyn PageHandle, url: &str, viewport: Viewport) -> Result<()> {
    let outcome = page
        .goto(url, NAVIGATION_TIMEOUT)
        .await
        .map_err(|e| AuditError::PageLoadFailed {
            status: None,
            message: e.to_string(),
        })?;

    if !outcome.ok {
        return Err(AuditError::PageLoadFailed {
            status: outcome.status,
            message: format!("response was absent or non-ok for {url}"),
        });
    }

    page.set_viewport(viewport.width, viewport.height)
        .await
        .map_err(|e| AuditError::PageUnresponsive(e.to_string()))?;

    scroll_sweep(page).await?;
    wait_for_stability(page).await?;

    Ok(())
}

async fn scroll_sweep(page: &dyn PageHandle) -> Result<()> {
    let dims = page
        .evaluate("({ height: document.body.scrollHeight, viewport: window.innerHeight })")
        .await
        .map_err(|e| AuditError::ScriptEvalFailed(e.to_string()))?;

    let viewport_height = dims.get("viewport").and_then(|v| v.as_f64()).unwrap_or(0.0);

    let steps = [0.0, viewport_height / 2.0, viewport_height];
    for y in steps {
        let script = format!("window.scrollTo(0, {y})");
        page.evaluate(&script)
            .await
            .map_err(|e| AuditError::ScriptEvalFailed(e.to_string()))?;
        tokio::time::sleep(SCROLL_STEP_PAUSE).await;
    }

    page.evaluate("window.scrollTo(0, 0)")
        .await
        .map_err(|e| AuditError::ScriptEvalFailed(e.to_string()))?;

    Ok(())
}

async fn wait_for_stability(page: &dyn PageHandle) -> Result<()> {
    page.wait_for_idle(NAVIGATION_TIMEOUT)
        .await
        .map_err(|e| AuditError::PageUnresponsive(e.to_string()))?;

    tokio::time::sleep(POST_IDLE_PAUSE).await;
    tokio::time::sleep(SETTLE_PAUSE).await;

    let animating = page
        .evaluate(ANIMATION_PROBE_SCRIPT)
        .await
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if animating {
        debug!("page has in-progress animations, pausing longer");
        tokio::time::sleep(ANIMATION_EXTRA_PAUSE).await;
    }

    page.evaluate("window.scrollTo(0, 0)")
        .await
        .map_err(|e| AuditError::ScriptEvalFailed(e.to_string()))?;
    tokio::time::sleep(FINAL_PAUSE).await;

    Ok(())
}
