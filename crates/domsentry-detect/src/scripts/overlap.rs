//! Driver scripts for the overlap detector.

/// Returns the filtered candidate element list: interactive controls,
/// media, headings, paragraphs, list items, spans, named UI classes,
/// and navigation containers, with the size/visibility/positioning
/// filters applied in-page.
pub const ELEMENTS_SCRIPT: &str = r#"
(() => {
  const SELECTOR = [
    'a', 'button', 'input', 'select', 'textarea', 'img', 'video', 'svg',
    'h1', 'h2', 'h3', 'h4', 'h5', 'h6', 'p', 'li', 'span',
    '.card', '.btn', '.nav-item', '.menu-item', '.logo', '.brand',
    'nav', 'header', '.navbar', '.navigation',
  ].join(',');

  const isNavLike = (el) => /nav|header|menu|navigation|navbar|logo|brand/i.test(
    (el.className || '') + ' ' + el.tagName
  );

  const out = [];
  for (const el of document.querySelectorAll(SELECTOR)) {
    const rect = el.getBoundingClientRect();
    if (rect.width < 10 || rect.height < 10) continue;

    const style = getComputedStyle(el);
    if (style.display === 'none' || style.visibility === 'hidden' || style.opacity === '0') continue;
    if (el.getAttribute('aria-hidden') === 'true') continue;

    const navLike = isNavLike(el);
    if (!navLike) {
      const zIndex = parseInt(style.zIndex, 10);
      if (!Number.isNaN(zIndex) && zIndex > 1) continue;
      if (style.position === 'absolute' && el.parentElement) {
        const parentStyle = getComputedStyle(el.parentElement);
        if (parentStyle.position === 'relative') continue;
      }
    }

    out.push({
      selector: el.tagName.toLowerCase() + (el.className ? '.' + String(el.className).split(' ').join('.') : ''),
      bounds: { x: rect.left, y: rect.top, width: rect.width, height: rect.height },
      isFixed: style.position === 'fixed',
      textContent: (el.textContent || '').trim().slice(0, 80) || null,
    });
  }
  return out;
})()
"#;

/// Scroll offsets, needed to reconcile fixed vs. non-fixed element
/// coordinates.
pub const SCROLL_OFFSET_SCRIPT: &str = "({ x: window.scrollX, y: window.scrollY })";

/// The "header sweep": presentational elements near the top of the
/// viewport (`top < 150px`), paired and intersected, returning the
/// top-10 overlapping pairs by percentage.
pub const HEADER_SWEEP_SCRIPT: &str = r#"
(() => {
  const els = Array.from(document.querySelectorAll('a, button, nav, header, .logo, .brand, .nav-item, .menu-item'))
    .map((el) => ({ el, rect: el.getBoundingClientRect() }))
    .filter(({ rect }) => rect.top < 150 && rect.width > 0 && rect.height > 0);

  const pairs = [];
  for (let i = 0; i < els.length; i++) {
    for (let j = i + 1; j < els.length; j++) {
      const a = els[i].rect;
      const b = els[j].rect;
      const x1 = Math.max(a.left, b.left);
      const y1 = Math.max(a.top, b.top);
      const x2 = Math.min(a.right, b.right);
      const y2 = Math.min(a.bottom, b.bottom);
      if (x2 <= x1 || y2 <= y1) continue;
      const overlapArea = (x2 - x1) * (y2 - y1);
      const smaller = Math.min(a.width * a.height, b.width * b.height);
      const pct = smaller > 0 ? (100 * overlapArea) / smaller : 0;
      if (pct > 20) {
        pairs.push({
          a: { selector: els[i].el.tagName.toLowerCase(), bounds: { x: a.left, y: a.top, width: a.width, height: a.height } },
          b: { selector: els[j].el.tagName.toLowerCase(), bounds: { x: b.left, y: b.top, width: b.width, height: b.height } },
          percentage: pct,
        });
      }
    }
  }
  pairs.sort((p, q) => q.percentage - p.percentage);
  return pairs.slice(0, 10);
})()
"#;
