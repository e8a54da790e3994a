//! Driver script for the spacing detector.

pub const SPACING_ELEMENTS_SCRIPT: &str = r#"
(() => {
  const SELECTOR = "a, button, input[type='button'], input[type='submit'], input[type='checkbox'], input[type='radio'], img, footer a, nav a";
  const out = [];
  for (const el of document.querySelectorAll(SELECTOR)) {
    const rect = el.getBoundingClientRect();
    if (rect.width === 0 && rect.height === 0) continue;
    const style = getComputedStyle(el);
    const parent = el.parentElement;
    out.push({
      selector: el.tagName.toLowerCase() + (el.className ? '.' + String(el.className).split(' ').join('.') : ''),
      bounds: { x: rect.left, y: rect.top, width: rect.width, height: rect.height },
      parentSelector: parent ? (parent.tagName.toLowerCase() + (parent.className ? '.' + String(parent.className).split(' ').join('.') : '')) : '',
      isInline: style.display.includes('inline'),
      textContent: (el.textContent || '').trim().slice(0, 40) || null,
    });
  }
  return out;
})()
"#;
