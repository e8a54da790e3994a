//! Driver script for the (opt-in) centering detector.

pub const CENTERING_CANDIDATES_SCRIPT: &str = r#"
(() => {
  const out = [];
  const all = document.querySelectorAll('*');
  for (const el of all) {
    const parent = el.parentElement;
    if (!parent) continue;
    const className = String(el.className || '').toLowerCase();
    const style = getComputedStyle(el);
    const parentStyle = getComputedStyle(parent);

    const marginAuto = style.marginLeft === 'auto' && style.marginRight === 'auto';
    const classIntent = className.includes('center') || className.includes('mx-auto');
    const parentCenters = (parentStyle.display.includes('flex') && parentStyle.justifyContent === 'center')
      || (parentStyle.display === 'grid' && parentStyle.justifyItems === 'center');
    if (!marginAuto && !classIntent && !parentCenters) continue;

    const rect = el.getBoundingClientRect();
    if (rect.width === 0 || rect.height === 0) continue;
    const parentRect = parent.getBoundingClientRect();

    out.push({
      selector: el.tagName.toLowerCase() + (el.className ? '.' + String(el.className).split(' ').join('.') : ''),
      bounds: { x: rect.left, y: rect.top, width: rect.width, height: rect.height },
      parentBounds: { x: parentRect.left, y: parentRect.top, width: parentRect.width, height: parentRect.height },
    });
  }
  return out;
})()
"#;
