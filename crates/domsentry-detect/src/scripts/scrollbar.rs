//! Driver script for the scrollbar detector.

pub const SCROLLBAR_SCRIPT: &str = r#"
(() => {
  const body = document.body;
  const docEl = document.documentElement;
  const viewportWidth = window.innerWidth;
  const viewportHeight = window.innerHeight;
  const docWidth = Math.max(body.scrollWidth, docEl.scrollWidth, body.offsetWidth, docEl.offsetWidth, body.clientWidth, docEl.clientWidth);
  const docHeight = Math.max(body.scrollHeight, docEl.scrollHeight, body.offsetHeight, docEl.offsetHeight, body.clientHeight, docEl.clientHeight);

  let causingSelector = null;
  let causingOverhang = 0;
  const candidates = document.querySelectorAll('body > *, .container, .wrapper, main, #content');
  for (const el of candidates) {
    const rect = el.getBoundingClientRect();
    const overhang = rect.right - viewportWidth;
    if (overhang > causingOverhang) {
      causingOverhang = overhang;
      causingSelector = el.tagName.toLowerCase() + (el.className ? '.' + String(el.className).split(' ').join('.') : '');
    }
  }

  return {
    viewportWidth,
    viewportHeight,
    docWidth,
    docHeight,
    causingSelector,
  };
})()
"#;
